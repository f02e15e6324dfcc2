//! The twist/break engine: per-bar evaluation over streaming closes.

use tracing::{debug, info};

use crate::config::{ConfigError, TwistBreakConfig};
use crate::domain::{Bar, Direction};
use crate::indicators::{ExcursionTracker, RollingMean};

use super::state::{Phase, SignalState, TradeState, TwistState};
use super::Decision;

/// Streaming twist/break signal engine.
///
/// Owns one [`SignalState`] and three rolling means. Strictly
/// sequential: the host must deliver bars one at a time in increasing
/// timestamp order and must not share one engine across instruments.
///
/// # Exit rule
/// Open positions close on price thresholds against the entry cost:
/// take-profit at `cost * (1 ± win_pct)` and stop-loss at
/// `cost * (1 ∓ loss_pct)` by direction. The per-trade excursion
/// accumulators (high-water, max drawdown of the signed log-return) are
/// maintained for observation and reported with the exit event, but do
/// not drive the exit themselves.
#[derive(Debug)]
pub struct TwistBreakEngine {
    config: TwistBreakConfig,
    short_ma: RollingMean,
    mid_ma: RollingMean,
    long_ma: RollingMean,
    state: SignalState,
}

impl TwistBreakEngine {
    /// Build an engine, failing fast on a malformed configuration.
    pub fn new(config: TwistBreakConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let short_ma = RollingMean::new(config.short_window);
        let mid_ma = RollingMean::new(config.mid_window);
        let long_ma = RollingMean::new(config.long_window);
        Ok(Self {
            config,
            short_ma,
            mid_ma,
            long_ma,
            state: SignalState::new(),
        })
    }

    pub fn config(&self) -> &TwistBreakConfig {
        &self.config
    }

    pub fn state(&self) -> &SignalState {
        &self.state
    }

    /// Evaluate one bar.
    ///
    /// `position_amount` is the host's current position size for this
    /// instrument (positive long, negative short, zero flat). The engine
    /// never tracks fills itself, so exits are only evaluated once the
    /// host reports the position as open — with next-bar execution that
    /// means the entry bar itself never exits.
    ///
    /// Invalid bars (zero, negative, or non-finite close) are skipped
    /// without mutating any state.
    pub fn on_bar(&mut self, bar: &Bar, position_amount: f64) -> Decision {
        if !bar.is_valid() {
            debug!(timestamp = %bar.timestamp, close = bar.close, "skipping invalid bar");
            return Decision::NoAction;
        }
        let close = bar.close;

        let bar_return = self.state.previous_close.map(|prev| (close / prev).ln());
        self.state.previous_close = Some(close);

        self.short_ma.push(close);
        self.mid_ma.push(close);
        self.long_ma.push(close);
        self.state.bar_count += 1;

        // Warm-up guard: the long window must be full before the base
        // price means anything.
        if !self.long_ma.is_full() {
            return Decision::NoAction;
        }

        let (Some(short), Some(mid), Some(long)) =
            (self.short_ma.mean(), self.mid_ma.mean(), self.long_ma.mean())
        else {
            return Decision::NoAction;
        };

        let base_price = (short + mid + long) / 3.0;
        if !base_price.is_finite() || base_price <= 0.0 {
            // A non-positive base price would make the convergence ratio
            // meaningless; treat the bar as a feed glitch.
            debug!(timestamp = %bar.timestamp, base_price, "skipping bar with degenerate base price");
            return Decision::NoAction;
        }

        let spread = (short - long)
            .abs()
            .max((mid - long).abs())
            .max((short - mid).abs());
        let ratio = spread / base_price;

        self.detect_twist(bar, close, base_price, ratio);

        let decision = self.check_break(bar, close);
        if decision.is_action() {
            return decision;
        }
        self.check_exit(bar, close, bar_return, position_amount)
    }

    /// Record a twist when the three averages converge and the close
    /// diverges from their mean. While already twisted, only a strictly
    /// tighter convergence replaces the recorded twist (ties keep the
    /// earlier one). Never fires while a position is open.
    fn detect_twist(&mut self, bar: &Bar, close: f64, base_price: f64, ratio: f64) {
        if ratio > self.config.twist_threshold {
            return;
        }
        let direction = if close > (1.0 + self.config.direction_threshold) * base_price {
            Direction::Long
        } else if close < (1.0 - self.config.direction_threshold) * base_price {
            Direction::Short
        } else {
            return;
        };

        match &mut self.state.phase {
            Phase::Flat => {
                info!(
                    timestamp = %bar.timestamp,
                    ratio,
                    twist_price = base_price,
                    direction = ?direction,
                    "twist recorded"
                );
                self.state.phase = Phase::Twisted(TwistState {
                    direction,
                    ratio,
                    twist_price: base_price,
                    bars_since_twist: 0,
                });
            }
            Phase::Twisted(twist) => {
                if ratio < twist.ratio {
                    info!(
                        timestamp = %bar.timestamp,
                        ratio,
                        previous_ratio = twist.ratio,
                        twist_price = base_price,
                        direction = ?direction,
                        "twist tightened"
                    );
                    *twist = TwistState {
                        direction,
                        ratio,
                        twist_price: base_price,
                        bars_since_twist: 0,
                    };
                }
            }
            Phase::Traded(_) => {}
        }
    }

    /// While armed, wait up to `max_twist_window` bars for the close to
    /// break away from the twist price; open a full-size position on the
    /// break, or quietly disarm on timeout.
    fn check_break(&mut self, bar: &Bar, close: f64) -> Decision {
        let Phase::Twisted(twist) = &mut self.state.phase else {
            return Decision::NoAction;
        };

        if twist.bars_since_twist > self.config.max_twist_window {
            info!(
                timestamp = %bar.timestamp,
                waited = twist.bars_since_twist,
                "twist timed out without a break"
            );
            self.state.phase = Phase::Flat;
            return Decision::NoAction;
        }
        twist.bars_since_twist += 1;

        let broke = match twist.direction {
            Direction::Long => close >= (1.0 + self.config.break_threshold) * twist.twist_price,
            Direction::Short => close <= (1.0 - self.config.break_threshold) * twist.twist_price,
        };
        if !broke {
            return Decision::NoAction;
        }

        let twist = twist.clone();
        let decision = match twist.direction {
            Direction::Long => Decision::OpenLong {
                size: self.config.position_size,
            },
            Direction::Short => Decision::OpenShort {
                size: self.config.position_size,
            },
        };
        info!(
            timestamp = %bar.timestamp,
            cost_price = close,
            twist_price = twist.twist_price,
            direction = ?twist.direction,
            "break confirmed, opening position"
        );
        self.state.phase = Phase::Traded(TradeState {
            twist,
            cost_price: close,
            excursion: ExcursionTracker::new(),
        });
        decision
    }

    /// Price-threshold exits for the open position, once the host
    /// reports it as actually held.
    fn check_exit(
        &mut self,
        bar: &Bar,
        close: f64,
        bar_return: Option<f64>,
        position_amount: f64,
    ) -> Decision {
        let Phase::Traded(trade) = &mut self.state.phase else {
            return Decision::NoAction;
        };
        if position_amount == 0.0 {
            // Entry decision not yet executed by the host.
            return Decision::NoAction;
        }

        if let Some(r) = bar_return {
            trade.excursion.push(trade.twist.direction.sign() * r);
        }

        let cost = trade.cost_price;
        let (take_profit, stop_loss) = match trade.twist.direction {
            Direction::Long => (
                close >= cost * (1.0 + self.config.win_pct),
                close <= cost * (1.0 - self.config.loss_pct),
            ),
            Direction::Short => (
                close <= cost * (1.0 - self.config.win_pct),
                close >= cost * (1.0 + self.config.loss_pct),
            ),
        };
        if !(take_profit || stop_loss) {
            return Decision::NoAction;
        }

        let stats = trade.excursion.stats();
        info!(
            timestamp = %bar.timestamp,
            close,
            cost_price = cost,
            direction = ?trade.twist.direction,
            reason = if take_profit { "take_profit" } else { "stop_loss" },
            cumulative_return = stats.cumulative_return,
            high_water = stats.high_water,
            max_drawdown = stats.max_drawdown,
            "closing position"
        );
        self.state.phase = Phase::Flat;
        Decision::ClosePosition { stats }
    }
}
