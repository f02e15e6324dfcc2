//! Mutable per-instrument signal state.
//!
//! One `SignalState` per strategy instance, created at run start,
//! mutated bar-by-bar, discarded at run end. The phase machine makes the
//! lifecycle explicit: `Flat → Twisted → Traded → Flat`. Twist fields
//! exist iff the phase is Twisted or Traded; the cost price and
//! excursion accumulators exist iff Traded, created on the
//! `Twisted → Traded` edge and dropped on any transition back to Flat.

use crate::domain::Direction;
use crate::indicators::ExcursionTracker;

/// A recorded convergence of the three moving averages.
#[derive(Debug, Clone)]
pub struct TwistState {
    /// Divergence sign of the close against the base price at detection.
    pub direction: Direction,
    /// Tightest convergence ratio observed since the twist was recorded.
    pub ratio: f64,
    /// Base price (mean of the three averages) at detection; the break
    /// threshold is measured against this reference.
    pub twist_price: f64,
    /// Bars elapsed since detection, reset on each tighter re-twist.
    pub bars_since_twist: usize,
}

/// An open position produced by a confirmed break.
#[derive(Debug, Clone)]
pub struct TradeState {
    /// The twist that produced this trade, frozen at entry.
    pub twist: TwistState,
    /// Close price of the entry bar.
    pub cost_price: f64,
    /// Per-trade return/drawdown accumulators, reported at exit.
    pub excursion: ExcursionTracker,
}

/// Where the strategy currently is in its lifecycle.
#[derive(Debug, Clone, Default)]
pub enum Phase {
    #[default]
    Flat,
    Twisted(TwistState),
    Traded(TradeState),
}

/// Full mutable state of one engine instance.
#[derive(Debug, Clone, Default)]
pub struct SignalState {
    /// Valid bars observed so far (invalid bars do not count).
    pub bar_count: u64,
    /// Last valid close, for log-return computation.
    pub previous_close: Option<f64>,
    pub phase: Phase,
}

impl SignalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True from twist detection until break, timeout, or exit. A trade
    /// keeps its originating twist alive, so this also holds while
    /// traded.
    pub fn is_twisted(&self) -> bool {
        matches!(self.phase, Phase::Twisted(_) | Phase::Traded(_))
    }

    pub fn is_traded(&self) -> bool {
        matches!(self.phase, Phase::Traded(_))
    }

    /// Recorded direction, defined iff twisted.
    pub fn direction(&self) -> Option<Direction> {
        match &self.phase {
            Phase::Flat => None,
            Phase::Twisted(twist) => Some(twist.direction),
            Phase::Traded(trade) => Some(trade.twist.direction),
        }
    }

    /// Tightest convergence ratio of the live twist, defined iff twisted.
    pub fn twisted_ratio(&self) -> Option<f64> {
        match &self.phase {
            Phase::Flat => None,
            Phase::Twisted(twist) => Some(twist.ratio),
            Phase::Traded(trade) => Some(trade.twist.ratio),
        }
    }

    /// Entry price of the open position, defined iff traded.
    pub fn cost_price(&self) -> Option<f64> {
        match &self.phase {
            Phase::Traded(trade) => Some(trade.cost_price),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_flat() {
        let state = SignalState::new();
        assert_eq!(state.bar_count, 0);
        assert!(state.previous_close.is_none());
        assert!(!state.is_twisted());
        assert!(!state.is_traded());
        assert!(state.direction().is_none());
        assert!(state.twisted_ratio().is_none());
        assert!(state.cost_price().is_none());
    }

    #[test]
    fn twisted_state_exposes_twist_fields() {
        let state = SignalState {
            phase: Phase::Twisted(TwistState {
                direction: Direction::Long,
                ratio: 0.0004,
                twist_price: 100.0,
                bars_since_twist: 2,
            }),
            ..Default::default()
        };
        assert!(state.is_twisted());
        assert!(!state.is_traded());
        assert_eq!(state.direction(), Some(Direction::Long));
        assert_eq!(state.twisted_ratio(), Some(0.0004));
        assert!(state.cost_price().is_none());
    }

    #[test]
    fn traded_state_keeps_twist_alive() {
        let state = SignalState {
            phase: Phase::Traded(TradeState {
                twist: TwistState {
                    direction: Direction::Short,
                    ratio: 0.0002,
                    twist_price: 100.0,
                    bars_since_twist: 4,
                },
                cost_price: 98.3,
                excursion: ExcursionTracker::new(),
            }),
            ..Default::default()
        };
        assert!(state.is_twisted());
        assert!(state.is_traded());
        assert_eq!(state.direction(), Some(Direction::Short));
        assert_eq!(state.cost_price(), Some(98.3));
    }
}
