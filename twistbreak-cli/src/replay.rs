//! Bar-by-bar replay of the engine over a loaded feed.
//!
//! The replay is the order-sink stand-in: it applies the engine's own
//! decisions as the position reported on the following bar (next-bar
//! execution), so the engine never sees its entry bar as already
//! filled. No fill simulation, no P&L accounting — position targets
//! only.

use chrono::{DateTime, Utc};
use tracing::info;
use twistbreak_core::domain::{Bar, Direction};
use twistbreak_core::indicators::TradeStats;
use twistbreak_core::{Decision, TwistBreakEngine};

/// One completed (or still open) trade observed during replay.
#[derive(Debug, Clone)]
pub struct TradeRecord {
    pub direction: Direction,
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_time: Option<DateTime<Utc>>,
    pub exit_price: Option<f64>,
    /// Excursion figures carried by the engine's close decision.
    pub stats: Option<TradeStats>,
}

#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub bars: usize,
    pub skipped_bars: usize,
    pub twists: usize,
    pub trades: Vec<TradeRecord>,
}

impl ReplaySummary {
    pub fn closed_trades(&self) -> usize {
        self.trades.iter().filter(|t| t.exit_time.is_some()).count()
    }
}

/// Drive the engine over the whole feed and collect what happened.
pub fn replay(engine: &mut TwistBreakEngine, bars: &[Bar]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    let mut position = 0.0_f64;

    for bar in bars {
        summary.bars += 1;
        if !bar.is_valid() {
            summary.skipped_bars += 1;
        }

        let was_twisted = engine.state().is_twisted();
        let decision = engine.on_bar(bar, position);
        if !was_twisted && engine.state().is_twisted() {
            summary.twists += 1;
        }

        match decision {
            Decision::NoAction => {}
            Decision::OpenLong { size } => {
                position = size;
                summary.trades.push(TradeRecord {
                    direction: Direction::Long,
                    entry_time: bar.timestamp,
                    entry_price: bar.close,
                    exit_time: None,
                    exit_price: None,
                    stats: None,
                });
            }
            Decision::OpenShort { size } => {
                position = -size;
                summary.trades.push(TradeRecord {
                    direction: Direction::Short,
                    entry_time: bar.timestamp,
                    entry_price: bar.close,
                    exit_time: None,
                    exit_price: None,
                    stats: None,
                });
            }
            Decision::ClosePosition { stats } => {
                position = 0.0;
                if let Some(open) = summary.trades.iter_mut().rev().find(|t| t.exit_time.is_none())
                {
                    open.exit_time = Some(bar.timestamp);
                    open.exit_price = Some(bar.close);
                    open.stats = Some(stats);
                }
            }
        }
    }

    info!(
        bars = summary.bars,
        skipped = summary.skipped_bars,
        twists = summary.twists,
        trades = summary.trades.len(),
        closed = summary.closed_trades(),
        "replay finished"
    );
    summary
}
