//! Excursion tracking for an open trade.
//!
//! Accumulates per-bar signed log-returns since entry and maintains the
//! running high-water mark and the maximum drawdown from it. Created on
//! trade entry, discarded on exit; the final [`TradeStats`] snapshot
//! travels with the exit decision.

use serde::{Deserialize, Serialize};

/// Final excursion figures of a trade, frozen at exit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    pub cumulative_return: f64,
    pub high_water: f64,
    pub max_drawdown: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ExcursionTracker {
    cumulative_return: f64,
    high_water: f64,
    max_drawdown: f64,
}

impl ExcursionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one bar's signed log-return (sign flipped for shorts by the
    /// caller so that "up" always means "in our favor").
    pub fn push(&mut self, signed_return: f64) {
        self.cumulative_return += signed_return;
        if self.cumulative_return > self.high_water {
            self.high_water = self.cumulative_return;
        }
        let drawdown = self.high_water - self.cumulative_return;
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }
    }

    /// Cumulative signed log-return since entry.
    pub fn cumulative_return(&self) -> f64 {
        self.cumulative_return
    }

    /// Best cumulative return seen since entry (never negative: the
    /// high-water starts at the zero return of the entry itself).
    pub fn high_water(&self) -> f64 {
        self.high_water
    }

    /// Largest peak-to-trough fall in cumulative return since entry.
    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    /// Snapshot the current figures, e.g. at trade exit.
    pub fn stats(&self) -> TradeStats {
        TradeStats {
            cumulative_return: self.cumulative_return,
            high_water: self.high_water,
            max_drawdown: self.max_drawdown,
        }
    }
}
