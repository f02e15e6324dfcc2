//! Bar — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single close-price bar, one per discrete time step.
///
/// Minute bars in the original feed, but the engine only assumes strictly
/// increasing timestamps. Volume is carried for observation and is not
/// used by the signal logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Bar {
    pub fn new(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self {
            timestamp,
            close,
            volume: None,
        }
    }

    /// A bar is valid iff its close is finite and strictly positive.
    ///
    /// Zero closes are bad feed ticks (they would divide a log-return by
    /// zero); negative or non-finite prints are treated the same way.
    pub fn is_valid(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}
