//! Streaming indicators.
//!
//! Unlike batch indicators that precompute a full series, these are
//! push-based accumulators: the engine feeds them one value per bar and
//! reads the current result in O(1). They never see invalid closes —
//! the engine filters those before pushing.

pub mod excursion;
pub mod rolling_mean;

pub use excursion::{ExcursionTracker, TradeStats};
pub use rolling_mean::RollingMean;
