//! TwistBreak Core — triple moving-average twist/break signal engine.
//!
//! This crate contains the signal logic and nothing else:
//! - Domain types (bars, decisions, directions)
//! - O(1) rolling indicators (ring-buffer mean, excursion tracker)
//! - The twist/break state machine (`Flat → Twisted → Traded → Flat`)
//! - Engine configuration with fail-fast validation
//!
//! The engine is driven synchronously, one bar at a time, by an external
//! host that owns data replay, order placement, and position bookkeeping.
//! It returns a [`signal::Decision`] per bar and performs no I/O of its
//! own beyond `tracing` event observation.

pub mod config;
pub mod domain;
pub mod indicators;
pub mod signal;

pub use config::{ConfigError, TwistBreakConfig};
pub use signal::{Decision, TwistBreakEngine};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: engine and domain types are Send + Sync.
    ///
    /// Each instrument owns an independent engine, so embedding one per
    /// worker thread in a multi-instrument host must stay possible.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Direction>();
        require_sync::<domain::Direction>();
        require_send::<signal::Decision>();
        require_sync::<signal::Decision>();
        require_send::<signal::SignalState>();
        require_sync::<signal::SignalState>();
        require_send::<TwistBreakEngine>();
        require_sync::<TwistBreakEngine>();
        require_send::<TwistBreakConfig>();
        require_sync::<TwistBreakConfig>();
        require_send::<indicators::RollingMean>();
        require_sync::<indicators::RollingMean>();
        require_send::<indicators::ExcursionTracker>();
        require_sync::<indicators::ExcursionTracker>();
    }

    /// Architecture contract: `on_bar` takes the host-reported position
    /// size as a plain input and returns a decision — the engine never
    /// holds a portfolio reference. If someone adds one, this signature
    /// check breaks loudly.
    #[test]
    fn engine_has_no_portfolio_dependency() {
        fn _check(
            engine: &mut TwistBreakEngine,
            bar: &domain::Bar,
            position_amount: f64,
        ) -> Decision {
            engine.on_bar(bar, position_amount)
        }
    }
}
