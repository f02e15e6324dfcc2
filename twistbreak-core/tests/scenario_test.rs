//! End-to-end twist → break → take-profit scenario.
//!
//! Replays the full lifecycle against a host-style driver: constant
//! warm-up, slow convergence with a divergent close (twist), a rising
//! run that crosses the break threshold (entry), and a final bar beyond
//! the take-profit target (exit). Position bookkeeping mirrors next-bar
//! execution: decisions take effect on the bar after they are emitted.

use chrono::{Duration, TimeZone, Utc};
use twistbreak_core::domain::{Bar, Direction};
use twistbreak_core::{Decision, TwistBreakConfig, TwistBreakEngine};

fn make_bar(index: usize, close: f64) -> Bar {
    let base = Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap();
    Bar::new(base + Duration::minutes(index as i64), close)
}

fn scenario_config() -> TwistBreakConfig {
    TwistBreakConfig {
        short_window: 10,
        mid_window: 30,
        long_window: 120,
        twist_threshold: 0.0008,
        direction_threshold: 0.0006,
        break_threshold: 0.008,
        max_twist_window: 30,
        win_pct: 0.02,
        loss_pct: 0.006,
        position_size: 1.0,
    }
}

/// Minimal order-sink stand-in: applies the engine's own decisions as
/// the position reported on the following bar.
struct Host {
    engine: TwistBreakEngine,
    position: f64,
    next_index: usize,
}

impl Host {
    fn new(config: TwistBreakConfig) -> Self {
        Self {
            engine: TwistBreakEngine::new(config).unwrap(),
            position: 0.0,
            next_index: 0,
        }
    }

    fn step(&mut self, close: f64) -> Decision {
        let bar = make_bar(self.next_index, close);
        self.next_index += 1;
        let decision = self.engine.on_bar(&bar, self.position);
        match decision {
            Decision::OpenLong { size } => self.position = size,
            Decision::OpenShort { size } => self.position = -size,
            Decision::ClosePosition { .. } => self.position = 0.0,
            Decision::NoAction => {}
        }
        decision
    }
}

#[test]
fn full_lifecycle_twist_break_take_profit() {
    let mut host = Host::new(scenario_config());

    // Warm-up: 120 constant bars. No decision, no twist.
    for _ in 0..120 {
        assert_eq!(host.step(100.0), Decision::NoAction);
        assert!(!host.engine.state().is_twisted());
    }

    // One bar at 100.1: averages are still converged
    // (ratio ≈ 9.2e-5 ≤ 0.0008) while the close clears the direction
    // band above the base price (~100.0047) → twist Long.
    assert_eq!(host.step(100.1), Decision::NoAction);
    assert!(host.engine.state().is_twisted());
    assert_eq!(host.engine.state().direction(), Some(Direction::Long));
    let ratio = host.engine.state().twisted_ratio().unwrap();
    assert!(ratio > 0.0 && ratio <= 0.0008, "unexpected twist ratio {ratio}");

    // Rise toward the break level (1.008 × twist price ≈ 100.8048)
    // without crossing it.
    for close in [100.3, 100.45, 100.6, 100.75] {
        assert_eq!(host.step(close), Decision::NoAction);
        assert!(host.engine.state().is_twisted());
        assert!(!host.engine.state().is_traded());
    }

    // The crossing bar opens the long.
    let entry_close = 100.1 * 1.009;
    assert_eq!(host.step(entry_close), Decision::OpenLong { size: 1.0 });
    assert!(host.engine.state().is_traded());
    assert_eq!(host.engine.state().cost_price(), Some(entry_close));

    // One bar past the +2% target: take-profit closes the position and
    // fully resets twist and trade state. The close carries the trade's
    // final excursion figures.
    let decision = host.step(entry_close * 1.021);
    let Decision::ClosePosition { stats } = decision else {
        panic!("expected close, got {decision:?}");
    };
    assert!(stats.cumulative_return > 0.02, "winning trade must show its gain");
    assert!(stats.high_water >= stats.cumulative_return - 1e-12);
    assert_eq!(host.position, 0.0);
    assert!(!host.engine.state().is_traded());
    assert!(!host.engine.state().is_twisted());
    assert!(host.engine.state().cost_price().is_none());
}

#[test]
fn downward_scenario_is_symmetric() {
    let mut host = Host::new(scenario_config());

    for _ in 0..120 {
        host.step(100.0);
    }

    // Divergence below the base price arms a short twist.
    host.step(99.9);
    assert_eq!(host.engine.state().direction(), Some(Direction::Short));

    // Break level ≈ 0.992 × twist price ≈ 99.196.
    for close in [99.7, 99.55, 99.4, 99.25] {
        assert_eq!(host.step(close), Decision::NoAction);
    }
    let entry_close = 99.9 * 0.991;
    assert_eq!(host.step(entry_close), Decision::OpenShort { size: 1.0 });

    // Stop-loss for a short is a rise of loss_pct above cost; the price
    // moved against the short, so the loss shows up in the stats.
    let decision = host.step(entry_close * 1.0061);
    let Decision::ClosePosition { stats } = decision else {
        panic!("expected close, got {decision:?}");
    };
    assert!(stats.cumulative_return < 0.0);
    assert!(stats.max_drawdown > 0.0);
    assert!(!host.engine.state().is_twisted());
}

#[test]
fn twist_timeout_leaves_no_trace() {
    let config = TwistBreakConfig {
        max_twist_window: 5,
        ..scenario_config()
    };
    let mut host = Host::new(config);

    for _ in 0..120 {
        host.step(100.0);
    }
    host.step(100.1);
    assert!(host.engine.state().is_twisted());

    // Drift sideways below the break level until the window expires.
    // The twist must clear without any decision ever firing.
    let mut cleared_at = None;
    for i in 0..30 {
        let decision = host.step(100.1);
        assert_eq!(decision, Decision::NoAction);
        if !host.engine.state().is_twisted() {
            cleared_at = Some(i);
            break;
        }
    }
    assert!(cleared_at.is_some(), "twist never timed out");
    assert!(host.engine.state().twisted_ratio().is_none());
    assert!(host.engine.state().direction().is_none());
}
