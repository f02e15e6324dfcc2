//! Twist/break signal generation.
//!
//! The engine watches three nested moving averages of the close. When
//! all three converge (a "twist") and the close diverges from their
//! average, a directional setup is armed; a subsequent move beyond the
//! break threshold opens a position, and price-threshold exits close it.
//!
//! The engine is portfolio-agnostic: it receives the host's current
//! position size as a plain input and emits decisions — it never places
//! orders, never does I/O, and never keeps portfolio state of its own.

pub mod engine;
pub mod state;

pub use engine::TwistBreakEngine;
pub use state::{Phase, SignalState, TradeState, TwistState};

use crate::indicators::TradeStats;
use serde::{Deserialize, Serialize};

/// Per-bar output of the engine.
///
/// `size` is the position target the host should move to, as a fraction
/// of portfolio (the host owns the unit and the actual order placement).
/// A close carries the final excursion figures of the trade it ends, so
/// hosts can report them without reaching into engine state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decision {
    NoAction,
    OpenLong { size: f64 },
    OpenShort { size: f64 },
    ClosePosition { stats: TradeStats },
}

impl Decision {
    pub fn is_action(&self) -> bool {
        !matches!(self, Decision::NoAction)
    }
}
