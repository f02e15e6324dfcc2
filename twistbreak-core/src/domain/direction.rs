//! Directional intent recorded at twist detection.

use serde::{Deserialize, Serialize};

/// Which way the close diverged from the base price when the three
/// moving averages converged. Valid only while a twist (or the trade it
/// produced) is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Sign applied to per-bar log-returns when feeding excursion
    /// accumulators: a short position profits from negative returns.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_convention() {
        assert_eq!(Direction::Long.sign(), 1.0);
        assert_eq!(Direction::Short.sign(), -1.0);
    }

    #[test]
    fn direction_serialization_roundtrip() {
        let json = serde_json::to_string(&Direction::Short).unwrap();
        let deser: Direction = serde_json::from_str(&json).unwrap();
        assert_eq!(deser, Direction::Short);
    }
}
