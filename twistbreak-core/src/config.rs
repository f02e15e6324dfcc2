//! Engine configuration with fail-fast validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters of the twist/break strategy.
///
/// Defaults are the constants the strategy originally traded BTC/USD
/// minute bars with. All fields are plain data; validation happens once
/// at engine construction, never silently during the bar loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwistBreakConfig {
    /// Short moving-average window (bars).
    pub short_window: usize,
    /// Mid moving-average window (bars).
    pub mid_window: usize,
    /// Long moving-average window (bars). Also the warm-up length: no
    /// signal fires before this many valid bars have been seen.
    pub long_window: usize,
    /// Max relative spread of the three averages that counts as a twist.
    pub twist_threshold: f64,
    /// Relative divergence of close from base price that sets direction.
    pub direction_threshold: f64,
    /// Relative move from the twist price that confirms a break.
    pub break_threshold: f64,
    /// Bars a twist stays armed waiting for a break before timing out.
    pub max_twist_window: usize,
    /// Take-profit: close a long at `cost * (1 + win_pct)`, a short at
    /// `cost * (1 - win_pct)`.
    pub win_pct: f64,
    /// Stop-loss: close a long at `cost * (1 - loss_pct)`, a short at
    /// `cost * (1 + loss_pct)`.
    pub loss_pct: f64,
    /// Position target emitted on a break, as a fraction of portfolio
    /// (1.0 = fully invested). The host interprets the unit.
    pub position_size: f64,
}

impl Default for TwistBreakConfig {
    fn default() -> Self {
        Self {
            short_window: 10,
            mid_window: 30,
            long_window: 120,
            twist_threshold: 0.001,
            direction_threshold: 0.001,
            break_threshold: 0.015,
            max_twist_window: 10,
            win_pct: 0.30,
            loss_pct: 0.006,
            position_size: 1.0,
        }
    }
}

impl TwistBreakConfig {
    /// Check every invariant the bar loop relies on.
    ///
    /// The base-price computation assumes three distinct nested
    /// horizons, so the windows must be strictly increasing; thresholds
    /// and percentages must be positive and finite or the comparison
    /// arithmetic degenerates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_window == 0 {
            return Err(ConfigError::NonPositiveWindow { name: "short_window" });
        }
        if !(self.short_window < self.mid_window && self.mid_window < self.long_window) {
            return Err(ConfigError::WindowsNotNested {
                short: self.short_window,
                mid: self.mid_window,
                long: self.long_window,
            });
        }
        for (name, value) in [
            ("twist_threshold", self.twist_threshold),
            ("direction_threshold", self.direction_threshold),
            ("break_threshold", self.break_threshold),
            ("win_pct", self.win_pct),
            ("loss_pct", self.loss_pct),
            ("position_size", self.position_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Construction-time configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be >= 1")]
    NonPositiveWindow { name: &'static str },

    #[error(
        "moving-average windows must be strictly nested \
         (short < mid < long), got {short}/{mid}/{long}"
    )]
    WindowsNotNested {
        short: usize,
        mid: usize,
        long: usize,
    },

    #[error("{name} must be positive and finite, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(TwistBreakConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_short_window() {
        let cfg = TwistBreakConfig {
            short_window: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositiveWindow { name: "short_window" })
        ));
    }

    #[test]
    fn rejects_unordered_windows() {
        let cfg = TwistBreakConfig {
            short_window: 30,
            mid_window: 30,
            long_window: 120,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::WindowsNotNested { .. })
        ));

        let cfg = TwistBreakConfig {
            short_window: 10,
            mid_window: 130,
            long_window: 120,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_thresholds() {
        for field in ["twist", "break", "loss"] {
            let mut cfg = TwistBreakConfig::default();
            match field {
                "twist" => cfg.twist_threshold = 0.0,
                "break" => cfg.break_threshold = -0.01,
                _ => cfg.loss_pct = f64::NAN,
            }
            assert!(
                matches!(cfg.validate(), Err(ConfigError::NonPositiveParameter { .. })),
                "expected rejection for {field}"
            );
        }
    }

    #[test]
    fn partial_config_fills_defaults() {
        // serde(default) lets a partial config file override only some
        // fields; the CLI relies on this for TOML overrides.
        let cfg: TwistBreakConfig = serde_json::from_str(r#"{"win_pct": 0.02}"#).unwrap();
        assert_eq!(cfg.win_pct, 0.02);
        assert_eq!(cfg.long_window, 120);
        assert!(cfg.validate().is_ok());
    }
}
