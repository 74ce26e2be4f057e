//! Scheduler configuration and validation.

use std::fmt;

use crate::speed::{MAX_MANUAL_RATE, MIN_RATE, SETTLE_SECONDS};

// ── InteractiveConfig ──────────────────────────────────────────────

/// Configuration for [`InteractivePlayer`](crate::InteractivePlayer).
#[derive(Clone, Debug, PartialEq)]
pub struct InteractiveConfig {
    /// Playback rate in events per second, within
    /// `[MIN_RATE, MAX_MANUAL_RATE]`. Default: 15.
    pub rate: f64,
    /// Ticks per second the caller drives the player at. Default: 60.
    pub tick_rate_hz: f64,
    /// Rates at or below this are wall-clock gated (one event per
    /// `1/rate` seconds); above it each tick applies a batch. Default: 1000.
    pub batch_threshold: f64,
    /// Desired total playback time in seconds. When set, the rate is
    /// derived from the event count (see [`auto_speed`](crate::auto_speed)).
    pub target_duration: Option<f64>,
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self {
            rate: 15.0,
            tick_rate_hz: 60.0,
            batch_threshold: 1000.0,
            target_duration: None,
        }
    }
}

impl InteractiveConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate(self.rate)?;
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(ConfigError::InvalidTickRate {
                value: self.tick_rate_hz,
            });
        }
        if !(self.batch_threshold.is_finite() && self.batch_threshold > 0.0) {
            return Err(ConfigError::InvalidBatchThreshold {
                value: self.batch_threshold,
            });
        }
        check_target(self.target_duration)
    }
}

// ── ExportConfig ───────────────────────────────────────────────────

/// Configuration for [`Exporter`](crate::Exporter).
#[derive(Clone, Debug, PartialEq)]
pub struct ExportConfig {
    /// Frames per second of the exported sequence. Default: 30.
    pub fps: u32,
    /// Playback rate in events per second. Default: 50.
    pub rate: f64,
    /// Seconds the terminal state is held after the last event. Default: 3.
    pub settle_seconds: f64,
    /// Desired total length in seconds, settle period included. When set,
    /// the rate is derived from the event count.
    pub target_duration: Option<f64>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            rate: 50.0,
            settle_seconds: SETTLE_SECONDS,
            target_duration: None,
        }
    }
}

impl ExportConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        check_rate(self.rate)?;
        if !(self.settle_seconds.is_finite() && self.settle_seconds >= 0.0) {
            return Err(ConfigError::InvalidSettle {
                value: self.settle_seconds,
            });
        }
        check_target(self.target_duration)
    }

    /// Number of extra ticks spent on the terminal state.
    pub fn settle_ticks(&self) -> u64 {
        (self.settle_seconds * f64::from(self.fps)).round() as u64
    }
}

fn check_rate(rate: f64) -> Result<(), ConfigError> {
    if (MIN_RATE..=MAX_MANUAL_RATE).contains(&rate) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { value: rate })
    }
}

fn check_target(target: Option<f64>) -> Result<(), ConfigError> {
    match target {
        Some(value) if !(value.is_finite() && value > 0.0) => {
            Err(ConfigError::InvalidTargetDuration { value })
        }
        _ => Ok(()),
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected when validating scheduler configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Rate is outside `[MIN_RATE, MAX_MANUAL_RATE]` or not a number.
    InvalidRate {
        /// The invalid value.
        value: f64,
    },
    /// Tick rate is not a positive finite number.
    InvalidTickRate {
        /// The invalid value.
        value: f64,
    },
    /// Batch threshold is not a positive finite number.
    InvalidBatchThreshold {
        /// The invalid value.
        value: f64,
    },
    /// Frame rate is zero.
    ZeroFps,
    /// Settle period is negative or not finite.
    InvalidSettle {
        /// The invalid value.
        value: f64,
    },
    /// Target duration is not a positive finite number.
    InvalidTargetDuration {
        /// The invalid value.
        value: f64,
    },
    /// The replay configuration was rejected.
    Replay(coreplay_replay::ConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRate { value } => {
                write!(
                    f,
                    "rate must be between {MIN_RATE} and {MAX_MANUAL_RATE:e} events/s, got {value}"
                )
            }
            Self::InvalidTickRate { value } => {
                write!(f, "tick rate must be positive, got {value}")
            }
            Self::InvalidBatchThreshold { value } => {
                write!(f, "batch threshold must be positive, got {value}")
            }
            Self::ZeroFps => write!(f, "frame rate must be at least 1"),
            Self::InvalidSettle { value } => {
                write!(f, "settle period must be non-negative, got {value}")
            }
            Self::InvalidTargetDuration { value } => {
                write!(f, "target duration must be positive, got {value}")
            }
            Self::Replay(e) => write!(f, "replay config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Replay(e) => Some(e),
            _ => None,
        }
    }
}

impl From<coreplay_replay::ConfigError> for ConfigError {
    fn from(e: coreplay_replay::ConfigError) -> Self {
        Self::Replay(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(InteractiveConfig::default().validate(), Ok(()));
        assert_eq!(ExportConfig::default().validate(), Ok(()));
    }

    #[test]
    fn interactive_rejects_bad_values() {
        let base = InteractiveConfig::default();
        let cfg = InteractiveConfig {
            rate: 0.0,
            ..base.clone()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidRate { .. })));

        let cfg = InteractiveConfig {
            tick_rate_hz: f64::NAN,
            ..base.clone()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidTickRate { .. })
        ));

        let cfg = InteractiveConfig {
            target_duration: Some(-1.0),
            ..base
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidTargetDuration { .. })
        ));
    }

    #[test]
    fn export_rejects_bad_values() {
        let base = ExportConfig::default();
        let cfg = ExportConfig {
            fps: 0,
            ..base.clone()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroFps));

        let cfg = ExportConfig {
            settle_seconds: -0.5,
            ..base.clone()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidSettle { .. })
        ));

        let cfg = ExportConfig {
            rate: f64::INFINITY,
            ..base
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidRate { .. })));
    }

    #[test]
    fn rate_must_lie_in_operating_band() {
        for rate in [1e-20, 0.099, 1e17, f64::NAN] {
            let cfg = InteractiveConfig {
                rate,
                ..InteractiveConfig::default()
            };
            assert!(
                matches!(cfg.validate(), Err(ConfigError::InvalidRate { .. })),
                "rate {rate} accepted"
            );
        }
        for rate in [MIN_RATE, 1.0, MAX_MANUAL_RATE] {
            let cfg = ExportConfig {
                rate,
                ..ExportConfig::default()
            };
            assert_eq!(cfg.validate(), Ok(()));
        }
    }

    #[test]
    fn settle_ticks_is_seconds_times_fps() {
        assert_eq!(ExportConfig::default().settle_ticks(), 90);
        let cfg = ExportConfig {
            fps: 24,
            settle_seconds: 0.0,
            ..ExportConfig::default()
        };
        assert_eq!(cfg.settle_ticks(), 0);
    }

    #[test]
    fn replay_errors_convert() {
        let e: ConfigError = coreplay_replay::ConfigError::ZeroTrailCapacity.into();
        assert!(e.to_string().starts_with("replay config"));
    }
}
