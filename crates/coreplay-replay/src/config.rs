//! Replay tuning knobs and their validation.

use std::fmt;

/// Shape of the decaying markers kept in [`ArenaState`](crate::ArenaState).
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayConfig {
    /// Maximum execution-trail length. Default: 30.
    pub trail_capacity: usize,
    /// Multiplier applied to every decay factor per tick, in `(0, 1)`. Default: 0.8.
    pub damping: f32,
    /// Markers whose decay drops below this are removed, in `(0, 1)`. Default: 0.1.
    pub decay_floor: f32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            trail_capacity: 30,
            damping: 0.8,
            decay_floor: 0.1,
        }
    }
}

impl ReplayConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trail_capacity == 0 {
            return Err(ConfigError::ZeroTrailCapacity);
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(ConfigError::InvalidDamping {
                value: self.damping,
            });
        }
        if !(self.decay_floor > 0.0 && self.decay_floor < 1.0) {
            return Err(ConfigError::InvalidDecayFloor {
                value: self.decay_floor,
            });
        }
        Ok(())
    }
}

/// Errors detected by [`ReplayConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Trail capacity is zero.
    ZeroTrailCapacity,
    /// Damping is NaN or outside `(0, 1)`.
    InvalidDamping {
        /// The invalid value.
        value: f32,
    },
    /// Decay floor is NaN or outside `(0, 1)`.
    InvalidDecayFloor {
        /// The invalid value.
        value: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTrailCapacity => write!(f, "execution trail capacity must be at least 1"),
            Self::InvalidDamping { value } => {
                write!(f, "damping must be in (0, 1), got {value}")
            }
            Self::InvalidDecayFloor { value } => {
                write!(f, "decay floor must be in (0, 1), got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
