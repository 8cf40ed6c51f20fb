use glam::Vec2;
use pond_common::Arena;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::steering::SteeringMode;

/// Errors from validating a [`SimConfig`]. Surfaced once, at setup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("arena must have positive extent, got {width}x{height}")]
    NonPositiveArena { width: f32, height: f32 },
    #[error("arena bounds must be finite, got {min:?}..{max:?}")]
    NonFiniteArena { min: Vec2, max: Vec2 },
    #[error("arena extent overflows f32, got {width}x{height}")]
    ArenaTooLarge { width: f32, height: f32 },
    #[error("{name} must not be negative, got {value}ms")]
    NegativeDelay { name: &'static str, value: i64 },
    #[error("rest window is inverted: min {min}ms > max {max}ms")]
    InvertedRestWindow { min: i64, max: i64 },
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidSpeedTerm { name: &'static str, value: f32 },
    #[error("base_speed must be positive, got {0}")]
    NonPositiveBaseSpeed(f32),
}

/// Tunable constants of the simulation.
///
/// Every field has a default, so a config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub arena: Arena,
    /// Wait between a food being eaten and its replacement appearing.
    pub food_respawn_delay_ms: i64,
    /// Rest duration is drawn uniformly from `[rest_min_ms, rest_max_ms]`.
    pub rest_min_ms: i64,
    pub rest_max_ms: i64,
    pub base_speed: f32,
    pub speed_floor: f32,
    /// Speed lost per unit of size.
    pub size_penalty: f32,
    /// Visual scale handed to renderers is `size * scale_per_size`.
    pub scale_per_size: f32,
    pub initial_turtle_count: usize,
    pub initial_food_count: usize,
    pub seed: u64,
    pub steering: SteeringMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            food_respawn_delay_ms: 1000,
            rest_min_ms: 1000,
            rest_max_ms: 3000,
            base_speed: 170.0,
            speed_floor: 10.0,
            size_penalty: 5.0,
            scale_per_size: 1.0,
            initial_turtle_count: 4,
            initial_food_count: 5,
            seed: 0,
            steering: SteeringMode::Direct,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Arena { min, max } = self.arena;
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::NonFiniteArena { min, max });
        }
        let (width, height) = (self.arena.width(), self.arena.height());
        if !width.is_finite() || !height.is_finite() {
            return Err(ConfigError::ArenaTooLarge { width, height });
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::NonPositiveArena { width, height });
        }

        for (name, value) in [
            ("food_respawn_delay_ms", self.food_respawn_delay_ms),
            ("rest_min_ms", self.rest_min_ms),
            ("rest_max_ms", self.rest_max_ms),
        ] {
            if value < 0 {
                return Err(ConfigError::NegativeDelay { name, value });
            }
        }
        if self.rest_min_ms > self.rest_max_ms {
            return Err(ConfigError::InvertedRestWindow {
                min: self.rest_min_ms,
                max: self.rest_max_ms,
            });
        }

        for (name, value) in [
            ("base_speed", self.base_speed),
            ("speed_floor", self.speed_floor),
            ("size_penalty", self.size_penalty),
            ("scale_per_size", self.scale_per_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSpeedTerm { name, value });
            }
        }
        if self.base_speed <= 0.0 {
            return Err(ConfigError::NonPositiveBaseSpeed(self.base_speed));
        }
        Ok(())
    }

    /// Only meaningful after [`SimConfig::validate`] succeeded.
    pub fn respawn_delay(&self) -> Duration {
        Duration::from_millis(self.food_respawn_delay_ms.max(0) as u64)
    }

    /// Inclusive bounds of the rest duration, in milliseconds.
    pub fn rest_window_ms(&self) -> (u64, u64) {
        (self.rest_min_ms.max(0) as u64, self.rest_max_ms.max(0) as u64)
    }
}
