use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Movement command handed to the movement backend for one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveCommand {
    /// Set the velocity outright.
    Velocity(Vec2),
    /// Accelerate, letting the backend cap speed at `max_speed` and apply drag.
    Acceleration { acceleration: Vec2, max_speed: f32 },
    /// Zero velocity and zero acceleration.
    Halt,
}

impl DriveCommand {
    /// Commanded velocity, zero for acceleration-based and halt commands.
    pub fn velocity(&self) -> Vec2 {
        match self {
            Self::Velocity(v) => *v,
            _ => Vec2::ZERO,
        }
    }

    pub fn acceleration(&self) -> Vec2 {
        match self {
            Self::Acceleration { acceleration, .. } => *acceleration,
            _ => Vec2::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.velocity() == Vec2::ZERO && self.acceleration() == Vec2::ZERO
    }
}

/// Computes how a body should move toward a target.
///
/// `target == None` must always yield [`DriveCommand::Halt`].
pub trait Steering: Send + Sync {
    fn steer(
        &self,
        position: Vec2,
        speed: f32,
        max_speed: f32,
        target: Option<Vec2>,
    ) -> DriveCommand;

    fn name(&self) -> &'static str;
}

/// Snap-to-heading pursuit: full speed straight at the target, every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPursuit;

impl Steering for DirectPursuit {
    fn steer(
        &self,
        position: Vec2,
        speed: f32,
        _max_speed: f32,
        target: Option<Vec2>,
    ) -> DriveCommand {
        match target {
            Some(target) => {
                DriveCommand::Velocity((target - position).normalize_or_zero() * speed)
            }
            None => DriveCommand::Halt,
        }
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

/// Acceleration toward the target, capped at `max_speed`. The backend's drag
/// gives a damped approach with slight overshoot.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceleratedPursuit;

impl Steering for AcceleratedPursuit {
    fn steer(
        &self,
        position: Vec2,
        speed: f32,
        max_speed: f32,
        target: Option<Vec2>,
    ) -> DriveCommand {
        match target {
            Some(target) => DriveCommand::Acceleration {
                acceleration: (target - position).normalize_or_zero() * speed,
                max_speed,
            },
            None => DriveCommand::Halt,
        }
    }

    fn name(&self) -> &'static str {
        "accelerated"
    }
}

/// Config-level choice of steering strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SteeringMode {
    #[default]
    Direct,
    Accelerated,
}

impl SteeringMode {
    pub fn build(self) -> Box<dyn Steering> {
        match self {
            Self::Direct => Box::new(DirectPursuit),
            Self::Accelerated => Box::new(AcceleratedPursuit),
        }
    }
}
