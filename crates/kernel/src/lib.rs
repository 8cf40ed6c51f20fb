//! Pond Kernel: authoritative food and turtle state, per-tick behavior, deferred timers.
//!
//! # Invariants
//! - A tick is atomic: observers only ever see registries between ticks.
//! - Targets are food ids resolved through the food registry, never owned.
//! - Timers and contacts naming entities that no longer exist are no-ops.
//! - Only configuration can fail; the tick absorbs every anomaly.

pub mod collision;
pub mod config;
pub mod event;
pub mod food;
pub mod movement;
pub mod simulation;
pub mod snapshot;
pub mod steering;
pub mod timer;
pub mod turtle;

pub use collision::{Contact, ContactKind};
pub use config::{ConfigError, SimConfig};
pub use event::SimEvent;
pub use food::{Food, FoodRegistry};
pub use movement::MovementBackend;
pub use simulation::{Simulation, TickReport};
pub use snapshot::{FoodView, FrameSnapshot, TurtleView};
pub use steering::{AcceleratedPursuit, DirectPursuit, DriveCommand, Steering, SteeringMode};
pub use timer::{TimerAction, TimerQueue};
pub use turtle::{GrowthCurve, Phase, Turtle, TurtleRegistry};
