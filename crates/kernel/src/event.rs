use glam::Vec2;
use pond_common::{FoodId, TurtleId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A record produced by every registry mutation.
///
/// The log is observational: hosts drain it for logging or debugging overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    TurtleSpawned { id: TurtleId, position: Vec2 },
    FoodSpawned { id: FoodId, position: Vec2 },
    /// `by` ate `food`; the replacement is due at `respawn_at`.
    FoodConsumed {
        food: FoodId,
        by: TurtleId,
        respawn_at: Duration,
    },
    TurtleRested {
        id: TurtleId,
        size: u32,
        wake_at: Duration,
    },
    TurtleWoke { id: TurtleId },
    /// Simulation advanced one tick; `elapsed` is the clock after the tick.
    Stepped { tick: u64, elapsed: Duration },
}
