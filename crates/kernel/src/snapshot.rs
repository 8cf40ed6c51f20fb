use glam::Vec2;
use pond_common::{FoodId, TurtleId};
use serde::{Deserialize, Serialize};

use crate::turtle::Phase;

/// Read-only projection of one turtle, including its indicator data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurtleView {
    pub id: TurtleId,
    pub position: Vec2,
    pub phase: Phase,
    pub size: u32,
    pub speed: f32,
    pub scale: f32,
    pub target: Option<FoodId>,
    /// Where to draw the target highlight. Only set while hunting a live food.
    pub target_marker: Option<Vec2>,
}

impl TurtleView {
    /// Text for the phase/size label.
    pub fn label(&self) -> String {
        format!("{} x{}", self.phase, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodView {
    pub id: FoodId,
    pub position: Vec2,
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub elapsed_ms: u64,
    pub turtles: Vec<TurtleView>,
    pub foods: Vec<FoodView>,
}

impl FrameSnapshot {
    pub fn turtle(&self, id: TurtleId) -> Option<&TurtleView> {
        self.turtles.iter().find(|t| t.id == id)
    }
}
