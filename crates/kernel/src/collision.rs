use pond_common::{EntityRef, FoodId, TurtleId};
use serde::{Deserialize, Serialize};

/// A pairwise overlap reported by the host's collision detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: EntityRef,
    pub b: EntityRef,
}

/// A contact with its participants put in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    TurtleFood(TurtleId, FoodId),
    PlayerFood(FoodId),
    TurtleTurtle(TurtleId, TurtleId),
    PlayerTurtle(TurtleId),
    /// Food against food, or a body against itself.
    Unrouted,
}

impl Contact {
    pub fn new(a: EntityRef, b: EntityRef) -> Self {
        Self { a, b }
    }

    pub fn kind(&self) -> ContactKind {
        use EntityRef::{Food, Player, Turtle};
        match (self.a, self.b) {
            (Turtle(t), Food(f)) | (Food(f), Turtle(t)) => ContactKind::TurtleFood(t, f),
            (Player, Food(f)) | (Food(f), Player) => ContactKind::PlayerFood(f),
            (Turtle(x), Turtle(y)) if x != y => ContactKind::TurtleTurtle(x.min(y), x.max(y)),
            (Player, Turtle(t)) | (Turtle(t), Player) => ContactKind::PlayerTurtle(t),
            _ => ContactKind::Unrouted,
        }
    }
}
