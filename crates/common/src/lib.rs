//! Shared types for the pond simulation: entity identity and arena geometry.

pub mod types;

pub use types::{Arena, EntityRef, FoodId, TurtleId};
