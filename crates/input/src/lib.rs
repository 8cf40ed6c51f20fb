//! Player Input: directional intent mapped to a player velocity.
//!
//! # Invariants
//! - The player moves at the same speed in every direction, diagonals included.
//! - Input never touches the simulation registries; it only drives the player body.

pub mod intent;
pub mod player;

pub use intent::{DirectionalInput, InputError};
pub use player::PlayerController;
