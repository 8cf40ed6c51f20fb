use glam::Vec2;
use pond_common::EntityRef;
use pond_kernel::MovementBackend;

use crate::intent::DirectionalInput;

/// Turns held direction keys into the player's velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerController {
    pub speed: f32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self { speed: 400.0 }
    }
}

impl PlayerController {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Normalized so diagonals are not faster than straight lines.
    pub fn velocity(&self, input: &DirectionalInput) -> Vec2 {
        input.axis().normalize_or_zero() * self.speed
    }

    /// Push this frame's velocity to the player body.
    pub fn drive(&self, input: &DirectionalInput, backend: &mut impl MovementBackend) {
        let velocity = self.velocity(input);
        tracing::trace!(?velocity, "player drive");
        backend.set_velocity(EntityRef::Player, velocity);
    }
}
