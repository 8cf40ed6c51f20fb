use glam::Vec2;
use pond_common::EntityRef;

use crate::steering::DriveCommand;

/// Physics collaborator that owns body positions and integrates motion.
///
/// The kernel reads positions and writes drive commands; it never integrates
/// motion itself. Implementations provide bounds clamping, bounce and drag.
pub trait MovementBackend {
    /// Register a body at `position`.
    fn insert(&mut self, body: EntityRef, position: Vec2);

    fn remove(&mut self, body: EntityRef);

    /// `None` if the body is unknown.
    fn position(&self, body: EntityRef) -> Option<Vec2>;

    fn set_velocity(&mut self, body: EntityRef, velocity: Vec2);

    /// Accelerate while capping speed at `max_speed`.
    fn set_acceleration(&mut self, body: EntityRef, acceleration: Vec2, max_speed: f32);

    /// Push two overlapping bodies apart. No state effect in the kernel.
    fn separate(&mut self, _a: EntityRef, _b: EntityRef) {}

    fn apply(&mut self, body: EntityRef, drive: &DriveCommand) {
        match *drive {
            DriveCommand::Velocity(velocity) => {
                self.set_acceleration(body, Vec2::ZERO, f32::INFINITY);
                self.set_velocity(body, velocity);
            }
            DriveCommand::Acceleration {
                acceleration,
                max_speed,
            } => self.set_acceleration(body, acceleration, max_speed),
            DriveCommand::Halt => {
                self.set_acceleration(body, Vec2::ZERO, f32::INFINITY);
                self.set_velocity(body, Vec2::ZERO);
            }
        }
    }
}
