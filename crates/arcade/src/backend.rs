use glam::Vec2;
use pond_common::{Arena, EntityRef};
use pond_kernel::{Contact, MovementBackend};
use std::collections::BTreeMap;
use std::time::Duration;

/// Physical character of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProfile {
    /// Collision circle radius.
    pub radius: f32,
    /// Fraction of speed kept when bouncing off the arena edge.
    pub bounce: f32,
    /// Velocity multiplier per second while not accelerating. `None` means no drag.
    pub damping: Option<f32>,
}

impl BodyProfile {
    pub const TURTLE: Self = Self {
        radius: 16.0,
        bounce: 0.2,
        damping: Some(0.95),
    };
    pub const FOOD: Self = Self {
        radius: 8.0,
        bounce: 1.0,
        damping: None,
    };
    pub const PLAYER: Self = Self {
        radius: 16.0,
        bounce: 0.0,
        damping: None,
    };

    pub fn for_entity(entity: EntityRef) -> Self {
        match entity {
            EntityRef::Player => Self::PLAYER,
            EntityRef::Turtle(_) => Self::TURTLE,
            EntityRef::Food(_) => Self::FOOD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Speed cap. Infinite when uncapped.
    pub max_speed: f32,
    pub profile: BodyProfile,
}

/// Kinematic backend with per-body drag, edge bounce and bounds clamping.
#[derive(Debug, Clone)]
pub struct ArcadeBackend {
    arena: Arena,
    bodies: BTreeMap<EntityRef, Body>,
}

impl ArcadeBackend {
    pub fn new(arena: Arena) -> Self {
        Self {
            arena,
            bodies: BTreeMap::new(),
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn body(&self, entity: EntityRef) -> Option<&Body> {
        self.bodies.get(&entity)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Move every body by `dt`.
    ///
    /// Acceleration feeds velocity, velocity moves the body, then drag decays
    /// velocity for bodies that are not accelerating.
    pub fn integrate(&mut self, dt: Duration) {
        let dt = dt.as_secs_f32();
        let arena = self.arena;
        for body in self.bodies.values_mut() {
            let accelerating = body.acceleration != Vec2::ZERO;
            if accelerating {
                body.velocity += body.acceleration * dt;
            }
            if body.max_speed.is_finite() {
                body.velocity = body.velocity.clamp_length_max(body.max_speed);
            }
            body.position += body.velocity * dt;
            if !accelerating {
                if let Some(damping) = body.profile.damping {
                    body.velocity *= damping.powf(dt);
                }
            }
            bounce_inside(&arena, body);
        }
    }

    /// Every pair of overlapping bodies, in `EntityRef` order.
    pub fn contacts(&self) -> Vec<Contact> {
        let bodies: Vec<(EntityRef, &Body)> = self.bodies.iter().map(|(e, b)| (*e, b)).collect();
        let mut contacts = Vec::new();
        for (i, (ea, a)) in bodies.iter().enumerate() {
            for (eb, b) in &bodies[i + 1..] {
                let reach = a.profile.radius + b.profile.radius;
                if a.position.distance_squared(b.position) < reach * reach {
                    contacts.push(Contact::new(*ea, *eb));
                }
            }
        }
        tracing::trace!(count = contacts.len(), "overlaps detected");
        contacts
    }
}

/// Clamp a body into the arena, reflecting the velocity on each edge it hit.
fn bounce_inside(arena: &Arena, body: &mut Body) {
    let clamped = arena.clamp(body.position);
    if clamped.x != body.position.x {
        body.velocity.x = -body.velocity.x * body.profile.bounce;
    }
    if clamped.y != body.position.y {
        body.velocity.y = -body.velocity.y * body.profile.bounce;
    }
    body.position = clamped;
}

impl MovementBackend for ArcadeBackend {
    fn insert(&mut self, body: EntityRef, position: Vec2) {
        self.bodies.insert(
            body,
            Body {
                position: self.arena.clamp(position),
                velocity: Vec2::ZERO,
                acceleration: Vec2::ZERO,
                max_speed: f32::INFINITY,
                profile: BodyProfile::for_entity(body),
            },
        );
    }

    fn remove(&mut self, body: EntityRef) {
        self.bodies.remove(&body);
    }

    fn position(&self, body: EntityRef) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn set_velocity(&mut self, body: EntityRef, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.velocity = velocity;
        }
    }

    fn set_acceleration(&mut self, body: EntityRef, acceleration: Vec2, max_speed: f32) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.acceleration = acceleration;
            b.max_speed = max_speed;
        }
    }

    /// Push both bodies apart along the line between them until they just touch.
    fn separate(&mut self, a: EntityRef, b: EntityRef) {
        let (Some(&body_a), Some(&body_b)) = (self.bodies.get(&a), self.bodies.get(&b)) else {
            return;
        };
        let delta = body_b.position - body_a.position;
        let overlap = body_a.profile.radius + body_b.profile.radius - delta.length();
        if overlap <= 0.0 {
            return;
        }
        let push = delta.try_normalize().unwrap_or(Vec2::X) * (overlap * 0.5);
        let arena = self.arena;
        if let Some(body) = self.bodies.get_mut(&a) {
            body.position = arena.clamp(body.position - push);
        }
        if let Some(body) = self.bodies.get_mut(&b) {
            body.position = arena.clamp(body.position + push);
        }
    }
}
