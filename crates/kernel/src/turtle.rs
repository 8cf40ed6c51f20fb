use glam::Vec2;
use pond_common::{Arena, FoodId, TurtleId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::config::SimConfig;
use crate::timer::{TimerAction, TimerQueue};

/// Behavioral state of a turtle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Hunting,
    Resting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hunting => "HUNTING",
            Self::Resting => "RESTING",
        })
    }
}

/// How size maps to speed and visual scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthCurve {
    pub base_speed: f32,
    pub speed_floor: f32,
    pub size_penalty: f32,
    pub scale_per_size: f32,
}

impl Default for GrowthCurve {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

impl GrowthCurve {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            base_speed: config.base_speed,
            speed_floor: config.speed_floor,
            size_penalty: config.size_penalty,
            scale_per_size: config.scale_per_size,
        }
    }

    /// `max(floor, base - penalty * size)`. Never increases with size.
    pub fn speed_for(&self, size: u32) -> f32 {
        (self.base_speed - self.size_penalty * size as f32).max(self.speed_floor)
    }

    pub fn scale_for(&self, size: u32) -> f32 {
        size as f32 * self.scale_per_size
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turtle {
    pub id: TurtleId,
    pub position: Vec2,
    pub speed: f32,
    pub max_speed: f32,
    /// Always at least 1.
    pub size: u32,
    pub phase: Phase,
    /// Weak reference into the food registry. Ignored while resting.
    pub target: Option<FoodId>,
    pub scale: f32,
}

impl Turtle {
    fn new(id: TurtleId, position: Vec2, curve: &GrowthCurve) -> Self {
        let mut turtle = Self {
            id,
            position,
            speed: 0.0,
            max_speed: 0.0,
            size: 1,
            phase: Phase::Hunting,
            target: None,
            scale: 0.0,
        };
        turtle.refresh_growth(curve);
        turtle
    }

    /// Recompute the size-derived parameters.
    pub fn refresh_growth(&mut self, curve: &GrowthCurve) {
        self.speed = curve.speed_for(self.size);
        self.max_speed = self.speed;
        self.scale = curve.scale_for(self.size);
    }

    pub fn is_hunting(&self) -> bool {
        self.phase == Phase::Hunting
    }
}

/// Owns every turtle and drives the phase state machine.
///
/// ```text
/// HUNTING --(ate its target)--> RESTING --(rest timer fired)--> HUNTING
/// ```
#[derive(Debug, Clone)]
pub struct TurtleRegistry {
    turtles: BTreeMap<TurtleId, Turtle>,
    next_id: u64,
    curve: GrowthCurve,
    /// Inclusive, in milliseconds.
    rest_window: (u64, u64),
}

impl TurtleRegistry {
    /// Empty registry with a growth curve and an inclusive rest window in milliseconds.
    pub fn new(curve: GrowthCurve, rest_window_ms: (u64, u64)) -> Self {
        Self {
            turtles: BTreeMap::new(),
            next_id: 0,
            curve,
            rest_window: rest_window_ms,
        }
    }

    /// The size to speed and scale mapping.
    pub fn curve(&self) -> &GrowthCurve {
        &self.curve
    }

    /// Create a hunting turtle of size 1 at a uniformly random position in `arena`.
    pub fn spawn(&mut self, arena: &Arena, rng: &mut impl Rng) -> &Turtle {
        let position = Vec2::new(
            rng.gen_range(arena.min.x..=arena.max.x),
            rng.gen_range(arena.min.y..=arena.max.y),
        );
        self.spawn_at(position)
    }

    /// Create a hunting turtle of size 1 at `position`.
    pub fn spawn_at(&mut self, position: Vec2) -> &Turtle {
        let id = TurtleId(self.next_id);
        self.next_id += 1;
        let turtle = Turtle::new(id, position, &self.curve);
        self.turtles.entry(id).or_insert(turtle)
    }

    /// Fire `HUNTING -> RESTING`: grow by one and schedule the wake-up.
    ///
    /// Returns the wake time, or `None` if the turtle is absent or already resting.
    pub fn begin_rest(
        &mut self,
        id: TurtleId,
        now: Duration,
        rng: &mut impl Rng,
        timers: &mut TimerQueue,
    ) -> Option<Duration> {
        let turtle = self.turtles.get_mut(&id).filter(|t| t.is_hunting())?;
        turtle.size += 1;
        turtle.phase = Phase::Resting;
        turtle.refresh_growth(&self.curve);

        let (lo, hi) = self.rest_window;
        let wake_at = now + Duration::from_millis(rng.gen_range(lo..=hi));
        timers.schedule(wake_at, TimerAction::WakeTurtle(id));
        tracing::debug!(turtle = %id, size = turtle.size, ?wake_at, "turtle resting");
        Some(wake_at)
    }

    /// Fire `RESTING -> HUNTING`. Stale ids and turtles that are not resting are ignored.
    pub fn wake(&mut self, id: TurtleId) -> bool {
        match self.turtles.get_mut(&id) {
            Some(turtle) if turtle.phase == Phase::Resting => {
                turtle.phase = Phase::Hunting;
                tracing::debug!(turtle = %id, "turtle hunting again");
                true
            }
            Some(_) => false,
            None => {
                tracing::debug!(turtle = %id, "wake for unknown turtle ignored");
                false
            }
        }
    }

    /// Look up a turtle.
    pub fn get(&self, id: TurtleId) -> Option<&Turtle> {
        self.turtles.get(&id)
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, id: TurtleId) -> Option<&mut Turtle> {
        self.turtles.get_mut(&id)
    }

    /// Turtles in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Turtle> {
        self.turtles.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Turtle> {
        self.turtles.values_mut()
    }

    /// Number of turtles.
    pub fn len(&self) -> usize {
        self.turtles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turtles.is_empty()
    }
}
