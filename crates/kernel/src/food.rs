use glam::Vec2;
use pond_common::{Arena, FoodId};
use rand::Rng;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::timer::{TimerAction, TimerQueue};

/// A consumable item. Moves only when the movement backend pushes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Food {
    pub id: FoodId,
    pub position: Vec2,
}

/// Owns the active food set and schedules replacements for eaten food.
///
/// Storage is keyed by [`FoodId`], so iteration runs in registration order.
#[derive(Debug, Clone)]
pub struct FoodRegistry {
    foods: BTreeMap<FoodId, Food>,
    next_id: u64,
    respawn_delay: Duration,
}

impl FoodRegistry {
    /// Empty registry. Eaten food comes back after `respawn_delay`.
    pub fn new(respawn_delay: Duration) -> Self {
        Self {
            foods: BTreeMap::new(),
            next_id: 0,
            respawn_delay,
        }
    }

    /// Delay between a food being eaten and its replacement.
    pub fn respawn_delay(&self) -> Duration {
        self.respawn_delay
    }

    /// Create a food at a uniformly random position inside `arena`.
    pub fn spawn(&mut self, arena: &Arena, rng: &mut impl Rng) -> Food {
        let position = Vec2::new(
            rng.gen_range(arena.min.x..=arena.max.x),
            rng.gen_range(arena.min.y..=arena.max.y),
        );
        self.spawn_at(position)
    }

    /// Create a food at a fixed position.
    pub fn spawn_at(&mut self, position: Vec2) -> Food {
        let id = FoodId(self.next_id);
        self.next_id += 1;
        let food = Food { id, position };
        self.foods.insert(id, food);
        food
    }

    /// Remove a food and schedule its replacement `respawn_delay` after `now`.
    ///
    /// Consuming an absent id does nothing and schedules nothing, so two eaters
    /// reporting the same food in one tick produce one removal and one respawn.
    pub fn consume(&mut self, id: FoodId, now: Duration, timers: &mut TimerQueue) -> Option<Food> {
        let food = self.foods.remove(&id)?;
        timers.schedule(now + self.respawn_delay, TimerAction::RespawnFood);
        tracing::debug!(food = %id, "food consumed, respawn scheduled");
        Some(food)
    }

    /// The active food closest to `position`. Equal distances go to the
    /// earlier-registered food.
    pub fn nearest_to(&self, position: Vec2) -> Option<&Food> {
        let mut best: Option<(&Food, f32)> = None;
        for food in self.foods.values() {
            let d = food.position.distance_squared(position);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((food, d)),
            }
        }
        best.map(|(food, _)| food)
    }

    /// Look up an active food.
    pub fn get(&self, id: FoodId) -> Option<&Food> {
        self.foods.get(&id)
    }

    /// Whether the food is still active.
    pub fn contains(&self, id: FoodId) -> bool {
        self.foods.contains_key(&id)
    }

    /// Active food in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Food> {
        self.foods.values()
    }

    /// Mutable access, used to pull positions from the backend.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Food> {
        self.foods.values_mut()
    }

    /// Number of active food items.
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}
