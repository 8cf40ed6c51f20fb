use glam::Vec2;
use pond_common::{EntityRef, FoodId, TurtleId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::time::Duration;

use crate::collision::{Contact, ContactKind};
use crate::config::{ConfigError, SimConfig};
use crate::event::SimEvent;
use crate::food::FoodRegistry;
use crate::movement::MovementBackend;
use crate::snapshot::{FoodView, FrameSnapshot, TurtleView};
use crate::steering::{DriveCommand, Steering};
use crate::timer::{TimerAction, TimerQueue};
use crate::turtle::{GrowthCurve, Phase, TurtleRegistry};

/// What happened during one tick. Anomalies are counted here instead of
/// being raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Drive handed to the backend for every turtle, in id order.
    pub drives: Vec<(TurtleId, DriveCommand)>,
    pub consumed: Vec<(TurtleId, FoodId)>,
    pub respawned: Vec<FoodId>,
    pub woke: Vec<TurtleId>,
    /// Hunting turtles that found no food.
    pub idle_hunters: usize,
    /// Contacts naming absent entities, or food someone else ate first.
    pub ignored_contacts: usize,
    /// Wake timers whose turtle was gone or no longer resting.
    pub stale_timers: usize,
}

/// The simulation core: food and turtle registries, the timer queue and the clock.
///
/// One call to [`Simulation::step`] is one tick. The host owns the movement
/// backend and collision detection and passes them in.
pub struct Simulation {
    config: SimConfig,
    rng: ChaCha8Rng,
    clock: Duration,
    tick: u64,
    foods: FoodRegistry,
    turtles: TurtleRegistry,
    timers: TimerQueue,
    steering: Box<dyn Steering>,
    /// Append-only log of registry mutations.
    event_log: Vec<SimEvent>,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.tick)
            .field("clock", &self.clock)
            .field("turtles", &self.turtles.len())
            .field("foods", &self.foods.len())
            .field("timers", &self.timers.len())
            .field("steering", &self.steering.name())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Validate `config` and build an empty simulation at tick 0.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            clock: Duration::ZERO,
            tick: 0,
            foods: FoodRegistry::new(config.respawn_delay()),
            turtles: TurtleRegistry::new(
                GrowthCurve::from_config(&config),
                config.rest_window_ms(),
            ),
            timers: TimerQueue::new(),
            steering: config.steering.build(),
            event_log: Vec::new(),
            config,
        })
    }

    /// Replace the steering strategy chosen by the config.
    pub fn with_steering(mut self, steering: Box<dyn Steering>) -> Self {
        self.steering = steering;
        self
    }

    /// Spawn the configured initial turtles and food.
    pub fn populate(&mut self, backend: &mut impl MovementBackend) {
        for _ in 0..self.config.initial_turtle_count {
            self.spawn_turtle(backend);
        }
        for _ in 0..self.config.initial_food_count {
            self.spawn_food(backend);
        }
        tracing::info!(
            turtles = self.turtles.len(),
            foods = self.foods.len(),
            steering = self.steering.name(),
            "simulation populated"
        );
    }

    /// Spawn a hunting turtle at a random position in the arena.
    pub fn spawn_turtle(&mut self, backend: &mut impl MovementBackend) -> TurtleId {
        let turtle = self.turtles.spawn(&self.config.arena, &mut self.rng);
        let (id, position) = (turtle.id, turtle.position);
        self.register_turtle(id, position, backend);
        id
    }

    /// Spawn a hunting turtle at `position`, clamped into the arena.
    pub fn spawn_turtle_at(
        &mut self,
        position: Vec2,
        backend: &mut impl MovementBackend,
    ) -> TurtleId {
        let position = self.config.arena.clamp(position);
        let id = self.turtles.spawn_at(position).id;
        self.register_turtle(id, position, backend);
        id
    }

    /// Spawn a food at a random position in the arena.
    pub fn spawn_food(&mut self, backend: &mut impl MovementBackend) -> FoodId {
        let food = self.foods.spawn(&self.config.arena, &mut self.rng);
        self.register_food(food.id, food.position, backend);
        food.id
    }

    /// Spawn a food at `position`, clamped into the arena.
    pub fn spawn_food_at(&mut self, position: Vec2, backend: &mut impl MovementBackend) -> FoodId {
        let food = self.foods.spawn_at(self.config.arena.clamp(position));
        self.register_food(food.id, food.position, backend);
        food.id
    }

    fn register_turtle(
        &mut self,
        id: TurtleId,
        position: Vec2,
        backend: &mut impl MovementBackend,
    ) {
        backend.insert(EntityRef::Turtle(id), position);
        self.event_log.push(SimEvent::TurtleSpawned { id, position });
        tracing::debug!(turtle = %id, ?position, "turtle spawned");
    }

    fn register_food(&mut self, id: FoodId, position: Vec2, backend: &mut impl MovementBackend) {
        backend.insert(EntityRef::Food(id), position);
        self.event_log.push(SimEvent::FoodSpawned { id, position });
        tracing::debug!(food = %id, ?position, "food spawned");
    }

    /// Advance the simulation by one tick of length `dt`.
    ///
    /// Order: pull positions, retarget and steer, route contacts, advance the
    /// clock and fire due timers.
    pub fn step(
        &mut self,
        dt: Duration,
        contacts: &[Contact],
        backend: &mut impl MovementBackend,
    ) -> TickReport {
        let _span = tracing::info_span!("sim_step", tick = self.tick).entered();
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        self.sync_positions(&*backend);
        self.drive_turtles(backend, &mut report);
        self.route_contacts(contacts, backend, &mut report);

        self.clock += dt;
        self.fire_timers(backend, &mut report);

        self.tick += 1;
        self.event_log.push(SimEvent::Stepped {
            tick: self.tick,
            elapsed: self.clock,
        });
        report
    }

    fn sync_positions(&mut self, backend: &impl MovementBackend) {
        for turtle in self.turtles.iter_mut() {
            if let Some(position) = backend.position(EntityRef::Turtle(turtle.id)) {
                turtle.position = position;
            }
        }
        for food in self.foods.iter_mut() {
            if let Some(position) = backend.position(EntityRef::Food(food.id)) {
                food.position = position;
            }
        }
    }

    fn drive_turtles(&mut self, backend: &mut impl MovementBackend, report: &mut TickReport) {
        let curve = *self.turtles.curve();
        let foods = &self.foods;
        let steering = &self.steering;

        for turtle in self.turtles.iter_mut() {
            turtle.refresh_growth(&curve);
            let drive = match turtle.phase {
                Phase::Hunting => {
                    let target = foods.nearest_to(turtle.position);
                    turtle.target = target.map(|f| f.id);
                    if target.is_none() {
                        report.idle_hunters += 1;
                        tracing::trace!(turtle = %turtle.id, "no food to hunt, idling");
                    }
                    steering.steer(
                        turtle.position,
                        turtle.speed,
                        turtle.max_speed,
                        target.map(|f| f.position),
                    )
                }
                Phase::Resting => DriveCommand::Halt,
            };
            tracing::trace!(turtle = %turtle.id, phase = %turtle.phase, ?drive, "steer");
            backend.apply(EntityRef::Turtle(turtle.id), &drive);
            report.drives.push((turtle.id, drive));
        }
    }

    fn route_contacts(
        &mut self,
        contacts: &[Contact],
        backend: &mut impl MovementBackend,
        report: &mut TickReport,
    ) {
        for contact in contacts {
            match contact.kind() {
                ContactKind::TurtleFood(turtle, food) => self.feed(turtle, food, backend, report),
                // Reserved hook: the player does not eat.
                ContactKind::PlayerFood(food) => {
                    tracing::trace!(food = %food, "player touched food");
                }
                ContactKind::TurtleTurtle(a, b) => {
                    if self.turtles.get(a).is_some() && self.turtles.get(b).is_some() {
                        backend.separate(EntityRef::Turtle(a), EntityRef::Turtle(b));
                    } else {
                        report.ignored_contacts += 1;
                    }
                }
                ContactKind::PlayerTurtle(turtle) => {
                    if self.turtles.get(turtle).is_some() {
                        backend.separate(EntityRef::Player, EntityRef::Turtle(turtle));
                    } else {
                        report.ignored_contacts += 1;
                    }
                }
                ContactKind::Unrouted => report.ignored_contacts += 1,
            }
        }
    }

    /// A turtle touched a food. Only a hunting turtle touching its own target eats.
    fn feed(
        &mut self,
        turtle_id: TurtleId,
        food_id: FoodId,
        backend: &mut impl MovementBackend,
        report: &mut TickReport,
    ) {
        let Some(turtle) = self.turtles.get(turtle_id) else {
            tracing::debug!(turtle = %turtle_id, "contact from unknown turtle ignored");
            report.ignored_contacts += 1;
            return;
        };
        if !turtle.is_hunting() || turtle.target != Some(food_id) {
            return;
        }
        if self.foods.consume(food_id, self.clock, &mut self.timers).is_none() {
            tracing::debug!(turtle = %turtle_id, food = %food_id, "food already gone");
            report.ignored_contacts += 1;
            return;
        }
        backend.remove(EntityRef::Food(food_id));
        self.event_log.push(SimEvent::FoodConsumed {
            food: food_id,
            by: turtle_id,
            respawn_at: self.clock + self.foods.respawn_delay(),
        });

        if let Some(wake_at) =
            self.turtles
                .begin_rest(turtle_id, self.clock, &mut self.rng, &mut self.timers)
        {
            // The pursuit drive from this tick must not carry into the rest.
            backend.apply(EntityRef::Turtle(turtle_id), &DriveCommand::Halt);
            let size = self.turtles.get(turtle_id).map_or(0, |t| t.size);
            self.event_log.push(SimEvent::TurtleRested {
                id: turtle_id,
                size,
                wake_at,
            });
        }
        report.consumed.push((turtle_id, food_id));
    }

    fn fire_timers(&mut self, backend: &mut impl MovementBackend, report: &mut TickReport) {
        while let Some((due, action)) = self.timers.pop_due(self.clock) {
            match action {
                TimerAction::RespawnFood => {
                    let id = self.spawn_food(backend);
                    tracing::debug!(food = %id, ?due, "food respawned");
                    report.respawned.push(id);
                }
                TimerAction::WakeTurtle(id) => {
                    if self.turtles.wake(id) {
                        self.event_log.push(SimEvent::TurtleWoke { id });
                        report.woke.push(id);
                    } else {
                        report.stale_timers += 1;
                    }
                }
            }
        }
    }

    /// Read-only projection of the current state for renderers.
    pub fn snapshot(&self) -> FrameSnapshot {
        let turtles = self
            .turtles
            .iter()
            .map(|t| {
                let target_marker = if t.is_hunting() {
                    t.target.and_then(|id| self.foods.get(id)).map(|f| f.position)
                } else {
                    None
                };
                TurtleView {
                    id: t.id,
                    position: t.position,
                    phase: t.phase,
                    size: t.size,
                    speed: t.speed,
                    scale: t.scale,
                    target: t.target,
                    target_marker,
                }
            })
            .collect();
        let foods = self
            .foods
            .iter()
            .map(|f| FoodView {
                id: f.id,
                position: f.position,
            })
            .collect();

        FrameSnapshot {
            tick: self.tick,
            elapsed_ms: self.clock.as_millis() as u64,
            turtles,
            foods,
        }
    }

    /// The validated configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated time since tick 0.
    pub fn elapsed(&self) -> Duration {
        self.clock
    }

    /// Read-only access to the active food.
    pub fn foods(&self) -> &FoodRegistry {
        &self.foods
    }

    /// Read-only access to the turtles.
    pub fn turtles(&self) -> &TurtleRegistry {
        &self.turtles
    }

    /// Pending respawns and wake-ups.
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Name of the active steering strategy.
    pub fn steering_name(&self) -> &'static str {
        self.steering.name()
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SimEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.event_log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steering::{AcceleratedPursuit, SteeringMode};
    use pond_common::Arena;
    use std::collections::BTreeMap;

    /// Backend that records commands and only moves bodies when told to.
    #[derive(Default)]
    struct RecordingBackend {
        positions: BTreeMap<EntityRef, Vec2>,
        velocities: BTreeMap<EntityRef, Vec2>,
        accelerations: BTreeMap<EntityRef, Vec2>,
        separated: Vec<(EntityRef, EntityRef)>,
    }

    impl RecordingBackend {
        fn teleport(&mut self, body: EntityRef, position: Vec2) {
            self.positions.insert(body, position);
        }
    }

    impl MovementBackend for RecordingBackend {
        fn insert(&mut self, body: EntityRef, position: Vec2) {
            self.positions.insert(body, position);
        }

        fn remove(&mut self, body: EntityRef) {
            self.positions.remove(&body);
            self.velocities.remove(&body);
            self.accelerations.remove(&body);
        }

        fn position(&self, body: EntityRef) -> Option<Vec2> {
            self.positions.get(&body).copied()
        }

        fn set_velocity(&mut self, body: EntityRef, velocity: Vec2) {
            self.velocities.insert(body, velocity);
        }

        fn set_acceleration(&mut self, body: EntityRef, acceleration: Vec2, _max_speed: f32) {
            self.accelerations.insert(body, acceleration);
        }

        fn separate(&mut self, a: EntityRef, b: EntityRef) {
            self.separated.push((a, b));
        }
    }

    const DT: Duration = Duration::from_millis(100);

    fn empty_sim() -> Simulation {
        Simulation::new(SimConfig {
            arena: Arena::new(Vec2::splat(-1000.0), Vec2::splat(1000.0)),
            initial_turtle_count: 0,
            initial_food_count: 0,
            seed: 11,
            ..SimConfig::default()
        })
        .unwrap()
    }

    fn eat(turtle: TurtleId, food: FoodId) -> Contact {
        Contact::new(EntityRef::Turtle(turtle), EntityRef::Food(food))
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = Simulation::new(SimConfig {
            rest_max_ms: -5,
            ..SimConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::NegativeDelay { name: "rest_max_ms", .. }));
    }

    #[test]
    fn populate_spawns_configured_counts_inside_arena() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let mut backend = RecordingBackend::default();
        sim.populate(&mut backend);

        assert_eq!(sim.turtles().len(), 4);
        assert_eq!(sim.foods().len(), 5);
        assert_eq!(backend.positions.len(), 9);
        let arena = sim.config().arena;
        assert!(sim.turtles().iter().all(|t| arena.contains(t.position)));
        assert!(sim.foods().iter().all(|f| arena.contains(f.position)));
        assert_eq!(sim.events().len(), 9);
    }

    #[test]
    fn same_seed_same_layout() {
        let layout = || {
            let mut sim = Simulation::new(SimConfig::default()).unwrap();
            sim.populate(&mut RecordingBackend::default());
            sim.snapshot()
        };
        assert_eq!(layout(), layout());
    }

    #[test]
    fn placed_spawns_are_clamped_into_arena() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let f = sim.spawn_food_at(Vec2::new(-500.0, 5000.0), &mut backend);
        let t = sim.spawn_turtle_at(Vec2::new(-3000.0, 10.0), &mut backend);

        let food = sim.foods().get(f).unwrap().position;
        let turtle = sim.turtles().get(t).unwrap().position;
        assert_eq!(food, Vec2::new(-500.0, 1000.0));
        assert_eq!(turtle, Vec2::new(-1000.0, 10.0));
        assert_eq!(backend.position(EntityRef::Food(f)), Some(food));
        assert_eq!(backend.position(EntityRef::Turtle(t)), Some(turtle));
    }

    #[test]
    fn hunter_steers_at_nearest_food() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let t = sim.spawn_turtle_at(Vec2::ZERO, &mut backend);
        sim.spawn_food_at(Vec2::new(0.0, 300.0), &mut backend);
        let near = sim.spawn_food_at(Vec2::new(100.0, 0.0), &mut backend);

        let report = sim.step(DT, &[], &mut backend);

        assert_eq!(sim.turtles().get(t).unwrap().target, Some(near));
        assert_eq!(report.drives, vec![(t, DriveCommand::Velocity(Vec2::new(165.0, 0.0)))]);
        assert_eq!(backend.velocities[&EntityRef::Turtle(t)], Vec2::new(165.0, 0.0));
    }

    #[test]
    fn target_is_reresolved_every_tick() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let t = sim.spawn_turtle_at(Vec2::ZERO, &mut backend);
        let far = sim.spawn_food_at(Vec2::new(500.0, 0.0), &mut backend);
        sim.step(DT, &[], &mut backend);
        assert_eq!(sim.turtles().get(t).unwrap().target, Some(far));

        let close = sim.spawn_food_at(Vec2::new(-20.0, 0.0), &mut backend);
        sim.step(DT, &[], &mut backend);
        assert_eq!(sim.turtles().get(t).unwrap().target, Some(close));
    }

    #[test]
    fn targets_follow_backend_positions() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let t = sim.spawn_turtle_at(Vec2::ZERO, &mut backend);
        let a = sim.spawn_food_at(Vec2::new(50.0, 0.0), &mut backend);
        let b = sim.spawn_food_at(Vec2::new(-80.0, 0.0), &mut backend);
        sim.step(DT, &[], &mut backend);
        assert_eq!(sim.turtles().get(t).unwrap().target, Some(a));

        backend.teleport(EntityRef::Turtle(t), Vec2::new(-60.0, 0.0));
        sim.step(DT, &[], &mut backend);
        assert_eq!(sim.turtles().get(t).unwrap().target, Some(b));
    }

    #[test]
    fn empty_food_set_idles_without_phase_change() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let t = sim.spawn_turtle_at(Vec2::new(10.0, 10.0), &mut backend);

        let report = sim.step(DT, &[], &mut backend);

        assert_eq!(report.idle_hunters, 1);
        assert_eq!(report.drives, vec![(t, DriveCommand::Halt)]);
        let turtle = sim.turtles().get(t).unwrap();
        assert_eq!(turtle.phase, Phase::Hunting);
        assert!(turtle.target.is_none());
        assert_eq!(backend.velocities[&EntityRef::Turtle(t)], Vec2::ZERO);
    }

    #[test]
    fn eating_grows_rests_and_schedules() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let t = sim.spawn_turtle_at(Vec2::ZERO, &mut backend);
        let f = sim.spawn_food_at(Vec2::new(5.0, 0.0), &mut backend);

        let report = sim.step(DT, &[eat(t, f)], &mut backend);

        assert_eq!(report.consumed, vec![(t, f)]);
        let turtle = sim.turtles().get(t).unwrap();
        assert_eq!(turtle.size, 2);
        assert_eq!(turtle.phase, Phase::Resting);
        assert_eq!(turtle.speed, 160.0);
        assert!(sim.foods().is_empty());
        assert!(backend.position(EntityRef::Food(f)).is_none());
        assert_eq!(backend.velocities[&EntityRef::Turtle(t)], Vec2::ZERO);
        assert_eq!(backend.accelerations[&EntityRef::Turtle(t)], Vec2::ZERO);
        assert_eq!(sim.timers().count(|a| *a == TimerAction::RespawnFood), 1);
        assert_eq!(sim.timers().count(|a| *a == TimerAction::WakeTurtle(t)), 1);
        assert!(sim.events().iter().any(|e| matches!(
            e,
            SimEvent::FoodConsumed { food, by, respawn_at }
                if *food == f && *by == t && *respawn_at == Duration::from_millis(1000)
        )));
    }

    #[test]
    fn touching_other_food_does_not_eat() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let t = sim.spawn_turtle_at(Vec2::ZERO, &mut backend);
        sim.spawn_food_at(Vec2::new(5.0, 0.0), &mut backend);
        let other = sim.spawn_food_at(Vec2::new(8.0, 0.0), &mut backend);

        let report = sim.step(DT, &[eat(t, other)], &mut backend);

        assert!(report.consumed.is_empty());
        assert_eq!(sim.foods().len(), 2);
        assert_eq!(sim.turtles().get(t).unwrap().phase, Phase::Hunting);
    }

    #[test]
    fn resting_drive_is_zero_even_with_target() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let t = sim.spawn_turtle_at(Vec2::ZERO, &mut backend);
        let f = sim.spawn_food_at(Vec2::new(5.0, 0.0), &mut backend);
        let spare = sim.spawn_food_at(Vec2::new(50.0, 0.0), &mut backend);
        sim.step(DT, &[eat(t, f)], &mut backend);

        sim.turtles.get_mut(t).unwrap().target = Some(spare);
        for _ in 0..5 {
            let report = sim.step(DT, &[], &mut backend);
            let (_, drive) = report.drives[0];
            assert!(drive.is_zero());
        }
        assert_eq!(sim.turtles().get(t).unwrap().target, Some(spare));
        assert_eq!(sim.snapshot().turtle(t).unwrap().target_marker, None);
    }

    #[test]
    fn simultaneous_eaters_consume_once() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let a = sim.spawn_turtle_at(Vec2::new(-5.0, 0.0), &mut backend);
        let b = sim.spawn_turtle_at(Vec2::new(5.0, 0.0), &mut backend);
        let f = sim.spawn_food_at(Vec2::ZERO, &mut backend);

        let report = sim.step(DT, &[eat(a, f), eat(b, f)], &mut backend);

        assert_eq!(report.consumed, vec![(a, f)]);
        assert_eq!(report.ignored_contacts, 1);
        assert_eq!(sim.timers().count(|x| *x == TimerAction::RespawnFood), 1);
        assert_eq!(sim.turtles().get(a).unwrap().size, 2);
        assert_eq!(sim.turtles().get(b).unwrap().size, 1);
        assert_eq!(sim.turtles().get(b).unwrap().phase, Phase::Hunting);
    }

    #[test]
    fn food_count_recovers_within_respawn_delay() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let t = sim.spawn_turtle_at(Vec2::ZERO, &mut backend);
        let f = sim.spawn_food_at(Vec2::new(3.0, 0.0), &mut backend);
        sim.spawn_food_at(Vec2::new(900.0, 900.0), &mut backend);
        let before = sim.foods().len();

        sim.step(DT, &[eat(t, f)], &mut backend);
        assert_eq!(sim.foods().len(), before - 1);

        let mut ticks = 1;
        while sim.foods().len() < before {
            sim.step(DT, &[], &mut backend);
            ticks += 1;
            assert!(ticks <= 11, "respawn took too long");
        }
        assert_eq!(sim.elapsed(), Duration::from_millis(1000));
        let respawned = sim.foods().iter().last().unwrap();
        assert!(sim.config().arena.contains(respawned.position));
    }

    #[test]
    fn resting_turtle_wakes_inside_window() {
        for seed in 0..20 {
            let mut sim = Simulation::new(SimConfig {
                initial_turtle_count: 0,
                initial_food_count: 0,
                seed,
                ..SimConfig::default()
            })
            .unwrap();
            let mut backend = RecordingBackend::default();
            let t = sim.spawn_turtle_at(Vec2::ZERO, &mut backend);
            let f = sim.spawn_food_at(Vec2::ONE, &mut backend);
            sim.step(DT, &[eat(t, f)], &mut backend);

            let mut woke_at = None;
            for _ in 0..40 {
                let report = sim.step(DT, &[], &mut backend);
                if report.woke.contains(&t) {
                    woke_at = Some(sim.elapsed());
                    break;
                }
                assert_eq!(sim.turtles().get(t).unwrap().phase, Phase::Resting);
            }
            let woke_at = woke_at.expect("turtle never woke");
            assert!(woke_at >= Duration::from_millis(1000), "seed {seed}: {woke_at:?}");
            assert!(woke_at <= Duration::from_millis(3000), "seed {seed}: {woke_at:?}");
            assert!(sim.turtles().get(t).unwrap().is_hunting());
        }
    }

    #[test]
    fn speed_matches_size_every_tick() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let t = sim.spawn_turtle_at(Vec2::ZERO, &mut backend);
        let curve = *sim.turtles().curve();
        for _ in 0..40 {
            let contacts: Vec<Contact> = sim
                .turtles()
                .get(t)
                .and_then(|turtle| turtle.target)
                .map(|f| eat(t, f))
                .into_iter()
                .collect();
            if sim.foods().is_empty() {
                sim.spawn_food_at(Vec2::new(2.0, 2.0), &mut backend);
            }
            sim.step(DT, &contacts, &mut backend);
            let turtle = sim.turtles().get(t).unwrap();
            assert!(turtle.size >= 1);
            assert_eq!(turtle.speed, (170.0 - 5.0 * turtle.size as f32).max(10.0));
            assert_eq!(turtle.speed, curve.speed_for(turtle.size));
        }
        assert!(sim.turtles().get(t).unwrap().size > 1);
    }

    #[test]
    fn stale_contacts_and_timers_are_absorbed() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let f = sim.spawn_food_at(Vec2::ONE, &mut backend);
        sim.timers.schedule(Duration::ZERO, TimerAction::WakeTurtle(TurtleId(99)));

        let report = sim.step(
            DT,
            &[
                eat(TurtleId(42), f),
                Contact::new(EntityRef::Food(f), EntityRef::Food(FoodId(7))),
            ],
            &mut backend,
        );

        assert_eq!(report.ignored_contacts, 2);
        assert_eq!(report.stale_timers, 1);
        assert_eq!(sim.foods().len(), 1);
    }

    #[test]
    fn player_food_contact_is_a_no_op() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let f = sim.spawn_food_at(Vec2::ONE, &mut backend);
        let report = sim.step(
            DT,
            &[Contact::new(EntityRef::Player, EntityRef::Food(f))],
            &mut backend,
        );
        assert_eq!(report, TickReport { tick: 0, ..TickReport::default() });
        assert!(sim.foods().contains(f));
    }

    #[test]
    fn body_contacts_are_separated_by_backend() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let a = sim.spawn_turtle_at(Vec2::ZERO, &mut backend);
        let b = sim.spawn_turtle_at(Vec2::ONE, &mut backend);
        sim.step(
            DT,
            &[
                Contact::new(EntityRef::Turtle(b), EntityRef::Turtle(a)),
                Contact::new(EntityRef::Turtle(a), EntityRef::Player),
            ],
            &mut backend,
        );
        assert_eq!(
            backend.separated,
            vec![
                (EntityRef::Turtle(a), EntityRef::Turtle(b)),
                (EntityRef::Player, EntityRef::Turtle(a)),
            ]
        );
        assert!(sim.turtles().iter().all(|t| t.size == 1));
    }

    #[test]
    fn snapshot_marks_live_targets() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        let t = sim.spawn_turtle_at(Vec2::ZERO, &mut backend);
        let f = sim.spawn_food_at(Vec2::new(30.0, 40.0), &mut backend);
        sim.step(DT, &[], &mut backend);

        let snap = sim.snapshot();
        let view = snap.turtle(t).unwrap();
        assert_eq!(view.target, Some(f));
        assert_eq!(view.target_marker, Some(Vec2::new(30.0, 40.0)));
        assert_eq!(view.label(), "HUNTING x1");
        assert_eq!(snap.foods.len(), 1);
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.elapsed_ms, 100);
    }

    #[test]
    fn accelerated_steering_from_config() {
        let mut sim = Simulation::new(SimConfig {
            initial_turtle_count: 0,
            initial_food_count: 0,
            steering: SteeringMode::Accelerated,
            ..SimConfig::default()
        })
        .unwrap();
        assert_eq!(sim.steering_name(), "accelerated");
        let mut backend = RecordingBackend::default();
        let t = sim.spawn_turtle_at(Vec2::ZERO, &mut backend);
        sim.spawn_food_at(Vec2::new(0.0, 10.0), &mut backend);

        let report = sim.step(DT, &[], &mut backend);
        assert_eq!(
            report.drives,
            vec![(
                t,
                DriveCommand::Acceleration {
                    acceleration: Vec2::new(0.0, 165.0),
                    max_speed: 165.0
                }
            )]
        );
        assert_eq!(backend.accelerations[&EntityRef::Turtle(t)], Vec2::new(0.0, 165.0));
    }

    #[test]
    fn with_steering_overrides_config() {
        let sim = empty_sim().with_steering(Box::new(AcceleratedPursuit));
        assert_eq!(sim.steering_name(), "accelerated");
    }

    #[test]
    fn step_logs_and_drains_events() {
        let mut sim = empty_sim();
        let mut backend = RecordingBackend::default();
        sim.step(DT, &[], &mut backend);
        sim.step(DT, &[], &mut backend);
        let events = sim.drain_events();
        assert_eq!(
            events.last(),
            Some(&SimEvent::Stepped {
                tick: 2,
                elapsed: Duration::from_millis(200)
            })
        );
        assert!(sim.events().is_empty());
        assert_eq!(sim.tick(), 2);
    }
}
