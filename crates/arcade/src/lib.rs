//! Arcade Backend: a small kinematic movement backend for hosts and tests.
//!
//! # Invariants
//! - Every body stays inside the arena after each integration step.
//! - Overlap detection is deterministic (bodies are visited in `EntityRef` order).
//!
//! # Workaround
//! Collision detection is a naive all-pairs circle test, standing in for a real
//! broad phase. Fine for the tens of bodies a pond holds.

mod backend;

pub use backend::{ArcadeBackend, Body, BodyProfile};

use pond_kernel::{Simulation, TickReport};
use std::time::Duration;

/// Run one host frame: detect overlaps, tick the simulation, integrate motion.
pub fn run_tick(sim: &mut Simulation, backend: &mut ArcadeBackend, dt: Duration) -> TickReport {
    let contacts = backend.contacts();
    let report = sim.step(dt, &contacts, backend);
    backend.integrate(dt);
    report
}
