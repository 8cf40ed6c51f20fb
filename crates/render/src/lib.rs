//! Presentation layer: draws frame snapshots, never the live simulation.
//!
//! # Invariants
//! - Renderers only see [`pond_kernel::FrameSnapshot`]; they cannot mutate simulation state.
//! - Indicators (target highlight, phase/size label) are derived from the snapshot every frame.
//!
//! # Workaround
//! Only a debug text renderer exists. Sprite renderers implement the same trait.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
