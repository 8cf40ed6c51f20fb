use pond_kernel::FrameSnapshot;

/// Which indicators to draw next to each turtle.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Highlight the food each hunting turtle is chasing.
    pub show_targets: bool,
    /// Phase and size label.
    pub show_labels: bool,
    /// List food positions too.
    pub show_food: bool,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            show_targets: true,
            show_labels: true,
            show_food: false,
        }
    }
}

/// Anything that can draw a pond frame.
///
/// The renderer reads a snapshot and a view configuration, then produces
/// output. It never sees the simulation itself.
pub trait Renderer {
    /// What `render` produces, e.g. a `String`.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &FrameSnapshot, view: &RenderView) -> Self::Output;
}

/// Text renderer for CLI output, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameSnapshot, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Pond (tick={}, t={}ms) ===\n",
            frame.tick, frame.elapsed_ms
        ));
        out.push_str(&format!(
            "Turtles: {}  Food: {}\n",
            frame.turtles.len(),
            frame.foods.len()
        ));

        for turtle in &frame.turtles {
            let p = turtle.position;
            out.push_str(&format!("  [{}] pos=({:.1}, {:.1})", turtle.id, p.x, p.y));
            if view.show_labels {
                out.push_str(&format!(" {} scale={:.1}", turtle.label(), turtle.scale));
            }
            if view.show_targets {
                if let (Some(food), Some(marker)) = (turtle.target, turtle.target_marker) {
                    out.push_str(&format!(" -> {} @ ({:.1}, {:.1})", food, marker.x, marker.y));
                }
            }
            out.push('\n');
        }

        if view.show_food {
            for food in &frame.foods {
                out.push_str(&format!(
                    "  ({}) pos=({:.1}, {:.1})\n",
                    food.id, food.position.x, food.position.y
                ));
            }
        }

        out
    }
}
