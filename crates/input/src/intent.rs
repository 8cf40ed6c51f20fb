use glam::Vec2;
use std::str::FromStr;

/// Errors from parsing directional input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown direction {0:?}, expected left/right/up/down or w/a/s/d")]
    UnknownDirection(String),
}

/// Which direction keys are held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionalInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl DirectionalInput {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        up: false,
        down: false,
    };

    /// Unnormalized direction in screen space (y grows downward).
    /// Opposite keys cancel out.
    pub fn axis(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.left {
            v.x -= 1.0;
        }
        if self.right {
            v.x += 1.0;
        }
        if self.up {
            v.y -= 1.0;
        }
        if self.down {
            v.y += 1.0;
        }
        v
    }

    pub fn is_idle(&self) -> bool {
        self.axis() == Vec2::ZERO
    }
}

/// Parses a comma-separated list such as `"up,left"` or `"w,a"`.
/// An empty string means no keys held.
impl FromStr for DirectionalInput {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut input = Self::NONE;
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.to_ascii_lowercase().as_str() {
                "left" | "a" => input.left = true,
                "right" | "d" => input.right = true,
                "up" | "w" => input.up = true,
                "down" | "s" => input.down = true,
                _ => return Err(InputError::UnknownDirection(token.to_string())),
            }
        }
        Ok(input)
    }
}
