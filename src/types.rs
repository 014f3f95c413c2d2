use bitflags::bitflags;
use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// World-assigned handle of a body. Stable for the lifetime of the body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

/// Pixel-space axis-aligned rectangle (top-left origin, y grows downwards).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn location(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn set_location(&mut self, p: IVec2) {
        self.x = p.x;
        self.y = p.y;
    }

    /// Integer center (half sizes truncated).
    pub const fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Strict overlap test: rectangles sharing only an edge do not intersect.
    pub const fn intersects(&self, other: &Rect) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }

    /// The four boundary edges: top, left, right, bottom.
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let (l, r) = (self.left() as f32, self.right() as f32);
        let (t, b) = (self.top() as f32, self.bottom() as f32);
        [
            (Vec2::new(l, t), Vec2::new(r, t)),
            (Vec2::new(l, t), Vec2::new(l, b)),
            (Vec2::new(r, t), Vec2::new(r, b)),
            (Vec2::new(l, b), Vec2::new(r, b)),
        ]
    }

    pub const fn is_well_formed(&self) -> bool {
        self.width >= 0 && self.height >= 0
    }
}

/// RGBA color. Carried for collaborators that render; ignored by collision logic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

bitflags! {
    /// Coarse travel direction derived from a body's angle of motion.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Heading: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
    }
}

impl Heading {
    /// Eight-bucket classification of an angle in degrees (y axis points down).
    pub fn from_direction(direction: Option<f32>) -> Self {
        let Some(d) = direction else { return Heading::empty() };
        if d == 0.0 {
            Heading::RIGHT
        } else if d == 90.0 {
            Heading::DOWN
        } else if d == 180.0 {
            Heading::LEFT
        } else if d == 270.0 {
            Heading::UP
        } else if d > 0.0 && d < 90.0 {
            Heading::RIGHT | Heading::DOWN
        } else if d > 90.0 && d < 180.0 {
            Heading::DOWN | Heading::LEFT
        } else if d > 180.0 && d < 270.0 {
            Heading::LEFT | Heading::UP
        } else {
            Heading::UP | Heading::RIGHT
        }
    }
}

/// World-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Largest distance (pixels) the driver moves a body in one frame. Raises
    /// the resolution budget to at least `max_speed + 1` one-pixel steps; the
    /// budget never drops below what the sizes of the bodies involved need.
    #[serde(default)]
    pub max_speed: Option<u32>,
    /// Hard ceiling on one-pixel resolution steps per body and frame. A body
    /// that reaches it is put back where detection found it and the frame
    /// reports `CollisionError::ResolutionLimit`.
    #[serde(default)]
    pub max_resolution_steps: Option<u32>,
    /// Enable internal timing instrumentation (adds small overhead when true).
    #[serde(default)]
    pub enable_timing: bool,
}

/// Counters for the last completed `update`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub bodies: usize,
    /// Ordered (current, other) overlaps seen by detection; each symmetric pair counts twice.
    pub overlaps: usize,
    /// Bodies pushed back out of fixed solids.
    pub resolved: usize,
    /// One-pixel steps spent on resolution, summed over all bodies.
    pub resolution_steps: u32,
}

/// Timing breakdown for the last `update`.
#[derive(Copy, Clone, Debug, Default)]
pub struct WorldTiming {
    pub update_ms: f64,
    pub integrate_ms: f64,
    pub collide_ms: f64,
    pub post_update_ms: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    #[error("rectangle {0:?} has a negative size")]
    InvalidRect(Rect),

    #[error("body {body:?} still overlaps after {steps} resolution steps")]
    ResolutionLimit { body: BodyId, steps: u32 },

    #[error("no body with id {0:?}")]
    UnknownBody(BodyId),
}
