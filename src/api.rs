use glam::Vec2;

use crate::body::Body;
use crate::types::*;

/// Public API contract for the collision world.
pub trait WorldApi {
    /// Construct a new world with the given configuration.
    fn new(cfg: WorldConfig) -> Self
    where
        Self: Sized;

    // --- Body set ------------------------------------------------------------

    /// Take ownership of a body and return its handle.
    fn add(&mut self, body: Body) -> Result<BodyId, CollisionError>;

    /// Remove a body, handing it back to the caller.
    fn remove(&mut self, id: BodyId) -> Option<Body>;

    fn get(&self, id: BodyId) -> Option<&Body>;

    fn get_mut(&mut self, id: BodyId) -> Option<&mut Body>;

    // --- Frame ---------------------------------------------------------------

    /// Advance one frame: per-body update, detection and resolution, post-update hooks.
    fn update(&mut self) -> Result<(), CollisionError>;

    /// Draw every body in insertion order.
    fn draw(&mut self, canvas: &mut dyn Canvas);

    // --- Queries -------------------------------------------------------------

    /// All bodies (enabled or not, solid or not) overlapping `rect`.
    fn intersect_rect(&self, rect: Rect) -> Vec<&Body>;

    /// True if any body overlaps `rect`.
    fn intersects_rect(&self, rect: Rect) -> bool;
}

/// Stateless geometry primitives shared by bodies and the ray tracer.
pub trait GeometryApi {
    /// Angle in degrees of the vector a→b, in [0, 360). Coincident points give 0.
    fn angle(a: Vec2, b: Vec2) -> f32;

    /// Displace `p` by `distance` along `degrees`, rounding to whole pixels.
    fn move_point(p: Vec2, distance: f32, degrees: f32) -> Vec2;

    /// Intersection point of segments a-b and c-d, if they cross.
    fn intersect_line_segments(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<Vec2>;
}

/// Drawing sink provided by the embedding application.
pub trait Canvas {
    fn draw_box(&mut self, rect: Rect, color: Color);
    fn draw_line(&mut self, a: Vec2, b: Vec2, color: Color);
    fn draw_text(&mut self, text: &str, at: Vec2, color: Color);
}
