use glam::Vec2;

use crate::api::{Canvas, GeometryApi};
use crate::body::Body;
use crate::geometry::Geometry;
use crate::types::*;
use crate::world::World;

/// Bounded ray cast against the edges of the enabled solid bodies of a world.
///
/// Configure `source`, `source_body`, `direction` and `radius`, then call
/// [`RayTracer::trace`]. After a trace, [`RayTracer::hit`] is the nearest edge
/// intersection, or the far end of the ray when nothing was hit.
#[derive(Clone, Debug)]
pub struct RayTracer {
    pub source: Vec2,
    /// Body the ray starts from; never reported as a hit.
    pub source_body: Option<BodyId>,
    /// Degrees, y axis pointing down.
    pub direction: f32,
    /// Maximum length in pixels.
    pub radius: u32,
    pub color: Color,
    hit: Vec2,
}

struct Edge<'w> {
    a: Vec2,
    b: Vec2,
    body: &'w Body,
}

impl Default for RayTracer {
    fn default() -> Self {
        Self {
            source: Vec2::ZERO,
            source_body: None,
            direction: 0.0,
            radius: 0,
            color: Color::YELLOW,
            hit: Vec2::ZERO,
        }
    }
}

impl RayTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Vec2) -> Self {
        self.source = source;
        self
    }

    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    /// Impact point of the last trace.
    pub fn hit(&self) -> Vec2 {
        self.hit
    }

    /// End of the unobstructed ray.
    pub fn far_point(&self) -> Vec2 {
        Geometry::move_point(self.source, self.radius as f32, self.direction.abs())
    }

    /// Cast the ray and return the nearest body whose edge it crosses.
    pub fn trace<'w>(&mut self, world: &'w World) -> Option<&'w Body> {
        let area = self.ray_area();
        let mut edges: Vec<Edge<'w>> = Vec::new();
        for body in self.bodies_in_area(world, area) {
            for (a, b) in body.rect().edges() {
                edges.push(Edge { a, b, body });
            }
        }

        let mut nearest: Option<(Vec2, f32, &'w Body)> = None;
        for edge in &edges {
            let Some(p) = Geometry::intersect_line_segments(self.source, self.hit, edge.a, edge.b) else {
                continue;
            };
            let dist = self.source.distance(p);
            // Strict: the first of equally distant hits wins.
            if nearest.is_none_or(|(_, best, _)| dist < best) {
                nearest = Some((p, dist, edge.body));
            }
        }

        let (p, dist, body) = nearest?;
        log::trace!("ray from {:?} hit {:?} '{}' at {:?} ({:.1} px)", self.source, body.id(), body.name, p, dist);
        self.hit = p;
        Some(body)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_line(self.source, self.hit, self.color);
    }

    /// Bounding box of the ray; also resets `hit` to the far end.
    fn ray_area(&mut self) -> Rect {
        let far = self.far_point();
        self.hit = far;

        let mut lo = self.source.min(far);
        let mut hi = self.source.max(far);
        // Axis-aligned rays would give a box with no area.
        match self.direction as i32 {
            0 | 180 => {
                lo.y -= 1.0;
                hi.y += 1.0;
            }
            90 | 270 => {
                lo.x -= 1.0;
                hi.x += 1.0;
            }
            _ => {}
        }
        Rect::new(lo.x as i32, lo.y as i32, (hi.x - lo.x) as i32, (hi.y - lo.y) as i32)
    }

    fn bodies_in_area<'w>(&self, world: &'w World, area: Rect) -> impl Iterator<Item = &'w Body> {
        let excluded = self.source_body;
        world.bodies().iter().filter(move |b| {
            b.enabled
                && b.solid
                && excluded.is_none_or(|id| b.id() != Some(id))
                && area.intersects(&b.rect())
        })
    }
}
