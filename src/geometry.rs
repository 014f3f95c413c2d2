use glam::Vec2;

use crate::api::GeometryApi;

/// Slack allowed when checking that an intersection point lies on both segments.
/// Points within this distance of a segment end still count as hits.
pub const SEGMENT_TOLERANCE: f64 = 0.01;

/// Geometry primitives. All math runs in f64 and is narrowed on return.
pub struct Geometry;

impl GeometryApi for Geometry {
    fn angle(a: Vec2, b: Vec2) -> f32 {
        let d = (b - a).as_dvec2();
        let mut deg = d.y.atan2(d.x).to_degrees();
        if deg < 0.0 {
            deg += 360.0;
        }
        let deg = deg as f32;
        // -1e-9 + 360 narrows to 360.0
        if deg >= 360.0 { 0.0 } else { deg }
    }

    fn move_point(p: Vec2, distance: f32, degrees: f32) -> Vec2 {
        let rad = f64::from(degrees).to_radians();
        let distance = f64::from(distance);
        let x = (f64::from(p.x) + distance * rad.cos()).round_ties_even();
        let y = (f64::from(p.y) + distance * rad.sin()).round_ties_even();
        Vec2::new(x as f32, y as f32)
    }

    fn intersect_line_segments(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<Vec2> {
        let (a, b, c, d) = (a.as_dvec2(), b.as_dvec2(), c.as_dvec2(), d.as_dvec2());
        let d1 = b - a;
        let d2 = d - c;
        let d3 = a - c;

        let len1 = d1.length();
        let len2 = d2.length();
        // Degenerate segments have no direction to intersect along.
        if len1 == 0.0 || len2 == 0.0 {
            return None;
        }

        // |cos| == 1: parallel or collinear
        let cos = d1.dot(d2) / (len1 * len2);
        if cos.abs() == 1.0 {
            return None;
        }

        let div = d2.y * d1.x - d2.x * d1.y;
        if div == 0.0 {
            return None;
        }
        let ua = (d2.x * d3.y - d2.y * d3.x) / div;
        let pt = a + d1 * ua;

        // On a segment iff the two sub-segment lengths add up to the segment length.
        let seg1 = pt.distance(a) + pt.distance(b);
        let seg2 = pt.distance(c) + pt.distance(d);
        if (len1 - seg1).abs() > SEGMENT_TOLERANCE || (len2 - seg2).abs() > SEGMENT_TOLERANCE {
            return None;
        }
        Some(pt.as_vec2())
    }
}
