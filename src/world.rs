use std::time::Instant;

use crate::api::{Canvas, GeometryApi, WorldApi};
use crate::body::{Body, UpdatePhase, run_collision_hook, run_update_hook};
use crate::geometry::Geometry;
use crate::types::*;

/// Reversal applied to a stationary body caught inside a fixed solid: the
/// stationary sentinel (-1) turned around, i.e. a step to the left.
const STATIONARY_REVERSE: f32 = 179.0;

/// Owns the bodies and runs detection and penetration resolution once per frame.
pub struct World {
    pub cfg: WorldConfig,
    pub frame_counter: u32,

    bodies: Vec<Body>,
    next_id: u32,

    // Per-frame scratch
    overlaps: Vec<usize>,
    response: Vec<usize>,

    last_stats: WorldStats,
    last_timing: Option<WorldTiming>,
}

impl Default for World {
    fn default() -> Self {
        <Self as WorldApi>::new(WorldConfig::default())
    }
}

impl WorldApi for World {
    fn new(cfg: WorldConfig) -> Self {
        Self {
            cfg,
            frame_counter: 0,
            bodies: Vec::new(),
            next_id: 0,
            overlaps: Vec::new(),
            response: Vec::new(),
            last_stats: WorldStats::default(),
            last_timing: None,
        }
    }

    fn add(&mut self, mut body: Body) -> Result<BodyId, CollisionError> {
        if !body.rect().is_well_formed() {
            return Err(CollisionError::InvalidRect(body.rect()));
        }
        let id = BodyId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        body.assign_id(id);
        log::trace!("added body {:?} '{}' at {:?}", id, body.name, body.rect());
        self.bodies.push(body);
        Ok(id)
    }

    fn remove(&mut self, id: BodyId) -> Option<Body> {
        let idx = self.index_of(id)?;
        Some(self.bodies.remove(idx))
    }

    fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id() == Some(id))
    }

    fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id() == Some(id))
    }

    fn update(&mut self) -> Result<(), CollisionError> {
        let t_all = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.last_stats = WorldStats { bodies: self.bodies.len(), ..Default::default() };

        // Pass 1: hooks and motion tracking for every body, enabled or not.
        for i in 0..self.bodies.len() {
            run_update_hook(&mut self.bodies, i, UpdatePhase::Pre);
            self.bodies[i].update();
        }
        let integrate_ms = t_all.map(|t| t.elapsed().as_secs_f64() * 1000.0).unwrap_or(0.0);

        // Pass 2: detection and response.
        let t_collide = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        // A body that cannot be resolved is put back and the frame carries on;
        // the first failure is reported once every pass has run.
        let mut failure = None;
        for i in 0..self.bodies.len() {
            if let Err(e) = self.collide(i) {
                failure.get_or_insert(e);
            }
        }
        let collide_ms = t_collide.map(|t| t.elapsed().as_secs_f64() * 1000.0).unwrap_or(0.0);

        // Pass 3: post-update hooks, only once everyone is resolved.
        let t_post = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        for i in 0..self.bodies.len() {
            run_update_hook(&mut self.bodies, i, UpdatePhase::Post);
        }
        let post_update_ms = t_post.map(|t| t.elapsed().as_secs_f64() * 1000.0).unwrap_or(0.0);

        if let Some(t_all) = t_all {
            self.last_timing = Some(WorldTiming {
                update_ms: t_all.elapsed().as_secs_f64() * 1000.0,
                integrate_ms,
                collide_ms,
                post_update_ms,
            });
        }
        log::trace!(
            "frame {}: {} bodies, {} overlaps, {} resolved in {} steps",
            self.frame_counter,
            self.last_stats.bodies,
            self.last_stats.overlaps,
            self.last_stats.resolved,
            self.last_stats.resolution_steps
        );
        failure.map_or(Ok(()), Err)
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        for body in &mut self.bodies {
            body.draw(canvas);
        }
    }

    fn intersect_rect(&self, rect: Rect) -> Vec<&Body> {
        self.bodies.iter().filter(|b| rect.intersects(&b.rect())).collect()
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        self.bodies.iter().any(|b| rect.intersects(&b.rect()))
    }
}

impl World {
    /// Bodies in insertion order.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Like `get_mut`, but a missing body is an error.
    pub fn body_mut(&mut self, id: BodyId) -> Result<&mut Body, CollisionError> {
        self.get_mut(id).ok_or(CollisionError::UnknownBody(id))
    }

    /// Counters for the last `update`.
    pub fn stats(&self) -> WorldStats {
        self.last_stats
    }

    /// Timing breakdown for the last `update` (only when `enable_timing` is set).
    pub fn timing(&self) -> Option<WorldTiming> {
        self.last_timing
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id() == Some(id))
    }

    /// Detection and response for `bodies[i]`.
    fn collide(&mut self, i: usize) -> Result<(), CollisionError> {
        if !self.bodies[i].enabled {
            return Ok(());
        }

        let rect = self.bodies[i].rect();
        self.overlaps.clear();
        for (j, other) in self.bodies.iter().enumerate() {
            if j != i && rect.intersects(&other.rect()) {
                self.overlaps.push(j);
            }
        }
        if self.overlaps.is_empty() {
            return Ok(());
        }
        self.last_stats.overlaps += self.overlaps.len();

        // Triggers included: any overlap is reported, solid or not.
        run_collision_hook(&mut self.bodies, i, &self.overlaps);

        self.response.clear();
        self.response.extend(
            self.overlaps.iter().copied().filter(|&j| self.bodies[j].solid && self.bodies[j].fixed),
        );
        if self.response.is_empty() {
            return Ok(());
        }

        let body = &self.bodies[i];
        if body.fixed {
            return Ok(());
        }
        let reverse = match body.direction() {
            Some(d) if d >= 180.0 => d - 180.0,
            Some(d) => d + 180.0,
            None => {
                log::debug!(
                    "body {:?} '{}' overlaps {} fixed solid(s) without moving; backing out along {} deg",
                    body.id(),
                    body.name,
                    self.response.len(),
                    STATIONARY_REVERSE
                );
                STATIONARY_REVERSE
            }
        };
        let cap = self.resolution_cap(i);
        let from = body.location();
        let mut steps = 0u32;
        loop {
            let next = Geometry::move_point(self.bodies[i].location(), 1.0, reverse);
            self.bodies[i].set_location(next);
            steps += 1;

            let moved = self.bodies[i].rect();
            if self.response.iter().all(|&j| !moved.intersects(&self.bodies[j].rect())) {
                break;
            }
            if steps >= cap {
                let id = self.bodies[i].id().unwrap_or(BodyId(u32::MAX));
                log::warn!(
                    "body {:?} '{}' still penetrating after {} steps along {:.1} deg; restored to {:?}",
                    id,
                    self.bodies[i].name,
                    steps,
                    reverse,
                    from
                );
                self.bodies[i].set_location(from);
                self.bodies[i].settle();
                return Err(CollisionError::ResolutionLimit { body: id, steps });
            }
        }

        // The correction itself is not motion.
        self.bodies[i].settle();
        self.last_stats.resolved += 1;
        self.last_stats.resolution_steps += steps;
        log::debug!(
            "body {:?} '{}' pushed back {} px: {:?} -> {:?}",
            self.bodies[i].id(),
            self.bodies[i].name,
            steps,
            from,
            self.bodies[i].location()
        );
        Ok(())
    }

    /// Step budget for backing `bodies[i]` out of the current response set.
    ///
    /// Every step moves the body exactly one pixel along the dominant axis of
    /// the reversal direction, so clearing the widest obstacle never takes
    /// more than the sum of both extents. That holds for any speed: a body
    /// sunk in along its minor axis (a shallow landing) has to slide all the
    /// way off the obstacle. `max_speed` only raises the budget, and
    /// `max_resolution_steps` is a hard ceiling below all of it.
    fn resolution_cap(&self, i: usize) -> u32 {
        let extent = |r: Rect| (r.width.max(0) as u32).saturating_add(r.height.max(0) as u32);
        let own = extent(self.bodies[i].rect());
        let widest = self.response.iter().map(|&j| extent(self.bodies[j].rect())).max().unwrap_or(0);
        let mut cap = own.saturating_add(widest).saturating_add(1);
        if let Some(speed) = self.cfg.max_speed {
            cap = cap.max(speed.saturating_add(1));
        }
        if let Some(limit) = self.cfg.max_resolution_steps {
            cap = cap.min(limit);
        }
        cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn wall(x: i32, y: i32, w: i32, h: i32) -> Body {
        Body::new(Rect::new(x, y, w, h), Color::GREEN, true, true)
    }

    fn mover(x: i32, y: i32, w: i32, h: i32) -> Body {
        Body::new(Rect::new(x, y, w, h), Color::RED, false, true)
    }

    #[test]
    fn test_add_assigns_ids_and_rejects_negative_size() {
        let mut w = World::default();
        let a = w.add(wall(0, 0, 10, 10)).unwrap();
        let b = w.add(wall(20, 0, 10, 10)).unwrap();
        assert_ne!(a, b);
        assert_eq!(w.get(a).unwrap().id(), Some(a));
        assert_eq!(w.len(), 2);
        let err = w.add(wall(0, 0, -1, 10)).unwrap_err();
        assert_eq!(err, CollisionError::InvalidRect(Rect::new(0, 0, -1, 10)));
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut w = World::default();
        let a = w.add(wall(0, 0, 10, 10).with_name("a")).unwrap();
        let b = w.add(wall(0, 0, 10, 10).with_name("b")).unwrap();
        let c = w.add(wall(0, 0, 10, 10).with_name("c")).unwrap();
        assert_eq!(w.remove(b).unwrap().name, "b");
        assert!(w.remove(b).is_none());
        let names: Vec<_> = w.bodies().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert!(w.get(a).is_some() && w.get(c).is_some());
        assert_eq!(w.body_mut(b).unwrap_err(), CollisionError::UnknownBody(b));
    }

    #[test]
    fn test_push_back_leaves_mover_adjacent() {
        let mut w = World::default();
        let fixed = w.add(wall(0, 0, 80, 80)).unwrap();
        let m = w.add(mover(80, 0, 80, 80)).unwrap();
        w.update().unwrap();
        assert_eq!(w.get(m).unwrap().direction(), None);

        w.body_mut(m).unwrap().translate(-30, 0);
        w.update().unwrap();

        let mr = w.get(m).unwrap().rect();
        let fr = w.get(fixed).unwrap().rect();
        assert_eq!(mr, Rect::new(80, 0, 80, 80));
        assert!(!mr.intersects(&fr));
        assert_eq!(fr, Rect::new(0, 0, 80, 80));
        assert_eq!(w.stats().resolved, 1);
        assert_eq!(w.stats().resolution_steps, 30);

        // Correction does not count as motion on the next frame.
        w.update().unwrap();
        assert_eq!(w.get(m).unwrap().direction(), None);
    }

    #[test]
    fn test_resolution_converges_for_bounded_speed() {
        let speed = 7;
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (-1, 1), (1, -1), (-1, -1)] {
            let mut w = World::new(WorldConfig { max_speed: Some(speed as u32), ..Default::default() });
            let fixed = w.add(wall(100, 100, 40, 40)).unwrap();
            // Start touching the obstacle on the side we approach from.
            let start = Rect::new(100 - dx * 40, 100 - dy * 40, 40, 40);
            let m = w.add(Body::new(start, Color::RED, false, true)).unwrap();
            w.update().unwrap();

            let before = w.get(m).unwrap().location();
            w.body_mut(m).unwrap().translate(dx * speed, dy * speed);
            let moved = w.get(m).unwrap().location();
            w.update().unwrap();

            let after = w.get(m).unwrap();
            assert!(!after.rect().intersects(&w.get(fixed).unwrap().rect()), "dir ({dx},{dy})");
            let correction = after.location().distance(moved);
            let displacement = moved.distance(before);
            assert!(correction <= displacement + 1.0, "dir ({dx},{dy}) corrected {correction}");
        }
    }

    #[test]
    fn test_shallow_diagonal_landing_resolves_with_bounded_speed() {
        let mut w = World::new(WorldConfig { max_speed: Some(7), ..Default::default() });
        let floor = w.add(wall(0, 100, 400, 20)).unwrap();
        let m = w.add(mover(100, 80, 20, 20)).unwrap();
        let posts = Rc::new(RefCell::new(0));
        let mut watcher = Body::new(Rect::new(900, 900, 1, 1), Color::WHITE, true, false);
        let p = posts.clone();
        watcher.on_post_update(move |_, _| *p.borrow_mut() += 1);
        w.add(watcher).unwrap();
        w.update().unwrap();

        // Mostly sideways, sinking 3 px into the floor: each reversed step only
        // moves x, so the body slides off the floor's far end.
        w.body_mut(m).unwrap().translate(7, 3);
        w.update().unwrap();
        let r = w.get(m).unwrap().rect();
        assert!(!r.intersects(&w.get(floor).unwrap().rect()));
        assert_eq!(r, Rect::new(-20, 83, 20, 20));
        assert_eq!(w.stats().resolution_steps, 127);
        assert_eq!(*posts.borrow(), 2);

        w.update().unwrap();
        assert_eq!(w.get(m).unwrap().direction(), None);
        assert_eq!(w.get(m).unwrap().rect(), Rect::new(-20, 83, 20, 20));
    }

    #[test]
    fn test_resolution_limit_restores_body_and_finishes_frame() {
        let mut w = World::new(WorldConfig { max_resolution_steps: Some(2), ..Default::default() });
        w.add(wall(0, 0, 80, 80)).unwrap();
        let stuck = w.add(mover(80, 0, 80, 80)).unwrap();
        w.add(wall(300, 0, 40, 40)).unwrap();
        let late = w.add(mover(340, 0, 40, 40)).unwrap();
        let posts = Rc::new(RefCell::new(0));
        let mut watcher = Body::new(Rect::new(900, 900, 1, 1), Color::WHITE, true, false);
        let p = posts.clone();
        watcher.on_post_update(move |_, _| *p.borrow_mut() += 1);
        w.add(watcher).unwrap();
        w.update().unwrap();

        w.body_mut(stuck).unwrap().translate(-30, 0);
        w.body_mut(late).unwrap().translate(-1, 0);
        let err = w.update().unwrap_err();
        assert_eq!(err, CollisionError::ResolutionLimit { body: stuck, steps: 2 });
        assert_eq!(w.get(stuck).unwrap().rect(), Rect::new(50, 0, 80, 80));
        // Later bodies are still resolved and post-update hooks still run.
        assert_eq!(w.get(late).unwrap().rect(), Rect::new(340, 0, 40, 40));
        assert_eq!(*posts.borrow(), 2);

        // The restore is not read as motion on the next frame.
        let err = w.update().unwrap_err();
        assert_eq!(err, CollisionError::ResolutionLimit { body: stuck, steps: 2 });
        let body = w.get(stuck).unwrap();
        assert_eq!(body.direction(), None);
        assert_eq!(body.rect(), Rect::new(50, 0, 80, 80));
        assert_eq!(*posts.borrow(), 3);
    }

    #[test]
    fn test_max_speed_never_lowers_the_size_bound() {
        let mut w = World::new(WorldConfig { max_speed: Some(2), ..Default::default() });
        let fixed = w.add(wall(0, 0, 80, 80)).unwrap();
        let m = w.add(mover(80, 0, 80, 80)).unwrap();
        w.update().unwrap();
        w.body_mut(m).unwrap().translate(-30, 0);
        w.update().unwrap();
        let r = w.get(m).unwrap().rect();
        assert_eq!(r, Rect::new(80, 0, 80, 80));
        assert!(!r.intersects(&w.get(fixed).unwrap().rect()));
    }

    #[test]
    fn test_teleport_deep_inside_still_terminates_without_speed() {
        let mut w = World::default();
        let fixed = w.add(wall(0, 0, 200, 200)).unwrap();
        let m = w.add(mover(300, 90, 20, 20)).unwrap();
        w.update().unwrap();
        w.body_mut(m).unwrap().translate(-250, 0);
        w.update().unwrap();
        let r = w.get(m).unwrap().rect();
        assert!(!r.intersects(&w.get(fixed).unwrap().rect()));
        assert_eq!(r.x, 200);
    }

    #[test]
    fn test_detection_is_symmetric() {
        let mut w = World::default();
        let seen: Rc<RefCell<Vec<(String, Vec<String>)>>> = Rc::default();
        for (name, x) in [("a", 0), ("b", 15), ("c", 100)] {
            let mut b = Body::new(Rect::new(x, 0, 20, 20), Color::RED, false, false).with_name(name);
            let s = seen.clone();
            b.on_collision(move |owner, others| {
                let names = others.iter().map(|o| o.name.clone()).collect();
                s.borrow_mut().push((owner.name.clone(), names));
            });
            w.add(b).unwrap();
        }
        w.update().unwrap();
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ("a".to_string(), vec!["b".to_string()]));
        assert_eq!(seen[1], ("b".to_string(), vec!["a".to_string()]));
        assert_eq!(w.stats().overlaps, 2);
    }

    #[test]
    fn test_collision_hook_gets_full_overlap_list_once() {
        let mut w = World::default();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut m = mover(10, 10, 20, 20);
        let c = calls.clone();
        m.on_collision(move |_, others| c.borrow_mut().push(others.len()));
        w.add(m).unwrap();
        w.add(Body::new(Rect::new(0, 0, 15, 15), Color::GREEN, false, false)).unwrap();
        w.add(Body::new(Rect::new(25, 25, 15, 15), Color::GREEN, false, false)).unwrap();
        w.add(Body::new(Rect::new(90, 90, 15, 15), Color::GREEN, false, false)).unwrap();
        w.update().unwrap();
        assert_eq!(*calls.borrow(), vec![2]);
    }

    #[test]
    fn test_trigger_reports_but_does_not_push() {
        let mut w = World::default();
        let hits = Rc::new(RefCell::new(Vec::new()));

        let mut trigger = Body::new(Rect::new(0, 0, 160, 160), Color::rgba(255, 0, 255, 128), true, false);
        let h = hits.clone();
        trigger.on_collision(move |owner, _| h.borrow_mut().push(owner.id()));
        let t = w.add(trigger).unwrap();

        let mut m = mover(200, 40, 40, 40);
        let h = hits.clone();
        m.on_collision(move |owner, _| h.borrow_mut().push(owner.id()));
        let m = w.add(m).unwrap();
        w.update().unwrap();
        assert!(hits.borrow().is_empty());

        w.body_mut(m).unwrap().translate(-60, 0);
        w.update().unwrap();
        assert_eq!(*hits.borrow(), vec![Some(t), Some(m)]);
        assert_eq!(w.get(m).unwrap().rect(), Rect::new(140, 40, 40, 40));
        assert_eq!(w.get(t).unwrap().rect(), Rect::new(0, 0, 160, 160));
        assert_eq!(w.stats().resolved, 0);
    }

    #[test]
    fn test_movable_solids_are_not_resolved() {
        let mut w = World::default();
        let a = w.add(mover(0, 0, 20, 20)).unwrap();
        let b = w.add(mover(40, 0, 20, 20)).unwrap();
        w.update().unwrap();
        w.body_mut(b).unwrap().translate(-30, 0);
        w.update().unwrap();
        assert_eq!(w.get(a).unwrap().rect().x, 0);
        assert_eq!(w.get(b).unwrap().rect().x, 10);
    }

    #[test]
    fn test_fixed_overlapping_fixed_is_left_alone() {
        let mut w = World::default();
        let a = w.add(wall(0, 0, 20, 20)).unwrap();
        let b = w.add(wall(10, 0, 20, 20)).unwrap();
        w.update().unwrap();
        assert_eq!(w.get(a).unwrap().rect().x, 0);
        assert_eq!(w.get(b).unwrap().rect().x, 10);
    }

    #[test]
    fn test_stationary_mover_inside_wall_backs_out_left() {
        let mut w = World::default();
        let fixed = w.add(wall(0, 0, 80, 80)).unwrap();
        let m = w.add(mover(10, 10, 20, 20)).unwrap();
        w.update().unwrap();
        let r = w.get(m).unwrap().rect();
        assert_eq!(r, Rect::new(-20, 10, 20, 20));
        assert!(!r.intersects(&w.get(fixed).unwrap().rect()));
        assert_eq!(w.stats().resolution_steps, 30);
    }

    #[test]
    fn test_platform_pushed_into_stationary_mover() {
        let mut w = World::default();
        let platform = w.add(wall(0, 0, 80, 80)).unwrap();
        let m = w.add(mover(100, 0, 40, 40)).unwrap();
        w.update().unwrap();

        w.body_mut(platform).unwrap().translate(30, 0);
        w.update().unwrap();
        let r = w.get(m).unwrap().rect();
        assert!(!r.intersects(&w.get(platform).unwrap().rect()));
        assert_eq!(r, Rect::new(-10, 0, 40, 40));
        assert_eq!(w.get(platform).unwrap().rect(), Rect::new(30, 0, 80, 80));

        w.update().unwrap();
        assert_eq!(w.get(m).unwrap().direction(), None);
    }

    #[test]
    fn test_disabled_body_is_not_resolved_but_still_updates() {
        let mut w = World::default();
        w.add(wall(0, 0, 80, 80)).unwrap();
        let m = w.add(mover(80, 0, 80, 80).with_enabled(false)).unwrap();
        w.update().unwrap();
        w.body_mut(m).unwrap().translate(-30, 0);
        w.update().unwrap();
        let body = w.get(m).unwrap();
        assert_eq!(body.rect().x, 50);
        assert_eq!(body.direction(), Some(180.0));
    }

    #[test]
    fn test_hook_order_across_passes() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut w = World::default();
        for name in ["a", "b"] {
            let mut b = Body::new(Rect::new(0, 0, 10, 10), Color::RED, false, false).with_name(name);
            let l = log.clone();
            b.on_pre_update(move |b, _| l.borrow_mut().push(format!("pre {}", b.name)));
            let l = log.clone();
            b.on_collision(move |b, _| l.borrow_mut().push(format!("collide {}", b.name)));
            let l = log.clone();
            b.on_post_update(move |b, _| l.borrow_mut().push(format!("post {}", b.name)));
            w.add(b).unwrap();
        }
        w.update().unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["pre a", "pre b", "collide a", "collide b", "post a", "post b"]
        );
    }

    #[test]
    fn test_pre_update_motion_is_seen_by_detection() {
        // A gravity hook drops the body 10 px per frame until it rests on the floor.
        let mut w = World::default();
        w.add(wall(0, 100, 200, 20)).unwrap();
        let mut m = mover(50, 65, 20, 20);
        m.on_pre_update(|b, others| {
            let r = b.rect();
            let below = Rect::new(r.x, r.bottom(), r.width - 1, 1);
            if !others.intersect_rect(below).iter().any(|o| o.solid && o.enabled) {
                b.translate(0, 10);
            }
        });
        let m = w.add(m).unwrap();
        for _ in 0..5 {
            w.update().unwrap();
        }
        let r = w.get(m).unwrap().rect();
        assert_eq!(r.bottom(), 100);
        assert_eq!(r.x, 50);
    }

    #[test]
    fn test_post_update_sees_resolved_positions() {
        let mut w = World::default();
        w.add(wall(0, 0, 80, 80)).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut watcher = Body::new(Rect::new(500, 500, 1, 1), Color::WHITE, true, false);
        let s = seen.clone();
        watcher.on_post_update(move |_, others| {
            s.borrow_mut().extend(others.iter().filter(|o| !o.fixed).map(|o| o.rect().x));
        });
        w.add(watcher).unwrap();
        let m = w.add(mover(80, 0, 80, 80)).unwrap();
        w.update().unwrap();
        w.body_mut(m).unwrap().translate(-30, 0);
        w.update().unwrap();
        assert_eq!(*seen.borrow(), vec![80, 80]);
    }

    #[test]
    fn test_intersect_rect_ignores_flags() {
        let mut w = World::default();
        w.add(wall(0, 0, 10, 10).with_enabled(false)).unwrap();
        w.add(Body::new(Rect::new(5, 5, 10, 10), Color::WHITE, false, false)).unwrap();
        w.add(wall(50, 50, 10, 10)).unwrap();
        assert_eq!(w.intersect_rect(Rect::new(0, 0, 12, 12)).len(), 2);
        assert!(w.intersects_rect(Rect::new(55, 55, 1, 1)));
        assert!(!w.intersects_rect(Rect::new(60, 60, 5, 5)));
        assert!(w.intersect_rect(Rect::new(100, 100, 5, 5)).is_empty());
    }

    #[test]
    fn test_timing_only_when_enabled() {
        let mut w = World::default();
        w.add(wall(0, 0, 10, 10)).unwrap();
        w.update().unwrap();
        assert!(w.timing().is_none());
        w.cfg.enable_timing = true;
        w.update().unwrap();
        let t = w.timing().unwrap();
        assert!(t.update_ms >= 0.0);
        assert_eq!(w.frame_counter, 2);
    }
}
