use std::fmt;

use glam::{IVec2, Vec2};

use crate::api::{Canvas, GeometryApi};
use crate::geometry::Geometry;
use crate::types::*;

/// Called around a body's per-frame update with a read-only view of the other bodies.
pub type UpdateHook = Box<dyn FnMut(&mut Body, &Neighbors<'_>)>;
/// Called around a body's draw.
pub type DrawHook = Box<dyn FnMut(&Body, &mut dyn Canvas)>;
/// Called once per frame with every body currently overlapping the owner.
pub type CollisionHook = Box<dyn FnMut(&Body, &[&Body])>;

/// Length of the direction line drawn from a moving body's center.
const DIRECTION_LINE_LEN: f32 = 32.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum UpdatePhase {
    Pre,
    Post,
}

#[derive(Default)]
struct Hooks {
    pre_update: Option<UpdateHook>,
    post_update: Option<UpdateHook>,
    pre_draw: Option<DrawHook>,
    post_draw: Option<DrawHook>,
    on_collision: Option<CollisionHook>,
    /// Set by `clear_hooks`; keeps a running hook from being put back.
    cleared: bool,
}

/// Axis-aligned rectangular body.
///
/// The rectangle is written by the driver between frames and by the world's
/// resolution step during `update`; nothing else inside the crate moves it.
pub struct Body {
    id: Option<BodyId>,
    pub name: String,
    pub tag: String,
    pub color: Color,
    /// Never moved by collision response.
    pub fixed: bool,
    /// Takes part in collision response. Non-solid bodies act as triggers.
    pub solid: bool,
    /// Takes part in detection and response at all.
    pub enabled: bool,
    /// Draw direction text on top of the body.
    pub debug: bool,
    rect: Rect,
    last_location: IVec2,
    direction: Option<f32>,
    heading: Heading,
    hooks: Hooks,
}

impl Body {
    pub fn new(rect: Rect, color: Color, fixed: bool, solid: bool) -> Self {
        Self {
            id: None,
            name: String::new(),
            tag: String::new(),
            color,
            fixed,
            solid,
            enabled: true,
            debug: false,
            rect,
            last_location: rect.location(),
            direction: None,
            heading: Heading::empty(),
            hooks: Hooks::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Handle assigned when the body is added to a world.
    pub fn id(&self) -> Option<BodyId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: BodyId) {
        self.id = Some(id);
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.rect.x += dx;
        self.rect.y += dy;
    }

    pub fn location(&self) -> Vec2 {
        self.rect.location().as_vec2()
    }

    /// Moves the top-left corner; fractional coordinates are truncated.
    pub fn set_location(&mut self, p: Vec2) {
        self.rect.set_location(IVec2::new(p.x as i32, p.y as i32));
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center().as_vec2()
    }

    pub fn set_center(&mut self, c: Vec2) {
        self.rect.x = (c.x - (self.rect.width / 2) as f32) as i32;
        self.rect.y = (c.y - (self.rect.height / 2) as f32) as i32;
    }

    /// Angle of travel in degrees since the previous update; `None` while stationary.
    pub fn direction(&self) -> Option<f32> {
        self.direction
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn is_moving(&self) -> bool {
        self.direction.is_some()
    }

    /// Recompute direction and heading from the distance travelled since the
    /// last update, then remember the current location.
    pub fn update(&mut self) {
        let loc = self.rect.location();
        self.direction = if !self.fixed && loc != self.last_location {
            Some(Geometry::angle(self.last_location.as_vec2(), loc.as_vec2()))
        } else {
            None
        };
        self.heading = Heading::from_direction(self.direction);
        self.last_location = loc;
    }

    /// Forget motion up to now so the next update starts from the current location.
    pub(crate) fn settle(&mut self) {
        self.last_location = self.rect.location();
    }

    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        if let Some(mut hook) = self.hooks.pre_draw.take() {
            hook(self, &mut *canvas);
            self.hooks.pre_draw.get_or_insert(hook);
        }

        canvas.draw_box(self.rect, self.color);

        if self.debug && !self.fixed {
            let label = match self.direction {
                Some(d) => format!("{d}º\n{}", heading_label(self.heading)),
                None => "-1º\n".to_string(),
            };
            let at = Vec2::new((self.rect.x + 1) as f32, (self.rect.y + 1) as f32);
            canvas.draw_text(&label, at, Color::WHITE);
        }

        if let (false, Some(d)) = (self.fixed, self.direction) {
            let center = self.center();
            let end = Geometry::move_point(center, DIRECTION_LINE_LEN, d);
            canvas.draw_line(center, end, Color::BLUE);
        }

        if let Some(mut hook) = self.hooks.post_draw.take() {
            hook(self, &mut *canvas);
            self.hooks.post_draw.get_or_insert(hook);
        }
    }

    // --- Hooks ---------------------------------------------------------------

    pub fn on_pre_update<F>(&mut self, f: F)
    where
        F: FnMut(&mut Body, &Neighbors<'_>) + 'static,
    {
        self.hooks.pre_update = Some(Box::new(f));
    }

    pub fn on_post_update<F>(&mut self, f: F)
    where
        F: FnMut(&mut Body, &Neighbors<'_>) + 'static,
    {
        self.hooks.post_update = Some(Box::new(f));
    }

    pub fn on_pre_draw<F>(&mut self, f: F)
    where
        F: FnMut(&Body, &mut dyn Canvas) + 'static,
    {
        self.hooks.pre_draw = Some(Box::new(f));
    }

    pub fn on_post_draw<F>(&mut self, f: F)
    where
        F: FnMut(&Body, &mut dyn Canvas) + 'static,
    {
        self.hooks.post_draw = Some(Box::new(f));
    }

    pub fn on_collision<F>(&mut self, f: F)
    where
        F: FnMut(&Body, &[&Body]) + 'static,
    {
        self.hooks.on_collision = Some(Box::new(f));
    }

    /// Drop every hook. Called from inside a running update hook, that hook
    /// is dropped as well once it returns.
    pub fn clear_hooks(&mut self) {
        self.hooks = Hooks { cleared: true, ..Hooks::default() };
    }

    fn update_hook_slot(&mut self, phase: UpdatePhase) -> &mut Option<UpdateHook> {
        match phase {
            UpdatePhase::Pre => &mut self.hooks.pre_update,
            UpdatePhase::Post => &mut self.hooks.post_update,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("rect", &self.rect)
            .field("fixed", &self.fixed)
            .field("solid", &self.solid)
            .field("enabled", &self.enabled)
            .field("direction", &self.direction)
            .field("heading", &self.heading)
            .finish_non_exhaustive()
    }
}

fn heading_label(h: Heading) -> String {
    let mut out = String::new();
    for (flag, name) in [
        (Heading::LEFT, "Left"),
        (Heading::UP, "Up"),
        (Heading::RIGHT, "Right"),
        (Heading::DOWN, "Down"),
    ] {
        if h.contains(flag) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(name);
        }
    }
    out
}

/// Read-only view of every body except the one a hook is running for.
pub struct Neighbors<'a> {
    before: &'a [Body],
    after: &'a [Body],
}

impl<'a> Neighbors<'a> {
    /// Split `bodies` into the body at `index` and everything else.
    pub(crate) fn split(bodies: &'a mut [Body], index: usize) -> Option<(&'a mut Body, Neighbors<'a>)> {
        if index >= bodies.len() {
            return None;
        }
        let (before, rest) = bodies.split_at_mut(index);
        let (current, after) = rest.split_first_mut()?;
        Some((current, Neighbors { before, after }))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Body> {
        self.before.iter().chain(self.after.iter())
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bodies overlapping `rect`, regardless of flags.
    pub fn intersect_rect(&self, rect: Rect) -> Vec<&'a Body> {
        self.iter().filter(|b| rect.intersects(&b.rect)).collect()
    }
}

/// Run the pre- or post-update hook of `bodies[index]`, if one is registered.
pub(crate) fn run_update_hook(bodies: &mut [Body], index: usize, phase: UpdatePhase) {
    let Some(body) = bodies.get_mut(index) else { return };
    let Some(mut hook) = body.update_hook_slot(phase).take() else { return };
    body.hooks.cleared = false;
    if let Some((body, neighbors)) = Neighbors::split(bodies, index) {
        hook(body, &neighbors);
        // A hook may have registered its own replacement, or cleared itself.
        if !std::mem::take(&mut body.hooks.cleared) {
            body.update_hook_slot(phase).get_or_insert(hook);
        }
    }
}

/// Run the collision hook of `bodies[index]` with the bodies at `overlaps`.
pub(crate) fn run_collision_hook(bodies: &mut [Body], index: usize, overlaps: &[usize]) {
    let Some(body) = bodies.get_mut(index) else { return };
    let Some(mut hook) = body.hooks.on_collision.take() else { return };
    {
        let others: Vec<&Body> = overlaps.iter().filter_map(|&j| bodies.get(j)).collect();
        hook(&bodies[index], others.as_slice());
    }
    bodies[index].hooks.on_collision.get_or_insert(hook);
}
