use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use pxcollide::*;

/// Stand-in for a renderer: counts what would be drawn.
#[derive(Default)]
struct CountingCanvas {
    boxes: usize,
    lines: usize,
    texts: usize,
}

impl Canvas for CountingCanvas {
    fn draw_box(&mut self, _rect: Rect, _color: Color) {
        self.boxes += 1;
    }

    fn draw_line(&mut self, _a: Vec2, _b: Vec2, _color: Color) {
        self.lines += 1;
    }

    fn draw_text(&mut self, _text: &str, _at: Vec2, _color: Color) {
        self.texts += 1;
    }
}

const TILE: i32 = 80;
const SPEED: i32 = 30;
const GRAVITY: i32 = 10;

fn main() -> Result<(), CollisionError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let mut world = World::new(WorldConfig { max_speed: Some((SPEED + GRAVITY) as u32), enable_timing: true, ..Default::default() });

    for (tx, ty) in [(0, 0), (0, 1), (0, 2), (0, 3), (1, 3), (2, 3), (3, 3), (3, 1), (9, 1), (0, 5)] {
        world.add(Body::new(Rect::new(tx * TILE, ty * TILE, TILE, TILE), Color::GREEN, true, true))?;
    }
    world.add(Body::new(Rect::new(TILE * 4, TILE, TILE, 20), Color::GREEN, true, true))?;
    world.add(Body::new(Rect::new(TILE * 2, TILE, TILE, 10), Color::GREEN, true, true))?;

    // Player: falls unless the one-pixel sensor strip under it touches something solid.
    let sensor = Rc::new(Cell::new(Rect::default()));
    let mut player = Body::new(Rect::new(TILE * 2, TILE * 2, TILE, TILE), Color::RED, false, true)
        .with_name("player")
        .with_debug(true);
    let s = sensor.clone();
    player.on_pre_update(move |owner, others| {
        let grounded = others
            .intersect_rect(s.get())
            .iter()
            .any(|b| b.solid && b.enabled);
        if !grounded {
            owner.translate(0, GRAVITY);
        }
    });
    let s = sensor.clone();
    player.on_post_update(move |owner, _| {
        let r = owner.rect();
        s.set(Rect::new(r.x, r.bottom(), r.width - 1, 1));
    });
    let s = sensor.clone();
    player.on_post_draw(move |_, canvas| canvas.draw_box(s.get(), Color::YELLOW));
    let player = world.add(player)?;

    let message = Rc::new(RefCell::new(String::new()));
    let mut trigger = Body::new(Rect::new(TILE * 6, TILE * 2, TILE * 2, TILE * 2), Color::rgba(255, 0, 255, 128), true, false)
        .with_name("trigger");
    let m = message.clone();
    trigger.on_collision(move |_, others| {
        *m.borrow_mut() = format!("{} bod(ies) inside the trigger area", others.len());
    });
    world.add(trigger)?;

    let mut ray = RayTracer::new();
    let mut canvas = CountingCanvas::default();
    let mouse = Vec2::new(700.0, 120.0);

    // Scripted input: stand still while the sensor settles, walk right off the
    // ledge through the trigger, then walk back left into the floor's side.
    for frame in 0..40 {
        message.borrow_mut().clear();
        let dx = match frame {
            0 => 0,
            1..=9 => SPEED,
            _ => -SPEED,
        };
        world.body_mut(player)?.translate(dx, 0);

        if let Err(e) = world.update() {
            log::warn!("frame {frame}: {e}");
            continue;
        }

        let body = world.get(player).ok_or(CollisionError::UnknownBody(player))?;
        ray.source = body.center();
        ray.source_body = Some(player);
        ray.direction = Geometry::angle(body.center(), mouse);
        ray.radius = 800;
        let target = ray.trace(&world).map(|b| b.rect());

        world.draw(&mut canvas);
        ray.draw(&mut canvas);

        let body = world.get(player).ok_or(CollisionError::UnknownBody(player))?;
        log::info!(
            "frame {frame:2}: player at {:?} dir {:?} heading {:?}; ray hit {:?} on {:?} {}",
            body.rect().location(),
            body.direction(),
            body.heading(),
            ray.hit(),
            target,
            message.borrow()
        );
    }

    if let Some(t) = world.timing() {
        log::info!("last frame: {:.3}ms (collide {:.3}ms)", t.update_ms, t.collide_ms);
    }
    log::info!(
        "drew {} boxes, {} lines, {} labels",
        canvas.boxes, canvas.lines, canvas.texts
    );
    Ok(())
}
