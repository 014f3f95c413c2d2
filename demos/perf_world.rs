use pxcollide::*;
use std::time::Instant;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn main() -> Result<(), CollisionError> {
    let mut world = World::new(WorldConfig { max_speed: Some(4), enable_timing: true, ..Default::default() });

    // Ring of walls around a 1000x1000 arena.
    for (x, y, w, h) in [(-20, -20, 1040, 20), (-20, 1000, 1040, 20), (-20, 0, 20, 1000), (1000, 0, 20, 1000)] {
        world.add(Body::new(Rect::new(x, y, w, h), Color::GREEN, true, true))?;
    }
    let n = 1_000usize;
    let mut seed = 1u32;
    let mut movers = Vec::with_capacity(n);
    for _ in 0..n {
        let x = (lcg(&mut seed) % 980) as i32;
        let y = (lcg(&mut seed) % 980) as i32;
        movers.push(world.add(Body::new(Rect::new(x, y, 8, 8), Color::RED, false, true))?);
    }

    let t0 = Instant::now();
    let frames = 60;
    for _ in 0..frames {
        for &id in &movers {
            // Axis-aligned steps only: a shallow diagonal hit slides the body off the end of the wall.
            let d = (lcg(&mut seed) % 9) as i32 - 4;
            if (lcg(&mut seed) >> 16) % 2 == 0 {
                world.body_mut(id)?.translate(d, 0);
            } else {
                world.body_mut(id)?.translate(0, d);
            }
        }
        world.update()?;
    }
    let ms = t0.elapsed().as_secs_f64() * 1000.0;
    let stats = world.stats();
    println!(
        "{} bodies, {} frames: {:.3} ms/frame; last frame {} overlaps, {} resolved ({} steps)",
        stats.bodies,
        frames,
        ms / frames as f64,
        stats.overlaps,
        stats.resolved,
        stats.resolution_steps
    );
    Ok(())
}
