use glam::Vec2;
use pxcollide::*;

fn main() -> Result<(), CollisionError> {
    let mut world = World::default();
    world.add(Body::new(Rect::new(100, 0, 40, 80), Color::GREEN, true, true).with_name("near"))?;
    world.add(Body::new(Rect::new(200, 0, 40, 80), Color::GREEN, true, true).with_name("far"))?;

    let mut ray = RayTracer::new().with_source(Vec2::new(0.0, 40.0)).with_radius(400);
    for direction in [0.0, 10.0, 45.0, 180.0] {
        ray.direction = direction;
        match ray.trace(&world) {
            Some(body) => println!("dir {direction:5.1}: hit '{}' at ({:.1},{:.1})", body.name, ray.hit().x, ray.hit().y),
            None => println!("dir {direction:5.1}: no hit, ray ends at ({:.1},{:.1})", ray.hit().x, ray.hit().y),
        }
    }
    Ok(())
}
