use bumpworld::*;
use glam::Vec2;

const WIDTH: f32 = 360.0;
const HEIGHT: f32 = 240.0;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn rndi(seed: &mut u32, lo: i32, hi: i32) -> f32 {
    (lo + (lcg(seed) % (hi - lo + 1) as u32) as i32) as f32
}

fn main() {
    env_logger::init();

    let mut world: World<String> = World::with_cell_size(16.0);
    let mut seed = 7u32;

    // Scatter non-overlapping bodies.
    let mut placed = 0;
    for i in 0..30 {
        for _ in 0..150 {
            let (w, h) = (rndi(&mut seed, 15, 30), rndi(&mut seed, 20, 35));
            let r = Rect::new(rndi(&mut seed, 0, (WIDTH - w) as i32), rndi(&mut seed, 0, (HEIGHT - h) as i32), w, h);
            if world.query_rect(r).is_empty() {
                world.add(format!("body_{i}"), r);
                placed += 1;
                break;
            }
        }
    }

    // World limits.
    world.add("leftwall".into(), Rect::new(-10.0, 0.0, 10.0, HEIGHT));
    world.add("rightwall".into(), Rect::new(WIDTH, 0.0, 10.0, HEIGHT));
    world.add("upwall".into(), Rect::new(0.0, -10.0, WIDTH, 10.0));
    world.add("downwall".into(), Rect::new(0.0, HEIGHT, WIDTH, 10.0));

    // Player in free space.
    let player = "player".to_string();
    for _ in 0..150 {
        let r = Rect::new(rndi(&mut seed, 15, (WIDTH - 31.0) as i32), rndi(&mut seed, 15, (HEIGHT - 31.0) as i32), 16.0, 16.0);
        if world.query_rect(r).is_empty() {
            world.add(player.clone(), r);
            break;
        }
    }
    println!("placed {} bodies, {} entities total", placed, world.len());

    // Scripted input: a few seconds of each direction at 50 units/s.
    let dt = 1.0 / 60.0;
    let speed = 50.0;
    let dirs = [Vec2::X, Vec2::Y, Vec2::NEG_X, Vec2::NEG_Y, Vec2::ONE.normalize()];
    for (leg, dir) in dirs.iter().enumerate() {
        for _ in 0..180 {
            let Some(r) = world.rect(&player) else { return };
            let goal = r.pos() + *dir * speed * dt;
            let res = world.move_with_collisions(&player, goal, Response::Slide);
            for c in &res.collisions {
                println!(
                    "leg {} {:?} hit {} ti={:.3} n=({:.0},{:.0}) at ({:.2},{:.2})",
                    leg, c.kind, c.other, c.ti, c.normal.x, c.normal.y, res.pos.x, res.pos.y
                );
            }
        }
    }

    if let Some(r) = world.rect(&player) {
        println!("player rests at ({:.2},{:.2})", r.x, r.y);
        println!("under the player: {:?}", world.query_point(r.pos() + r.size() * 0.5));
        let ray = world.query_segment_hits(r.pos(), Vec2::new(WIDTH, r.y));
        for h in ray {
            println!("ray to the right crosses {} at t={:.3}", h.item, h.t0);
        }
    }
}
