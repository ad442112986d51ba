use bumpworld::*;
use glam::Vec2;
use std::time::Instant;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn unit(seed: &mut u32) -> f32 {
    lcg(seed) as f32 / u32::MAX as f32
}

fn run(broad_phase: BroadPhase, n: usize, ticks: usize) -> (f64, usize) {
    let mut world = World::new(WorldConfig { cell_size: 8.0, broad_phase });
    let mut seed = 1u32;
    for i in 0..n {
        let x = unit(&mut seed) * 400.0 - 200.0;
        let y = unit(&mut seed) * 400.0 - 200.0;
        world.add(i as u32, Rect::new(x, y, 1.0 + unit(&mut seed) * 3.0, 1.0 + unit(&mut seed) * 3.0));
    }

    let responses = Response::ALL;
    let t0 = Instant::now();
    let mut total_collisions = 0usize;
    for tick in 0..ticks {
        // Every tenth entity moves each tick.
        for i in (tick % 10..n).step_by(10) {
            let id = i as u32;
            let Some(r) = world.rect(&id) else { continue };
            let vel = Vec2::new(unit(&mut seed) * 4.0 - 2.0, unit(&mut seed) * 4.0 - 2.0);
            let res = world.move_with_collisions(&id, r.pos() + vel, responses[i % responses.len()]);
            total_collisions += res.collisions.len();
        }
    }
    (t0.elapsed().as_secs_f64() * 1000.0, total_collisions)
}

fn main() {
    env_logger::init();

    let n = 5_000usize;
    let ticks = 20usize;
    for bp in [BroadPhase::BruteForce, BroadPhase::Grid] {
        let (ms, collisions) = run(bp, n, ticks);
        println!("N={} ticks={} broad_phase={:?} total={:.3}ms collisions={}", n, ticks, bp, ms, collisions);
    }
}
