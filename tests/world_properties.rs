//! Behavioral properties of the collision world.

use bumpworld::*;
use glam::Vec2;
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    (-60i32..60).prop_map(|v| v as f32)
}

fn extent() -> impl Strategy<Value = f32> {
    (1i32..25).prop_map(|v| v as f32)
}

fn rect() -> impl Strategy<Value = Rect> {
    (coord(), coord(), extent(), extent()).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn response() -> impl Strategy<Value = Response> {
    prop::sample::select(Response::ALL.to_vec())
}

fn brute() -> World<u32> {
    World::new(WorldConfig { cell_size: 16.0, broad_phase: BroadPhase::BruteForce })
}

fn grid() -> World<u32> {
    World::new(WorldConfig { cell_size: 16.0, broad_phase: BroadPhase::Grid })
}

#[test]
fn concrete_slide_scenario() {
    let mut w = World::with_cell_size(16.0);
    w.add("box", Rect::new(0.0, 0.0, 10.0, 10.0));
    w.add("player", Rect::new(0.0, -20.0, 10.0, 10.0));
    let res = w.move_with_collisions(&"player", Vec2::new(0.0, 20.0), Response::Slide);
    assert_eq!(res.pos.y, -10.0);
    assert_eq!(res.collisions[0].normal, Vec2::new(0.0, -1.0));
    assert_eq!(res.collisions[0].kind, CollisionKind::Slide);
    assert!(!res.collisions[0].overlaps);
    assert!((res.collisions[0].ti - 0.25).abs() < 1e-6);
}

#[test]
fn segment_query_examples() {
    let mut w = World::default();
    w.add("wall", Rect::new(10.0, 10.0, 5.0, 5.0));
    assert_eq!(w.query_segment(Vec2::new(0.0, 0.0), Vec2::new(20.0, 20.0)), vec!["wall"]);
    assert!(w.query_segment(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0)).is_empty());

    let hits = w.query_segment_hits(Vec2::new(0.0, 0.0), Vec2::new(20.0, 20.0));
    assert_eq!(hits.len(), 1);
    assert!((hits[0].entry - Vec2::new(10.0, 10.0)).length() < 1e-4);
    assert!((hits[0].exit - Vec2::new(15.0, 15.0)).length() < 1e-4);
}

#[test]
fn response_tags_parse_from_strings() {
    let r: Response = "bounce".parse().unwrap();
    assert_eq!(r, Response::Bounce);
    assert_eq!(r.to_string(), "bounce");
    assert!("wobble".parse::<Response>().is_err());
    assert_eq!(Response::default(), Response::Slide);
}

proptest! {
    #[test]
    fn missing_ids_are_no_ops(rects in prop::collection::vec(rect(), 0..8), gx in coord(), gy in coord(), r in response()) {
        let mut w = brute();
        for (i, rc) in rects.iter().enumerate() {
            w.add(i as u32, *rc);
        }
        let before: Vec<_> = w.iter().map(|(k, r)| (*k, *r)).collect();
        let ghost = 999u32;
        let goal = Vec2::new(gx, gy);
        prop_assert_eq!(w.move_to(&ghost, goal), MoveResult::unmoved(goal));
        prop_assert_eq!(w.move_with_collisions(&ghost, goal, r), MoveResult::unmoved(goal));
        w.update(&ghost, gx, gy, Some(3.0), None);
        prop_assert_eq!(w.remove(&ghost), None);
        let after: Vec<_> = w.iter().map(|(k, r)| (*k, *r)).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn overlap_is_symmetric(a in rect(), b in rect()) {
        let mut w = brute();
        w.add(0, a);
        w.add(1, b);
        let from_a = w.query_rect(a).contains(&1);
        let from_b = w.query_rect(b).contains(&0);
        prop_assert_eq!(from_a, from_b);
    }

    #[test]
    fn unit_steps_match_single_slide(gap in 0i32..40, steps in 0i32..80, ox in -9i32..10) {
        let start_y = -10.0 - gap as f32;
        let x = ox as f32;

        let mut stepped = brute();
        stepped.add(0, Rect::new(0.0, 0.0, 10.0, 10.0));
        stepped.add(1, Rect::new(x, start_y, 10.0, 10.0));
        for i in 1..=steps {
            stepped.move_with_collisions(&1, Vec2::new(x, start_y + i as f32), Response::Slide);
        }

        let mut single = brute();
        single.add(0, Rect::new(0.0, 0.0, 10.0, 10.0));
        single.add(1, Rect::new(x, start_y, 10.0, 10.0));
        single.move_with_collisions(&1, Vec2::new(x, start_y + steps as f32), Response::Slide);

        prop_assert_eq!(stepped.rect(&1), single.rect(&1));
        let expected_y = (start_y + steps as f32).min(-10.0);
        prop_assert_eq!(single.rect(&1).map(|r| r.y), Some(expected_y));
    }

    #[test]
    fn touch_never_penetrates(mover in rect(), obstacle in rect(), gx in coord(), gy in coord()) {
        prop_assume!(!(mover.x < obstacle.right() && mover.right() > obstacle.x
            && mover.y < obstacle.bottom() && mover.bottom() > obstacle.y));
        let mut w = brute();
        w.add(0, obstacle);
        w.add(1, mover);
        let res = w.move_with_collisions(&1, Vec2::new(gx, gy), Response::Touch);
        let end = mover.at(res.pos);
        prop_assert!(w.query_rect(end).iter().all(|k| *k == 1));
        if let Some(c) = res.collisions.first() {
            let on_face = res.pos.x == obstacle.x - mover.w
                || res.pos.x == obstacle.right()
                || res.pos.y == obstacle.y - mover.h
                || res.pos.y == obstacle.bottom();
            prop_assert!(on_face);
            prop_assert!(c.ti >= 0.0 && c.ti <= 1.0);
        } else {
            prop_assert_eq!(res.pos, Vec2::new(gx, gy));
        }
    }

    #[test]
    fn cross_passes_through_and_reports_goal_overlaps(
        mover in rect(),
        others in prop::collection::vec(rect(), 0..10),
        gx in coord(),
        gy in coord(),
    ) {
        let mut w = brute();
        for (i, rc) in others.iter().enumerate() {
            w.add(i as u32 + 1, *rc);
        }
        w.add(0, mover);
        let goal = Vec2::new(gx, gy);
        let res = w.move_with_collisions(&0, goal, Response::Cross);
        prop_assert_eq!(res.pos, goal);
        prop_assert_eq!(w.rect(&0).map(|r| r.pos()), Some(goal));

        let reported: Vec<u32> = res.collisions.iter().map(|c| c.other).collect();
        for k in w.query_rect(mover.at(goal)) {
            if k != 0 {
                prop_assert!(reported.contains(&k), "entity {} overlaps the goal but was not reported", k);
            }
        }
        prop_assert!(res.collisions.windows(2).all(|p| p[0].ti <= p[1].ti));
    }

    #[test]
    fn grid_matches_brute_force(
        rects in prop::collection::vec(rect(), 1..12),
        moves in prop::collection::vec((0usize..12, coord(), coord(), response()), 0..12),
        removals in prop::collection::vec(0usize..12, 0..3),
        probe in rect(),
    ) {
        let mut a = brute();
        let mut b = grid();
        for (i, rc) in rects.iter().enumerate() {
            a.add(i as u32, *rc);
            b.add(i as u32, *rc);
        }
        for r in &removals {
            let id = (*r % rects.len()) as u32;
            prop_assert_eq!(a.remove(&id), b.remove(&id));
        }
        for (i, gx, gy, resp) in moves {
            let id = (i % rects.len()) as u32;
            let goal = Vec2::new(gx, gy);
            prop_assert_eq!(a.move_with_collisions(&id, goal, resp), b.move_with_collisions(&id, goal, resp));
        }
        prop_assert_eq!(a.query_rect(probe), b.query_rect(probe));
        prop_assert_eq!(a.query_point(probe.pos()), b.query_point(probe.pos()));
        let (s0, s1) = (probe.pos(), probe.pos() + probe.size() * 3.0);
        prop_assert_eq!(a.query_segment(s0, s1), b.query_segment(s0, s1));
        let teleport = Vec2::new(probe.x, probe.y);
        prop_assert_eq!(a.move_to(&0, teleport), b.move_to(&0, teleport));
    }
}
