use glam::Vec2;
use log::trace;

use crate::api::NarrowphaseApi;
use crate::narrowphase::Narrowphase;
use crate::query::QueryEngine;
use crate::types::*;

/// Resolves one `move_with_collisions` call against the resting rects of every
/// other entity. Holds no state between calls.
pub struct Resolver<'q, 'a, K> {
    query: &'q QueryEngine<'a, K>,
}

impl<'q, 'a, K: EntityKey> Resolver<'q, 'a, K> {
    pub fn new(query: &'q QueryEngine<'a, K>) -> Self {
        Self { query }
    }

    /// Final position of `id` (currently at `rect`) after trying to reach
    /// `goal`, plus the contacts that shaped it.
    pub fn resolve(&self, id: &K, rect: Rect, goal: Vec2, response: Response) -> (Vec2, Vec<Collision<K>>) {
        let delta = goal - rect.pos();
        match response {
            Response::Cross => {
                let mut hits = self.all_hits(id, rect, delta, response);
                hits.sort_by(|a, b| a.ti.total_cmp(&b.ti));
                (goal, hits)
            }
            Response::Touch | Response::Bounce => match self.earliest(id, rect, delta, response) {
                Some(hit) => (hit.touch, vec![hit]),
                None => (goal, Vec::new()),
            },
            Response::Slide => match self.earliest(id, rect, delta, response) {
                Some(hit) => self.slide(id, rect, goal, hit),
                None => (goal, Vec::new()),
            },
        }
    }

    /// Stop at the contact, then make a single extra pass along the unblocked
    /// axis. The struck axis stays on the face.
    fn slide(&self, id: &K, rect: Rect, goal: Vec2, hit: Collision<K>) -> (Vec2, Vec<Collision<K>>) {
        let touch = hit.touch;
        if hit.overlaps {
            return (touch, vec![hit]);
        }
        let target = Vec2::new(
            if hit.normal.x != 0.0 { touch.x } else { goal.x },
            if hit.normal.y != 0.0 { touch.y } else { goal.y },
        );
        let remaining = target - touch;
        let mut collisions = vec![hit];
        if remaining == Vec2::ZERO {
            return (touch, collisions);
        }
        match self.earliest(id, rect.at(touch), remaining, Response::Slide) {
            Some(second) => {
                let pos = second.touch;
                collisions.push(second);
                (pos, collisions)
            }
            None => (target, collisions),
        }
    }

    /// Contact with the smallest time of impact; the first one found wins ties.
    fn earliest(&self, id: &K, rect: Rect, delta: Vec2, response: Response) -> Option<Collision<K>> {
        let (min, max) = rect.swept(delta);
        let mut best: Option<(&K, Rect, SweepHit)> = None;
        for (other, other_rect) in self.query.candidates(min, max) {
            if other == id {
                continue;
            }
            let Some(hit) = Narrowphase::sweep_rect_rect(&rect, delta, &other_rect) else {
                continue;
            };
            match &best {
                Some((_, _, bh)) if hit.ti >= bh.ti => {}
                _ => best = Some((other, other_rect, hit)),
            }
        }
        best.map(|(other, other_rect, hit)| Self::record(id, other, rect, other_rect, delta, hit, response))
    }

    fn all_hits(&self, id: &K, rect: Rect, delta: Vec2, response: Response) -> Vec<Collision<K>> {
        let (min, max) = rect.swept(delta);
        self.query
            .candidates(min, max)
            .into_iter()
            .filter(|(other, _)| *other != id)
            .filter_map(|(other, other_rect)| {
                let hit = Narrowphase::sweep_rect_rect(&rect, delta, &other_rect)?;
                Some(Self::record(id, other, rect, other_rect, delta, hit, response))
            })
            .collect()
    }

    fn record(
        id: &K,
        other: &K,
        rect: Rect,
        other_rect: Rect,
        delta: Vec2,
        hit: SweepHit,
        response: Response,
    ) -> Collision<K> {
        let kind = if hit.overlaps { CollisionKind::Overlap } else { CollisionKind::from(response) };
        trace!("{id:?} hits {other:?}: {kind:?} ti={:.4} n=({}, {})", hit.ti, hit.normal.x, hit.normal.y);
        Collision {
            item: id.clone(),
            other: other.clone(),
            kind,
            overlaps: hit.overlaps,
            ti: hit.ti,
            delta,
            normal: hit.normal,
            touch: hit.touch,
            item_rect: rect,
            other_rect,
        }
    }
}
