use glam::Vec2;

use crate::types::*;

/// Public API contract for the collision world.
pub trait CollisionWorldApi<K: EntityKey> {
    /// Construct an empty world with the given configuration.
    fn new(cfg: WorldConfig) -> Self
    where
        Self: Sized;

    // --- Entity table ------------------------------------------------------

    /// Insert `id`, or overwrite its rect if already present (keeps its
    /// position in iteration order).
    fn add(&mut self, id: K, rect: Rect);

    /// Remove `id`. Unknown ids are ignored.
    fn remove(&mut self, id: &K) -> Option<Rect>;

    /// Current rect of `id`.
    fn rect(&self, id: &K) -> Option<Rect>;

    /// Overwrite the position and optionally the size of an existing entity.
    /// No-op for unknown ids.
    fn update(&mut self, id: &K, x: f32, y: f32, w: Option<f32>, h: Option<f32>);

    // --- Movement ----------------------------------------------------------

    /// Teleport `id` to `goal` and report every entity overlapping it there.
    /// No sweeping, no correction.
    fn move_to(&mut self, id: &K, goal: Vec2) -> MoveResult<K> {
        self.move_and_resize(id, goal, None, None)
    }

    /// Like [`move_to`](Self::move_to), optionally replacing the size.
    fn move_and_resize(&mut self, id: &K, goal: Vec2, w: Option<f32>, h: Option<f32>) -> MoveResult<K>;

    /// Sweep `id` toward `goal`, resolve the earliest contact with `response`
    /// and store the resulting position.
    fn move_with_collisions(&mut self, id: &K, goal: Vec2, response: Response) -> MoveResult<K>;

    // --- Queries -----------------------------------------------------------

    /// All entities whose rect overlaps `rect` (open intervals).
    fn query_rect(&self, rect: Rect) -> Vec<K>;

    /// All entities containing `p`, using `[x, x + w)` on both axes.
    fn query_point(&self, p: Vec2) -> Vec<K>;

    /// All entities intersected by the segment `a..b`.
    fn query_segment(&self, a: Vec2, b: Vec2) -> Vec<K>;

    /// Segment query that also reports where the segment enters and leaves
    /// each rect.
    fn query_segment_hits(&self, a: Vec2, b: Vec2) -> Vec<SegmentHit<K>>;
}

/// Primitive rect tests used by the world.
pub trait NarrowphaseApi {
    /// Open-interval overlap on both axes; touching edges do not overlap.
    fn overlap_rect_rect(a: &Rect, b: &Rect) -> bool;

    /// Closed-left/open-right containment.
    fn contains_point(r: &Rect, p: Vec2) -> bool;

    /// Earliest contact of `a` moving by `delta` against resting `b`.
    fn sweep_rect_rect(a: &Rect, delta: Vec2, b: &Rect) -> Option<SweepHit>;

    /// Liang–Barsky clip of segment `a..b` against `r`; returns the surviving
    /// parameter interval `(t0, t1)` within [0,1].
    fn clip_segment_rect(a: Vec2, b: Vec2, r: &Rect) -> Option<(f32, f32)>;
}
