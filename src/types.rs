use core::fmt;
use core::hash::Hash;
use core::str::FromStr;

use glam::Vec2;
use thiserror::Error;

/// Caller-supplied opaque identifier for an entity (e.g. a `&'static str`, a
/// `String`, or a packed `u64` handle). The world never generates keys.
pub trait EntityKey: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> EntityKey for T {}

/// Axis-aligned rectangle. `(x, y)` is the top-left corner; `w`/`h` extend
/// right and down.
///
/// Callers are expected to keep `w > 0` and `h > 0`. Nothing enforces it:
/// degenerate extents only make the geometric tests report fewer contacts.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Top-left corner.
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Same extents, moved so the top-left corner sits at `pos`.
    pub fn at(self, pos: Vec2) -> Self {
        Self { x: pos.x, y: pos.y, ..self }
    }

    /// True when either extent is zero, negative or NaN.
    pub fn is_degenerate(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }

    /// Normalized `(min, max)` corners, valid even for negative extents.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let p0 = self.pos();
        let p1 = p0 + self.size();
        (p0.min(p1), p0.max(p1))
    }

    /// Smallest rectangle covering this one at its current position and after
    /// being displaced by `delta`.
    pub fn swept(&self, delta: Vec2) -> (Vec2, Vec2) {
        let (min0, max0) = self.bounds();
        (min0.min(min0 + delta), max0.max(max0 + delta))
    }
}

/// How a blocked move is resolved by [`move_with_collisions`](crate::CollisionWorldApi::move_with_collisions).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Response {
    /// Stop at the contact, then keep moving along the unblocked axis.
    #[default]
    Slide,
    /// Stop at the contact and discard the rest of the move.
    Touch,
    /// Pass through everything; contacts are still reported.
    Cross,
    /// Stop at the contact. The caller reflects its own velocity using the
    /// reported normal (see [`Collision::bounce_delta`]).
    Bounce,
}

impl Response {
    pub const ALL: [Response; 4] = [Response::Slide, Response::Touch, Response::Cross, Response::Bounce];

    pub fn as_str(self) -> &'static str {
        match self {
            Response::Slide => "slide",
            Response::Touch => "touch",
            Response::Cross => "cross",
            Response::Bounce => "bounce",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown collision response `{0}` (expected slide, touch, cross or bounce)")]
pub struct ParseResponseError(pub String);

impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Response::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ParseResponseError(s.to_owned()))
    }
}

/// Tag carried by each [`Collision`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CollisionKind {
    /// The two rectangles already intersected before the move started.
    Overlap,
    Slide,
    Touch,
    Cross,
    Bounce,
}

impl From<Response> for CollisionKind {
    fn from(r: Response) -> Self {
        match r {
            Response::Slide => CollisionKind::Slide,
            Response::Touch => CollisionKind::Touch,
            Response::Cross => CollisionKind::Cross,
            Response::Bounce => CollisionKind::Bounce,
        }
    }
}

/// Sweep (time-of-impact) result between a moving and a resting rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SweepHit {
    /// Fraction in [0,1] of the delta at which the rectangles first touch.
    pub ti: f32,
    /// Face of the resting rectangle that was struck; `(0,0)` for overlaps.
    pub normal: Vec2,
    /// Mover's top-left corner at the moment of impact.
    pub touch: Vec2,
    /// True when the rectangles already intersect at `ti = 0`.
    pub overlaps: bool,
}

/// One contact detected while resolving a move.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collision<K> {
    pub item: K,
    pub other: K,
    pub kind: CollisionKind,
    pub overlaps: bool,
    pub ti: f32,
    /// Movement that was attempted when this contact was found.
    pub delta: Vec2,
    pub normal: Vec2,
    pub touch: Vec2,
    pub item_rect: Rect,
    pub other_rect: Rect,
}

impl<K> Collision<K> {
    /// `delta` with the component along the struck axis inverted.
    pub fn bounce_delta(&self) -> Vec2 {
        let mut d = self.delta;
        if self.normal.x != 0.0 {
            d.x = -d.x;
        }
        if self.normal.y != 0.0 {
            d.y = -d.y;
        }
        d
    }
}

/// Outcome of a move call: the stored position plus every contact detected.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveResult<K> {
    pub pos: Vec2,
    pub collisions: Vec<Collision<K>>,
}

impl<K> MoveResult<K> {
    /// Result for an id that is not registered: the goal, no contacts.
    pub fn unmoved(goal: Vec2) -> Self {
        Self { pos: goal, collisions: Vec::new() }
    }
}

/// Segment query hit with the clipped parameter interval.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentHit<K> {
    pub item: K,
    /// Parameter along the segment where it enters the rectangle.
    pub t0: f32,
    /// Parameter along the segment where it leaves the rectangle.
    pub t1: f32,
    pub entry: Vec2,
    pub exit: Vec2,
}

/// Candidate filtering used by moves and queries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BroadPhase {
    /// Test every entity on every call.
    #[default]
    BruteForce,
    /// Bucket entities into a uniform grid of `cell_size` and only test
    /// entities sharing a cell with the query region. Same results as
    /// `BruteForce`, including order.
    Grid,
}

/// World-level configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Grid cell size in world units (typ. 16–64). Only read by `BroadPhase::Grid`.
    pub cell_size: f32,
    pub broad_phase: BroadPhase,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { cell_size: 64.0, broad_phase: BroadPhase::BruteForce }
    }
}

/// Debug statistics for the current world contents.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub entities: usize,
    /// Occupied grid cells (0 without a grid).
    pub cells: usize,
    /// Sum of per-cell entity counts, counts an entity once per covered cell.
    pub cell_entries: usize,
    /// Entities too large (or non-finite) to bucket; tested on every call.
    pub oversized: usize,
}
