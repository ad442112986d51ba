use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::types::*;

/// Narrowphase primitive tests over top-left/extent rectangles.
pub struct Narrowphase;

impl NarrowphaseApi for Narrowphase {
    fn overlap_rect_rect(a: &Rect, b: &Rect) -> bool {
        a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
    }

    fn contains_point(r: &Rect, p: Vec2) -> bool {
        p.x >= r.x && p.x < r.right() && p.y >= r.y && p.y < r.bottom()
    }

    fn sweep_rect_rect(a: &Rect, delta: Vec2, b: &Rect) -> Option<SweepHit> {
        if Self::overlap_rect_rect(a, b) {
            return Some(SweepHit {
                ti: 0.0,
                normal: Vec2::ZERO,
                touch: a.pos(),
                overlaps: true,
            });
        }

        // A motionless axis can only admit a hit if the boxes already share
        // that slab; otherwise the ±inf sentinels below would report contacts
        // with boxes that are merely level with the mover.
        let (dx, dy) = (delta.x, delta.y);
        if dx == 0.0 && !(a.x < b.right() && a.right() > b.x) {
            return None;
        }
        if dy == 0.0 && !(a.y < b.bottom() && a.bottom() > b.y) {
            return None;
        }

        // Slab distances: leading edge to near face, trailing edge to far face.
        let (x_inv_entry, x_inv_exit) = if dx > 0.0 {
            (b.x - a.right(), b.right() - a.x)
        } else {
            (b.right() - a.x, b.x - a.right())
        };
        let (y_inv_entry, y_inv_exit) = if dy > 0.0 {
            (b.y - a.bottom(), b.bottom() - a.y)
        } else {
            (b.bottom() - a.y, b.y - a.bottom())
        };

        let x_entry = if dx == 0.0 { f32::NEG_INFINITY } else { x_inv_entry / dx };
        let x_exit = if dx == 0.0 { f32::INFINITY } else { x_inv_exit / dx };
        let y_entry = if dy == 0.0 { f32::NEG_INFINITY } else { y_inv_entry / dy };
        let y_exit = if dy == 0.0 { f32::INFINITY } else { y_inv_exit / dy };

        let entry = x_entry.max(y_entry);
        let exit = x_exit.min(y_exit);

        if entry > exit || (x_entry < 0.0 && y_entry < 0.0) || entry < 0.0 || entry > 1.0 {
            return None;
        }

        let mut normal = Vec2::ZERO;
        let mut touch = a.pos() + delta * entry;
        // Snap the struck axis onto the face so the contact never penetrates.
        if x_entry > y_entry {
            normal.x = if x_inv_entry < 0.0 { 1.0 } else { -1.0 };
            touch.x = if normal.x > 0.0 { b.right() } else { b.x - a.w };
        } else {
            normal.y = if y_inv_entry < 0.0 { 1.0 } else { -1.0 };
            touch.y = if normal.y > 0.0 { b.bottom() } else { b.y - a.h };
        }

        Some(SweepHit {
            ti: entry,
            normal,
            touch,
            overlaps: false,
        })
    }

    fn clip_segment_rect(a: Vec2, b: Vec2, r: &Rect) -> Option<(f32, f32)> {
        let d = b - a;
        let mut t0 = 0.0f32;
        let mut t1 = 1.0f32;
        // Left, right, top, bottom half-planes.
        let p = [-d.x, d.x, -d.y, d.y];
        let q = [a.x - r.x, r.right() - a.x, a.y - r.y, r.bottom() - a.y];

        for (p, q) in p.into_iter().zip(q) {
            if p == 0.0 {
                // Parallel to this edge: reject if outside it.
                if q < 0.0 {
                    return None;
                }
            } else {
                let t = q / p;
                if p < 0.0 {
                    if t > t1 {
                        return None;
                    }
                    if t > t0 {
                        t0 = t;
                    }
                } else {
                    if t < t0 {
                        return None;
                    }
                    if t < t1 {
                        t1 = t;
                    }
                }
            }
        }
        Some((t0, t1))
    }
}
