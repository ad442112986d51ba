use glam::Vec2;

use std::collections::{HashMap, HashSet};

use crate::types::{EntityKey, Rect};

/// Rects spanning more cells than this (or with non-finite bounds) are kept in
/// a side list and tested on every call instead of being bucketed.
const MAX_CELLS_PER_RECT: i64 = 4096;

/// Uniform grid: cell coord -> ids whose rect touches that cell.
///
/// Cells are half-open `[i*cs, (i+1)*cs)` but rect bounds are bucketed with
/// `floor` on both min and max, so two rects that merely share an edge always
/// share a cell too. Touching contacts are therefore never filtered out.
#[derive(Clone, Debug)]
pub struct UniformGrid<K> {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<K>>,
    oversized: Vec<K>,
}

/// Inclusive cell range `(ix0, iy0, ix1, iy1)`.
type CellRange = (i32, i32, i32, i32);

impl<K: EntityKey> UniformGrid<K> {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1e-5),
            cells: HashMap::new(),
            oversized: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn insert(&mut self, id: &K, rect: &Rect) {
        let (min, max) = rect.bounds();
        match self.cell_range(min, max) {
            Some((ix0, iy0, ix1, iy1)) => {
                for iy in iy0..=iy1 {
                    for ix in ix0..=ix1 {
                        self.cells.entry((ix, iy)).or_default().push(id.clone());
                    }
                }
            }
            None => self.oversized.push(id.clone()),
        }
    }

    /// Remove `id` from the cells covered by `rect` (its last inserted rect).
    pub fn remove(&mut self, id: &K, rect: &Rect) {
        let (min, max) = rect.bounds();
        match self.cell_range(min, max) {
            Some((ix0, iy0, ix1, iy1)) => {
                for iy in iy0..=iy1 {
                    for ix in ix0..=ix1 {
                        if let Some(list) = self.cells.get_mut(&(ix, iy)) {
                            list.retain(|k| k != id);
                            if list.is_empty() {
                                self.cells.remove(&(ix, iy));
                            }
                        }
                    }
                }
            }
            None => self.oversized.retain(|k| k != id),
        }
    }

    /// Move `id` from `old`'s cells to `new`'s cells.
    pub fn relocate(&mut self, id: &K, old: &Rect, new: &Rect) {
        let old_range = self.cell_range_of(old);
        if old_range.is_some() && old_range == self.cell_range_of(new) {
            return;
        }
        self.remove(id, old);
        self.insert(id, new);
    }

    /// Deduplicated ids that may touch the region `[min, max]`, or `None` when
    /// the region is too large to enumerate and the caller should scan
    /// everything.
    ///
    /// The lookup reaches one ring of cells past the region: segment clips and
    /// sweeps round in `f32` and can accept a rect that starts just beyond the
    /// region's far edge.
    pub fn candidates(&self, min: Vec2, max: Vec2) -> Option<Vec<&K>> {
        let (ix0, iy0, ix1, iy1) = self.cell_range(min, max)?;
        let (ix0, iy0) = (ix0.saturating_sub(1), iy0.saturating_sub(1));
        let (ix1, iy1) = (ix1.saturating_add(1), iy1.saturating_add(1));
        let mut seen: HashSet<&K> = HashSet::new();
        let mut out = Vec::new();
        for iy in iy0..=iy1 {
            for ix in ix0..=ix1 {
                if let Some(list) = self.cells.get(&(ix, iy)) {
                    for k in list {
                        if seen.insert(k) {
                            out.push(k);
                        }
                    }
                }
            }
        }
        for k in &self.oversized {
            if seen.insert(k) {
                out.push(k);
            }
        }
        Some(out)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.oversized.clear();
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell_entries(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn oversized_count(&self) -> usize {
        self.oversized.len()
    }

    fn cell_range_of(&self, rect: &Rect) -> Option<CellRange> {
        let (min, max) = rect.bounds();
        self.cell_range(min, max)
    }

    fn cell_range(&self, min: Vec2, max: Vec2) -> Option<CellRange> {
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        let (ix0, iy0) = self.world_to_cell(min);
        let (ix1, iy1) = self.world_to_cell(max);
        let span = (i64::from(ix1) - i64::from(ix0) + 1) * (i64::from(iy1) - i64::from(iy0) + 1);
        if span > MAX_CELLS_PER_RECT {
            return None;
        }
        Some((ix0, iy0, ix1, iy1))
    }

    fn world_to_cell(&self, p: Vec2) -> (i32, i32) {
        let cs = self.cell_size;
        ((p.x / cs).floor() as i32, (p.y / cs).floor() as i32)
    }
}
