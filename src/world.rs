use glam::Vec2;
use log::{debug, trace, warn};

use crate::api::{CollisionWorldApi, NarrowphaseApi};
use crate::grid::UniformGrid;
use crate::narrowphase::Narrowphase;
use crate::query::QueryEngine;
use crate::response::Resolver;
use crate::table::EntityTable;
use crate::types::*;

/// Persistent AABB world: a keyed rect table plus swept moves and spatial
/// queries over it.
///
/// Not internally synchronized. A multi-threaded host must wrap the whole
/// world in one lock, since a move reads and writes the table in several steps.
#[derive(Clone, Debug)]
pub struct World<K> {
    cfg: WorldConfig,
    table: EntityTable<K>,
    grid: Option<UniformGrid<K>>,
}

impl<K: EntityKey> CollisionWorldApi<K> for World<K> {
    fn new(cfg: WorldConfig) -> Self {
        debug!("new collision world: cell_size={} broad_phase={:?}", cfg.cell_size, cfg.broad_phase);
        let grid = match cfg.broad_phase {
            BroadPhase::BruteForce => None,
            BroadPhase::Grid => Some(UniformGrid::new(cfg.cell_size)),
        };
        Self { cfg, table: EntityTable::new(), grid }
    }

    fn add(&mut self, id: K, rect: Rect) {
        if rect.is_degenerate() {
            warn!("entity {id:?} added with non-positive extent {}x{}", rect.w, rect.h);
        }
        debug!("add {id:?} at ({}, {}) {}x{}", rect.x, rect.y, rect.w, rect.h);
        let prev = self.table.insert(id.clone(), rect);
        if let Some(grid) = self.grid.as_mut() {
            match prev {
                Some(old) => grid.relocate(&id, &old, &rect),
                None => grid.insert(&id, &rect),
            }
        }
    }

    fn remove(&mut self, id: &K) -> Option<Rect> {
        let rect = self.table.remove(id)?;
        debug!("remove {id:?}");
        if let Some(grid) = self.grid.as_mut() {
            grid.remove(id, &rect);
        }
        Some(rect)
    }

    fn rect(&self, id: &K) -> Option<Rect> {
        self.table.get(id)
    }

    fn update(&mut self, id: &K, x: f32, y: f32, w: Option<f32>, h: Option<f32>) {
        let Some(old) = self.table.get(id) else {
            return;
        };
        let rect = Rect::new(x, y, w.unwrap_or(old.w), h.unwrap_or(old.h));
        if rect.is_degenerate() && !old.is_degenerate() {
            warn!("entity {id:?} updated to non-positive extent {}x{}", rect.w, rect.h);
        }
        self.store(id, old, rect);
    }

    fn move_and_resize(&mut self, id: &K, goal: Vec2, w: Option<f32>, h: Option<f32>) -> MoveResult<K> {
        let Some(old) = self.table.get(id) else {
            return MoveResult::unmoved(goal);
        };
        let rect = Rect::new(goal.x, goal.y, w.unwrap_or(old.w), h.unwrap_or(old.h));
        let delta = goal - old.pos();
        let (min, max) = rect.bounds();
        let collisions: Vec<Collision<K>> = self
            .query()
            .candidates(min, max)
            .into_iter()
            .filter(|(other, other_rect)| *other != id && Narrowphase::overlap_rect_rect(&rect, other_rect))
            .map(|(other, other_rect)| Collision {
                item: id.clone(),
                other: other.clone(),
                kind: CollisionKind::Touch,
                overlaps: true,
                ti: 1.0,
                delta,
                normal: Vec2::ZERO,
                touch: goal,
                item_rect: rect,
                other_rect,
            })
            .collect();
        self.store(id, old, rect);
        trace!("move {id:?} -> ({}, {}): {} overlaps", goal.x, goal.y, collisions.len());
        MoveResult { pos: goal, collisions }
    }

    fn move_with_collisions(&mut self, id: &K, goal: Vec2, response: Response) -> MoveResult<K> {
        let Some(old) = self.table.get(id) else {
            return MoveResult::unmoved(goal);
        };
        let (pos, collisions) = {
            let query = self.query();
            Resolver::new(&query).resolve(id, old, goal, response)
        };
        self.store(id, old, old.at(pos));
        trace!(
            "{response} {id:?} goal=({}, {}) -> ({}, {}) with {} collisions",
            goal.x,
            goal.y,
            pos.x,
            pos.y,
            collisions.len()
        );
        MoveResult { pos, collisions }
    }

    fn query_rect(&self, rect: Rect) -> Vec<K> {
        self.query().rect(&rect)
    }

    fn query_point(&self, p: Vec2) -> Vec<K> {
        self.query().point(p)
    }

    fn query_segment(&self, a: Vec2, b: Vec2) -> Vec<K> {
        self.query().segment(a, b)
    }

    fn query_segment_hits(&self, a: Vec2, b: Vec2) -> Vec<SegmentHit<K>> {
        self.query().segment_hits(a, b)
    }
}

impl<K: EntityKey> World<K> {
    /// Brute-force world remembering `cell_size` for a later
    /// [`set_broad_phase`](Self::set_broad_phase) to the grid.
    pub fn with_cell_size(cell_size: f32) -> Self {
        Self::new(WorldConfig { cell_size, ..Default::default() })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.cfg
    }

    /// Switch broad phase, rebuilding the grid from the current table when
    /// needed. Query and move results do not change.
    pub fn set_broad_phase(&mut self, broad_phase: BroadPhase) {
        if self.cfg.broad_phase == broad_phase {
            return;
        }
        debug!("broad phase {:?} -> {:?}", self.cfg.broad_phase, broad_phase);
        self.cfg.broad_phase = broad_phase;
        self.grid = match broad_phase {
            BroadPhase::BruteForce => None,
            BroadPhase::Grid => {
                let mut grid = UniformGrid::new(self.cfg.cell_size);
                for (id, rect) in self.table.iter() {
                    grid.insert(id, rect);
                }
                Some(grid)
            }
        };
    }

    pub fn contains(&self, id: &K) -> bool {
        self.table.contains(id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entities and their rects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Rect)> + '_ {
        self.table.iter()
    }

    pub fn clear(&mut self) {
        debug!("clear {} entities", self.table.len());
        self.table.clear();
        if let Some(grid) = self.grid.as_mut() {
            grid.clear();
        }
    }

    /// Return debug stats for the current contents.
    pub fn stats(&self) -> WorldStats {
        let (cells, cell_entries, oversized) = match &self.grid {
            Some(g) => (g.cell_count(), g.cell_entries(), g.oversized_count()),
            None => (0, 0, 0),
        };
        WorldStats { entities: self.table.len(), cells, cell_entries, oversized }
    }

    fn query(&self) -> QueryEngine<'_, K> {
        QueryEngine::new(&self.table, self.grid.as_ref())
    }

    fn store(&mut self, id: &K, old: Rect, rect: Rect) {
        self.table.set(id, rect);
        if let Some(grid) = self.grid.as_mut() {
            grid.relocate(id, &old, &rect);
        }
    }
}

impl<K: EntityKey> Default for World<K> {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}
