use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::grid::UniformGrid;
use crate::narrowphase::Narrowphase;
use crate::table::EntityTable;
use crate::types::*;

/// Read-only spatial queries over the entity table.
///
/// With a grid attached, only entities sharing a cell with the query region
/// are tested; candidates are put back into table order first, so the output
/// is the same as a full scan.
pub struct QueryEngine<'a, K> {
    table: &'a EntityTable<K>,
    grid: Option<&'a UniformGrid<K>>,
}

impl<'a, K: EntityKey> QueryEngine<'a, K> {
    pub fn new(table: &'a EntityTable<K>, grid: Option<&'a UniformGrid<K>>) -> Self {
        Self { table, grid }
    }

    /// Entities that may touch `[min, max]`, in table order.
    pub(crate) fn candidates(&self, min: Vec2, max: Vec2) -> Vec<(&'a K, Rect)> {
        let Some(ids) = self.grid.and_then(|g| g.candidates(min, max)) else {
            return self.table.iter().map(|(k, r)| (k, *r)).collect();
        };
        let mut indexed: Vec<usize> = ids
            .into_iter()
            .map(|k| match self.table.index_of(k) {
                Some(i) => i,
                None => panic!("grid references entity {k:?} that is not in the table"),
            })
            .collect();
        indexed.sort_unstable();
        indexed
            .into_iter()
            .filter_map(|i| self.table.get_index(i))
            .map(|(k, r)| (k, *r))
            .collect()
    }

    pub fn rect(&self, rect: &Rect) -> Vec<K> {
        let (min, max) = rect.bounds();
        self.candidates(min, max)
            .into_iter()
            .filter(|(_, r)| Narrowphase::overlap_rect_rect(r, rect))
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn point(&self, p: Vec2) -> Vec<K> {
        self.candidates(p, p)
            .into_iter()
            .filter(|(_, r)| Narrowphase::contains_point(r, p))
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn segment(&self, a: Vec2, b: Vec2) -> Vec<K> {
        self.segment_hits(a, b).into_iter().map(|h| h.item).collect()
    }

    pub fn segment_hits(&self, a: Vec2, b: Vec2) -> Vec<SegmentHit<K>> {
        let d = b - a;
        self.candidates(a.min(b), a.max(b))
            .into_iter()
            .filter_map(|(k, r)| {
                let (t0, t1) = Narrowphase::clip_segment_rect(a, b, &r)?;
                Some(SegmentHit {
                    item: k.clone(),
                    t0,
                    t1,
                    entry: a + d * t0,
                    exit: a + d * t1,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> EntityTable<&'static str> {
        let mut t = EntityTable::new();
        t.insert("a", Rect::new(0.0, 0.0, 10.0, 10.0));
        t.insert("b", Rect::new(5.0, 5.0, 10.0, 10.0));
        t.insert("far", Rect::new(100.0, 100.0, 1.0, 1.0));
        t
    }

    fn grid_of(t: &EntityTable<&'static str>) -> UniformGrid<&'static str> {
        let mut g = UniformGrid::new(4.0);
        for (k, r) in t.iter() {
            g.insert(k, r);
        }
        g
    }

    #[test]
    fn test_rect_query_overlap_symmetry() {
        let t = table();
        let q = QueryEngine::new(&t, None);
        assert_eq!(q.rect(&Rect::new(0.0, 0.0, 10.0, 10.0)), vec!["a", "b"]);
        assert_eq!(q.rect(&Rect::new(5.0, 5.0, 10.0, 10.0)), vec!["a", "b"]);
        assert!(q.rect(&Rect::new(20.0, 20.0, 5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_point_query_edges() {
        let t = table();
        let q = QueryEngine::new(&t, None);
        assert_eq!(q.point(Vec2::new(0.0, 0.0)), vec!["a"]);
        assert_eq!(q.point(Vec2::new(7.0, 7.0)), vec!["a", "b"]);
        assert_eq!(q.point(Vec2::new(10.0, 10.0)), vec!["b"]);
        assert!(q.point(Vec2::new(15.0, 15.0)).is_empty());
    }

    #[test]
    fn test_segment_hits_report_entry_and_exit() {
        let t = table();
        let q = QueryEngine::new(&t, None);
        let hits = q.segment_hits(Vec2::new(-10.0, 2.0), Vec2::new(10.0, 2.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item, "a");
        assert!((hits[0].t0 - 0.5).abs() < 1e-5);
        assert!((hits[0].entry.x - 0.0).abs() < 1e-5);
        assert!((hits[0].exit.x - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_grid_candidates_match_full_scan_order() {
        let t = table();
        let g = grid_of(&t);
        let brute = QueryEngine::new(&t, None);
        let grid = QueryEngine::new(&t, Some(&g));
        let region = Rect::new(-3.0, -3.0, 120.0, 120.0);
        assert_eq!(brute.rect(&region), grid.rect(&region));
        assert_eq!(grid.rect(&region), vec!["a", "b", "far"]);
        let p = Vec2::new(100.5, 100.5);
        assert_eq!(brute.point(p), grid.point(p));
        let (a, b) = (Vec2::new(-1.0, -1.0), Vec2::new(101.0, 101.0));
        assert_eq!(brute.segment(a, b), grid.segment(a, b));
    }

    #[test]
    fn test_grid_segment_ending_below_cell_edge() {
        let mut t = EntityTable::new();
        t.insert("r", Rect::new(16.0, 0.0, 10.0, 10.0));
        let mut g = UniformGrid::new(16.0);
        for (k, r) in t.iter() {
            g.insert(k, r);
        }
        let brute = QueryEngine::new(&t, None);
        let grid = QueryEngine::new(&t, Some(&g));
        // The clip rounds t0 up to 1.0 for an end point one ulp short of the rect.
        let (a, b) = (Vec2::new(-20.0, 5.0), Vec2::new(f32::from_bits(16f32.to_bits() - 1), 5.0));
        assert_eq!(brute.segment_hits(a, b), grid.segment_hits(a, b));
        assert_eq!(brute.segment(a, b), grid.segment(a, b));
    }
}
