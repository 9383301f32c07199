//! Tolerance-based point lookup on a quantized grid.
//!
//! Points are bucketed by `(floor(x/eps), floor(y/eps))`. Any stored point
//! within `eps` of a query lies in one of the 3×3 cells around the query's
//! cell, so a lookup touches a constant number of buckets instead of scanning
//! everything inserted so far.

use std::collections::HashMap;

use crate::Point;

#[derive(Clone, Debug)]
pub struct SpatialIndex {
    eps: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
    points: Vec<Point>,
}

impl SpatialIndex {
    /// Pre: `eps > 0` and finite.
    pub fn new(eps: f64) -> Self {
        debug_assert!(eps > 0.0 && eps.is_finite(), "grid size must be positive");
        Self {
            eps,
            cells: HashMap::new(),
            points: Vec::new(),
        }
    }

    #[inline]
    fn key(&self, z: Point) -> (i64, i64) {
        // `as` saturates, so far-away points share the outermost cells.
        ((z.re / self.eps).floor() as i64, (z.im / self.eps).floor() as i64)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, id: usize) -> Point {
        self.points[id]
    }

    /// Store `z`, returning its id (insertion order).
    pub fn insert(&mut self, z: Point) -> usize {
        let id = self.points.len();
        self.points.push(z);
        let key = self.key(z);
        self.cells.entry(key).or_default().push(id);
        id
    }

    /// Smallest id of a stored point within `eps` of `z`.
    pub fn find(&self, z: Point) -> Option<usize> {
        self.neighbors(z).min()
    }

    /// Id of a stored point within `eps` of `z`, inserting `z` if there is none.
    /// The flag is `true` when `z` was inserted.
    pub fn find_or_insert(&mut self, z: Point) -> (usize, bool) {
        match self.find(z) {
            Some(id) => (id, false),
            None => (self.insert(z), true),
        }
    }

    /// All stored ids within `eps` of `z`, unordered.
    pub fn neighbors(&self, z: Point) -> impl Iterator<Item = usize> + '_ {
        let (kx, ky) = self.key(z);
        let eps = self.eps;
        (-1i64..=1)
            .flat_map(move |dx| (-1i64..=1).map(move |dy| (kx.saturating_add(dx), ky.saturating_add(dy))))
            .filter_map(move |k| self.cells.get(&k))
            .flatten()
            .copied()
            .filter(move |&id| (self.points[id] - z).norm() <= eps)
    }
}
