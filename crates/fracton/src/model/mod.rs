//! Hyperbolic fracton model on a {p,q} lattice.
//!
//! Purpose
//! - Hold the lattice data the observables need: bulk/border partition,
//!   cyclic border order, deduplicated edge geodesics, vertex interaction
//!   groups and the ±1 spin configuration.
//!
//! Lifecycle
//! - Everything except `spins` is computed once in `from_tiling` and never
//!   changes. Construction is all-or-nothing.
//! - `spins` starts all +1 and is changed only by `decorrelate`/`set_spins`.
//!
//! Code cross-refs: `Tiling`, `Geodesic`, `SpatialIndex`, `crate::entropy`.

mod observables;

pub use observables::Flip;

use crate::cfg::{ModelCfg, GEODESIC_EPS};
use crate::error::{check_schlafli, FractonError};
use crate::geodesic::Geodesic;
use crate::spatial::SpatialIndex;
use crate::tiling::{Kernel, ReflectionTiling, Tiling};
use crate::Point;

#[derive(Clone, Debug)]
pub struct FractonModel {
    p: usize,
    nlayers: usize,
    vertices: Vec<Vec<Point>>,
    centers: Vec<Point>,
    bulk: Vec<usize>,
    border: Vec<usize>,
    border_phases: Vec<f64>,
    border_neigh: Vec<Vec<usize>>,
    geodesics: Vec<Geodesic>,
    interactions: Vec<Vec<usize>>,
    spins: Vec<i8>,
}

impl FractonModel {
    /// Build the model on a freshly generated {p,q} tiling with `nlayers`
    /// layers around the central polygon.
    pub fn new(
        p: usize,
        q: usize,
        nlayers: usize,
        kernel: Option<Kernel>,
    ) -> Result<Self, FractonError> {
        Self::with_cfg(p, q, nlayers, kernel, ModelCfg::default())
    }

    pub fn with_cfg(
        p: usize,
        q: usize,
        nlayers: usize,
        kernel: Option<Kernel>,
        cfg: ModelCfg,
    ) -> Result<Self, FractonError> {
        check_schlafli(p, q)?;
        let tiling = ReflectionTiling::with_cfg(p, q, nlayers, kernel.unwrap_or_default(), &cfg)?;
        Self::from_tiling(&tiling, nlayers, cfg)
    }

    /// Build the model on any tiling. Polygons with `layer == nlayers` form
    /// the border; all others are bulk.
    pub fn from_tiling<T: Tiling + ?Sized>(
        tiling: &T,
        nlayers: usize,
        cfg: ModelCfg,
    ) -> Result<Self, FractonError> {
        let p = tiling.p();
        if p < 3 {
            return Err(FractonError::invalid(format!("polygons need p >= 3, got {p}")));
        }
        let n = tiling.len();
        let mut vertices = Vec::with_capacity(n);
        for i in 0..n {
            let vs = tiling.vertices(i);
            if vs.len() != p {
                return Err(FractonError::invalid(format!(
                    "polygon {i} has {} vertices, expected {p}",
                    vs.len()
                )));
            }
            vertices.push(vs.to_vec());
        }
        let centers: Vec<Point> = (0..n).map(|i| tiling.center(i)).collect();

        let (bulk, border): (Vec<usize>, Vec<usize>) =
            (0..n).partition(|&i| tiling.layer(i) != nlayers);
        let (border, border_phases) = sort_by_phase(border, &centers);
        let border_neigh = half_circle_neighbors(border.len());
        let geodesics = edge_geodesics(&bulk, &vertices, &cfg)?;
        let interactions = vertex_groups(&bulk, &vertices, cfg.vertex_eps);

        tracing::debug!(
            polygons = n,
            bulk = bulk.len(),
            border = border.len(),
            geodesics = geodesics.len(),
            interactions = interactions.len(),
            "model built"
        );
        Ok(Self {
            p,
            nlayers,
            vertices,
            centers,
            bulk,
            border,
            border_phases,
            border_neigh,
            geodesics,
            interactions,
            spins: vec![1; n],
        })
    }

    /// Edge count of every polygon.
    pub fn p(&self) -> usize {
        self.p
    }

    pub fn nlayers(&self) -> usize {
        self.nlayers
    }

    /// Number of polygons.
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    pub fn vertices(&self) -> &[Vec<Point>] {
        &self.vertices
    }

    pub fn centers(&self) -> &[Point] {
        &self.centers
    }

    pub fn bulk(&self) -> &[usize] {
        &self.bulk
    }

    /// Border polygon indices, ascending by the phase of their centers.
    pub fn border(&self) -> &[usize] {
        &self.border
    }

    /// Phases matching `border` entry by entry.
    pub fn border_phases(&self) -> &[f64] {
        &self.border_phases
    }

    /// For border position `i`: positions `i+1 ..= i+⌊|border|/2⌋` (cyclic).
    pub fn border_neigh(&self) -> &[Vec<usize>] {
        &self.border_neigh
    }

    pub fn border_centers(&self) -> Vec<Point> {
        self.border.iter().map(|&i| self.centers[i]).collect()
    }

    /// Deduplicated bulk edge geodesics, in discovery order.
    pub fn geodesics(&self) -> &[Geodesic] {
        &self.geodesics
    }

    /// One group per lattice vertex touched by the bulk: every polygon with
    /// that vertex, ascending.
    pub fn interactions(&self) -> &[Vec<usize>] {
        &self.interactions
    }

    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    /// Replace the spin configuration. Must have one ±1 entry per polygon.
    pub fn set_spins(&mut self, spins: Vec<i8>) -> Result<(), FractonError> {
        if spins.len() != self.len() {
            return Err(FractonError::invalid(format!(
                "expected {} spins, got {}",
                self.len(),
                spins.len()
            )));
        }
        if let Some(bad) = spins.iter().find(|&&s| s != 1 && s != -1) {
            return Err(FractonError::invalid(format!("spin value {bad} is not ±1")));
        }
        self.spins = spins;
        Ok(())
    }

    /// All spins back to +1.
    pub fn reset_spins(&mut self) {
        self.spins.iter_mut().for_each(|s| *s = 1);
    }
}

/// Co-sort border indices with the phases of their centers (ties by index).
fn sort_by_phase(border: Vec<usize>, centers: &[Point]) -> (Vec<usize>, Vec<f64>) {
    let mut keyed: Vec<(f64, usize)> = border.into_iter().map(|i| (centers[i].arg(), i)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    keyed.into_iter().map(|(phase, i)| (i, phase)).unzip()
}

fn half_circle_neighbors(n: usize) -> Vec<Vec<usize>> {
    (0..n)
        .map(|i| (1..=n / 2).map(|k| (i + k) % n).collect())
        .collect()
}

/// Edges on a line through the origin become diameters. Circles and diameters
/// are deduplicated separately (centers vs. `direction²`), never looser than
/// `Geodesic`'s own equality so no two kept lines compare equal.
fn edge_geodesics(
    bulk: &[usize],
    vertices: &[Vec<Point>],
    cfg: &ModelCfg,
) -> Result<Vec<Geodesic>, FractonError> {
    let eps = cfg.geodesic_eps.max(GEODESIC_EPS);
    let mut circles = SpatialIndex::new(eps);
    let mut diameters = SpatialIndex::new(eps);
    let mut out = Vec::new();
    for &pol in bulk {
        let vs = &vertices[pol];
        for edge in 0..vs.len() {
            let (a, b) = (vs[edge], vs[(edge + 1) % vs.len()]);
            let g = Geodesic::from_edge(a, b, cfg.diameter_eps).map_err(|source| {
                FractonError::Geodesic {
                    polygon: pol,
                    edge,
                    source,
                }
            })?;
            let seen = if g.is_diameter() {
                &mut diameters
            } else {
                &mut circles
            };
            if seen.find_or_insert(g.dedup_key()).1 {
                out.push(g);
            }
        }
    }
    if !diameters.is_empty() {
        tracing::debug!(diameters = diameters.len(), "bulk edges on lines through the origin");
    }
    Ok(out)
}

fn vertex_groups(bulk: &[usize], vertices: &[Vec<Point>], eps: f64) -> Vec<Vec<usize>> {
    let mut all = SpatialIndex::new(eps);
    let mut owner = Vec::new();
    for (pol, vs) in vertices.iter().enumerate() {
        for &v in vs {
            all.insert(v);
            owner.push(pol);
        }
    }
    let mut recorded = SpatialIndex::new(eps);
    let mut groups = Vec::new();
    for &pol in bulk {
        for &v in &vertices[pol] {
            if !recorded.find_or_insert(v).1 {
                continue;
            }
            let mut group: Vec<usize> = all.neighbors(v).map(|id| owner[id]).collect();
            group.sort_unstable();
            group.dedup();
            groups.push(group);
        }
    }
    groups
}
