//! Tolerances for lattice construction.
//!
//! Policy
//! - Defaults are fixed constants; `ModelCfg` exists so experiments on deep
//!   lattices (where reflected coordinates accumulate error) can loosen them
//!   without touching call sites.

/// Absolute tolerance on geodesic centers used by `Geodesic`'s `PartialEq`.
pub const GEODESIC_EPS: f64 = 1e-7;
/// Absolute tolerance for identifying lattice vertices.
pub const VERTEX_EPS: f64 = 1e-8;
/// Absolute tolerance for identifying polygon centers while tiling.
pub const CENTER_EPS: f64 = 1e-6;
/// Edges with `|sin(angle between their endpoint rays)|` below this lie on a
/// diameter; they have no finite orthogonal circle.
pub const DIAMETER_EPS: f64 = 1e-9;

/// Model configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelCfg {
    pub vertex_eps: f64,
    /// Geodesic dedup tolerance. Values below `GEODESIC_EPS` are raised to it.
    pub geodesic_eps: f64,
    pub center_eps: f64,
    pub diameter_eps: f64,
}

impl Default for ModelCfg {
    fn default() -> Self {
        Self {
            vertex_eps: VERTEX_EPS,
            geodesic_eps: GEODESIC_EPS,
            center_eps: CENTER_EPS,
            diameter_eps: DIAMETER_EPS,
        }
    }
}

/// Entanglement-entropy sweep parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntropyCfg {
    /// When positive, geodesics with `distance_to_origin <= black_hole_radius`
    /// are ignored; 0 keeps all of them.
    pub black_hole_radius: f64,
    /// Only every `freq`-th border index is used as a cut origin. Clamped to >= 1.
    pub freq: usize,
}

impl Default for EntropyCfg {
    fn default() -> Self {
        Self {
            black_hole_radius: 0.0,
            freq: 1,
        }
    }
}

impl EntropyCfg {
    pub fn new(black_hole_radius: f64, freq: usize) -> Self {
        Self {
            black_hole_radius,
            freq,
        }
    }

    #[inline]
    pub(crate) fn step(&self) -> usize {
        self.freq.max(1)
    }
}
