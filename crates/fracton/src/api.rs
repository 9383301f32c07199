//! Curated internal API (UNSTABLE).
//!
//! A convenience surface for the CLI, benches and experiments. Breaking
//! changes are allowed and expected.

// Geometry
pub use crate::geodesic::{is_between, on_diameter, Geodesic, GeodesicError, Shape};
pub use crate::spatial::SpatialIndex;
pub use crate::Point;
// Lattice
pub use crate::cfg::{ModelCfg, CENTER_EPS, DIAMETER_EPS, GEODESIC_EPS, VERTEX_EPS};
pub use crate::error::{check_schlafli, FractonError};
pub use crate::tiling::{Kernel, Polygon, ReflectionTiling, Tiling};
// Model and observables
pub use crate::model::{Flip, FractonModel};
// Entropy
pub use crate::cfg::EntropyCfg;
pub use crate::entropy::{
    entanglement_entropy, entanglement_entropy_par, entanglement_entropy_with_progress,
    geodesics_per_length, wedge_counts, EntropyProgress,
};
// Render data
pub use crate::render::{ColorScheme, PolygonPatch, Scene};
