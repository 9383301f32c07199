//! Hyperbolic fracton model on {p,q} tilings of the Poincaré disk.
//!
//! Layout
//! - `geodesic`: closed-form hyperbolic lines and the wedge side test.
//! - `tiling`: the lattice surface the model consumes, plus a reflection
//!   generator.
//! - `model`: bulk/border partition, edge geodesics, vertex interaction
//!   groups, spins, energy, correlators and the random wedge flip.
//! - `entropy`: geodesic-crossing entanglement profile and the length
//!   histogram.
//! - `render`: polygon outlines and fill colors for plotting front ends.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; prefer
//!   the curated re-exports in `api` and `prelude`.

pub mod api;
pub mod cfg;
pub mod entropy;
pub mod error;
pub mod geodesic;
pub mod model;
pub mod render;
pub mod spatial;
pub mod tiling;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Points of the ambient plane (the disk is `|z| < 1`).
pub type Point = nalgebra::Complex<f64>;

pub use cfg::{EntropyCfg, ModelCfg};
pub use error::FractonError;
pub use geodesic::{Geodesic, GeodesicError};
pub use model::FractonModel;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::entropy::{entanglement_entropy, entanglement_entropy_par, geodesics_per_length};
    pub use crate::render::ColorScheme;
    pub use crate::tiling::{Kernel, Tiling};
    pub use crate::{EntropyCfg, FractonError, FractonModel, Geodesic, ModelCfg, Point};
}
