//! Error type shared by tiling, model construction and scene export.

use std::fmt;

use crate::geodesic::GeodesicError;

#[derive(Debug)]
pub enum FractonError {
    /// `(p-2)(q-2) > 4` does not hold; the tiling is not hyperbolic.
    InvalidSchlafli { p: usize, q: usize },
    InvalidParams { reason: String },
    /// A bulk polygon edge produced a degenerate geodesic.
    Geodesic {
        polygon: usize,
        edge: usize,
        source: GeodesicError,
    },
    ColorCount { expected: usize, got: usize },
}

impl FractonError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FractonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSchlafli { p, q } => {
                write!(f, "{{{p},{q}}} is not hyperbolic: need (p-2)(q-2) > 4")
            }
            Self::InvalidParams { reason } => write!(f, "invalid params: {reason}"),
            Self::Geodesic {
                polygon,
                edge,
                source,
            } => write!(f, "polygon {polygon}, edge {edge}: {source}"),
            Self::ColorCount { expected, got } => {
                write!(f, "expected {expected} colors (or 1), got {got}")
            }
        }
    }
}

impl std::error::Error for FractonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geodesic { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Validate the Schläfli condition `(p-2)(q-2) > 4`.
pub fn check_schlafli(p: usize, q: usize) -> Result<(), FractonError> {
    let (pi, qi) = (p as i64, q as i64);
    if p < 3 || q < 3 || (pi - 2) * (qi - 2) <= 4 {
        return Err(FractonError::InvalidSchlafli { p, q });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schlafli_accepts_hyperbolic_only() {
        assert!(check_schlafli(4, 5).is_ok());
        assert!(check_schlafli(5, 4).is_ok());
        assert!(check_schlafli(7, 3).is_ok());
        // Euclidean and spherical tilings
        assert!(check_schlafli(4, 4).is_err());
        assert!(check_schlafli(3, 6).is_err());
        assert!(check_schlafli(6, 3).is_err());
        assert!(check_schlafli(5, 3).is_err());
        // Degenerate polygons
        assert!(check_schlafli(2, 100).is_err());
        assert!(check_schlafli(0, 0).is_err());
    }

    #[test]
    fn display_names_the_symbol() {
        let e = FractonError::InvalidSchlafli { p: 4, q: 4 };
        assert_eq!(e.to_string(), "{4,4} is not hyperbolic: need (p-2)(q-2) > 4");
    }
}
