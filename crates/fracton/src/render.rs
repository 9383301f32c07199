//! Drawing data for the lattice: closed vertex loops plus a fill color.
//!
//! No drawing happens here; a plotting front end consumes `Scene`.

use crate::error::FractonError;
use crate::model::FractonModel;

/// Color selection for polygon fills. Colors are free-form names.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorScheme {
    Uniform(String),
    /// One color per polygon; a single entry is used for every polygon.
    PerPolygon(Vec<String>),
    /// +1 → `up`, −1 → `down`.
    Spins { up: String, down: String },
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::Uniform("white".to_string())
    }
}

impl ColorScheme {
    pub fn spins() -> Self {
        Self::Spins {
            up: "paleturquoise".to_string(),
            down: "crimson".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolygonPatch {
    /// `[x, y]` pairs; the first vertex is repeated at the end.
    pub outline: Vec<[f64; 2]>,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub patches: Vec<PolygonPatch>,
    /// Whether the unit boundary circle should be drawn.
    pub unit_circle: bool,
}

impl FractonModel {
    /// One patch per polygon, in index order.
    pub fn scene(&self, colors: &ColorScheme, unit_circle: bool) -> Result<Scene, FractonError> {
        let fills = self.fill_colors(colors)?;
        let patches = self
            .vertices()
            .iter()
            .zip(fills)
            .map(|(vs, color)| {
                let mut outline: Vec<[f64; 2]> = vs.iter().map(|v| [v.re, v.im]).collect();
                if let Some(&first) = outline.first() {
                    outline.push(first);
                }
                PolygonPatch { outline, color }
            })
            .collect();
        Ok(Scene {
            patches,
            unit_circle,
        })
    }

    fn fill_colors(&self, colors: &ColorScheme) -> Result<Vec<String>, FractonError> {
        let n = self.len();
        match colors {
            ColorScheme::Uniform(c) => Ok(vec![c.clone(); n]),
            ColorScheme::PerPolygon(list) if list.len() == 1 => Ok(vec![list[0].clone(); n]),
            ColorScheme::PerPolygon(list) if list.len() == n => Ok(list.clone()),
            ColorScheme::PerPolygon(list) => Err(FractonError::ColorCount {
                expected: n,
                got: list.len(),
            }),
            ColorScheme::Spins { up, down } => Ok(self
                .spins()
                .iter()
                .map(|&s| if s == 1 { up.clone() } else { down.clone() })
                .collect()),
        }
    }
}
