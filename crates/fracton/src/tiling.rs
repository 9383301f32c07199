//! Regular {p,q} tilings of the Poincaré disk.
//!
//! Purpose
//! - `Tiling` is the read-only surface the model consumes: polygon count,
//!   per-polygon vertex loop, center and layer depth, and the edge count `p`.
//! - `ReflectionTiling` is a small generator behind that surface so a model can
//!   be built from `(p, q, nlayers, kernel)` alone.
//!
//! Model
//! - Layer 0 is a regular p-gon centered at the origin, vertex `k` at angle
//!   `2πk/p` and Euclidean radius `sqrt(cos(π/p+π/q) / cos(π/p−π/q))`.
//! - New polygons are images of existing ones under the hyperbolic reflection
//!   across one of their edges. Polygons are identified by their centers.
//! - `Kernel` decides what "next layer" means: edge neighbors only, or every
//!   polygon sharing a vertex with the previous layer.

use std::collections::VecDeque;
use std::f64::consts::PI;
use std::str::FromStr;

use crate::cfg::ModelCfg;
use crate::error::{check_schlafli, FractonError};
use crate::geodesic::Geodesic;
use crate::spatial::SpatialIndex;
use crate::Point;

/// Read-only view of a generated tiling.
pub trait Tiling {
    /// Edge count of every polygon.
    fn p(&self) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Vertex loop (counter-clockwise, not closed).
    fn vertices(&self, index: usize) -> &[Point];
    fn center(&self, index: usize) -> Point;
    fn layer(&self, index: usize) -> usize;
}

/// Layer growth rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Kernel {
    /// Layer k+1: polygons sharing an edge with layer k.
    #[default]
    EdgeAdjacent,
    /// Layer k+1: polygons sharing at least one vertex with layer k.
    VertexAdjacent,
}

impl FromStr for Kernel {
    type Err = FractonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edge" | "edge-adjacent" => Ok(Self::EdgeAdjacent),
            "vertex" | "vertex-adjacent" => Ok(Self::VertexAdjacent),
            other => Err(FractonError::invalid(format!("unknown kernel `{other}`"))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Polygon {
    pub index: usize,
    pub vertices: Vec<Point>,
    pub center: Point,
    pub layer: usize,
}

impl Polygon {
    /// Mirror image across edge `k` (vertices `k`, `k+1`).
    fn reflected(
        &self,
        k: usize,
        index: usize,
        layer: usize,
        diameter_eps: f64,
    ) -> Result<Polygon, FractonError> {
        let n = self.vertices.len();
        let a = self.vertices[k];
        let b = self.vertices[(k + 1) % n];
        let mirror = Geodesic::from_edge(a, b, diameter_eps).map_err(|source| {
            FractonError::Geodesic {
                polygon: self.index,
                edge: k,
                source,
            }
        })?;
        // Reflection reverses orientation; reversing the loop restores CCW.
        let vertices = self
            .vertices
            .iter()
            .rev()
            .map(|&v| mirror.reflect(v))
            .collect();
        Ok(Polygon {
            index,
            vertices,
            center: mirror.reflect(self.center),
            layer,
        })
    }
}

/// {p,q} tiling grown by edge reflections.
#[derive(Clone, Debug)]
pub struct ReflectionTiling {
    p: usize,
    q: usize,
    kernel: Kernel,
    diameter_eps: f64,
    polygons: Vec<Polygon>,
}

impl ReflectionTiling {
    pub fn new(p: usize, q: usize, nlayers: usize, kernel: Kernel) -> Result<Self, FractonError> {
        Self::with_cfg(p, q, nlayers, kernel, &ModelCfg::default())
    }

    pub fn with_cfg(
        p: usize,
        q: usize,
        nlayers: usize,
        kernel: Kernel,
        cfg: &ModelCfg,
    ) -> Result<Self, FractonError> {
        check_schlafli(p, q)?;
        let mut tiling = Self {
            p,
            q,
            kernel,
            diameter_eps: cfg.diameter_eps,
            polygons: vec![fundamental_polygon(p, q)],
        };
        let mut seen = SpatialIndex::new(cfg.center_eps);
        seen.insert(tiling.polygons[0].center);
        let mut frontier = vec![0];
        for layer in 1..=nlayers {
            frontier = match kernel {
                Kernel::EdgeAdjacent => tiling.grow_edges(&frontier, layer, &mut seen)?,
                Kernel::VertexAdjacent => {
                    tiling.grow_vertices(&frontier, layer, &mut seen, cfg.vertex_eps)?
                }
            };
            tracing::debug!(layer, added = frontier.len(), total = tiling.polygons.len(), "tiling layer");
            if frontier.is_empty() {
                break;
            }
        }
        Ok(tiling)
    }

    fn grow_edges(
        &mut self,
        frontier: &[usize],
        layer: usize,
        seen: &mut SpatialIndex,
    ) -> Result<Vec<usize>, FractonError> {
        let mut next = Vec::new();
        for &i in frontier {
            for k in 0..self.p {
                let cand =
                    self.polygons[i].reflected(k, self.polygons.len(), layer, self.diameter_eps)?;
                if seen.find(cand.center).is_none() {
                    seen.insert(cand.center);
                    next.push(cand.index);
                    self.polygons.push(cand);
                }
            }
        }
        Ok(next)
    }

    fn grow_vertices(
        &mut self,
        frontier: &[usize],
        layer: usize,
        seen: &mut SpatialIndex,
        vertex_eps: f64,
    ) -> Result<Vec<usize>, FractonError> {
        let mut ring = SpatialIndex::new(vertex_eps);
        for &i in frontier {
            for &v in &self.polygons[i].vertices {
                ring.find_or_insert(v);
            }
        }
        // Polygons around a ring vertex may only be reachable through polygons
        // of earlier layers, so every known polygon seeds the walk.
        let mut queue: VecDeque<usize> = (0..self.polygons.len()).collect();
        let mut next = Vec::new();
        while let Some(i) = queue.pop_front() {
            for k in 0..self.p {
                let cand =
                    self.polygons[i].reflected(k, self.polygons.len(), layer, self.diameter_eps)?;
                if seen.find(cand.center).is_some() {
                    continue;
                }
                if !cand.vertices.iter().any(|&v| ring.find(v).is_some()) {
                    continue;
                }
                seen.insert(cand.center);
                next.push(cand.index);
                queue.push_back(cand.index);
                self.polygons.push(cand);
            }
        }
        Ok(next)
    }

    pub fn q(&self) -> usize {
        self.q
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }
}

impl Tiling for ReflectionTiling {
    fn p(&self) -> usize {
        self.p
    }

    fn len(&self) -> usize {
        self.polygons.len()
    }

    fn vertices(&self, index: usize) -> &[Point] {
        &self.polygons[index].vertices
    }

    fn center(&self, index: usize) -> Point {
        self.polygons[index].center
    }

    fn layer(&self, index: usize) -> usize {
        self.polygons[index].layer
    }
}

fn fundamental_polygon(p: usize, q: usize) -> Polygon {
    let (pf, qf) = (p as f64, q as f64);
    let r0 = ((PI / pf + PI / qf).cos() / (PI / pf - PI / qf).cos()).sqrt();
    let vertices = (0..p)
        .map(|k| Point::from_polar(r0, 2.0 * PI * k as f64 / pf))
        .collect();
    Polygon {
        index: 0,
        vertices,
        center: Point::new(0.0, 0.0),
        layer: 0,
    }
}
