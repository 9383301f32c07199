//! Hyperbolic lines in the Poincaré disk.
//!
//! A geodesic through two points `z1, z2` of the disk is the Euclidean circle
//! through both that meets the unit circle at right angles. Everything here is
//! closed-form: no iteration, no root finding.
//!
//! Conventions
//! - `center` is the Euclidean center of that circle (outside the unit disk).
//! - `radius` stores `|center|² − 1`, i.e. the *squared* Euclidean radius
//!   (orthogonality gives `R² + 1 = |center|²`).
//! - `endpoints` are the two ideal points, re-derived from `center`.
//! - `distance_to_origin` is the closest Euclidean approach of the circle
//!   to the origin, `|center| − sqrt(|center|² − 1)`.
//!
//! Formulas are written in terms of the doubled center coordinates
//! `a = 2·Re(center)`, `b = 2·Im(center)`, branching on exact zeros the same
//! way for endpoints and distance.
//!
//! Lines through the origin are the `Shape::Diameter` limit of the circle
//! family (center at infinity). They carry a unit direction in the upper
//! half-plane, endpoints `±direction`, distance 0, and the side test
//! degenerates to a half-disk: −1 strictly left of `direction`.

use std::fmt;

use crate::cfg::GEODESIC_EPS;
use crate::Point;

#[derive(Clone, Debug, PartialEq)]
pub enum GeodesicError {
    /// The two points coincide or are collinear with the origin.
    Degenerate { reason: String },
}

impl GeodesicError {
    fn degenerate(reason: impl Into<String>) -> Self {
        Self::Degenerate {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GeodesicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degenerate { reason } => write!(f, "degenerate geodesic: {reason}"),
        }
    }
}

impl std::error::Error for GeodesicError {}

/// Euclidean shape of a hyperbolic line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Circle orthogonal to the unit circle; `radius` is `|center|² − 1`.
    Circle { center: Point, radius: f64 },
    /// Line through the origin; `direction` is a unit vector with angle in `[0, π)`.
    Diameter { direction: Point },
}

/// One hyperbolic line. Immutable after construction.
#[derive(Clone, Copy, Debug)]
pub struct Geodesic {
    shape: Shape,
    endpoints: [Point; 2],
    distance_to_origin: f64,
}

impl Geodesic {
    /// Geodesic through `z1` and `z2`.
    ///
    /// Pre: `z1 != z2` and the two points are not collinear with the origin
    /// (antipodal ideal points, or any diameter). Both cases are reported as
    /// `GeodesicError::Degenerate`. Nearly collinear input is accepted and
    /// yields a very distant center.
    pub fn new(z1: Point, z2: Point) -> Result<Self, GeodesicError> {
        let center = orthogonal_center(z1, z2)?;
        Ok(Self {
            shape: Shape::Circle {
                center,
                radius: center.norm_sqr() - 1.0,
            },
            endpoints: ideal_endpoints(center),
            distance_to_origin: closest_approach(center),
        })
    }

    /// The diameter along `u` (any nonzero multiple of the direction).
    pub fn diameter(u: Point) -> Result<Self, GeodesicError> {
        let len = u.norm();
        if !(len > 0.0 && len.is_finite()) {
            return Err(GeodesicError::degenerate("diameter direction is zero or not finite"));
        }
        let mut direction = u / len;
        if direction.im < 0.0 || (direction.im == 0.0 && direction.re < 0.0) {
            direction = -direction;
        }
        Ok(Self {
            shape: Shape::Diameter { direction },
            endpoints: [direction, -direction],
            distance_to_origin: 0.0,
        })
    }

    /// Line carrying the lattice edge `a`–`b`: a diameter when the edge lies on
    /// a line through the origin (within `diameter_eps`), else the orthogonal
    /// circle.
    pub fn from_edge(a: Point, b: Point, diameter_eps: f64) -> Result<Self, GeodesicError> {
        if a == b {
            return Err(GeodesicError::degenerate("edge endpoints coincide"));
        }
        if on_diameter(a, b, diameter_eps) {
            let far = if a.norm() >= b.norm() { a } else { b };
            Self::diameter(far)
        } else {
            Self::new(a, b)
        }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn is_diameter(&self) -> bool {
        matches!(self.shape, Shape::Diameter { .. })
    }

    /// Euclidean center; `None` for a diameter.
    #[inline]
    pub fn center(&self) -> Option<Point> {
        match self.shape {
            Shape::Circle { center, .. } => Some(center),
            Shape::Diameter { .. } => None,
        }
    }

    /// `|center|² − 1` (squared Euclidean radius of the circle); `None` for a
    /// diameter.
    #[inline]
    pub fn radius(&self) -> Option<f64> {
        match self.shape {
            Shape::Circle { radius, .. } => Some(radius),
            Shape::Diameter { .. } => None,
        }
    }

    #[inline]
    pub fn endpoints(&self) -> [Point; 2] {
        self.endpoints
    }

    #[inline]
    pub fn distance_to_origin(&self) -> f64 {
        self.distance_to_origin
    }

    /// Side tag of `z0`: −1 iff `z0` lies angularly between the endpoints
    /// (as seen from the origin) and farther from the origin than the arc's
    /// closest approach; +1 otherwise.
    ///
    /// This is a wedge test anchored at the origin, not literal containment in
    /// the disk segment cut off by the arc.
    ///
    /// For a diameter the wedge is the open half-disk left of `direction`.
    pub fn is_inside(&self, z0: Point) -> i8 {
        let inside = match self.shape {
            Shape::Circle { .. } => {
                let [z1, z2] = self.endpoints;
                z0.norm() > self.distance_to_origin && is_between(z0, z1, z2)
            }
            Shape::Diameter { direction } => cross(direction, z0) > 0.0,
        };
        if inside {
            -1
        } else {
            1
        }
    }

    /// `is_inside` applied to every point, same order.
    pub fn inside_tags(&self, points: &[Point]) -> Vec<i8> {
        points.iter().map(|&z| self.is_inside(z)).collect()
    }

    /// Hyperbolic reflection across this line: inversion in the circle, or the
    /// Euclidean mirror for a diameter.
    pub fn reflect(&self, z: Point) -> Point {
        match self.shape {
            Shape::Circle { center, radius } => center + radius / (z - center).conj(),
            Shape::Diameter { direction } => direction * direction * z.conj(),
        }
    }

    /// Circles: centers within `eps` (absolute). Diameters: directions equal
    /// modulo π, compared as `direction²` within `eps`. A circle never equals
    /// a diameter.
    #[inline]
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        match (self.shape, other.shape) {
            (Shape::Circle { center: c1, .. }, Shape::Circle { center: c2, .. }) => {
                (c1 - c2).norm() <= eps
            }
            (Shape::Diameter { direction: u1 }, Shape::Diameter { direction: u2 }) => {
                (u1 * u1 - u2 * u2).norm() <= eps
            }
            _ => false,
        }
    }

    /// Point identifying this line up to `approx_eq`: the center, or
    /// `direction²` for a diameter.
    pub(crate) fn dedup_key(&self) -> Point {
        match self.shape {
            Shape::Circle { center, .. } => center,
            Shape::Diameter { direction } => direction * direction,
        }
    }
}

/// Equality uses `approx_eq` with the absolute tolerance `GEODESIC_EPS`.
impl PartialEq for Geodesic {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, GEODESIC_EPS)
    }
}

/// Is `z0` inside the (smaller than π) angular sector spanned by `z1` and `z2`?
/// Boundary rays count as inside.
pub fn is_between(z0: Point, z1: Point, z2: Point) -> bool {
    let cross10 = cross(z1, z0);
    let cross12 = cross(z1, z2);
    let cross20 = cross(z2, z0);
    let cross21 = cross(z2, z1);
    cross10 * cross12 >= 0.0 && cross20 * cross21 >= 0.0
}

/// Does the segment `a`–`b` lie (within `eps`) on a line through the origin?
/// `eps` bounds `|sin|` of the angle between the rays to `a` and `b`.
pub fn on_diameter(a: Point, b: Point, eps: f64) -> bool {
    cross(a, b).abs() <= eps * a.norm() * b.norm()
}

#[inline]
fn cross(u: Point, v: Point) -> f64 {
    u.re * v.im - v.re * u.im
}

fn orthogonal_center(z1: Point, z2: Point) -> Result<Point, GeodesicError> {
    let det = cross(z1, z2);
    if det == 0.0 {
        return Err(GeodesicError::degenerate(
            "points coincide or are collinear with the origin",
        ));
    }
    let n1 = z1.norm_sqr() + 1.0;
    let n2 = z2.norm_sqr() + 1.0;
    let cx = (z2.im * n1 - z1.im * n2) / (2.0 * det);
    let cy = (z1.re * n2 - z2.re * n1) / (2.0 * det);
    if !(cx.is_finite() && cy.is_finite()) {
        return Err(GeodesicError::degenerate("center is not finite"));
    }
    Ok(Point::new(cx, cy))
}

fn ideal_endpoints(center: Point) -> [Point; 2] {
    let a = 2.0 * center.re;
    let b = 2.0 * center.im;
    if a == 0.0 {
        let y = 2.0 / b;
        let x = (1.0 - 4.0 / (b * b)).sqrt();
        [Point::new(x, y), Point::new(-x, y)]
    } else if b == 0.0 {
        let x = 2.0 / a;
        let y = (1.0 - 4.0 / (a * a)).sqrt();
        [Point::new(x, y), Point::new(x, -y)]
    } else {
        // Chord midpoint c/|c|² plus/minus the half chord along i·c.
        let s = a * a + b * b;
        let w = (s - 4.0).sqrt();
        [
            Point::new((2.0 * a - b * w) / s, (2.0 * b + a * w) / s),
            Point::new((2.0 * a + b * w) / s, (2.0 * b - a * w) / s),
        ]
    }
}

fn closest_approach(center: Point) -> f64 {
    let a = 2.0 * center.re;
    let b = 2.0 * center.im;
    if a == 0.0 || b == 0.0 {
        let m = if b == 0.0 { a } else { b };
        let r = (m * m / 4.0 - 1.0).sqrt();
        return (r - m / 2.0).abs().min((-r - m / 2.0).abs());
    }
    // Both intersections of the circle with the line through origin and center.
    let s = a * a + b * b;
    let u = (a.powi(6) + 2.0 * a.powi(4) * (b * b - 2.0) + a * a * b * b * (b * b - 4.0)).sqrt();
    let x0 = (a.powi(3) + a * b * b + u) / (2.0 * s);
    let x1 = (a.powi(3) + a * b * b - u) / (2.0 * s);
    let y0 = b * x0 / a;
    let y1 = b * x1 / a;
    x0.hypot(y0).min(x1.hypot(y1))
}
