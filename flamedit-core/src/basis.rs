//! Coordinate basis
//!
//! Maps the abstract coordinate system in which xform coefficients are
//! authored onto scene coordinates. Every triangle, the selection polygon
//! and the coordinate mark are stored in scene coordinates and are
//! re-expressed whenever the basis changes.

use crate::genome::Coefs;
use kurbo::{Affine, BezPath, Point, Rect, Shape};
use serde::{Deserialize, Serialize};

/// Default basis: 100 scene units per abstract unit, y axis pointing up
pub const DEFAULT_BASIS: [f64; 6] = [100.0, 0.0, 0.0, -100.0, 0.0, 0.0];

/// The three points of an xform triangle
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriangleCoords {
    /// Origin
    pub o: Point,
    /// Tip of the X axis
    pub x: Point,
    /// Tip of the Y axis
    pub y: Point,
}

impl TriangleCoords {
    pub fn new(o: Point, x: Point, y: Point) -> Self {
        Self { o, x, y }
    }

    /// Coordinates of the given coefficients in abstract space
    pub fn from_coefs(c: &Coefs) -> Self {
        let o = Point::new(c[2][0], c[2][1]);
        Self {
            o,
            x: Point::new(o.x + c[0][0], o.y + c[0][1]),
            y: Point::new(o.x + c[1][0], o.y + c[1][1]),
        }
    }

    /// Coefficients described by these abstract coordinates
    pub fn to_coefs(&self) -> Coefs {
        [
            [self.x.x - self.o.x, self.x.y - self.o.y],
            [self.y.x - self.o.x, self.y.y - self.o.y],
            [self.o.x, self.o.y],
        ]
    }

    pub fn map(&self, affine: Affine) -> Self {
        Self {
            o: affine * self.o,
            x: affine * self.x,
            y: affine * self.y,
        }
    }

    pub fn points(&self) -> [Point; 3] {
        [self.o, self.x, self.y]
    }
}

/// Affine map from abstract to scene coordinates
#[derive(Clone, Debug)]
pub struct Basis {
    coord_transform: Affine,
    inverse: Affine,
}

impl Default for Basis {
    fn default() -> Self {
        Self::new(Affine::new(DEFAULT_BASIS))
    }
}

impl Basis {
    /// Create a basis from an abstract → scene transform
    ///
    /// A singular transform falls back to the default basis.
    pub fn new(coord_transform: Affine) -> Self {
        if coord_transform.determinant().abs() < f64::EPSILON {
            log::warn!("Basis::new: singular basis {:?}, using default", coord_transform);
            return Self::default();
        }
        Self {
            coord_transform,
            inverse: coord_transform.inverse(),
        }
    }

    pub fn from_coeffs(coeffs: [f64; 6]) -> Self {
        Self::new(Affine::new(coeffs))
    }

    pub fn coord_transform(&self) -> Affine {
        self.coord_transform
    }

    pub fn inverse(&self) -> Affine {
        self.inverse
    }

    pub fn coeffs(&self) -> [f64; 6] {
        self.coord_transform.as_coeffs()
    }

    /// Replace the transform, returning the old → new re-expression map
    pub fn set_coord_transform(&mut self, coord_transform: Affine) -> Affine {
        let old_inverse = self.inverse;
        *self = Self::new(coord_transform);
        self.coord_transform * old_inverse
    }

    /// Scale the basis in abstract space
    ///
    /// Returns `new * old⁻¹`: the map that re-expresses a scene point under
    /// the old basis as the same abstract point under the new one. Dependents
    /// apply this to their scene points instead of recomputing them from the
    /// coefficients.
    pub fn scale(&mut self, dx: f64, dy: f64) -> Affine {
        if dx == 0.0 || dy == 0.0 {
            return Affine::IDENTITY;
        }
        let scaled = self.coord_transform * Affine::scale_non_uniform(dx, dy);
        self.set_coord_transform(scaled)
    }

    /// Abstract → scene
    pub fn map(&self, p: Point) -> Point {
        self.coord_transform * p
    }

    /// Scene → abstract
    pub fn inverse_map(&self, p: Point) -> Point {
        self.inverse * p
    }

    pub fn map_polygon(&self, polygon: &[Point]) -> Vec<Point> {
        polygon.iter().map(|&p| self.map(p)).collect()
    }

    pub fn inverse_map_polygon(&self, polygon: &[Point]) -> Vec<Point> {
        polygon.iter().map(|&p| self.inverse_map(p)).collect()
    }

    /// Scene coordinates of an xform triangle
    pub fn coords(&self, coefs: &Coefs) -> TriangleCoords {
        TriangleCoords::from_coefs(coefs).map(self.coord_transform)
    }

    /// Coefficients of a triangle given in scene coordinates
    pub fn coefs(&self, scene: &TriangleCoords) -> Coefs {
        scene.map(self.inverse).to_coefs()
    }

    /// Scene coordinates of the unit basis triangle
    pub fn triangle(&self) -> TriangleCoords {
        TriangleCoords::new(
            self.map(Point::ORIGIN),
            self.map(Point::new(1.0, 0.0)),
            self.map(Point::new(0.0, 1.0)),
        )
    }

    pub fn scene_bounding_box(&self) -> Rect {
        let t = self.triangle();
        Rect::from_points(t.o, t.x).union_pt(t.y)
    }

    /// Whether a scene point lies inside the basis triangle
    pub fn contains(&self, p: Point) -> bool {
        let t = self.triangle();
        let mut path = BezPath::new();
        path.move_to(t.o);
        path.line_to(t.x);
        path.line_to(t.y);
        path.close_path();
        path.contains(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::IDENTITY_COEFS;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn test_default_maps_unit_triangle() {
        let basis = Basis::default();
        let tc = basis.coords(&IDENTITY_COEFS);
        assert!(close(tc.o, Point::new(0.0, 0.0)));
        assert!(close(tc.x, Point::new(100.0, 0.0)));
        assert!(close(tc.y, Point::new(0.0, -100.0)));
    }

    #[test]
    fn test_coefs_round_trip() {
        let basis = Basis::from_coeffs([80.0, 10.0, -5.0, -90.0, 12.0, 7.0]);
        let coefs = [[0.5, 0.25], [-0.3, 0.8], [0.1, -0.2]];
        let back = basis.coefs(&basis.coords(&coefs));
        for row in 0..3 {
            for col in 0..2 {
                assert!((back[row][col] - coefs[row][col]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_scale_returns_reexpression() {
        let mut basis = Basis::default();
        let abstract_pt = Point::new(0.4, -1.5);
        let before = basis.map(abstract_pt);
        let delta = basis.scale(2.0, 2.0);
        assert!(close(delta * before, basis.map(abstract_pt)));
        assert!(close(basis.map(abstract_pt), Point::new(80.0, 300.0)));
    }

    #[test]
    fn test_singular_basis_falls_back() {
        let basis = Basis::from_coeffs([0.0, 0.0, 0.0, 0.0, 1.0, 1.0]);
        assert_eq!(basis.coeffs(), DEFAULT_BASIS);
    }

    #[test]
    fn test_contains() {
        let basis = Basis::default();
        assert!(basis.contains(Point::new(10.0, -10.0)));
        assert!(!basis.contains(Point::new(10.0, 10.0)));
    }
}
