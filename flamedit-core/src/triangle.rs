//! Xform triangles and their nodes
//!
//! A triangle is the on-screen proxy of one xform: its three points are the
//! scene images of the xform's origin, X-axis tip and Y-axis tip. Edits
//! happen on the scene points and are written back to the record through
//! the inverse basis.

use crate::basis::{Basis, TriangleCoords};
use crate::genome::{XForm, IDENTITY_COEFS};
use kurbo::{Affine, BezPath, Circle, Line, ParamCurveNearest, Point, Rect, Shape, Vec2};
use serde::{Deserialize, Serialize};

/// Radius of a node handle in scene units
pub const NODE_RADIUS: f64 = 4.0;

/// Distance from a side within which the side counts as grabbed
pub const EDGE_TOLERANCE: f64 = 4.0;

/// Which coefficient block a triangle edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriangleKind {
    /// The xform's pre-transform coefficients
    Xform,
    /// The xform's post-transform coefficients
    Post,
}

/// One of the three vertices of a triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeId {
    O,
    X,
    Y,
}

impl NodeId {
    pub const ALL: [NodeId; 3] = [NodeId::O, NodeId::X, NodeId::Y];

    fn slot(self) -> usize {
        match self {
            NodeId::O => 0,
            NodeId::X => 1,
            NodeId::Y => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeId::O => "O",
            NodeId::X => "X",
            NodeId::Y => "Y",
        }
    }
}

/// Side of a triangle under the pointer, deciding what a drag does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeType {
    /// Inside the triangle, away from the sides: drag moves
    #[default]
    None,
    /// Side O–X or O–Y: drag rotates
    Rotate,
    /// Side X–Y: drag scales
    Scale,
}

/// Editable proxy of one xform
#[derive(Clone, Debug)]
pub struct Triangle {
    kind: TriangleKind,
    index: usize,
    points: [Point; 3],
    z: f64,
    edge: EdgeType,
    visible: bool,
}

impl Triangle {
    /// Create a triangle bound to the record at `index`
    pub fn new(kind: TriangleKind, index: usize, coords: TriangleCoords) -> Self {
        Self {
            kind,
            index,
            points: coords.points(),
            z: 0.0,
            edge: EdgeType::None,
            visible: true,
        }
    }

    /// Create a triangle and position it from the record's coefficients
    pub fn from_xform(kind: TriangleKind, index: usize, basis: &Basis, xform: &XForm) -> Self {
        let mut triangle = Self::new(kind, index, TriangleCoords::from_coefs(&IDENTITY_COEFS));
        triangle.load(basis, xform);
        triangle
    }

    pub fn kind(&self) -> TriangleKind {
        self.kind
    }

    /// Position of the bound record in the genome
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn set_z(&mut self, z: f64) {
        self.z = z;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn coords(&self) -> TriangleCoords {
        TriangleCoords::new(self.points[0], self.points[1], self.points[2])
    }

    pub fn set_points(&mut self, coords: TriangleCoords) {
        self.points = coords.points();
    }

    pub fn node_pos(&self, node: NodeId) -> Point {
        self.points[node.slot()]
    }

    /// Recompute the scene points from the record
    pub fn load(&mut self, basis: &Basis, xform: &XForm) {
        let coefs = match self.kind {
            TriangleKind::Xform => &xform.coefs,
            TriangleKind::Post => &xform.post,
        };
        self.set_points(basis.coords(coefs));
    }

    /// Store the scene points into the record's coefficients
    pub fn write_back(&self, basis: &Basis, xform: &mut XForm) {
        let coefs = basis.coefs(&self.coords());
        match self.kind {
            TriangleKind::Xform => xform.coefs = coefs,
            TriangleKind::Post => xform.post = coefs,
        }
    }

    /// Reset the record's coefficients to identity and reload
    pub fn reset_position(&mut self, basis: &Basis, xform: &mut XForm) {
        match self.kind {
            TriangleKind::Xform => xform.coefs = IDENTITY_COEFS,
            TriangleKind::Post => xform.post = IDENTITY_COEFS,
        }
        self.load(basis, xform);
    }

    /// Re-express the points after a basis change
    pub fn basis_scaled(&mut self, delta: Affine) {
        self.transform(delta);
    }

    pub fn transform(&mut self, affine: Affine) {
        for p in &mut self.points {
            *p = affine * *p;
        }
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.transform(Affine::translate((dx, dy)));
    }

    /// Rotate counter-clockwise in scene coordinates about `pivot`
    pub fn rotate(&mut self, rad: f64, pivot: Point) {
        self.transform(Affine::rotate_about(rad, pivot));
    }

    pub fn scale(&mut self, sx: f64, sy: f64, pivot: Point) {
        self.transform(scale_about(sx, sy, pivot));
    }

    /// Mirror across the vertical line through `pivot`
    pub fn flip_horizontally(&mut self, pivot: Point) {
        self.transform(scale_about(-1.0, 1.0, pivot));
    }

    /// Mirror across the horizontal line through `pivot`
    pub fn flip_vertically(&mut self, pivot: Point) {
        self.transform(scale_about(1.0, -1.0, pivot));
    }

    pub fn move_node(&mut self, node: NodeId, dx: f64, dy: f64) {
        self.points[node.slot()] += Vec2::new(dx, dy);
    }

    pub fn transform_node(&mut self, node: NodeId, affine: Affine) {
        let p = &mut self.points[node.slot()];
        *p = affine * *p;
    }

    /// Centroid of the three points
    pub fn center(&self) -> Point {
        let [o, x, y] = self.points;
        Point::new((o.x + x.x + y.x) / 3.0, (o.y + x.y + y.y) / 3.0)
    }

    pub fn bounding_box(&self) -> Rect {
        let [o, x, y] = self.points;
        Rect::from_points(o, x).union_pt(y)
    }

    pub fn node_bounding_box(&self, node: NodeId) -> Rect {
        Rect::from_center_size(self.node_pos(node), (NODE_RADIUS * 2.0, NODE_RADIUS * 2.0))
    }

    fn path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.points[0]);
        path.line_to(self.points[1]);
        path.line_to(self.points[2]);
        path.close_path();
        path
    }

    /// Whether a scene point lies inside the filled triangle
    pub fn contains(&self, p: Point) -> bool {
        self.path().contains(p)
    }

    /// Node under a scene point, checked in O, X, Y order
    pub fn node_at(&self, p: Point) -> Option<NodeId> {
        NodeId::ALL
            .into_iter()
            .find(|&node| Circle::new(self.node_pos(node), NODE_RADIUS).contains(p))
    }

    /// Classify which side of the triangle is nearest to `p`
    ///
    /// The result is remembered and read back by drag handling.
    pub fn find_edge(&mut self, p: Point) -> EdgeType {
        let [o, x, y] = self.points;
        let sides = [
            (segment_distance(p, o, x), EdgeType::Rotate),
            (segment_distance(p, o, y), EdgeType::Rotate),
            (segment_distance(p, x, y), EdgeType::Scale),
        ];
        self.edge = sides
            .into_iter()
            .filter(|(distance, _)| *distance <= EDGE_TOLERANCE)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, edge)| edge)
            .unwrap_or(EdgeType::None);
        self.edge
    }

    pub fn edge_type(&self) -> EdgeType {
        self.edge
    }

    pub fn clear_edge(&mut self) {
        self.edge = EdgeType::None;
    }
}

/// Scale by (`sx`, `sy`) about `pivot`
pub fn scale_about(sx: f64, sy: f64, pivot: Point) -> Affine {
    let v = pivot.to_vec2();
    Affine::translate(v) * Affine::scale_non_uniform(sx, sy) * Affine::translate(-v)
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    Line::new(a, b).nearest(p, 1e-9).distance_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-9;

    fn assert_points_close(a: TriangleCoords, b: TriangleCoords) {
        for (p, q) in a.points().iter().zip(b.points().iter()) {
            assert!((*p - *q).hypot() < EPS, "{:?} != {:?}", p, q);
        }
    }

    fn sample() -> Triangle {
        Triangle::new(
            TriangleKind::Xform,
            0,
            TriangleCoords::new(
                Point::new(10.0, 20.0),
                Point::new(110.0, 35.0),
                Point::new(-5.0, -80.0),
            ),
        )
    }

    #[test]
    fn test_rotate_inverse() {
        let mut t = sample();
        let original = t.coords();
        let pivot = Point::new(42.0, -7.0);
        t.rotate(0.73, pivot);
        t.rotate(-0.73, pivot);
        assert_points_close(t.coords(), original);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut t = sample();
        t.rotate(PI / 2.0, Point::new(10.0, 20.0));
        // origin is the pivot and stays put; X tip swings onto +y
        assert!((t.node_pos(NodeId::O) - Point::new(10.0, 20.0)).hypot() < EPS);
        assert!((t.node_pos(NodeId::X) - Point::new(-5.0, 120.0)).hypot() < EPS);
    }

    #[test]
    fn test_scale_inverse() {
        let mut t = sample();
        let original = t.coords();
        let pivot = Point::new(-3.0, 8.0);
        t.scale(1.7, 1.7, pivot);
        t.scale(1.0 / 1.7, 1.0 / 1.7, pivot);
        assert_points_close(t.coords(), original);
    }

    #[test]
    fn test_flip_twice_is_identity() {
        let mut t = sample();
        let original = t.coords();
        let pivot = Point::new(5.0, 5.0);
        t.flip_horizontally(pivot);
        assert!((t.node_pos(NodeId::O).x - 0.0).abs() < EPS);
        t.flip_horizontally(pivot);
        assert_points_close(t.coords(), original);

        t.flip_vertically(pivot);
        t.flip_vertically(pivot);
        assert_points_close(t.coords(), original);
    }

    #[test]
    fn test_write_back_and_load() {
        let basis = Basis::default();
        let mut xform = XForm::default();
        let mut t = Triangle::from_xform(TriangleKind::Xform, 0, &basis, &xform);
        t.move_by(50.0, -100.0);
        t.write_back(&basis, &mut xform);
        assert!((xform.coefs[2][0] - 0.5).abs() < EPS);
        assert!((xform.coefs[2][1] - 1.0).abs() < EPS);
        assert!((xform.coefs[0][0] - 1.0).abs() < EPS);
        // post block is untouched
        assert_eq!(xform.post, IDENTITY_COEFS);
    }

    #[test]
    fn test_post_triangle_writes_post_block() {
        let basis = Basis::default();
        let mut xform = XForm::default();
        let mut post = Triangle::from_xform(TriangleKind::Post, 0, &basis, &xform);
        post.scale(2.0, 2.0, Point::ORIGIN);
        post.write_back(&basis, &mut xform);
        assert!((xform.post[0][0] - 2.0).abs() < EPS);
        assert_eq!(xform.coefs, IDENTITY_COEFS);
    }

    #[test]
    fn test_find_edge() {
        let basis = Basis::default();
        let mut t = Triangle::from_xform(TriangleKind::Xform, 0, &basis, &XForm::default());
        // O=(0,0) X=(100,0) Y=(0,-100)
        assert_eq!(t.find_edge(Point::new(50.0, -1.0)), EdgeType::Rotate);
        assert_eq!(t.find_edge(Point::new(-1.0, -50.0)), EdgeType::Rotate);
        assert_eq!(t.find_edge(Point::new(50.0, -50.0)), EdgeType::Scale);
        assert_eq!(t.find_edge(Point::new(20.0, -20.0)), EdgeType::None);
        assert_eq!(t.edge_type(), EdgeType::None);
        // past the X end of side O-X: on the line but off the segment
        assert_eq!(t.find_edge(Point::new(108.0, 0.0)), EdgeType::None);
        assert_eq!(t.find_edge(Point::new(50.0, 3.0)), EdgeType::Rotate);
    }

    #[test]
    fn test_node_hit_and_contains() {
        let t = sample();
        assert_eq!(t.node_at(Point::new(111.0, 36.0)), Some(NodeId::X));
        assert_eq!(t.node_at(Point::new(60.0, 60.0)), None);
        assert!(t.contains(t.center()));
    }

    #[test]
    fn test_move_node_only_moves_vertex() {
        let mut t = sample();
        t.move_node(NodeId::Y, 1.0, 2.0);
        assert!((t.node_pos(NodeId::Y) - Point::new(-4.0, -78.0)).hypot() < EPS);
        assert!((t.node_pos(NodeId::O) - Point::new(10.0, 20.0)).hypot() < EPS);
    }
}
