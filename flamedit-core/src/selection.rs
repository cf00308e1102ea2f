//! Selection aggregate
//!
//! Groups either whole triangles or individual triangle nodes, never both,
//! so that rotate/scale/flip/move can be applied to all of them at once.
//! The aggregate only references its members; the geometry lives in the
//! editor's triangle set and is reached through [`SelectionMembers`].

use crate::triangle::{scale_about, NodeId};
use kurbo::{Affine, BezPath, Point, Rect, Shape};
use serde::{Deserialize, Serialize};

/// What kind of item a selection holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionType {
    /// Whole triangles (xform or post)
    #[default]
    Triangles,
    /// Individual triangle vertices
    Nodes,
}

/// Key of a triangle in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKey {
    /// Triangle bound to the xform at this position
    Xform(usize),
    /// The post triangle of the selected xform
    Post,
}

/// One node of a triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub handle: HandleKey,
    pub node: NodeId,
}

impl NodeRef {
    pub fn new(handle: HandleKey, node: NodeId) -> Self {
        Self { handle, node }
    }
}

/// A selectable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionItem {
    Triangle(HandleKey),
    Node(NodeRef),
}

impl SelectionItem {
    pub fn selection_type(&self) -> SelectionType {
        match self {
            SelectionItem::Triangle(_) => SelectionType::Triangles,
            SelectionItem::Node(_) => SelectionType::Nodes,
        }
    }

    /// Triangle this item belongs to
    pub fn owner(&self) -> HandleKey {
        match self {
            SelectionItem::Triangle(handle) => *handle,
            SelectionItem::Node(node) => node.handle,
        }
    }
}

/// Access to the geometry of selection members
pub trait SelectionMembers {
    /// Scene bounding box of an item, `None` if it no longer exists
    fn item_bounds(&self, item: &SelectionItem) -> Option<Rect>;

    /// Apply a scene-space transform to an item
    fn transform_item(&mut self, item: &SelectionItem, affine: Affine);
}

/// Group container for batch edits over triangles or nodes
#[derive(Clone, Debug)]
pub struct TriangleSelection {
    selected_type: SelectionType,
    items: Vec<SelectionItem>,
    polygon: Vec<Point>,
    transform: Affine,
    visible: bool,
    z: f64,
}

impl Default for TriangleSelection {
    fn default() -> Self {
        Self::new(SelectionType::default())
    }
}

impl TriangleSelection {
    /// Create an empty, hidden selection
    pub fn new(selected_type: SelectionType) -> Self {
        Self {
            selected_type,
            items: Vec::new(),
            polygon: Vec::new(),
            transform: Affine::IDENTITY,
            visible: false,
            z: -1.0,
        }
    }

    pub fn selected_type(&self) -> SelectionType {
        self.selected_type
    }

    /// Change the item type; existing members are dropped if it differs
    pub fn set_selected_type(&mut self, selected_type: SelectionType) {
        if self.selected_type != selected_type {
            self.items.clear();
            self.selected_type = selected_type;
        }
    }

    /// Whether an item of this kind may join the selection
    pub fn accepts(&self, item: &SelectionItem) -> bool {
        item.selection_type() == self.selected_type
    }

    /// Add an item and fit the polygon around all members
    ///
    /// Items of the wrong type and duplicates are rejected.
    pub fn add_item(&mut self, item: SelectionItem, members: &impl SelectionMembers) -> bool {
        if !self.insert_item(item) {
            return false;
        }
        self.fit_to_items(members);
        true
    }

    /// Add an item without touching the polygon
    pub fn insert_item(&mut self, item: SelectionItem) -> bool {
        if !self.accepts(&item) {
            log::debug!(
                "TriangleSelection::insert_item: rejecting {:?} for {:?} selection",
                item,
                self.selected_type
            );
            return false;
        }
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Drop every member belonging to `handle`
    pub fn remove_handle(&mut self, handle: HandleKey) {
        self.items.retain(|i| i.owner() != handle);
    }

    pub fn contains(&self, item: &SelectionItem) -> bool {
        self.items.contains(item)
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn items(&self) -> &[SelectionItem] {
        &self.items
    }

    pub fn first(&self) -> Option<&SelectionItem> {
        self.items.first()
    }

    /// Selected triangles (empty for a node selection)
    pub fn triangles(&self) -> Vec<HandleKey> {
        self.items
            .iter()
            .filter_map(|i| match i {
                SelectionItem::Triangle(handle) => Some(*handle),
                SelectionItem::Node(_) => None,
            })
            .collect()
    }

    /// Triangles owning at least one member, in selection order
    pub fn owner_handles(&self) -> Vec<HandleKey> {
        let mut owners = Vec::new();
        for item in &self.items {
            let owner = item.owner();
            if !owners.contains(&owner) {
                owners.push(owner);
            }
        }
        owners
    }

    /// Drop all members and reset the polygon
    pub fn clear(&mut self) {
        self.items.clear();
        self.polygon.clear();
        self.transform = Affine::IDENTITY;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn set_z(&mut self, z: f64) {
        self.z = z;
    }

    /// The aggregate's own transform, applied on top of its polygon
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Polygon in scene coordinates
    pub fn polygon(&self) -> Vec<Point> {
        self.polygon.iter().map(|&p| self.transform * p).collect()
    }

    /// Replace the polygon (scene coordinates) and reset the transform
    pub fn set_polygon(&mut self, polygon: Vec<Point>) {
        self.polygon = polygon;
        self.transform = Affine::IDENTITY;
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.set_polygon(rect_polygon(rect));
    }

    /// Scene bounding box of the polygon
    pub fn bounding_box(&self) -> Rect {
        polygon_bounds(&self.polygon())
    }

    /// Whether a scene point lies inside the polygon
    pub fn contains_point(&self, p: Point) -> bool {
        let polygon = self.polygon();
        if polygon.len() < 3 {
            return false;
        }
        let mut path = BezPath::new();
        path.move_to(polygon[0]);
        for &q in &polygon[1..] {
            path.line_to(q);
        }
        path.close_path();
        path.contains(p)
    }

    /// Fit the polygon to the union of the members' bounding boxes
    pub fn fit_to_items(&mut self, members: &impl SelectionMembers) {
        let bounds = self
            .items
            .iter()
            .filter_map(|item| members.item_bounds(item))
            .reduce(|a, b| a.union(b));
        match bounds {
            Some(rect) => self.set_rect(rect),
            None => self.set_polygon(Vec::new()),
        }
    }

    /// Add every candidate whose bounding box overlaps the current polygon
    ///
    /// Candidates of the wrong type are skipped. Returns the number added.
    pub fn select_covered_items<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = (SelectionItem, Rect)>,
    {
        let band = self.bounding_box();
        let mut added = 0;
        for (item, bounds) in candidates {
            if rects_overlap(band, bounds) && self.insert_item(item) {
                added += 1;
            }
        }
        log::debug!("TriangleSelection::select_covered_items: {} items covered", added);
        added
    }

    /// Compose `affine` into the aggregate and apply it to every member
    pub fn apply(&mut self, affine: Affine, members: &mut impl SelectionMembers) {
        self.transform = affine * self.transform;
        for item in &self.items {
            members.transform_item(item, affine);
        }
    }

    pub fn move_by(&mut self, dx: f64, dy: f64, members: &mut impl SelectionMembers) {
        self.apply(Affine::translate((dx, dy)), members);
    }

    pub fn rotate(&mut self, rad: f64, pivot: Point, members: &mut impl SelectionMembers) {
        self.apply(Affine::rotate_about(rad, pivot), members);
    }

    pub fn scale(&mut self, sx: f64, sy: f64, pivot: Point, members: &mut impl SelectionMembers) {
        self.apply(scale_about(sx, sy, pivot), members);
    }

    pub fn flip_horizontally(&mut self, pivot: Point, members: &mut impl SelectionMembers) {
        self.apply(scale_about(-1.0, 1.0, pivot), members);
    }

    pub fn flip_vertically(&mut self, pivot: Point, members: &mut impl SelectionMembers) {
        self.apply(scale_about(1.0, -1.0, pivot), members);
    }

    /// Re-express the polygon after a basis change, without touching members
    pub fn basis_scaled(&mut self, delta: Affine) {
        let polygon = self.polygon().into_iter().map(|p| delta * p).collect();
        self.set_polygon(polygon);
    }
}

/// Corners of a rectangle as a closed polygon
pub fn rect_polygon(rect: Rect) -> Vec<Point> {
    vec![
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

/// Bounding box of a polygon, `Rect::ZERO` when empty
pub fn polygon_bounds(polygon: &[Point]) -> Rect {
    let mut points = polygon.iter();
    match points.next() {
        Some(&first) => points.fold(Rect::from_points(first, first), |r, &p| r.union_pt(p)),
        None => Rect::ZERO,
    }
}

// Edge contact counts, so degenerate (zero-area) boxes can still be covered.
fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Items as bare boxes, transformed as a whole
    #[derive(Default)]
    struct Boxes(HashMap<SelectionItem, Rect>);

    impl SelectionMembers for Boxes {
        fn item_bounds(&self, item: &SelectionItem) -> Option<Rect> {
            self.0.get(item).copied()
        }

        fn transform_item(&mut self, item: &SelectionItem, affine: Affine) {
            if let Some(r) = self.0.get_mut(item) {
                *r = affine.transform_rect_bbox(*r);
            }
        }
    }

    fn tri(i: usize) -> SelectionItem {
        SelectionItem::Triangle(HandleKey::Xform(i))
    }

    fn node(i: usize, node: NodeId) -> SelectionItem {
        SelectionItem::Node(NodeRef::new(HandleKey::Xform(i), node))
    }

    #[test]
    fn test_add_is_idempotent_and_fits() {
        let mut boxes = Boxes::default();
        boxes.0.insert(tri(0), Rect::new(0.0, 0.0, 10.0, 10.0));
        boxes.0.insert(tri(1), Rect::new(20.0, 5.0, 30.0, 40.0));

        let mut selection = TriangleSelection::new(SelectionType::Triangles);
        assert!(selection.add_item(tri(0), &boxes));
        assert!(!selection.add_item(tri(0), &boxes));
        assert!(selection.add_item(tri(1), &boxes));
        assert_eq!(selection.items().len(), 2);
        assert_eq!(selection.bounding_box(), Rect::new(0.0, 0.0, 30.0, 40.0));
    }

    #[test]
    fn test_type_is_homogeneous() {
        let boxes = Boxes::default();
        let mut selection = TriangleSelection::new(SelectionType::Nodes);
        assert!(selection.add_item(node(0, NodeId::O), &boxes));
        assert!(selection.add_item(node(1, NodeId::X), &boxes));
        assert!(!selection.add_item(tri(2), &boxes));
        assert_eq!(selection.items().len(), 2);
        assert!(selection
            .items()
            .iter()
            .all(|i| i.selection_type() == SelectionType::Nodes));
    }

    #[test]
    fn test_select_covered_items() {
        let mut selection = TriangleSelection::new(SelectionType::Triangles);
        selection.set_rect(Rect::new(0.0, 0.0, 50.0, 50.0));
        let added = selection.select_covered_items(vec![
            (tri(0), Rect::new(40.0, 40.0, 60.0, 60.0)),
            (tri(1), Rect::new(70.0, 70.0, 80.0, 80.0)),
            (node(2, NodeId::Y), Rect::new(1.0, 1.0, 2.0, 2.0)),
        ]);
        assert_eq!(added, 1);
        assert!(selection.contains(&tri(0)));
        // rubber band is kept as drawn
        assert_eq!(selection.bounding_box(), Rect::new(0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_group_move_applies_to_members_and_polygon() {
        let mut boxes = Boxes::default();
        boxes.0.insert(tri(0), Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut selection = TriangleSelection::new(SelectionType::Triangles);
        selection.add_item(tri(0), &boxes);

        selection.move_by(5.0, -2.0, &mut boxes);
        assert_eq!(boxes.0[&tri(0)], Rect::new(5.0, -2.0, 15.0, 8.0));
        assert_eq!(selection.bounding_box(), Rect::new(5.0, -2.0, 15.0, 8.0));
    }

    #[test]
    fn test_contains_point_follows_rotation() {
        let boxes_rect = Rect::new(0.0, 0.0, 100.0, 10.0);
        let mut selection = TriangleSelection::new(SelectionType::Triangles);
        selection.set_rect(boxes_rect);
        assert!(selection.contains_point(Point::new(90.0, 5.0)));

        let mut boxes = Boxes::default();
        selection.rotate(std::f64::consts::FRAC_PI_2, Point::ORIGIN, &mut boxes);
        assert!(!selection.contains_point(Point::new(90.0, 5.0)));
        assert!(selection.contains_point(Point::new(-5.0, 90.0)));
    }

    #[test]
    fn test_clear_keeps_type() {
        let boxes = Boxes::default();
        let mut selection = TriangleSelection::new(SelectionType::Nodes);
        selection.add_item(node(0, NodeId::O), &boxes);
        selection.clear();
        assert!(!selection.has_items());
        assert!(selection.polygon().is_empty());
        assert_eq!(selection.selected_type(), SelectionType::Nodes);
    }

    #[test]
    fn test_owner_handles_dedup() {
        let boxes = Boxes::default();
        let mut selection = TriangleSelection::new(SelectionType::Nodes);
        selection.add_item(node(1, NodeId::O), &boxes);
        selection.add_item(node(1, NodeId::X), &boxes);
        selection.add_item(node(0, NodeId::Y), &boxes);
        assert_eq!(
            selection.owner_handles(),
            vec![HandleKey::Xform(1), HandleKey::Xform(0)]
        );
    }
}
