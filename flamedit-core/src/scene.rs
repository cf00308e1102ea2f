//! Triangle set and coordinate mark
//!
//! The editor owns every triangle through a [`TriangleSet`]: one triangle
//! per xform, in genome order, plus the single post triangle which is
//! re-bound to whichever xform is selected.

use crate::basis::Basis;
use crate::genome::Genome;
use crate::selection::{HandleKey, NodeRef, SelectionItem, SelectionMembers, SelectionType};
use crate::triangle::{NodeId, Triangle};
use kurbo::{Affine, Point, Rect};

/// Size of the coordinate mark cross in scene units
pub const MARK_SIZE: f64 = 10.0;

/// Owner of all triangles of the editor
#[derive(Clone, Debug, Default)]
pub struct TriangleSet {
    triangles: Vec<Triangle>,
    post: Option<Triangle>,
}

impl TriangleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    pub fn triangle_mut(&mut self, index: usize) -> Option<&mut Triangle> {
        self.triangles.get_mut(index)
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn pop(&mut self) -> Option<Triangle> {
        self.triangles.pop()
    }

    pub fn post(&self) -> Option<&Triangle> {
        self.post.as_ref()
    }

    pub fn post_mut(&mut self) -> Option<&mut Triangle> {
        self.post.as_mut()
    }

    pub fn set_post(&mut self, post: Triangle) {
        self.post = Some(post);
    }

    /// The post triangle if it exists and is shown
    pub fn visible_post(&self) -> Option<&Triangle> {
        self.post.as_ref().filter(|p| p.is_visible())
    }

    pub fn get(&self, key: HandleKey) -> Option<&Triangle> {
        match key {
            HandleKey::Xform(index) => self.triangles.get(index),
            HandleKey::Post => self.post.as_ref(),
        }
    }

    pub fn get_mut(&mut self, key: HandleKey) -> Option<&mut Triangle> {
        match key {
            HandleKey::Xform(index) => self.triangles.get_mut(index),
            HandleKey::Post => self.post.as_mut(),
        }
    }

    /// Keys of every triangle that can currently be edited
    pub fn keys(&self) -> Vec<HandleKey> {
        let mut keys: Vec<HandleKey> = (0..self.triangles.len()).map(HandleKey::Xform).collect();
        if self.visible_post().is_some() {
            keys.push(HandleKey::Post);
        }
        keys
    }

    /// Items eligible for a rubber-band selection of the given type
    pub fn selectable_items(&self, selected_type: SelectionType) -> Vec<(SelectionItem, Rect)> {
        let mut items = Vec::new();
        for key in self.keys() {
            let Some(triangle) = self.get(key) else {
                continue;
            };
            match selected_type {
                SelectionType::Triangles => {
                    items.push((SelectionItem::Triangle(key), triangle.bounding_box()));
                }
                SelectionType::Nodes => {
                    for node in NodeId::ALL {
                        items.push((
                            SelectionItem::Node(NodeRef::new(key, node)),
                            triangle.node_bounding_box(node),
                        ));
                    }
                }
            }
        }
        items
    }

    /// Write a triangle's scene points back into its record
    pub fn commit(&self, key: HandleKey, basis: &Basis, genome: &mut Genome) {
        let Some(triangle) = self.get(key) else {
            return;
        };
        match genome.xform_mut(triangle.index()) {
            Some(xform) => triangle.write_back(basis, xform),
            None => log::warn!(
                "TriangleSet::commit: {:?} bound to missing xform {}",
                key,
                triangle.index()
            ),
        }
    }

    /// Re-express every triangle after a basis change
    pub fn basis_scaled(&mut self, delta: Affine) {
        for triangle in &mut self.triangles {
            triangle.basis_scaled(delta);
        }
        if let Some(post) = &mut self.post {
            post.basis_scaled(delta);
        }
    }

    /// Union of the scene bounding boxes of all triangles
    pub fn bounding_box(&self) -> Option<Rect> {
        self.triangles
            .iter()
            .chain(self.visible_post())
            .map(Triangle::bounding_box)
            .reduce(|a, b| a.union(b))
    }
}

impl SelectionMembers for TriangleSet {
    fn item_bounds(&self, item: &SelectionItem) -> Option<Rect> {
        match item {
            SelectionItem::Triangle(key) => self.get(*key).map(Triangle::bounding_box),
            SelectionItem::Node(node) => self
                .get(node.handle)
                .map(|t| t.node_bounding_box(node.node)),
        }
    }

    fn transform_item(&mut self, item: &SelectionItem, affine: Affine) {
        match item {
            SelectionItem::Triangle(key) => {
                if let Some(triangle) = self.get_mut(*key) {
                    triangle.transform(affine);
                }
            }
            SelectionItem::Node(node) => {
                if let Some(triangle) = self.get_mut(node.handle) {
                    triangle.transform_node(node.node, affine);
                }
            }
        }
    }
}

/// Marker for a user-chosen reference point
#[derive(Clone, Debug)]
pub struct CoordinateMark {
    center: Point,
    visible: bool,
    z: f64,
}

impl Default for CoordinateMark {
    fn default() -> Self {
        Self {
            center: Point::ORIGIN,
            visible: false,
            z: 0.0,
        }
    }
}

impl CoordinateMark {
    pub fn center(&self) -> Point {
        self.center
    }

    pub fn center_on(&mut self, p: Point) {
        self.center = p;
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

    pub fn bounding_box(&self) -> Rect {
        Rect::from_center_size(self.center, (MARK_SIZE * 2.0, MARK_SIZE * 2.0))
    }
}
