//! Triangle editor controller
//!
//! [`FigureEditor`] owns the genome being edited, one [`Triangle`] per xform,
//! the post triangle, the selection aggregate, the coordinate mark and the
//! basis. Pointer and wheel input is dispatched in [`input`], structural and
//! clipboard edits live in [`clipboard`], the two-phase context menu in
//! [`menu`] and undo capture in [`undo_state`].
//!
//! Triangles are bound to xforms by position. Every structural change of the
//! genome must be followed by [`FigureEditor::reset`], which re-establishes
//! `triangle[i] ↔ xform[i]` for all `i`.

pub mod clipboard;
pub mod input;
pub mod menu;
pub mod undo_state;

use crate::basis::Basis;
use crate::event::EditorEvent;
use crate::genome::{Genome, XForm};
use crate::scene::{CoordinateMark, TriangleSet};
use crate::selection::{HandleKey, SelectionItem, TriangleSelection};
use crate::settings::{EditorSettings, PivotMode};
use crate::triangle::{NodeId, Triangle, TriangleKind};
use kurbo::{Affine, Point, Rect, Size, Vec2};

pub use input::{InteractionState, MovingTarget};
pub use menu::{ContextMenuAction, MenuTarget};

/// Margin added around the items when sizing the scene
pub const SCENE_MARGIN: f64 = 200.0;

/// Padding used by [`FigureEditor::auto_scale`]
const AUTO_SCALE_PADDING: f64 = 100.0;

/// The triangle editor
pub struct FigureEditor {
    genome: Genome,
    basis: Basis,
    triangles: TriangleSet,
    selection: TriangleSelection,
    mark: CoordinateMark,

    /// Position of the selected xform
    selected: Option<usize>,
    editing_post: bool,
    has_selection: bool,

    clip: Vec<XForm>,

    state: InteractionState,
    wheel_moved: bool,

    next_z: f64,
    scene_rect: Rect,
    view_scroll: Vec2,
    view_center: Option<Point>,

    grid_visible: bool,
    grid_color: String,
    bg_color: String,
    centered_scaling: bool,
    pivot_mode: PivotMode,

    hovered: Option<usize>,
    info: Option<String>,

    events: Vec<EditorEvent>,
}

impl FigureEditor {
    /// Create an editor for `genome` configured from `settings`
    pub fn new(genome: Genome, settings: EditorSettings) -> Self {
        let mut editor = Self {
            genome,
            basis: Basis::from_coeffs(settings.basis),
            triangles: TriangleSet::new(),
            selection: TriangleSelection::new(settings.selection_type),
            mark: CoordinateMark::default(),
            selected: None,
            editing_post: false,
            has_selection: false,
            clip: Vec::new(),
            state: InteractionState::Idle,
            wheel_moved: false,
            next_z: 0.0,
            scene_rect: Rect::ZERO,
            view_scroll: Vec2::ZERO,
            view_center: None,
            grid_visible: settings.grid_visible,
            grid_color: settings.grid_color,
            bg_color: settings.bg_color,
            centered_scaling: settings.centered_scaling,
            pivot_mode: settings.pivot_mode,
            hovered: None,
            info: None,
            events: Vec::new(),
        };
        editor.reset();
        editor
    }

    /// Snapshot of the persistent settings
    pub fn settings(&self) -> EditorSettings {
        EditorSettings {
            basis: self.basis.coeffs(),
            grid_visible: self.grid_visible,
            grid_color: self.grid_color.clone(),
            bg_color: self.bg_color.clone(),
            centered_scaling: self.centered_scaling,
            selection_type: self.selection.selected_type(),
            pivot_mode: self.pivot_mode,
        }
    }

    /// Tear the editor down, returning the genome and the settings to persist
    pub fn into_parts(self) -> (Genome, EditorSettings) {
        let settings = self.settings();
        (self.genome, settings)
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Replace the genome and resynchronise
    pub fn set_genome(&mut self, genome: Genome) {
        self.genome = genome;
        self.reset();
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn triangles(&self) -> &TriangleSet {
        &self.triangles
    }

    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        self.triangles.triangle(index)
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn selection(&self) -> &TriangleSelection {
        &self.selection
    }

    pub fn has_selection(&self) -> bool {
        self.has_selection
    }

    pub fn mark(&self) -> &CoordinateMark {
        &self.mark
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_triangle(&self) -> Option<&Triangle> {
        self.selected.and_then(|i| self.triangles.triangle(i))
    }

    pub fn post(&self) -> Option<&Triangle> {
        self.triangles.post()
    }

    pub fn post_enabled(&self) -> bool {
        self.editing_post
    }

    pub fn clip(&self) -> &[XForm] {
        &self.clip
    }

    pub fn scene_rect(&self) -> Rect {
        self.scene_rect
    }

    /// Accumulated view scroll from middle-button panning
    pub fn view_scroll(&self) -> Vec2 {
        self.view_scroll
    }

    /// Scene point the view should be centred on, when centered scaling is on
    pub fn view_center(&self) -> Option<Point> {
        self.view_center
    }

    /// Hover text for the triangle under the pointer
    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered
    }

    /// Drain the pending notifications
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    fn next_z_pos(&mut self) -> f64 {
        self.next_z += 1.0;
        self.next_z
    }

    fn move_to_front(&mut self, key: HandleKey) {
        let z = self.next_z_pos();
        if let Some(t) = self.triangles.get_mut(key) {
            t.set_z(z);
        }
    }

    // ----- settings -----

    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.grid_visible = visible;
    }

    pub fn grid_color(&self) -> &str {
        &self.grid_color
    }

    pub fn set_grid_color(&mut self, color: impl Into<String>) {
        self.grid_color = color.into();
    }

    pub fn bg_color(&self) -> &str {
        &self.bg_color
    }

    pub fn set_bg_color(&mut self, color: impl Into<String>) {
        self.bg_color = color.into();
    }

    pub fn centered_scaling(&self) -> bool {
        self.centered_scaling
    }

    pub fn set_centered_scaling(&mut self, flag: bool) {
        self.centered_scaling = flag;
        if !flag {
            self.view_center = None;
        }
    }

    pub fn pivot_mode(&self) -> PivotMode {
        self.pivot_mode
    }

    pub fn set_pivot_mode(&mut self, mode: PivotMode) {
        self.pivot_mode = mode;
    }

    pub fn set_selection_type(&mut self, selected_type: crate::selection::SelectionType) {
        self.selection.set_selected_type(selected_type);
    }

    pub fn set_mark_visible(&mut self, visible: bool) {
        self.mark.set_visible(visible);
        if visible {
            let z = self.next_z_pos();
            self.mark.set_z(z);
        }
        self.emit(EditorEvent::CoordinateChanged(Point::ORIGIN));
    }

    /// Place the mark at an abstract position
    pub fn set_mark_position(&mut self, p: Point) {
        self.mark.center_on(self.basis.map(p));
    }

    // ----- synchronisation -----

    /// Resynchronise the triangles with the genome
    ///
    /// Inserts a default xform into an empty genome, grows or shrinks the
    /// triangle list to the number of xforms, rebinds and repositions every
    /// triangle, restores the selected index (falling back to the last
    /// triangle) and resizes the scene.
    pub fn reset(&mut self) {
        log::debug!("FigureEditor::reset: {} xforms", self.genome.num_xforms());
        if self.genome.is_empty() {
            log::warn!("FigureEditor::reset: no xforms, adding a default");
            self.genome.add_default_xform();
        }

        let selected_idx = self.selected.unwrap_or(0);
        let has_post = self.editing_post;
        self.edit_post_triangle(false);

        if self.has_selection {
            self.enable_selection(false);
        }

        let count = self.genome.num_xforms();
        while self.triangles.len() < count {
            let index = self.triangles.len();
            let mut triangle =
                Triangle::from_xform(TriangleKind::Xform, index, &self.basis, &self.genome.xforms()[index]);
            triangle.set_z(self.next_z_pos());
            self.triangles.push(triangle);
        }
        while self.triangles.len() > count {
            self.triangles.pop();
        }

        for (index, xform) in self.genome.xforms().iter().enumerate() {
            if let Some(triangle) = self.triangles.triangle_mut(index) {
                triangle.set_index(index);
                triangle.load(&self.basis, xform);
                triangle.clear_edge();
            }
        }

        self.selected = None;
        self.editing_post = has_post;
        let index = if selected_idx < count { selected_idx } else { count - 1 };
        self.select_index(index);

        self.adjust_scene_rect();
    }

    /// Select the triangle at `index`; out-of-range requests are ignored
    pub fn select_triangle(&mut self, index: usize) {
        if index < self.triangles.len() {
            self.select_index(index);
        } else {
            log::debug!("FigureEditor::select_triangle: no triangle {}", index);
        }
    }

    pub fn select_next_triangle(&mut self) {
        if let Some(n) = self.selected {
            if n + 1 < self.triangles.len() {
                self.select_index(n + 1);
            }
        }
    }

    pub fn select_previous_triangle(&mut self) {
        if let Some(n) = self.selected {
            if n > 0 {
                self.select_index(n - 1);
            }
        }
    }

    fn select_index(&mut self, index: usize) {
        if self.selected == Some(index) || index >= self.triangles.len() {
            return;
        }
        let post = self.editing_post;
        if self.selected.is_some() {
            self.edit_post_triangle(false);
        }
        self.selected = Some(index);
        log::debug!("FigureEditor::select_triangle: selecting triangle {}", index + 1);
        self.move_to_front(HandleKey::Xform(index));
        self.edit_post_triangle(post);
        self.emit(EditorEvent::TriangleSelected(index));
    }

    /// Show or hide the post triangle of the selected xform
    ///
    /// The post triangle is created on first use and re-bound to the
    /// selected xform on every call.
    pub fn edit_post_triangle(&mut self, flag: bool) {
        let Some(selected) = self.selected else {
            return;
        };
        let xform = self.genome.xform(selected);

        match (self.triangles.post_mut(), xform) {
            (Some(post), Some(xform)) => {
                post.set_index(selected);
                post.load(&self.basis, xform);
            }
            (None, Some(xform)) => {
                let post = Triangle::from_xform(TriangleKind::Post, selected, &self.basis, xform);
                self.triangles.set_post(post);
            }
            (Some(_), None) => {}
            (None, None) => return,
        }

        if flag {
            let z = self.next_z_pos();
            if let Some(post) = self.triangles.post_mut() {
                post.set_visible(true);
                post.set_z(z);
            }
        } else {
            if self.has_selection {
                self.selection.remove_handle(HandleKey::Post);
            }
            if let Some(post) = self.triangles.post_mut() {
                post.set_visible(false);
            }
        }
        self.editing_post = flag;
    }

    /// Show or hide the selection aggregate; hiding drops its members
    pub fn enable_selection(&mut self, flag: bool) {
        self.selection.set_visible(flag);
        self.has_selection = flag;
        if flag {
            let z = self.next_z_pos();
            self.selection.set_z(z);
        } else {
            self.selection.clear();
            self.selection.set_z(-1.0);
        }
    }

    /// Add an item to the selection, making it visible
    pub fn add_to_selection(&mut self, item: SelectionItem) -> bool {
        if self.selection.contains(&item) || !self.selection.accepts(&item) {
            return false;
        }
        if self.triangles.get(item.owner()).is_none() {
            return false;
        }
        self.selection.add_item(item, &self.triangles);
        let z = self.next_z_pos();
        self.selection.set_z(z);
        self.selection.set_visible(true);
        self.has_selection = true;
        true
    }

    /// Bounds of everything shown in the scene
    pub fn items_scene_bounds(&self) -> Rect {
        let mut bounds = self.basis.scene_bounding_box();
        if let Some(triangles) = self.triangles.bounding_box() {
            bounds = bounds.union(triangles);
        }
        if self.selection.is_visible() && !self.selection.polygon().is_empty() {
            bounds = bounds.union(self.selection.bounding_box());
        }
        if self.mark.is_visible() {
            bounds = bounds.union(self.mark.bounding_box());
        }
        bounds
    }

    fn adjust_scene_rect(&mut self) {
        self.scene_rect = self.items_scene_bounds().inflate(SCENE_MARGIN, SCENE_MARGIN);
        if self.centered_scaling {
            self.view_center = Some(self.triangle_transform_pos());
        }
    }

    /// Hover text for an xform
    pub fn info_label(&self, index: usize) -> Option<String> {
        let xform = self.genome.xform(index)?;
        let mut info = if self.genome.is_final(index) {
            format!("final transform: {}\n", index + 1)
        } else {
            format!("transform: {}\n", index + 1)
        };
        info.push_str(&format!("density: {:.4}\n", xform.density));
        for (name, weight) in &xform.variations {
            if *weight != 0.0 {
                info.push_str(&format!("{}: {:.4}\n", name, weight));
            }
        }
        Some(info)
    }

    // ----- edits -----

    /// Key of the triangle interactive edits apply to
    fn editing_key(&self) -> Option<HandleKey> {
        if self.editing_post && self.triangles.post().is_some() {
            Some(HandleKey::Post)
        } else {
            self.selected.map(HandleKey::Xform)
        }
    }

    /// Pivot for interactive rotate/scale, in scene coordinates
    pub fn triangle_transform_pos(&self) -> Point {
        let triangle = self.editing_key().and_then(|key| self.triangles.get(key));
        match (self.pivot_mode, triangle) {
            (PivotMode::Origin, Some(t)) => t.node_pos(NodeId::O),
            (PivotMode::Center, Some(t)) => t.center(),
            (PivotMode::Mark, _) => self.mark.center(),
            _ => self.basis.map(Point::ORIGIN),
        }
    }

    fn commit(&mut self, key: HandleKey) {
        self.triangles.commit(key, &self.basis, &mut self.genome);
    }

    fn commit_selection(&mut self) {
        for key in self.selection.owner_handles() {
            self.commit(key);
        }
    }

    /// Record that a triangle changed: select its xform and notify
    fn triangle_modified(&mut self, key: HandleKey) {
        let index = match key {
            HandleKey::Xform(index) => Some(index),
            HandleKey::Post => self.selected,
        };
        if let Some(index) = index {
            self.select_index(index);
            self.emit(EditorEvent::TriangleModified(index));
        }
    }

    fn edit_triangle(&mut self, key: HandleKey, edit: impl FnOnce(&mut Triangle)) {
        let Some(triangle) = self.triangles.get_mut(key) else {
            return;
        };
        edit(triangle);
        self.commit(key);
        self.triangle_modified(key);
    }

    pub fn rotate_triangle(&mut self, key: HandleKey, rad: f64, pivot: Point) {
        self.edit_triangle(key, |t| t.rotate(rad, pivot));
    }

    pub fn scale_triangle(&mut self, key: HandleKey, sx: f64, sy: f64, pivot: Point) {
        self.edit_triangle(key, |t| t.scale(sx, sy, pivot));
    }

    pub fn flip_triangle_horizontally(&mut self, key: HandleKey, pivot: Point) {
        self.edit_triangle(key, |t| t.flip_horizontally(pivot));
    }

    pub fn flip_triangle_vertically(&mut self, key: HandleKey, pivot: Point) {
        self.edit_triangle(key, |t| t.flip_vertically(pivot));
    }

    /// Move a triangle by a distance given in abstract units
    pub fn move_triangle_by(&mut self, key: HandleKey, dx: f64, dy: f64) {
        let d = self.abstract_to_scene_vec(dx, dy);
        self.edit_triangle(key, |t| t.move_by(d.x, d.y));
    }

    fn abstract_to_scene_vec(&self, dx: f64, dy: f64) -> Vec2 {
        self.basis.map(Point::new(dx, dy)) - self.basis.map(Point::ORIGIN)
    }

    fn selection_modified(&mut self, owner: Option<HandleKey>) {
        self.commit_selection();
        if let Some(key) = owner {
            self.triangle_modified(key);
        }
    }

    pub fn rotate_selection(&mut self, rad: f64, pivot: Point) {
        self.selection.rotate(rad, pivot, &mut self.triangles);
        log::debug!("FigureEditor::rotate_selection: {} rad about {:?}", rad, pivot);
        let owner = self.selected_if_any_member();
        self.selection_modified(owner);
    }

    pub fn scale_selection(&mut self, sx: f64, sy: f64, pivot: Point) {
        self.selection.scale(sx, sy, pivot, &mut self.triangles);
        log::debug!("FigureEditor::scale_selection: {}x{} about {:?}", sx, sy, pivot);
        let owner = self.selected_if_any_member();
        self.selection_modified(owner);
    }

    /// Move the selection by a distance given in abstract units
    pub fn move_selection_by(&mut self, dx: f64, dy: f64) {
        let d = self.abstract_to_scene_vec(dx, dy);
        self.selection.move_by(d.x, d.y, &mut self.triangles);
        let owner = self.selection.first().map(SelectionItem::owner);
        self.selection_modified(owner);
    }

    pub fn flip_selection_horizontally(&mut self, pivot: Point) {
        self.selection.flip_horizontally(pivot, &mut self.triangles);
        let owner = self.selection.first().map(SelectionItem::owner);
        self.selection_modified(owner);
    }

    pub fn flip_selection_vertically(&mut self, pivot: Point) {
        self.selection.flip_vertically(pivot, &mut self.triangles);
        let owner = self.selection.first().map(SelectionItem::owner);
        self.selection_modified(owner);
    }

    fn selected_if_any_member(&self) -> Option<HandleKey> {
        if self.selection.has_items() {
            self.selected.map(HandleKey::Xform)
        } else {
            None
        }
    }

    // ----- basis -----

    /// Scale the basis, keeping every dependent anchored
    pub fn scale_basis(&mut self, dx: f64, dy: f64) {
        let mark = self.basis.inverse_map(self.mark.center());
        let delta = self.basis.scale(dx, dy);
        self.basis_changed(delta, mark);
    }

    /// Replace the basis transform, keeping every dependent anchored
    pub fn set_coord_transform(&mut self, transform: Affine) {
        let mark = self.basis.inverse_map(self.mark.center());
        let delta = self.basis.set_coord_transform(transform);
        self.basis_changed(delta, mark);
    }

    fn basis_changed(&mut self, delta: Affine, mark: Point) {
        self.triangles.basis_scaled(delta);
        if self.has_selection {
            self.selection.basis_scaled(delta);
        }
        self.mark.center_on(self.basis.map(mark));
        self.adjust_scene_rect();
    }

    pub fn scale_in_scene(&mut self) {
        self.scale_basis(1.1, 1.1);
    }

    pub fn scale_out_scene(&mut self) {
        self.scale_basis(0.9090, 0.9090);
    }

    /// Rescale the basis until all items fit in a viewport of `viewport` size
    pub fn auto_scale(&mut self, viewport: Size) {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }
        let fit = |bounds: Rect| {
            let w = bounds.width() + AUTO_SCALE_PADDING;
            let h = bounds.height() + AUTO_SCALE_PADDING;
            (viewport.width / w).min(viewport.height / h)
        };
        let mut dz = fit(self.items_scene_bounds());
        // the padding is fixed, so convergence is geometric but not exact
        for _ in 0..64 {
            if (0.99..=1.01).contains(&dz) {
                break;
            }
            log::debug!("FigureEditor::auto_scale: scale {}", dz);
            self.scale_basis(dz, dz);
            dz = fit(self.items_scene_bounds());
        }
        self.view_center = Some(self.items_scene_bounds().center());
        self.adjust_scene_rect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionType;

    fn editor(count: usize) -> FigureEditor {
        FigureEditor::new(Genome::with_default_xforms(count), EditorSettings::default())
    }

    #[test]
    fn test_new_selects_first() {
        let mut ed = editor(3);
        assert_eq!(ed.num_triangles(), 3);
        assert_eq!(ed.selected_index(), Some(0));
        assert!(ed.take_events().contains(&EditorEvent::TriangleSelected(0)));
    }

    #[test]
    fn test_empty_genome_gets_default() {
        let ed = editor(0);
        assert_eq!(ed.genome().num_xforms(), 1);
        assert_eq!(ed.num_triangles(), 1);
        assert_eq!(ed.selected_index(), Some(0));
    }

    #[test]
    fn test_post_triangle_lifecycle() {
        let mut ed = editor(2);
        assert!(ed.post().is_none());
        ed.edit_post_triangle(true);
        assert!(ed.post_enabled());
        assert_eq!(ed.post().unwrap().index(), 0);

        ed.select_triangle(1);
        assert!(ed.post_enabled());
        assert_eq!(ed.post().unwrap().index(), 1);

        ed.edit_post_triangle(false);
        assert!(ed.post().is_some());
        assert!(!ed.post().unwrap().is_visible());
    }

    #[test]
    fn test_rotate_post_writes_post_coefs() {
        let mut ed = editor(1);
        ed.edit_post_triangle(true);
        ed.rotate_triangle(HandleKey::Post, std::f64::consts::PI, Point::ORIGIN);
        let xf = &ed.genome().xforms()[0];
        assert!((xf.post[0][0] + 1.0).abs() < 1e-9);
        assert!((xf.coefs[0][0] - 1.0).abs() < 1e-9);
        assert!(ed.take_events().contains(&EditorEvent::TriangleModified(0)));
    }

    #[test]
    fn test_move_triangle_in_abstract_units() {
        let mut ed = editor(1);
        ed.move_triangle_by(HandleKey::Xform(0), 0.5, 0.25);
        let xf = &ed.genome().xforms()[0];
        assert!((xf.coefs[2][0] - 0.5).abs() < 1e-9);
        assert!((xf.coefs[2][1] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_basis_rescale_anchors_triangles() {
        let mut ed = editor(2);
        ed.rotate_triangle(HandleKey::Xform(1), 0.4, Point::new(13.0, -7.0));
        ed.set_mark_visible(true);
        ed.set_mark_position(Point::new(0.3, 0.7));
        let before: Vec<_> = ed.triangles().triangles().iter().map(|t| t.coords()).collect();
        let mark_before = ed.mark().center();

        ed.scale_basis(1.37, 1.37);
        assert!((ed.mark().center() - mark_before).hypot() > 1.0);
        ed.scale_basis(1.0 / 1.37, 1.0 / 1.37);

        for (t, b) in ed.triangles().triangles().iter().zip(before) {
            for (p, q) in t.coords().points().iter().zip(b.points().iter()) {
                assert!((*p - *q).hypot() < 1e-9);
            }
        }
        assert!((ed.mark().center() - mark_before).hypot() < 1e-9);
    }

    #[test]
    fn test_basis_rescale_keeps_coefficients() {
        let mut ed = editor(1);
        ed.move_triangle_by(HandleKey::Xform(0), 0.2, 0.1);
        let coefs = ed.genome().xforms()[0].coefs;
        ed.scale_basis(2.0, 2.0);
        assert_eq!(ed.genome().xforms()[0].coefs, coefs);
        assert_eq!(ed.settings().basis, [200.0, 0.0, 0.0, -200.0, 0.0, 0.0]);
    }

    #[test]
    fn test_auto_scale_fits_viewport() {
        let mut ed = editor(1);
        ed.auto_scale(Size::new(800.0, 600.0));
        let bounds = ed.items_scene_bounds();
        let dz = (800.0 / (bounds.width() + 100.0)).min(600.0 / (bounds.height() + 100.0));
        assert!((0.99..=1.01).contains(&dz));
    }

    #[test]
    fn test_info_label() {
        let mut genome = Genome::with_default_xforms(1);
        genome.add_xforms(1, true);
        let ed = FigureEditor::new(genome, EditorSettings::default());
        assert_eq!(ed.info_label(0).unwrap(), "transform: 1\ndensity: 0.5000\nlinear: 1.0000\n");
        assert!(ed.info_label(1).unwrap().starts_with("final transform: 2\n"));
        assert!(ed.info_label(2).is_none());
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = EditorSettings {
            grid_visible: true,
            centered_scaling: true,
            selection_type: SelectionType::Nodes,
            pivot_mode: PivotMode::Center,
            ..Default::default()
        };
        let ed = FigureEditor::new(Genome::with_default_xforms(1), settings.clone());
        assert_eq!(ed.settings(), settings);
        assert!(ed.view_center().is_some());
    }

    #[test]
    fn test_transform_pos_modes() {
        let mut ed = editor(1);
        ed.move_triangle_by(HandleKey::Xform(0), 1.0, 0.0);
        assert_eq!(ed.triangle_transform_pos(), Point::new(100.0, 0.0));
        ed.set_pivot_mode(PivotMode::Center);
        let c = ed.triangle_transform_pos();
        assert!((c - Point::new(100.0 + 100.0 / 3.0, -100.0 / 3.0)).hypot() < 1e-9);
        ed.set_pivot_mode(PivotMode::BasisOrigin);
        assert_eq!(ed.triangle_transform_pos(), Point::ORIGIN);
    }
}
