//! Pointer and wheel dispatch
//!
//! A press picks the topmost item and starts one of the drag modes of
//! [`InteractionState`]; moves apply incremental edits; the release ends the
//! mode and asks for an undo checkpoint when anything moved.

use super::menu::MenuTarget;
use super::FigureEditor;
use crate::event::{EditorEvent, Modifiers, PointerButton, PointerEvent, WheelEvent};
use crate::hit_test::{item_at, SceneItem};
use crate::selection::{HandleKey, NodeRef, SelectionItem, SelectionType};
use crate::triangle::EdgeType;
use kurbo::{Point, Rect};
use std::f64::consts::PI;

/// Size of the seed rectangle of a rubber band
const RUBBER_BAND_SEED: f64 = 0.01;

/// What a drag in progress is moving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovingTarget {
    Triangle(HandleKey),
    Node(NodeRef),
}

/// Current pointer interaction
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Dragging a triangle or one of its nodes
    MovingHandle {
        target: MovingTarget,
        press_pos: Point,
        last_pos: Point,
    },
    /// Dragging the selection aggregate
    MovingSelection { press_pos: Point, last_pos: Point },
    /// Control-drag rubber band
    RubberBandSelecting { start: Point },
    /// Middle-button drag
    PanningView { last_screen: Point },
}

/// Drag scale ratios: (grow, shrink)
fn drag_scale_ratio(dx: f64, modifiers: Modifiers) -> f64 {
    let (grow, shrink) = if modifiers.shift {
        (1.01, 0.99)
    } else if modifiers.control {
        (1.10, 0.9090)
    } else {
        (1.05, 0.9523)
    };
    if dx > 0.0 {
        grow
    } else {
        shrink
    }
}

fn wheel_scale_ratio(delta: f64, modifiers: Modifiers) -> f64 {
    match (delta > 0.0, modifiers.shift) {
        (true, false) => 1.1,
        (false, false) => 0.9090,
        (true, true) => 1.05,
        (false, true) => 0.9523,
    }
}

fn wheel_basis_ratio(delta: f64, modifiers: Modifiers) -> f64 {
    match (delta > 0.0, modifiers.shift) {
        (true, false) => 1.2,
        (false, false) => 0.8333,
        (true, true) => 1.1,
        (false, true) => 0.9090,
    }
}

/// Wheel rotation angle in radians
fn wheel_angle(delta: f64, modifiers: Modifiers) -> f64 {
    let degrees = if modifiers.shift {
        delta / (128.0 * PI)
    } else {
        delta / (16.0 * PI)
    };
    degrees.to_radians()
}

impl FigureEditor {
    pub fn interaction_state(&self) -> InteractionState {
        self.state
    }

    /// Topmost item under a scene point
    pub fn item_at(&self, pos: Point) -> Option<SceneItem> {
        item_at(&self.triangles, &self.selection, &self.basis, pos)
    }

    /// Handle a button press
    ///
    /// A secondary press does not change any state and returns the target
    /// for a context menu instead.
    pub fn mouse_pressed(&mut self, event: &PointerEvent) -> Option<MenuTarget> {
        let pos = event.scene_pos;
        match event.button {
            PointerButton::Secondary => Some(self.context_menu_requested(pos)),
            PointerButton::Middle => {
                if self.mark.is_visible() && event.modifiers.shift {
                    self.mark.center_on(pos);
                    let z = self.next_z_pos();
                    self.mark.set_z(z);
                }
                self.state = InteractionState::PanningView {
                    last_screen: event.screen_pos(),
                };
                None
            }
            PointerButton::Primary => {
                self.primary_pressed(pos, event.modifiers);
                None
            }
        }
    }

    fn primary_pressed(&mut self, pos: Point, modifiers: Modifiers) {
        self.wheel_moved = false;

        if modifiers.control {
            self.selection.clear();
            self.selection.set_rect(Rect::from_origin_size(
                pos,
                (RUBBER_BAND_SEED, RUBBER_BAND_SEED),
            ));
            self.selection.set_visible(true);
            self.state = InteractionState::RubberBandSelecting { start: pos };
            return;
        }

        let Some(item) = self.item_at(pos) else {
            log::trace!("FigureEditor::mouse_pressed: nothing at {:?}", pos);
            return;
        };

        let moving = |target| InteractionState::MovingHandle {
            target,
            press_pos: pos,
            last_pos: pos,
        };

        self.state = match item {
            SceneItem::Triangle(index) => {
                self.select_index(index);
                if let Some(t) = self.triangles.triangle_mut(index) {
                    t.find_edge(pos);
                }
                moving(MovingTarget::Triangle(HandleKey::Xform(index)))
            }
            SceneItem::Post => {
                if let Some(post) = self.triangles.post_mut() {
                    post.find_edge(pos);
                }
                moving(MovingTarget::Triangle(HandleKey::Post))
            }
            SceneItem::Node(node) => {
                if let HandleKey::Xform(index) = node.handle {
                    self.select_index(index);
                }
                moving(MovingTarget::Node(node))
            }
            SceneItem::Selection => {
                let z = self.next_z_pos();
                self.selection.set_z(z);
                InteractionState::MovingSelection {
                    press_pos: pos,
                    last_pos: pos,
                }
            }
            SceneItem::Basis => return,
        };

        if modifiers.shift {
            let candidate = match item {
                SceneItem::Triangle(index) => Some(SelectionItem::Triangle(HandleKey::Xform(index))),
                SceneItem::Post => Some(SelectionItem::Triangle(HandleKey::Post)),
                SceneItem::Node(node) => match self.selection.selected_type() {
                    SelectionType::Triangles => Some(SelectionItem::Triangle(node.handle)),
                    SelectionType::Nodes => Some(SelectionItem::Node(node)),
                },
                SceneItem::Selection | SceneItem::Basis => None,
            };
            if let Some(candidate) = candidate {
                self.add_to_selection(candidate);
            }
        }
    }

    /// Handle pointer motion
    pub fn mouse_moved(&mut self, event: &PointerEvent) {
        let pos = event.scene_pos;

        let state = self.state;
        match state {
            InteractionState::Idle => self.hover(pos),
            InteractionState::MovingHandle {
                target,
                press_pos,
                last_pos,
            } => {
                let d = pos - last_pos;
                if d.x != 0.0 || d.y != 0.0 {
                    log::trace!("FigureEditor::mouse_moved: {:?} by ({}, {})", target, d.x, d.y);
                    self.info = None;
                    match target {
                        MovingTarget::Triangle(key) => {
                            self.drag_triangle(key, d.x, d.y, event.modifiers)
                        }
                        MovingTarget::Node(node) => self.drag_node(node, d.x, d.y),
                    }
                    self.state = InteractionState::MovingHandle {
                        target,
                        press_pos,
                        last_pos: pos,
                    };
                }
            }
            InteractionState::MovingSelection {
                press_pos,
                last_pos,
            } => {
                let d = pos - last_pos;
                if d.x != 0.0 || d.y != 0.0 {
                    self.selection.move_by(d.x, d.y, &mut self.triangles);
                    let owner = self.selection.first().map(SelectionItem::owner);
                    self.selection_modified(owner);
                    self.state = InteractionState::MovingSelection {
                        press_pos,
                        last_pos: pos,
                    };
                }
            }
            InteractionState::RubberBandSelecting { start } => {
                self.selection.set_rect(Rect::from_points(start, pos));
            }
            InteractionState::PanningView { last_screen } => {
                let screen = event.screen_pos();
                let d = screen - last_screen;
                if self.mark.is_visible() && event.modifiers.shift {
                    self.mark.center_on(pos);
                } else if event.modifiers.control {
                    if d.x != 0.0 && d.x.abs() >= d.y.abs() {
                        // sub-pixel deltas count as one pixel
                        let magnitude = d.x.abs().max(1.0);
                        let k = if d.x > 0.0 {
                            1.05 + magnitude.ln() / 10.0
                        } else {
                            0.9523 - magnitude.ln() / 10.0
                        };
                        let k = k.max(0.1);
                        self.scale_basis(k, k);
                    }
                } else {
                    self.view_scroll -= d;
                    self.state = InteractionState::PanningView {
                        last_screen: screen,
                    };
                    return;
                }
                self.state = InteractionState::PanningView {
                    last_screen: screen,
                };
            }
        }

        let abstract_pos = self.basis.inverse_map(pos);
        self.emit(EditorEvent::CoordinateChanged(abstract_pos));
    }

    fn drag_triangle(&mut self, key: HandleKey, dx: f64, dy: f64, modifiers: Modifiers) {
        let Some(edge) = self.triangles.get(key).map(|t| t.edge_type()) else {
            return;
        };
        match edge {
            EdgeType::Rotate => {
                if dx.abs() >= dy.abs() {
                    let degrees = if modifiers.shift {
                        dx / 10.0
                    } else if modifiers.control {
                        dx * 10.0
                    } else {
                        dx
                    };
                    let pivot = self.triangle_transform_pos();
                    self.rotate_triangle(key, degrees.to_radians(), pivot);
                }
            }
            EdgeType::Scale => {
                if dx.abs() >= dy.abs() {
                    let ratio = drag_scale_ratio(dx, modifiers);
                    let pivot = self.triangle_transform_pos();
                    self.scale_triangle(key, ratio, ratio, pivot);
                }
            }
            EdgeType::None => self.edit_triangle(key, |t| t.move_by(dx, dy)),
        }
    }

    fn drag_node(&mut self, node: NodeRef, dx: f64, dy: f64) {
        self.edit_triangle(node.handle, |t| t.move_node(node.node, dx, dy));
    }

    fn hover(&mut self, pos: Point) {
        let handle = match self.item_at(pos) {
            Some(SceneItem::Triangle(index)) => Some(HandleKey::Xform(index)),
            Some(SceneItem::Post) => Some(HandleKey::Post),
            Some(SceneItem::Node(node)) => Some(node.handle),
            _ => None,
        };

        match handle {
            Some(HandleKey::Xform(index)) => {
                if self.selected == Some(index) {
                    if let Some(t) = self.triangles.triangle_mut(index) {
                        t.find_edge(pos);
                    }
                }
                self.hovered = Some(index);
                self.info = self.info_label(index);
            }
            Some(HandleKey::Post) => {
                if let Some(post) = self.triangles.post_mut() {
                    post.find_edge(pos);
                }
                self.hovered = self.selected;
                self.info = self.selected.map(|i| format!("post transform: {}\n", i + 1));
            }
            None => {
                self.hovered = None;
                self.info = None;
            }
        }
    }

    /// Handle a button release
    pub fn mouse_released(&mut self, event: &PointerEvent) {
        let pos = event.scene_pos;
        match std::mem::take(&mut self.state) {
            InteractionState::MovingHandle { press_pos, .. }
            | InteractionState::MovingSelection { press_pos, .. } => {
                if pos != press_pos || self.wheel_moved {
                    self.emit(EditorEvent::UndoCheckpoint);
                }
            }
            InteractionState::RubberBandSelecting { start } => {
                if pos == start {
                    self.enable_selection(false);
                } else {
                    self.selection.set_rect(Rect::from_points(start, pos));
                    let candidates = self.triangles.selectable_items(self.selection.selected_type());
                    let count = self.selection.select_covered_items(candidates);
                    log::debug!("FigureEditor::mouse_released: {} items selected", count);
                    self.enable_selection(true);
                }
            }
            InteractionState::PanningView { .. } | InteractionState::Idle => {}
        }
        self.wheel_moved = false;
        self.adjust_scene_rect();
    }

    /// Handle wheel rotation over an item
    pub fn wheel(&mut self, event: &WheelEvent) {
        let pos = event.scene_pos;
        let Some(item) = self.item_at(pos) else {
            return;
        };
        let modifiers = event.modifiers;

        match item {
            SceneItem::Triangle(_) | SceneItem::Post => {
                let key = match item {
                    SceneItem::Triangle(index) => HandleKey::Xform(index),
                    _ => HandleKey::Post,
                };
                if modifiers.control {
                    let ratio = wheel_scale_ratio(event.delta, modifiers);
                    self.scale_triangle(key, ratio, ratio, pos);
                } else {
                    self.rotate_triangle(key, wheel_angle(event.delta, modifiers), pos);
                }
            }
            SceneItem::Selection => {
                if modifiers.control {
                    let ratio = wheel_scale_ratio(event.delta, modifiers);
                    self.scale_selection(ratio, ratio, pos);
                } else {
                    self.rotate_selection(wheel_angle(event.delta, modifiers), pos);
                }
            }
            SceneItem::Basis => {
                let ratio = wheel_basis_ratio(event.delta, modifiers);
                self.scale_basis(ratio, ratio);
            }
            SceneItem::Node(_) => {}
        }
        self.wheel_moved = true;
    }
}
