//! Two-phase context menu
//!
//! A secondary press yields a [`MenuTarget`] recording where the menu was
//! opened and what was under the pointer. Whatever presents the menu hands
//! the chosen [`ContextMenuAction`] back together with that target.

use super::FigureEditor;
use crate::event::EditorEvent;
use crate::hit_test::SceneItem;
use crate::selection::HandleKey;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Where a context menu was opened
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuTarget {
    /// Scene position of the request; also the flip pivot
    pub pos: Point,
    /// Item under the pointer, if any
    pub item: Option<SceneItem>,
}

/// Entries of the editor's context menu
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextMenuAction {
    Cut,
    Copy,
    Paste,
    AddTriangle,
    RemoveTriangle,
    ResetPosition,
    FlipHorizontal,
    FlipVertical,
    EditPostTriangle(bool),
    EnableFinalXform(bool),
    SelectTriangle(usize),
    RescaleView { width: f64, height: f64 },
    ShowGrid(bool),
    ShowMark(bool),
}

impl FigureEditor {
    /// Record the target of a context menu opened at `pos`
    pub fn context_menu_requested(&mut self, pos: Point) -> MenuTarget {
        let item = self.item_at(pos);
        log::debug!("FigureEditor::context_menu_requested: {:?} at {:?}", item, pos);
        MenuTarget { pos, item }
    }

    /// Carry out a chosen menu entry
    pub fn context_menu_action(&mut self, target: &MenuTarget, action: ContextMenuAction) {
        log::debug!("FigureEditor::context_menu_action: {:?}", action);
        match action {
            ContextMenuAction::Cut => self.cut(Some(target)),
            ContextMenuAction::Copy => {
                self.copy(Some(target));
            }
            ContextMenuAction::Paste => self.paste(),
            ContextMenuAction::AddTriangle => self.add_triangle(),
            ContextMenuAction::RemoveTriangle => self.remove_triangle(Some(target)),
            ContextMenuAction::ResetPosition => self.reset_triangle_position(Some(target)),
            ContextMenuAction::FlipHorizontal => self.flip_horizontal(Some(target.pos)),
            ContextMenuAction::FlipVertical => self.flip_vertical(Some(target.pos)),
            ContextMenuAction::EditPostTriangle(flag) => self.edit_post_triangle(flag),
            ContextMenuAction::EnableFinalXform(flag) => self.enable_final_xform(flag),
            ContextMenuAction::SelectTriangle(index) => self.select_triangle(index),
            ContextMenuAction::RescaleView { width, height } => {
                self.auto_scale(Size::new(width, height))
            }
            ContextMenuAction::ShowGrid(flag) => self.set_grid_visible(flag),
            ContextMenuAction::ShowMark(flag) => self.set_mark_visible(flag),
        }
    }

    /// Flip about `pivot` (default: the transform pivot)
    ///
    /// Flips the selection when there is one, else the post triangle while it
    /// is being edited, else the selected triangle.
    pub fn flip_horizontal(&mut self, pivot: Option<Point>) {
        let pivot = pivot.unwrap_or_else(|| self.triangle_transform_pos());
        match self.flip_target() {
            Some(FlipTarget::Selection) => self.flip_selection_horizontally(pivot),
            Some(FlipTarget::Triangle(key)) => self.flip_triangle_horizontally(key, pivot),
            None => return,
        }
        self.emit(EditorEvent::UndoCheckpoint);
    }

    pub fn flip_vertical(&mut self, pivot: Option<Point>) {
        let pivot = pivot.unwrap_or_else(|| self.triangle_transform_pos());
        match self.flip_target() {
            Some(FlipTarget::Selection) => self.flip_selection_vertically(pivot),
            Some(FlipTarget::Triangle(key)) => self.flip_triangle_vertically(key, pivot),
            None => return,
        }
        self.emit(EditorEvent::UndoCheckpoint);
    }

    fn flip_target(&self) -> Option<FlipTarget> {
        if self.has_selection && self.selection.has_items() {
            Some(FlipTarget::Selection)
        } else if self.editing_post && self.triangles.post().is_some() {
            Some(FlipTarget::Triangle(HandleKey::Post))
        } else {
            self.selected.map(|i| FlipTarget::Triangle(HandleKey::Xform(i)))
        }
    }
}

enum FlipTarget {
    Selection,
    Triangle(HandleKey),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Modifiers, PointerButton, PointerEvent};
    use crate::genome::Genome;
    use crate::selection::SelectionItem;
    use crate::settings::EditorSettings;

    fn editor(count: usize) -> FigureEditor {
        let mut ed = FigureEditor::new(Genome::with_default_xforms(count), EditorSettings::default());
        ed.take_events();
        ed
    }

    #[test]
    fn test_secondary_press_returns_target() {
        let mut ed = editor(1);
        let event = PointerEvent::new(Point::new(30.0, -30.0), PointerButton::Secondary, Modifiers::NONE);
        let target = ed.mouse_pressed(&event).unwrap();
        assert_eq!(target.item, Some(SceneItem::Triangle(0)));
        assert_eq!(target.pos, Point::new(30.0, -30.0));
        assert!(ed.take_events().is_empty());
    }

    #[test]
    fn test_flip_about_menu_position() {
        let mut ed = editor(1);
        let target = ed.context_menu_requested(Point::new(50.0, 0.0));
        ed.context_menu_action(&target, ContextMenuAction::FlipHorizontal);
        // X axis reversed, origin mirrored to x = 100
        let xf = &ed.genome().xforms()[0];
        assert!((xf.coefs[0][0] + 1.0).abs() < 1e-9);
        assert!((xf.coefs[2][0] - 1.0).abs() < 1e-9);
        assert_eq!(ed.take_events().last(), Some(&EditorEvent::UndoCheckpoint));
    }

    #[test]
    fn test_flip_prefers_selection() {
        let mut ed = editor(2);
        ed.add_to_selection(SelectionItem::Triangle(HandleKey::Xform(1)));
        ed.flip_vertical(Some(Point::ORIGIN));
        assert!((ed.genome().xforms()[1].coefs[1][1] + 1.0).abs() < 1e-9);
        assert!((ed.genome().xforms()[0].coefs[1][1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_flip_post_while_editing() {
        let mut ed = editor(1);
        ed.edit_post_triangle(true);
        ed.flip_horizontal(Some(Point::ORIGIN));
        let xf = &ed.genome().xforms()[0];
        assert!((xf.post[0][0] + 1.0).abs() < 1e-9);
        assert!((xf.coefs[0][0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_menu_copy_paste_targets_item() {
        let mut ed = editor(2);
        ed.move_triangle_by(HandleKey::Xform(1), 3.0, 0.0);
        let target = ed.context_menu_requested(Point::new(330.0, -30.0));
        assert_eq!(target.item, Some(SceneItem::Triangle(1)));
        ed.select_triangle(0);
        ed.context_menu_action(&target, ContextMenuAction::Copy);
        ed.context_menu_action(&target, ContextMenuAction::Paste);
        assert_eq!(ed.num_triangles(), 3);
        assert_eq!(ed.genome().xforms()[2], ed.genome().xforms()[1]);
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&ContextMenuAction::EditPostTriangle(true)).unwrap();
        assert_eq!(json, r#"{"editPostTriangle":true}"#);
        let back: ContextMenuAction = serde_json::from_str(r#""addTriangle""#).unwrap();
        assert_eq!(back, ContextMenuAction::AddTriangle);
    }
}
