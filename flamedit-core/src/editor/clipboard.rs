//! Structural edits: add, remove, copy, cut, paste
//!
//! Each of these changes the genome's record list, so each ends with a
//! [`FigureEditor::reset`] followed by a modification notice and an undo
//! checkpoint.

use super::menu::MenuTarget;
use super::FigureEditor;
use crate::event::EditorEvent;
use crate::hit_test::SceneItem;
use crate::selection::{HandleKey, NodeRef};

impl FigureEditor {
    /// Index addressed by a menu target, falling back to the selected xform
    ///
    /// A triangle, or a node of an xform triangle, names its own xform.
    pub fn current_or_selected(&self, target: Option<&MenuTarget>) -> Option<usize> {
        match target.and_then(|t| t.item) {
            Some(SceneItem::Triangle(index))
            | Some(SceneItem::Node(NodeRef {
                handle: HandleKey::Xform(index),
                ..
            })) => Some(index),
            _ => self.selected,
        }
    }

    /// Xform indices owning selection members; the post maps to the selected xform
    fn selection_records(&self) -> Vec<usize> {
        let mut records = Vec::new();
        for key in self.selection.owner_handles() {
            let index = match key {
                HandleKey::Xform(index) => Some(index),
                HandleKey::Post => self.selected,
            };
            if let Some(index) = index {
                if !records.contains(&index) {
                    records.push(index);
                }
            }
        }
        records
    }

    fn structure_changed(&mut self) {
        if let Some(index) = self.selected {
            self.emit(EditorEvent::TriangleModified(index));
        }
        self.emit(EditorEvent::UndoCheckpoint);
    }

    /// Append a default xform (before the final one) and select it
    pub fn add_triangle(&mut self) {
        let index = self.genome.add_default_xform();
        log::debug!("FigureEditor::add_triangle: added xform {}", index + 1);
        self.reset();
        self.select_index(index);
        self.structure_changed();
    }

    /// Delete the targeted xform, or the selected one
    pub fn remove_triangle(&mut self, target: Option<&MenuTarget>) {
        let Some(index) = self.current_or_selected(target) else {
            return;
        };
        log::debug!("FigureEditor::remove_triangle: removing xform {}", index + 1);
        if self.genome.delete_xform(index).is_none() {
            return;
        }
        self.reset();
        self.structure_changed();
    }

    /// Copy the selection's xforms, or the targeted/selected one, to the clip
    ///
    /// Returns the number of records copied.
    pub fn copy(&mut self, target: Option<&MenuTarget>) -> usize {
        let indices = if self.has_selection && self.selection.has_items() {
            self.selection_records()
        } else {
            self.current_or_selected(target).into_iter().collect()
        };
        self.clip = indices
            .iter()
            .filter_map(|&i| self.genome.xform(i).cloned())
            .collect();
        log::debug!("FigureEditor::copy: {} xforms copied", self.clip.len());
        self.clip.len()
    }

    /// Copy, then delete the copied records
    pub fn cut(&mut self, target: Option<&MenuTarget>) {
        let mut indices = if self.has_selection && self.selection.has_items() {
            self.selection_records()
        } else {
            self.current_or_selected(target).into_iter().collect()
        };
        if indices.is_empty() {
            return;
        }
        self.copy(target);

        // deleting high to low keeps the lower indices valid
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();
        for index in indices {
            log::debug!("FigureEditor::cut: removing xform {}", index + 1);
            self.genome.delete_xform(index);
        }
        self.reset();
        self.structure_changed();
    }

    /// Insert the clip's records before the final xform and select the last one
    pub fn paste(&mut self) {
        if self.clip.is_empty() {
            return;
        }
        let count = self.clip.len();
        let position = self.genome.add_xforms(count, false);
        for (offset, xform) in self.clip.iter().enumerate() {
            if let Some(slot) = self.genome.xform_mut(position + offset) {
                *slot = xform.clone();
            }
        }
        log::debug!(
            "FigureEditor::paste: {} xforms at {}",
            count,
            position + 1
        );
        self.reset();
        self.select_index(position + count - 1);
        self.structure_changed();
    }

    /// Reset the targeted triangle (or the selected one) to identity
    pub fn reset_triangle_position(&mut self, target: Option<&MenuTarget>) {
        let key = match target.and_then(|t| t.item) {
            Some(SceneItem::Triangle(index)) => Some(HandleKey::Xform(index)),
            Some(SceneItem::Post) => Some(HandleKey::Post),
            _ => self.selected.map(HandleKey::Xform),
        };
        let Some(key) = key else {
            return;
        };
        let Some(triangle) = self.triangles.get_mut(key) else {
            return;
        };
        let Some(xform) = self.genome.xform_mut(triangle.index()) else {
            return;
        };
        triangle.reset_position(&self.basis, xform);
        if self.has_selection {
            self.selection.fit_to_items(&self.triangles);
        }
        self.triangle_modified(key);
        self.emit(EditorEvent::UndoCheckpoint);
    }

    /// Add or remove the final xform
    pub fn enable_final_xform(&mut self, enable: bool) {
        match (enable, self.genome.final_xform_index()) {
            (true, Some(index)) => {
                log::warn!("FigureEditor::enable_final_xform: final xform already exists");
                self.select_index(index);
            }
            (true, None) => {
                log::info!("FigureEditor::enable_final_xform: adding final xform");
                let index = self.genome.add_xforms(1, true);
                self.reset();
                self.select_index(index);
                self.structure_changed();
            }
            (false, Some(index)) => {
                log::info!("FigureEditor::enable_final_xform: removing final xform");
                self.genome.delete_xform(index);
                self.reset();
                self.structure_changed();
            }
            (false, None) => {
                log::warn!("FigureEditor::enable_final_xform: no final xform to remove");
            }
        }
    }
}
