//! Capture and restore of selection and mark for undo

use super::FigureEditor;
use crate::selection::{HandleKey, NodeRef, SelectionItem};
use crate::undo::{UndoMember, UndoState, POST_HANDLE_INDEX};

fn member_index(key: HandleKey) -> i32 {
    match key {
        HandleKey::Xform(index) => i32::try_from(index).unwrap_or(i32::MAX),
        HandleKey::Post => POST_HANDLE_INDEX,
    }
}

impl FigureEditor {
    /// Snapshot the selection and mark in abstract coordinates
    pub fn save_undo_state(&self) -> UndoState {
        let selection_rect = if self.selection.is_visible() {
            self.basis.inverse_map_polygon(&self.selection.polygon())
        } else {
            Vec::new()
        };
        let members = self
            .selection
            .items()
            .iter()
            .map(|item| match item {
                SelectionItem::Triangle(key) => UndoMember::triangle(member_index(*key)),
                SelectionItem::Node(node) => UndoMember::node(member_index(node.handle), node.node),
            })
            .collect();

        UndoState {
            selection_rect,
            selected_type: self.selection.selected_type(),
            members,
            mark_pos: self.basis.inverse_map(self.mark.center()),
        }
    }

    /// Rebuild selection and mark from a snapshot
    ///
    /// Members are looked up by position; indices past the current triangle
    /// count are skipped, and the post member is restored only while the post
    /// triangle is being edited.
    pub fn restore_undo_state(&mut self, state: &UndoState) {
        if state.selection_rect.is_empty() {
            self.enable_selection(false);
        } else {
            self.selection.clear();
            self.selection.set_selected_type(state.selected_type);
            self.selection
                .set_polygon(self.basis.map_polygon(&state.selection_rect));

            for member in &state.members {
                let key = if member.is_post() {
                    if !self.editing_post {
                        continue;
                    }
                    HandleKey::Post
                } else {
                    match usize::try_from(member.index) {
                        Ok(index) if index < self.triangles.len() => HandleKey::Xform(index),
                        _ => {
                            log::debug!(
                                "FigureEditor::restore_undo_state: skipping stale member {}",
                                member.index
                            );
                            continue;
                        }
                    }
                };
                let item = match member.node {
                    Some(node) => SelectionItem::Node(NodeRef::new(key, node)),
                    None => SelectionItem::Triangle(key),
                };
                self.selection.insert_item(item);
            }
            self.enable_selection(true);
        }

        self.mark.center_on(self.basis.map(state.mark_pos));
    }
}
