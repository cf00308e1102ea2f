//! Editing session: the editor plus its undo history
//!
//! Plays the observer role for the editor: drains its events after every
//! operation and commits an undo checkpoint whenever one is requested.

use crate::script::Gesture;
use flamedit_core::editor::FigureEditor;
use flamedit_core::event::EditorEvent;
use flamedit_core::genome::Genome;
use flamedit_core::settings::EditorSettings;
use flamedit_core::undo::{Checkpoint, History};

pub struct Session {
    editor: FigureEditor,
    history: History,
    modified: bool,
}

impl Session {
    pub fn new(genome: Genome, settings: EditorSettings) -> Self {
        let mut editor = FigureEditor::new(genome, settings);
        editor.take_events();
        let mut history = History::new();
        history.push(Checkpoint {
            genome: editor.genome().clone(),
            state: editor.save_undo_state(),
        });
        Self {
            editor,
            history,
            modified: false,
        }
    }

    pub fn editor(&self) -> &FigureEditor {
        &self.editor
    }

    /// Run an operation on the editor and process what it reports
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut FigureEditor) -> R) -> R {
        let result = f(&mut self.editor);
        self.process_events();
        result
    }

    /// Whether the genome changed during the session
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    fn process_events(&mut self) {
        for event in self.editor.take_events() {
            match event {
                EditorEvent::UndoCheckpoint => self.save_undo(),
                EditorEvent::TriangleModified(index) => {
                    log::debug!("Transform {} modified", index + 1);
                    self.modified = true;
                }
                EditorEvent::TriangleSelected(index) => {
                    log::debug!("Transform {} selected", index + 1);
                }
                EditorEvent::CoordinateChanged(p) => {
                    log::trace!("Pointer at ({:.4}, {:.4})", p.x, p.y);
                }
            }
        }
    }

    /// Commit the current state as an undo checkpoint
    pub fn save_undo(&mut self) {
        let checkpoint = Checkpoint {
            genome: self.editor.genome().clone(),
            state: self.editor.save_undo_state(),
        };
        if self.history.current().map(|c| &c.genome) == Some(&checkpoint.genome) {
            log::trace!("Skipping checkpoint: genome unchanged");
            return;
        }
        self.history.push(checkpoint);
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo().cloned() {
            Some(checkpoint) => {
                self.restore(checkpoint);
                true
            }
            None => {
                log::info!("Nothing to undo");
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo().cloned() {
            Some(checkpoint) => {
                self.restore(checkpoint);
                true
            }
            None => {
                log::info!("Nothing to redo");
                false
            }
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.editor.set_genome(checkpoint.genome);
        self.editor.restore_undo_state(&checkpoint.state);
        // restoring is not an edit of its own
        self.editor.take_events();
        self.modified = true;
    }

    pub fn apply(&mut self, gesture: &Gesture) {
        log::trace!("Replaying {:?}", gesture);
        match gesture {
            Gesture::Press(event) => {
                // a secondary press only reports a target; menus are scripted explicitly
                self.edit(|ed| ed.mouse_pressed(event));
            }
            Gesture::Move(event) => self.edit(|ed| ed.mouse_moved(event)),
            Gesture::Release(event) => self.edit(|ed| ed.mouse_released(event)),
            Gesture::Wheel(event) => self.edit(|ed| ed.wheel(event)),
            Gesture::Menu { pos, action } => self.edit(|ed| {
                let target = ed.context_menu_requested(*pos);
                ed.context_menu_action(&target, *action);
            }),
            Gesture::Undo => {
                self.undo();
            }
            Gesture::Redo => {
                self.redo();
            }
            Gesture::SaveUndo => self.save_undo(),
        }
    }

    pub fn replay(&mut self, gestures: &[Gesture]) {
        for gesture in gestures {
            self.apply(gesture);
        }
        log::info!(
            "Replayed {} gestures ({} undo steps)",
            gestures.len(),
            self.history.undo_len().saturating_sub(1)
        );
    }

    pub fn into_parts(self) -> (Genome, EditorSettings) {
        self.editor.into_parts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;
    use flamedit_core::editor::ContextMenuAction;
    use kurbo::Point;

    fn session(count: usize) -> Session {
        Session::new(Genome::with_default_xforms(count), EditorSettings::default())
    }

    #[test]
    fn test_drag_creates_checkpoint_and_undoes() {
        let mut session = session(1);
        let script = parse_script(
            r#"[
                { "gesture": "press", "scene_pos": { "x": 30.0, "y": -30.0 } },
                { "gesture": "move", "scene_pos": { "x": 130.0, "y": -30.0 } },
                { "gesture": "release", "scene_pos": { "x": 130.0, "y": -30.0 } }
            ]"#,
        )
        .unwrap();
        session.replay(&script);
        assert!(session.is_modified());
        assert_eq!(session.history().undo_len(), 2);
        assert!((session.editor().genome().xforms()[0].coefs[2][0] - 1.0).abs() < 1e-9);

        assert!(session.undo());
        assert_eq!(session.editor().genome().xforms()[0].coefs[2], [0.0, 0.0]);
        assert!(!session.undo());

        assert!(session.redo());
        assert!((session.editor().genome().xforms()[0].coefs[2][0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_menu_gesture() {
        let mut session = session(2);
        session.apply(&Gesture::Menu {
            pos: Point::new(30.0, -30.0),
            action: ContextMenuAction::Copy,
        });
        session.apply(&Gesture::Menu {
            pos: Point::new(1000.0, 1000.0),
            action: ContextMenuAction::Paste,
        });
        assert_eq!(session.editor().num_triangles(), 3);
        assert_eq!(session.history().undo_len(), 2);
    }

    #[test]
    fn test_unchanged_genome_skips_checkpoint() {
        let mut session = session(1);
        session.save_undo();
        session.save_undo();
        assert_eq!(session.history().undo_len(), 1);
    }
}
