//! Gesture scripts
//!
//! A script is a JSON array of gestures replayed against the editor, e.g.
//!
//! ```json
//! [
//!   { "gesture": "press", "scene_pos": { "x": 30.0, "y": -30.0 } },
//!   { "gesture": "move", "scene_pos": { "x": 80.0, "y": -30.0 } },
//!   { "gesture": "release", "scene_pos": { "x": 80.0, "y": -30.0 } },
//!   { "gesture": "menu", "pos": { "x": 80.0, "y": -30.0 }, "action": "copy" },
//!   { "gesture": "undo" }
//! ]
//! ```

use flamedit_core::editor::ContextMenuAction;
use flamedit_core::event::{PointerEvent, WheelEvent};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", rename_all = "camelCase")]
pub enum Gesture {
    Press(PointerEvent),
    Move(PointerEvent),
    Release(PointerEvent),
    Wheel(WheelEvent),
    /// Open the context menu at `pos` and pick `action`
    Menu {
        pos: Point,
        action: ContextMenuAction,
    },
    Undo,
    Redo,
    /// Commit an undo checkpoint now
    SaveUndo,
}

pub fn parse_script(text: &str) -> Result<Vec<Gesture>, serde_json::Error> {
    serde_json::from_str(text)
}

pub fn load_script(path: &Path) -> Result<Vec<Gesture>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let gestures = parse_script(&text)?;
    log::debug!("Loaded {} gestures from {}", gestures.len(), path.display());
    Ok(gestures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flamedit_core::event::{Modifiers, PointerButton};

    #[test]
    fn test_parse_script() {
        let text = r#"[
            { "gesture": "press", "scene_pos": { "x": 1.0, "y": 2.0 },
              "modifiers": { "shift": true } },
            { "gesture": "wheel", "scene_pos": { "x": 0.0, "y": 0.0 }, "delta": -120.0 },
            { "gesture": "menu", "pos": { "x": 5.0, "y": 5.0 },
              "action": { "editPostTriangle": true } },
            { "gesture": "saveUndo" },
            { "gesture": "redo" }
        ]"#;
        let gestures = parse_script(text).unwrap();
        assert_eq!(gestures.len(), 5);
        match &gestures[0] {
            Gesture::Press(event) => {
                assert_eq!(event.scene_pos, Point::new(1.0, 2.0));
                assert_eq!(event.button, PointerButton::Primary);
                assert_eq!(event.modifiers, Modifiers::SHIFT);
            }
            other => panic!("unexpected gesture {:?}", other),
        }
        assert!(matches!(gestures[1], Gesture::Wheel(WheelEvent { delta, .. }) if delta == -120.0));
        assert_eq!(
            gestures[2],
            Gesture::Menu {
                pos: Point::new(5.0, 5.0),
                action: ContextMenuAction::EditPostTriangle(true),
            }
        );
        assert_eq!(gestures[3], Gesture::SaveUndo);
    }

    #[test]
    fn test_unknown_gesture_is_rejected() {
        assert!(parse_script(r#"[{ "gesture": "doubleClick" }]"#).is_err());
    }
}
