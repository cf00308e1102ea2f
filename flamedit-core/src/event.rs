//! Input and notification types
//!
//! The editor is driven by plain pointer/wheel records instead of toolkit
//! events, and reports back through [`EditorEvent`]s that observers drain.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// Keyboard modifiers held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub control: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        control: false,
    };
    pub const CONTROL: Modifiers = Modifiers {
        shift: false,
        control: true,
    };
}

/// Press, move or release of the pointer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Position in scene coordinates
    pub scene_pos: Point,
    /// Position in screen coordinates; defaults to the scene position
    #[serde(default)]
    pub screen_pos: Option<Point>,
    #[serde(default)]
    pub button: PointerButton,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(scene_pos: Point, button: PointerButton, modifiers: Modifiers) -> Self {
        Self {
            scene_pos,
            screen_pos: None,
            button,
            modifiers,
        }
    }

    /// Primary button, no modifiers
    pub fn primary(scene_pos: Point) -> Self {
        Self::new(scene_pos, PointerButton::Primary, Modifiers::NONE)
    }

    pub fn with_screen_pos(mut self, screen_pos: Point) -> Self {
        self.screen_pos = Some(screen_pos);
        self
    }

    pub fn screen_pos(&self) -> Point {
        self.screen_pos.unwrap_or(self.scene_pos)
    }
}

/// Mouse wheel rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub scene_pos: Point,
    /// Wheel delta in eighths of a degree (120 per notch)
    pub delta: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl WheelEvent {
    pub fn new(scene_pos: Point, delta: f64, modifiers: Modifiers) -> Self {
        Self {
            scene_pos,
            delta,
            modifiers,
        }
    }
}

/// Notification for observers of the editor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
    /// The xform at this index was modified
    TriangleModified(usize),
    /// The xform at this index became the selected one
    TriangleSelected(usize),
    /// An undo checkpoint should be committed
    UndoCheckpoint,
    /// Pointer position in abstract coordinates
    CoordinateChanged(Point),
}
