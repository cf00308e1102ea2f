//! Undo state for selection and mark
//!
//! An [`UndoState`] records the selection aggregate and the coordinate mark
//! in abstract coordinates, so it survives basis changes. Members are stored
//! by triangle position and are looked up again in the current triangle list
//! on restore; a restore that crosses an added or removed xform may therefore
//! pick a different triangle.
//!
//! [`History`] keeps bounded undo/redo stacks of genome snapshots paired with
//! these states, for consumers that answer the editor's undo checkpoints.

use crate::genome::Genome;
use crate::selection::SelectionType;
use crate::triangle::NodeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Member index standing for the post triangle of the selected xform
pub const POST_HANDLE_INDEX: i32 = -1;

/// One selection member by position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoMember {
    /// Triangle position, or [`POST_HANDLE_INDEX`]
    pub index: i32,
    /// Node role for node selections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
}

impl UndoMember {
    pub fn triangle(index: i32) -> Self {
        Self { index, node: None }
    }

    pub fn node(index: i32, node: NodeId) -> Self {
        Self {
            index,
            node: Some(node),
        }
    }

    pub fn is_post(&self) -> bool {
        self.index == POST_HANDLE_INDEX
    }
}

/// Snapshot of selection and mark, independent of the basis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UndoState {
    /// Selection polygon in abstract coordinates, empty when hidden
    pub selection_rect: Vec<Point>,
    pub selected_type: SelectionType,
    pub members: Vec<UndoMember>,
    /// Coordinate mark centre in abstract coordinates
    pub mark_pos: Point,
}

/// Genome snapshot paired with its selection state
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub genome: Genome,
    pub state: UndoState,
}

/// Bounded undo/redo stacks of checkpoints
///
/// The top of the undo stack is always the current state; undoing moves it
/// to the redo stack and returns the one below.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Checkpoint>,
    redo_stack: Vec<Checkpoint>,
    max_undo_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_depth(100)
    }

    pub fn with_depth(max_undo_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_depth: max_undo_depth.max(1),
        }
    }

    /// Record a new current state; clears the redo stack
    pub fn push(&mut self, checkpoint: Checkpoint) {
        self.redo_stack.clear();
        self.undo_stack.push(checkpoint);
        if self.undo_stack.len() > self.max_undo_depth {
            self.undo_stack.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Step back, returning the checkpoint to restore
    pub fn undo(&mut self) -> Option<&Checkpoint> {
        if !self.can_undo() {
            return None;
        }
        let current = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        self.undo_stack.last()
    }

    /// Step forward, returning the checkpoint to restore
    pub fn redo(&mut self) -> Option<&Checkpoint> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(next);
        self.undo_stack.last()
    }

    pub fn current(&self) -> Option<&Checkpoint> {
        self.undo_stack.last()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoint(n: usize) -> Checkpoint {
        Checkpoint {
            genome: Genome::with_default_xforms(n),
            state: UndoState::default(),
        }
    }

    #[test]
    fn test_undo_redo() {
        let mut history = History::new();
        history.push(checkpoint(1));
        history.push(checkpoint(2));
        history.push(checkpoint(3));

        assert_eq!(history.undo().unwrap().genome.num_xforms(), 2);
        assert_eq!(history.undo().unwrap().genome.num_xforms(), 1);
        assert!(history.undo().is_none());
        assert_eq!(history.redo().unwrap().genome.num_xforms(), 2);
        assert_eq!(history.redo_len(), 1);
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = History::new();
        history.push(checkpoint(1));
        history.push(checkpoint(2));
        history.undo();
        assert!(history.can_redo());
        history.push(checkpoint(5));
        assert!(!history.can_redo());
        assert_eq!(history.current().unwrap().genome.num_xforms(), 5);
    }

    #[test]
    fn test_depth_limit() {
        let mut history = History::with_depth(3);
        for n in 1..=5 {
            history.push(checkpoint(n));
        }
        assert_eq!(history.undo_len(), 3);
        history.undo();
        history.undo();
        assert!(!history.can_undo());
        assert_eq!(history.current().unwrap().genome.num_xforms(), 3);
    }

    #[test]
    fn test_member_serialization() {
        let members = vec![UndoMember::triangle(2), UndoMember::node(POST_HANDLE_INDEX, NodeId::X)];
        let json = serde_json::to_string(&members).unwrap();
        let back: Vec<UndoMember> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, members);
        assert!(back[1].is_post());
    }
}
