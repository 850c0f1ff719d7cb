//! The single-line undo log.

use arrayvec::ArrayVec;

use crate::param::UNDO_BUF;

/// One reversible edit, tagged with the logical position it applied
/// at and the byte it moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditOp {
    Insert { pos: usize, byte: u8 },
    Delete { pos: usize, byte: u8 },
}

/// A bounded stack of edits. Best effort: pushes beyond the capacity
/// are dropped, and the whole log dies with the line (commit, kill,
/// completion-listing redraw).
#[derive(Default)]
pub(crate) struct UndoLog {
    ops: ArrayVec<EditOp, UNDO_BUF>,
}

impl UndoLog {
    pub(crate) const fn new() -> Self {
        Self {
            ops: ArrayVec::new_const(),
        }
    }

    pub(crate) fn push(&mut self, op: EditOp) {
        let _ = self.ops.try_push(op);
    }

    pub(crate) fn pop(&mut self) -> Option<EditOp> {
        self.ops.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.ops.clear();
    }
}
