//! Key dispatch and in-place line editing.
//!
//! Each key code delivered by the interrupt handler mutates the line
//! under the console lock and issues compensating screen operations,
//! so the rendered cells always equal the editable region `[w, e)`
//! and the hardware cursor always sits on the caret.

use crate::{
    clipboard::Clipboard,
    complete::TabLatch,
    hal::Hal,
    key::{
        CTRL_A, CTRL_C, CTRL_D, CTRL_H, CTRL_P, CTRL_S, CTRL_U, CTRL_V, CTRL_Z, DEL, KEY_LF,
        KEY_RT, is_whitespace,
    },
    line::LineBuffer,
    param::{COLUMNS, ROWS},
    screen::{self, HIGHLIGHT_ATTR, NORMAL_ATTR},
    select::{self, Selection},
    undo::{EditOp, UndoLog},
};

/// Everything the console lock protects.
///
/// Opaque to callers; it exists as a public type so platforms can
/// name the lock that wraps it.
pub struct ConsoleState {
    pub(crate) line: LineBuffer,
    pub(crate) selection: Selection,
    pub(crate) clipboard: Clipboard,
    pub(crate) undo: UndoLog,
    pub(crate) tab: TabLatch,
}

/// What the caller owes after a key is handled: waking blocked
/// readers is done while still holding the lock, dumping tasks after
/// releasing it.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct KeyOutcome {
    pub(crate) wake_readers: bool,
    pub(crate) dump_tasks: bool,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleState {
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
            selection: Selection::Inactive,
            clipboard: Clipboard::new(),
            undo: UndoLog::new(),
            tab: TabLatch::new(),
        }
    }

    /// Handles one key code. Caller holds the console lock.
    pub(crate) fn dispatch<H: Hal>(&mut self, hw: &H, c: u8) -> KeyOutcome {
        let mut out = KeyOutcome::default();

        if c != b'\t' {
            self.tab.reset();
        }

        match c {
            b'\t' => {
                self.deselect_if_any(hw);
                self.complete(hw);
            }
            CTRL_S => self.toggle_selection(hw),
            CTRL_C => self.copy_selection(hw),
            CTRL_V => self.paste(hw),
            CTRL_A => {
                self.deselect_if_any(hw);
                self.caret_word_left(hw);
            }
            CTRL_D => {
                self.deselect_if_any(hw);
                out.wake_readers = self.eof_or_word_right(hw);
            }
            CTRL_P => {
                self.deselect_if_any(hw);
                out.dump_tasks = true;
            }
            CTRL_U => {
                self.deselect_if_any(hw);
                self.kill_line(hw);
            }
            CTRL_H | DEL => self.backspace(hw),
            CTRL_Z => {
                self.deselect_if_any(hw);
                self.undo_last(hw);
            }
            KEY_LF => {
                self.deselect_if_any(hw);
                self.caret_left(hw);
            }
            KEY_RT => {
                self.deselect_if_any(hw);
                self.caret_right(hw);
            }
            0 => {}
            _ => out.wake_readers = self.insert_key(hw, c),
        }

        out
    }

    /// Ordinary byte: insert at the caret, or commit the line when a
    /// newline arrives or the ring fills.
    fn insert_key<H: Hal>(&mut self, hw: &H, c: u8) -> bool {
        let c = if c == b'\r' { b'\n' } else { c };

        if self.selection.is_active() {
            self.delete_selection(hw);
        }

        let mut committed = false;
        if c == b'\n' || !self.line.edit_room() {
            // The slot reserved by `edit_room` means the terminator
            // always fits; a ring packed with unread committed bytes
            // has no room at all and the key is dropped.
            if self.line.ring_room() {
                if c == b'\n' {
                    screen::putc(hw, b'\n');
                }
                self.line.push(b'\n');
                self.line.commit();
                self.undo.clear();
                committed = true;
            }
        } else {
            self.insert_with_undo(hw, c);
        }

        self.clear_selection(hw);
        committed
    }

    /// Inserts `b` at the caret, logs it, and redraws the tail with
    /// the hardware cursor put back on the caret.
    fn insert_with_undo<H: Hal>(&mut self, hw: &H, b: u8) {
        let pos = self.line.c;
        self.undo.push(EditOp::Insert { pos, byte: b });
        self.line.insert(pos, b);
        self.line.c += 1;

        for i in self.line.c - 1..self.line.e {
            screen::putc(hw, self.line.byte(i));
        }
        hw.set_cursor(hw.cursor() - (self.line.e - self.line.c));
    }

    /// Backspace: delete the selection if one is active, else the
    /// byte before the caret.
    fn backspace<H: Hal>(&mut self, hw: &H) {
        if self.selection.is_active() {
            self.delete_selection(hw);
            return;
        }

        if self.line.c > self.line.w {
            let pos = self.line.c - 1;
            self.undo.push(EditOp::Delete {
                pos,
                byte: self.line.byte(pos),
            });

            let line_start = hw.cursor() - (self.line.c - self.line.w);
            self.line.remove_range(pos, pos + 1);
            self.line.c = pos;

            hw.set_cursor(line_start);
            for i in self.line.w..self.line.e {
                screen::putc(hw, self.line.byte(i));
            }
            screen::putc(hw, b' ');
            hw.set_cursor(line_start + (self.line.c - self.line.w));
        }
    }

    /// Ctrl+U: erase the whole editable region.
    fn kill_line<H: Hal>(&mut self, hw: &H) {
        if self.line.e != self.line.w {
            hw.set_cursor(hw.cursor() + (self.line.e - self.line.c));
            self.line.c = self.line.e;
            while self.line.e != self.line.w {
                self.line.e -= 1;
                self.line.c -= 1;
                screen::put_backspace(hw);
            }
        }
        self.line.c = self.line.w;
        self.undo.clear();
    }

    /// Ctrl+D: inject the end-of-file byte and commit when the caret
    /// sits at the end of the line, move a word right otherwise.
    fn eof_or_word_right<H: Hal>(&mut self, hw: &H) -> bool {
        if self.line.c == self.line.e {
            if self.line.ring_room() {
                self.line.push(CTRL_D);
                self.line.commit();
                self.undo.clear();
                return true;
            }
            return false;
        }

        let old = self.line.c;
        let mut p = self.line.c;
        while p < self.line.e && !is_whitespace(self.line.byte(p)) {
            p += 1;
        }
        while p < self.line.e && is_whitespace(self.line.byte(p)) {
            p += 1;
        }
        if p < self.line.e {
            hw.set_cursor(hw.cursor() + (p - old));
            self.line.c = p;
        }
        false
    }

    /// Ctrl+A: move the caret to the start of the previous word.
    fn caret_word_left<H: Hal>(&mut self, hw: &H) {
        if self.line.c > self.line.w {
            let old = self.line.c;
            let mut p = self.line.c - 1;
            while p > self.line.w && is_whitespace(self.line.byte(p)) {
                p -= 1;
            }
            while p > self.line.w && !is_whitespace(self.line.byte(p - 1)) {
                p -= 1;
            }
            self.line.c = p;
            hw.set_cursor(hw.cursor() - (old - p));
        }
    }

    fn caret_left<H: Hal>(&mut self, hw: &H) {
        if self.line.c > self.line.w {
            self.line.c -= 1;
            hw.set_cursor(hw.cursor() - 1);
        }
    }

    fn caret_right<H: Hal>(&mut self, hw: &H) {
        if self.line.c < self.line.e {
            self.line.c += 1;
            hw.set_cursor(hw.cursor() + 1);
        }
    }

    /// Ctrl+S: place a mark at the caret, or close the range started
    /// by the previous mark. Closing on the mark itself is a no-op.
    fn toggle_selection<H: Hal>(&mut self, hw: &H) {
        match self.selection {
            Selection::Marking { anchor } => {
                self.selection = match select::close(anchor, self.line.c) {
                    Some((start, end)) => Selection::Active { start, end },
                    None => Selection::Inactive,
                };
                if let Selection::Active { start, end } = self.selection {
                    self.apply_highlight(hw, start, end, true);
                }
            }
            _ => {
                self.clear_selection(hw);
                self.selection = Selection::Marking {
                    anchor: self.line.c,
                };
            }
        }
    }

    /// Ctrl+C: copy the clamped selection, or clear both the
    /// selection and the clipboard when none is active.
    fn copy_selection<H: Hal>(&mut self, hw: &H) {
        if let Selection::Active { start, end } = self.selection {
            let lo = start.max(self.line.w);
            let hi = end.min(self.line.e);
            self.clipboard.clear();
            for i in lo..hi {
                self.clipboard.push(self.line.byte(i));
            }
        } else {
            self.clear_selection(hw);
            self.clipboard.clear();
        }
    }

    /// Ctrl+V: replace the selection (if any) with the clipboard
    /// contents, inserting byte by byte while room remains.
    fn paste<H: Hal>(&mut self, hw: &H) {
        if !self.clipboard.is_empty() {
            if self.selection.is_active() {
                self.delete_selection(hw);
            }
            for i in 0..self.clipboard.len() {
                if !self.line.edit_room() {
                    break;
                }
                let b = self.clipboard.byte(i);
                self.insert_with_undo(hw, b);
            }
        }
        self.clear_selection(hw);
    }

    /// Removes the clamped selection from the line and redraws,
    /// leaving the caret at the start of the removed range.
    fn delete_selection<H: Hal>(&mut self, hw: &H) {
        let Selection::Active { start, end } = self.selection else {
            return;
        };
        let lo = start.max(self.line.w);
        let hi = end.min(self.line.e);
        if lo >= hi {
            self.clear_selection(hw);
            return;
        }

        // Logged from the highest position down so popping one op at
        // a time re-inserts left to right at still-valid positions.
        for i in (lo..hi).rev() {
            self.undo.push(EditOp::Delete {
                pos: i,
                byte: self.line.byte(i),
            });
        }

        let old_e = self.line.e;
        let old_c = self.line.c;
        let base = (hw.cursor() as isize - (old_c as isize - self.line.w as isize))
            .clamp(0, (ROWS * COLUMNS - 1) as isize) as usize;

        self.line.remove_range(lo, hi);
        self.line.c = lo;

        hw.set_cursor(base);
        for i in self.line.w..self.line.e {
            screen::putc(hw, self.line.byte(i));
        }
        for _ in 0..old_e - self.line.e {
            screen::putc(hw, b' ');
        }
        hw.set_cursor(base + (self.line.c - self.line.w));

        self.clear_selection(hw);
    }

    /// Ctrl+Z: revert the most recent logged edit.
    fn undo_last<H: Hal>(&mut self, hw: &H) {
        let Some(op) = self.undo.pop() else {
            return;
        };
        match op {
            EditOp::Insert { pos, .. } => {
                if pos < self.line.w || pos >= self.line.e {
                    return;
                }
                self.line.remove_range(pos, pos + 1);

                let target =
                    (hw.cursor() as isize - (self.line.c as isize - pos as isize)) as usize;
                hw.set_cursor(target);
                for i in pos..self.line.e {
                    screen::putc(hw, self.line.byte(i));
                }
                screen::putc(hw, b' ');
                hw.set_cursor(hw.cursor() - (self.line.e - pos + 1));

                self.line.c = pos;
            }
            EditOp::Delete { pos, byte } => {
                if pos < self.line.w || pos > self.line.e || !self.line.edit_room() {
                    return;
                }
                let target =
                    (hw.cursor() as isize - (self.line.c as isize - pos as isize)) as usize;
                self.line.insert(pos, byte);

                hw.set_cursor(target);
                for i in pos..self.line.e {
                    screen::putc(hw, self.line.byte(i));
                }
                hw.set_cursor(hw.cursor() - (self.line.e - (pos + 1)));

                self.line.c = pos + 1;
            }
        }
    }

    fn deselect_if_any<H: Hal>(&mut self, hw: &H) {
        if self.selection.is_active() {
            self.clear_selection(hw);
        }
    }

    /// Drops any selection state, removing the highlight of a closed
    /// range.
    fn clear_selection<H: Hal>(&mut self, hw: &H) {
        if let Selection::Active { start, end } = self.selection {
            self.apply_highlight(hw, start, end, false);
        }
        self.selection = Selection::Inactive;
    }

    /// Sets or clears the highlight over the clamped logical range.
    /// The screen cell of `w` is recovered from the hardware cursor
    /// and the caret; cells that fall off screen are skipped.
    fn apply_highlight<H: Hal>(&self, hw: &H, start: usize, end: usize, on: bool) {
        let start = start.max(self.line.w);
        let end = end.min(self.line.e);
        if start >= end {
            return;
        }

        let base = hw.cursor() as isize - (self.line.c - self.line.w) as isize;
        let attr = if on { HIGHLIGHT_ATTR } else { NORMAL_ATTR };
        for i in start..end {
            let pos = base + (i - self.line.w) as isize;
            if pos >= 0 {
                screen::set_cell_attr(hw, pos as usize, attr);
            }
        }
    }
}
