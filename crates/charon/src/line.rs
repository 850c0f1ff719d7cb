//! The ring-buffered input line.

use crate::param::INPUT_BUF;

/// The input line, stored in a bounded ring.
///
/// The indices grow without bound and are reduced modulo the ring
/// size only when the backing array is touched:
///
/// * `[r, w)` -- committed bytes awaiting delivery to readers.
/// * `[w, e)` -- the line currently being edited.
/// * `c` -- the caret, always within `[w, e]`.
///
/// `r <= w <= e`, `e - r <= INPUT_BUF`, and edits never reach into
/// `[r, w)`, so the interrupt handler can reorder the editable region
/// while a reader drains the committed one.
pub(crate) struct LineBuffer {
    buf: [u8; INPUT_BUF],
    /// Read index
    pub(crate) r: usize,
    /// Write index
    pub(crate) w: usize,
    /// Edit index
    pub(crate) e: usize,
    /// Caret index
    pub(crate) c: usize,
}

impl LineBuffer {
    pub(crate) const fn new() -> Self {
        Self {
            buf: [0; INPUT_BUF],
            r: 0,
            w: 0,
            e: 0,
            c: 0,
        }
    }

    pub(crate) fn byte(&self, i: usize) -> u8 {
        self.buf[i % INPUT_BUF]
    }

    /// Whether one more byte fits without stealing the slot reserved
    /// for the `\n` that terminates a full line.
    pub(crate) fn edit_room(&self) -> bool {
        self.e - self.r < INPUT_BUF - 1
    }

    /// Whether any slot at all is free, including the reserved one.
    pub(crate) fn ring_room(&self) -> bool {
        self.e - self.r < INPUT_BUF
    }

    /// Appends `b` at the edit index.
    pub(crate) fn push(&mut self, b: u8) {
        debug_assert!(self.e - self.r < INPUT_BUF);
        self.buf[self.e % INPUT_BUF] = b;
        self.e += 1;
    }

    /// Shifts `[pos, e)` right one slot and stores `b` at `pos`.
    pub(crate) fn insert(&mut self, pos: usize, b: u8) {
        debug_assert!(self.e - self.r < INPUT_BUF);
        debug_assert!(self.w <= pos && pos <= self.e);
        let mut j = self.e;
        while j > pos {
            self.buf[j % INPUT_BUF] = self.buf[(j - 1) % INPUT_BUF];
            j -= 1;
        }
        self.buf[pos % INPUT_BUF] = b;
        self.e += 1;
    }

    /// Drops `[lo, hi)`, shifting `[hi, e)` left to close the gap.
    pub(crate) fn remove_range(&mut self, lo: usize, hi: usize) {
        debug_assert!(self.w <= lo && lo <= hi && hi <= self.e);
        let len = hi - lo;
        for i in hi..self.e {
            self.buf[(i - len) % INPUT_BUF] = self.buf[i % INPUT_BUF];
        }
        self.e -= len;
    }

    /// Commits the edited region; bytes in `[r, w)` become readable.
    pub(crate) fn commit(&mut self) {
        self.w = self.e;
        self.c = self.w;
    }

    /// Whether a committed byte is available to readers.
    pub(crate) fn has_readable(&self) -> bool {
        self.r != self.w
    }

    /// Consumes one committed byte.
    pub(crate) fn take_read_byte(&mut self) -> u8 {
        debug_assert!(self.has_readable());
        let b = self.byte(self.r);
        self.r += 1;
        b
    }

    /// Puts the last consumed byte back. The one place an index moves
    /// backwards: retaining an end-of-file byte for the next read.
    pub(crate) fn put_back_read_byte(&mut self) {
        self.r -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_with(bytes: &[u8]) -> LineBuffer {
        let mut line = LineBuffer::new();
        for &b in bytes {
            line.push(b);
        }
        line
    }

    fn edited(line: &LineBuffer) -> Vec<u8> {
        (line.w..line.e).map(|i| line.byte(i)).collect()
    }

    #[test]
    fn test_push_and_commit() {
        let mut line = line_with(b"hi\n");
        assert_eq!(edited(&line), b"hi\n");
        assert!(!line.has_readable());

        line.commit();
        assert!(line.has_readable());
        assert_eq!(line.take_read_byte(), b'h');
        assert_eq!(line.take_read_byte(), b'i');
        assert_eq!(line.take_read_byte(), b'\n');
        assert!(!line.has_readable());
    }

    #[test]
    fn test_insert_shifts_right() {
        let mut line = line_with(b"ac");
        line.insert(1, b'b');
        assert_eq!(edited(&line), b"abc");

        line.insert(0, b'_');
        assert_eq!(edited(&line), b"_abc");

        line.insert(line.e, b'!');
        assert_eq!(edited(&line), b"_abc!");
    }

    #[test]
    fn test_remove_range_shifts_left() {
        let mut line = line_with(b"hello");
        line.remove_range(1, 4);
        assert_eq!(edited(&line), b"ho");

        line.remove_range(0, 0);
        assert_eq!(edited(&line), b"ho");

        line.remove_range(0, 2);
        assert_eq!(edited(&line), b"");
    }

    #[test]
    fn test_indices_wrap_modulo_ring() {
        let mut line = LineBuffer::new();
        // Run several full lines through so the indices pass the ring
        // size while staying coherent.
        for round in 0..5_u8 {
            for i in 0..INPUT_BUF as u8 / 2 {
                line.push(round.wrapping_mul(31).wrapping_add(i));
            }
            line.commit();
            for i in 0..INPUT_BUF as u8 / 2 {
                assert_eq!(line.take_read_byte(), round.wrapping_mul(31).wrapping_add(i));
            }
        }
        assert!(line.e > INPUT_BUF);
        assert_eq!(line.r, line.w);
        assert_eq!(line.w, line.e);
    }

    #[test]
    fn test_edit_room_reserves_commit_slot() {
        let mut line = LineBuffer::new();
        while line.edit_room() {
            line.push(b'x');
        }
        assert_eq!(line.e - line.r, INPUT_BUF - 1);
        // The reserved slot still takes the terminator.
        line.push(b'\n');
        assert_eq!(line.e - line.r, INPUT_BUF);
    }

    #[test]
    fn test_put_back_read_byte() {
        let mut line = line_with(&[4]);
        line.commit();
        assert_eq!(line.take_read_byte(), 4);
        line.put_back_read_byte();
        assert!(line.has_readable());
        assert_eq!(line.take_read_byte(), 4);
    }
}
