//! Text-mode output with serial mirroring.
//!
//! Every byte put through here lands in two places: the serial sink
//! and the framebuffer cell under the hardware cursor. A backspace
//! mirrors as `\b ' ' \b` on serial and blanks the vacated cell on
//! screen. Highlight toggling rewrites attributes only and touches
//! neither the serial sink nor the glyphs.

use core::{
    hint,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    hal::Hal,
    param::{COLUMNS, ROWS},
};

/// Light-on-black, the attribute every put uses.
pub(crate) const NORMAL_ATTR: u16 = 0x0700;
/// Inverse video, the attribute of selected cells.
pub(crate) const HIGHLIGHT_ATTR: u16 = 0x7000;

/// Set by the panic path; freezes all console output so the fatal
/// diagnostics stay on screen.
pub static PANICKED: AtomicBool = AtomicBool::new(false);

fn freeze_if_panicked() {
    if PANICKED.load(Ordering::Relaxed) {
        loop {
            hint::spin_loop();
        }
    }
}

/// Puts one byte at the hardware cursor and advances it.
///
/// `\n` advances to the start of the next row; anything else writes a
/// normal-attribute cell. When the cursor would land on the bottom
/// row, the screen scrolls up one row first.
///
/// # Panics
///
/// Panics if the cursor leaves the framebuffer.
pub(crate) fn putc<H: Hal>(hw: &H, b: u8) {
    freeze_if_panicked();

    hw.serial_put(b);

    let mut pos = hw.cursor();
    if b == b'\n' {
        pos += COLUMNS - pos % COLUMNS;
    } else {
        hw.set_cell(pos, u16::from(b) | NORMAL_ATTR);
        pos += 1;
    }
    assert!(pos <= ROWS * COLUMNS, "hardware cursor left the framebuffer");

    if pos / COLUMNS >= ROWS - 1 {
        // Discard the top row and clear from the cursor down.
        for i in 0..(ROWS - 2) * COLUMNS {
            hw.set_cell(i, hw.cell_at(i + COLUMNS));
        }
        pos -= COLUMNS;
        for i in pos..(ROWS - 1) * COLUMNS {
            hw.set_cell(i, 0);
        }
    }

    hw.set_cursor(pos);
}

/// Erases the cell before the cursor and backs the cursor up.
pub(crate) fn put_backspace<H: Hal>(hw: &H) {
    freeze_if_panicked();

    hw.serial_put(0x08);
    hw.serial_put(b' ');
    hw.serial_put(0x08);

    let mut pos = hw.cursor();
    if pos > 0 {
        pos -= 1;
    }
    hw.set_cursor(pos);
    hw.set_cell(pos, u16::from(b' ') | NORMAL_ATTR);
}

/// Puts every byte of `s`.
pub(crate) fn puts<H: Hal>(hw: &H, s: &str) {
    for b in s.bytes() {
        putc(hw, b);
    }
}

/// Rewrites the attribute of the cell at `pos`, preserving its glyph.
/// Positions outside the framebuffer are silently skipped.
pub(crate) fn set_cell_attr<H: Hal>(hw: &H, pos: usize, attr: u16) {
    if pos < ROWS * COLUMNS {
        let glyph = hw.cell_at(pos) & 0x00ff;
        hw.set_cell(pos, glyph | attr);
    }
}
