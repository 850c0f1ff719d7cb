//! Console tunables.

/// Input line ring size in bytes.
pub const INPUT_BUF: usize = 128;

/// Clipboard capacity in bytes.
pub const CLIPBOARD_BUF: usize = 128;

/// Undo log capacity in operations.
pub const UNDO_BUF: usize = 128;

/// Text rows on the framebuffer.
pub const ROWS: usize = 25;

/// Text columns on the framebuffer.
pub const COLUMNS: usize = 80;

/// Slots in the device switch.
pub const NDEV: usize = 10;

/// Shell prompt reprinted after a completion listing.
pub const PROMPT: &str = "$ ";
