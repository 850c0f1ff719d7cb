//! Mock hardware shared by the integration tests.
//!
//! The harness plays the interrupt handler's role by feeding key
//! codes through `Console::handle_interrupt`; the mock records what
//! reaches the framebuffer, the CRT cursor register, and the serial
//! sink.
#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use charon::{
    Console, ConsoleState,
    hal::Hal,
    param::{COLUMNS, ROWS},
};
use sync_api::CondvarChannel;

pub type TestConsole = Console<MockHal, Mutex<ConsoleState>, CondvarChannel>;

#[derive(Clone)]
pub struct MockHal {
    cells: Arc<Mutex<Vec<u16>>>,
    cursor: Arc<AtomicUsize>,
    serial: Arc<Mutex<Vec<u8>>>,
    killed: Arc<AtomicBool>,
    dumps: Arc<AtomicUsize>,
    keyboard_on: Arc<AtomicBool>,
}

impl MockHal {
    pub fn new() -> Self {
        Self {
            cells: Arc::new(Mutex::new(vec![0; ROWS * COLUMNS])),
            cursor: Arc::new(AtomicUsize::new(0)),
            serial: Arc::new(Mutex::new(Vec::new())),
            killed: Arc::new(AtomicBool::new(false)),
            dumps: Arc::new(AtomicUsize::new(0)),
            keyboard_on: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The glyphs of one row, with trailing blanks trimmed.
    pub fn row_text(&self, row: usize) -> String {
        let cells = self.cells.lock().unwrap();
        let text: String = cells[row * COLUMNS..(row + 1) * COLUMNS]
            .iter()
            .map(|&cell| match (cell & 0xff) as u8 {
                0 => ' ',
                b => b as char,
            })
            .collect();
        text.trim_end().to_string()
    }

    pub fn attr_at(&self, pos: usize) -> u16 {
        self.cells.lock().unwrap()[pos] & 0xff00
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    pub fn serial_bytes(&self) -> Vec<u8> {
        self.serial.lock().unwrap().clone()
    }

    pub fn set_killed(&self, killed: bool) {
        self.killed.store(killed, Ordering::SeqCst);
    }

    pub fn dump_count(&self) -> usize {
        self.dumps.load(Ordering::SeqCst)
    }

    pub fn keyboard_enabled(&self) -> bool {
        self.keyboard_on.load(Ordering::SeqCst)
    }
}

impl Hal for MockHal {
    fn cell_at(&self, pos: usize) -> u16 {
        self.cells.lock().unwrap()[pos]
    }

    fn set_cell(&self, pos: usize, cell: u16) {
        self.cells.lock().unwrap()[pos] = cell;
    }

    fn cursor(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    fn set_cursor(&self, pos: usize) {
        self.cursor.store(pos, Ordering::SeqCst);
    }

    fn serial_put(&self, b: u8) {
        self.serial.lock().unwrap().push(b);
    }

    fn current_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }

    fn dump_tasks(&self) {
        self.dumps.fetch_add(1, Ordering::SeqCst);
    }

    fn enable_keyboard(&self) {
        self.keyboard_on.store(true, Ordering::SeqCst);
    }
}

/// A console over fresh mock hardware, with a handle kept for
/// inspection.
pub fn new_console() -> (MockHal, TestConsole) {
    let hw = MockHal::new();
    let console = Console::new(hw.clone());
    (hw, console)
}

/// Delivers key codes the way the keyboard handler would.
pub fn feed(console: &TestConsole, bytes: &[u8]) {
    let mut keys = bytes.iter().copied();
    console.handle_interrupt(|| keys.next());
}
