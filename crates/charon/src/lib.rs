//! Console input and output, to a text framebuffer and serial sink.
//!
//! Reads are line at a time. Implements in-place line editing with
//! these special input characters:
//!
//! * `newline` -- end of line
//! * `control-h` -- backspace
//! * `control-u` -- kill line
//! * `control-d` -- end of file at end of line, word right otherwise
//! * `control-a` -- word left
//! * `control-s` -- mark or close a selection
//! * `control-c` -- copy the selection
//! * `control-v` -- paste
//! * `control-z` -- undo
//! * `control-p` -- print process list
//! * `tab` -- complete a command name
//!
//! The hardware sits behind [`hal::Hal`]; the lock and the channel
//! that blocked readers sleep on sit behind [`sync_api::Mutex`] and
//! [`sync_api::WaitChannel`], so the same console runs under a kernel
//! spinlock or a host mutex and condition variable.

#![cfg_attr(not(test), no_std)]

mod clipboard;
mod complete;
pub mod device;
mod editor;
mod error;
pub mod hal;
pub mod key;
mod line;
pub mod param;
mod screen;
mod select;
mod undo;

use core::fmt::{self, Write as _};

use sync_api::{Mutex, WaitChannel};

use crate::{device::CharDevice, hal::Hal, key::CTRL_D};

pub use crate::{editor::ConsoleState, error::ConsoleError, screen::PANICKED};

/// The console: one editable input line shared between the keyboard
/// interrupt handler and blocking readers.
///
/// `L` guards [`ConsoleState`]; `C` is the channel readers sleep on
/// until the handler commits a line.
pub struct Console<H, L, C>
where
    H: Hal,
    L: Mutex<Data = ConsoleState>,
    C: WaitChannel<L>,
{
    hw: H,
    state: L,
    /// Signaled on every commit.
    written: C,
}

impl<H, L, C> Console<H, L, C>
where
    H: Hal,
    L: Mutex<Data = ConsoleState>,
    C: WaitChannel<L>,
{
    /// Creates a console with zeroed state over the given hardware.
    pub fn new(hw: H) -> Self {
        Self {
            hw,
            state: L::new(ConsoleState::new()),
            written: C::new(),
        }
    }

    /// Brings the device up: unmask the keyboard interrupt line.
    ///
    /// Binding into a [`device::DeviceTable`] is the caller's move,
    /// since the table lives with the file layer.
    pub fn init(&self) {
        self.hw.enable_keyboard();
    }

    /// Handles console input interrupts.
    ///
    /// The keyboard handler calls this with a closure draining the
    /// controller; each key does erase/kill/edit processing, and
    /// readers are woken when a whole line (or end-of-file) arrives.
    /// A requested process dump runs after the lock is released.
    pub fn handle_interrupt<F>(&self, mut getc: F)
    where
        F: FnMut() -> Option<u8>,
    {
        let mut dump = false;

        let mut state = self.state.lock();
        while let Some(c) = getc() {
            let outcome = state.dispatch(&self.hw, c);
            if outcome.wake_readers {
                self.written.wakeup();
            }
            dump |= outcome.dump_tasks;
        }
        drop(state);

        if dump {
            self.hw.dump_tasks();
        }
    }

    /// Copies up to a whole committed line into `dst`, blocking while
    /// none is available.
    ///
    /// Stops after a newline is copied. An end-of-file byte ends the
    /// read without being copied; when bytes were already copied it
    /// is retained so the next read returns 0 by itself. Returns
    /// [`ConsoleError::CallerKilled`] if the process was killed while
    /// waiting.
    pub fn read(&self, dst: &mut [u8]) -> Result<usize, ConsoleError> {
        let mut i = 0;
        let mut state = self.state.lock();
        while i < dst.len() {
            // Wait until the interrupt handler has committed a line.
            while !state.line.has_readable() {
                if self.hw.current_killed() {
                    drop(state);
                    return Err(ConsoleError::CallerKilled);
                }
                state = self.written.sleep(state);
            }

            let c = state.line.take_read_byte();

            if c == CTRL_D {
                // Save the end-of-file byte for next time, so the
                // caller gets a 0-byte result on its own.
                if i > 0 {
                    state.line.put_back_read_byte();
                }
                break;
            }

            dst[i] = c;
            i += 1;

            if c == b'\n' {
                // A whole line has arrived.
                break;
            }
        }
        drop(state);

        Ok(i)
    }

    /// Renders every byte of `src`. User write()s to the console go
    /// here.
    pub fn write(&self, src: &[u8]) -> Result<usize, ConsoleError> {
        let _guard = self.state.lock();
        for &b in src {
            screen::putc(&self.hw, b);
        }
        Ok(src.len())
    }

    /// Formatted output under the console lock, for a kernel to hang
    /// its `print!`/`println!` macros on.
    pub fn print(&self, args: fmt::Arguments<'_>) {
        let _guard = self.state.lock();
        let mut writer = ScreenWriter { hw: &self.hw };
        let _ = writer.write_fmt(args);
    }
}

impl<H, L, C> CharDevice for Console<H, L, C>
where
    H: Hal + Sync,
    L: Mutex<Data = ConsoleState> + Sync,
    C: WaitChannel<L> + Sync,
{
    fn read(&self, dst: &mut [u8]) -> Result<usize, ConsoleError> {
        Console::read(self, dst)
    }

    fn write(&self, src: &[u8]) -> Result<usize, ConsoleError> {
        Console::write(self, src)
    }
}

struct ScreenWriter<'a, H: Hal> {
    hw: &'a H,
}

impl<H: Hal> fmt::Write for ScreenWriter<'_, H> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        screen::puts(self.hw, s);
        Ok(())
    }
}
