//! First-word command-name completion.
//!
//! Tab completes the first word of the line against a fixed command
//! table. One press extends by the longest common prefix of the
//! matches; a second consecutive press lists them and reprints the
//! prompt with the line redrawn after it.

use arrayvec::ArrayVec;

use crate::{
    editor::ConsoleState,
    hal::Hal,
    param::{INPUT_BUF, PROMPT},
    screen,
};

/// The command names known at build time.
pub(crate) const COMMANDS: &[&str] = &[
    "cat", "echo", "find_sum", "forktest", "grep", "init", "kill", "ln", "ls", "mkdir", "rm", "sh",
    "stressfs", "usertests", "wc", "zombie", "console",
];

const MAX_MATCHES: usize = COMMANDS.len();

/// Distinguishes a first Tab press from a consecutive one. Any
/// non-Tab key resets it, so disambiguation never acts on stale
/// state.
#[derive(Default)]
pub(crate) struct TabLatch {
    armed: bool,
}

impl TabLatch {
    pub(crate) const fn new() -> Self {
        Self { armed: false }
    }

    pub(crate) fn reset(&mut self) {
        self.armed = false;
    }

    fn arm(&mut self) {
        self.armed = true;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Length of the longest prefix shared by every match.
fn common_prefix_len(matches: &[&str]) -> usize {
    match matches {
        [] => 0,
        [only] => only.len(),
        [first, rest @ ..] => first
            .bytes()
            .enumerate()
            .take_while(|&(i, b)| rest.iter().all(|m| m.as_bytes().get(i) == Some(&b)))
            .count(),
    }
}

impl ConsoleState {
    pub(crate) fn complete<H: Hal>(&mut self, hw: &H) {
        // Completion applies to the first word only.
        for i in self.line.w..self.line.e {
            if self.line.byte(i) == b' ' {
                self.tab.reset();
                return;
            }
        }

        let len = self.line.e - self.line.w;
        if len >= INPUT_BUF {
            self.tab.reset();
            return;
        }
        let mut prefix = ArrayVec::<u8, INPUT_BUF>::new();
        for i in self.line.w..self.line.e {
            prefix.push(self.line.byte(i));
        }

        let mut matches = ArrayVec::<&str, MAX_MATCHES>::new();
        for &cmd in COMMANDS {
            if cmd.as_bytes().starts_with(&prefix) {
                matches.push(cmd);
            }
        }

        if matches.is_empty() {
            self.tab.reset();
            return;
        }

        if let [only] = matches.as_slice() {
            self.append_completion(hw, &only.as_bytes()[len..]);
            self.tab.reset();
            return;
        }

        if self.tab.is_armed() {
            self.list_matches_and_redraw(hw, &matches);
            self.tab.reset();
        } else {
            let lcp = common_prefix_len(&matches);
            if lcp > len {
                let first = matches[0];
                self.append_completion(hw, &first.as_bytes()[len..lcp]);
            }
            self.tab.arm();
        }
    }

    /// Appends and echoes a completion suffix, leaving the caret at
    /// the end of the line.
    fn append_completion<H: Hal>(&mut self, hw: &H, suffix: &[u8]) {
        for &b in suffix {
            if !self.line.edit_room() {
                break;
            }
            self.line.push(b);
            screen::putc(hw, b);
        }
        self.line.c = self.line.e;
    }

    /// Lists the matches on their own row, reprints the prompt, and
    /// redraws the edited line after it with the caret restored.
    fn list_matches_and_redraw<H: Hal>(&mut self, hw: &H, matches: &[&str]) {
        screen::putc(hw, b'\n');
        for m in matches {
            screen::puts(hw, m);
            screen::puts(hw, "  ");
        }
        screen::putc(hw, b'\n');
        screen::puts(hw, PROMPT);

        for i in self.line.w..self.line.e {
            screen::putc(hw, self.line.byte(i));
        }
        hw.set_cursor(hw.cursor() - (self.line.e - self.line.c));

        self.undo.clear();
    }
}
