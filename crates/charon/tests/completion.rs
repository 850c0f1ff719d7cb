//! Tab completion against the built-in command table.

mod common;

use charon::param::COLUMNS;

use crate::common::{feed, new_console};

fn read_line(console: &common::TestConsole) -> Vec<u8> {
    let mut buf = [0u8; 256];
    let n = console.read(&mut buf).unwrap();
    buf[..n].to_vec()
}

#[test]
fn test_unique_match_completes() {
    let (hw, console) = new_console();
    feed(&console, b"mk\t\n");

    assert_eq!(read_line(&console), b"mkdir\n");
    assert_eq!(hw.row_text(0), "mkdir");
}

#[test]
fn test_two_matches_list_on_a_second_tab() {
    let (hw, console) = new_console();

    // First Tab: find_sum and forktest share no prefix beyond "f",
    // so the line stays put and the latch arms.
    feed(&console, b"f\t");
    assert_eq!(hw.row_text(0), "f");
    assert_eq!(hw.row_text(1), "");

    // Second Tab: list both, reprint the prompt, redraw the line.
    feed(&console, b"\t");
    assert_eq!(hw.row_text(1), "find_sum  forktest");
    assert_eq!(hw.row_text(2), "$ f");
    assert_eq!(hw.cursor_pos(), 2 * COLUMNS + 3);

    // The prefix survived the listing: narrowing it completes.
    feed(&console, b"i\t\n");
    assert_eq!(read_line(&console), b"find_sum\n");
    assert_eq!(hw.row_text(2), "$ find_sum");
}

#[test]
fn test_tab_on_a_second_word_does_nothing() {
    let (hw, console) = new_console();
    feed(&console, b"cat READ\t\n");

    assert_eq!(read_line(&console), b"cat READ\n");
    assert_eq!(hw.row_text(0), "cat READ");
}

#[test]
fn test_tab_with_no_match_does_nothing() {
    let (_hw, console) = new_console();
    feed(&console, b"qq\t\n");

    assert_eq!(read_line(&console), b"qq\n");
}

#[test]
fn test_interleaved_editing_rearms_the_first_tab() {
    let (hw, console) = new_console();
    feed(&console, b"l\t");
    // ln and ls: latch armed. Editing the line resets it, so the
    // next Tab extends again instead of listing.
    feed(&console, b"s\t");

    assert_eq!(hw.row_text(1), "");
    feed(&console, b"\n");
    assert_eq!(read_line(&console), b"ls\n");
}
