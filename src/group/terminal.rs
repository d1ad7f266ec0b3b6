// src/group/terminal.rs

//! Shared terminal state restoration.

use std::io::{self, Write};

use crossterm::{cursor, execute, style, terminal};

/// Restore terminal state that child processes might have left altered:
/// colors, cursor visibility, alternate screen buffer, raw input mode.
///
/// Runs unconditionally during teardown, even if no child ever touched the
/// terminal; the supervisor cannot know which sibling did. Every step is
/// best-effort and failures here must not block the rest of teardown.
pub fn restore() {
    let _ = terminal::disable_raw_mode();

    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        style::ResetColor,
        cursor::Show,
        terminal::LeaveAlternateScreen
    );
    let _ = stdout.flush();
}
