// src/batch/report.rs

//! Human-facing report lines.
//!
//! One line per task: pass/fail mark, name, subsystem tag, elapsed time.
//! Failing tasks get their captured output (or remediation hint) printed
//! beneath their line. Colors are applied only when the stream is a TTY.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use crossterm::style::Stylize;

use crate::exec::{ExecutionResult, Task};

fn stdout_is_tty() -> bool {
    io::stdout().is_terminal()
}

fn elapsed_secs(elapsed: Duration) -> String {
    format!("{:.1}", elapsed.as_secs_f64())
}

fn tag_label(tag: Option<&str>, color: bool) -> String {
    match tag {
        Some(tag) => {
            let label = format!(" [{tag}]");
            if color { label.dim().to_string() } else { label }
        }
        None => String::new(),
    }
}

/// Print the result line for one batch task, plus its failure payload.
pub fn print_result(task: &Task, result: &ExecutionResult) {
    let color = stdout_is_tty();
    let tag = tag_label(task.tag.as_deref(), color);
    let elapsed = elapsed_secs(result.elapsed);

    if result.success() {
        let mark = format!("✓ {}", task.name);
        let mark = if color { mark.green().to_string() } else { mark };
        println!("{mark}{tag} ({elapsed}s)");
        return;
    }

    let mark = format!("✗ {}", task.name);
    let mark = if color { mark.red().to_string() } else { mark };
    println!("{mark}{tag} ({elapsed}s)");

    if let Some(hint) = &task.hint {
        let hint = format!("  {hint}");
        let hint = if color { hint.dim().to_string() } else { hint };
        println!("{hint}");
    } else {
        if !result.stdout.is_empty() {
            print!("{}", result.stdout);
        }
        if !result.stderr.is_empty() {
            eprint!("{}", result.stderr);
        }
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
    }
}

/// Print the result line for one sequential step. The output payload is
/// printed only on failure; `run` exits after that.
pub fn print_step_line(name: &str, tag: Option<&str>, exit_code: i32, elapsed: Duration) {
    let color = stdout_is_tty();
    let tag = tag_label(tag, color);
    let elapsed = elapsed_secs(elapsed);

    if exit_code == 0 {
        let mark = format!("✓ {name}");
        let mark = if color { mark.green().to_string() } else { mark };
        println!("{mark}{tag} ({elapsed}s)");
    } else {
        let mark = format!("✗ {name}");
        let mark = if color { mark.red().to_string() } else { mark };
        println!("{mark}{tag} ({elapsed}s)");
    }
}

/// Dump a failed step's captured output verbatim.
pub fn print_step_output(result: &ExecutionResult) {
    if !result.stdout.is_empty() {
        print!("{}", result.stdout);
    }
    if !result.stderr.is_empty() {
        eprint!("{}", result.stderr);
    }
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
}

/// Warn that an expected tool is absent and what gets skipped because of it.
pub fn warn_missing_tool(tool: &str, consequence: &str) {
    let line = format!("⚠ {tool} not found: {consequence}");
    let line = if io::stderr().is_terminal() {
        line.yellow().to_string()
    } else {
        line
    };
    eprintln!("{line}");
}

/// Startup announcement for a supervised dev process.
pub fn announce_start(name: &str) {
    let line = format!("→ Starting {name}...");
    let line = if stdout_is_tty() {
        line.cyan().bold().to_string()
    } else {
        line
    };
    println!("{line}");
}
