//! Spinner styles for the import command.

use indicatif::ProgressStyle;

/// Shown while commits are being replayed; the message carries the
/// `[n/total] <reference> <short id>` counter.
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[33m{spinner}\x1b[0m {wide_msg}")
        .expect("static spinner template")
        .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"])
}

/// Final line once every commit has been saved.
pub fn ok_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[32m✔\x1b[0m {wide_msg}").expect("static ok template")
}

/// Final line when the import aborted; the error itself is reported by `main`.
pub fn err_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[31m✘\x1b[0m {wide_msg}").expect("static err template")
}
