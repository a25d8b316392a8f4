//! Log-line helpers for user-supplied and upstream-supplied text.
//!
//! Chat messages and completions are free-form and frequently multi-line; these helpers keep
//! every log record on one line and cap how much of a conversation ends up in the log.

use std::fmt::Write;

/// Default number of characters of user content kept in a log line.
pub const LOG_PREVIEW_CHARS: usize = 120;

/// Escape `s` for single-line logging, keeping at most [`LOG_PREVIEW_CHARS`] characters.
pub fn escape_log(s: &str) -> String {
    escape_log_capped(s, LOG_PREVIEW_CHARS)
}

/// Escape newlines, tabs, backslashes and other control characters, then cap at `max_chars`.
///
/// A truncated preview ends with `…` and the total character count, e.g. `abc… (512 chars)`.
pub fn escape_log_capped(s: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(s.len().min(max_chars * 4) + 16);
    let mut total = 0usize;
    for ch in s.chars() {
        total += 1;
        if total > max_chars {
            continue;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    if total > max_chars {
        let _ = write!(&mut out, "… ({} chars)", total);
    }
    out
}
