// crates/dubcut-ui/src/helpers/log.rs
//
// Unified logging for the UI crate.
//
// In release builds launched from a desktop shortcut there is no console
// attached, so `eprintln!` output is silently discarded. All log calls go to
// a temp file instead so they're visible regardless of launch mode.
//
// File: $TMPDIR/dubcut.log  — append-only, created on first write per session.
//
// Usage:
//   use crate::helpers::log::dlog;
//   dlog("[app] timeline loaded");
//
// Or use the macro for format string convenience:
//   dubcut_log!("[api] progress persisted at {pos:.1}s");

use std::io::Write;

/// Write `msg` to the DubCut log file in the OS temp directory.
/// Never panics — failures are silently ignored (we're already in a fallback path).
pub fn dlog(msg: &str) {
    if let Ok(mut f) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(std::env::temp_dir().join("dubcut.log"))
    {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = writeln!(f, "[{ts}] {msg}");
    }
}

/// Convenience macro — formats like `eprintln!` but routes through `dlog`.
#[macro_export]
macro_rules! dubcut_log {
    ($($arg:tt)*) => {
        $crate::helpers::log::dlog(&format!($($arg)*))
    };
}
