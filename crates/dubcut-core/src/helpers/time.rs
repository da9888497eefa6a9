// crates/dubcut-core/src/helpers/time.rs
//
// Shared time-formatting utilities used by the ruler, the segment list, and
// anywhere else a human-readable timestamp is needed.

/// Format a position in seconds as `MM:SS`.
///
/// Used on the timeline ruler at normal zoom and in the segment list.
///
/// ```
/// use dubcut_core::helpers::time::format_time;
/// assert_eq!(format_time(0.0),    "00:00");
/// assert_eq!(format_time(61.5),   "01:01");
/// assert_eq!(format_time(3599.0), "59:59");
/// ```
pub fn format_time(s: f64) -> String {
    let m  = (s / 60.0) as u32;
    let sc = (s % 60.0) as u32;
    format!("{m:02}:{sc:02}")
}

/// Format a position in seconds as `MM:SS:FF` (frames at 30 fps).
///
/// Used on the ruler at high zoom (≥ 200 px/s) where frame-level precision
/// matters.
///
/// ```
/// use dubcut_core::helpers::time::format_time_frames;
/// assert_eq!(format_time_frames(0.0),  "00:00:00");
/// assert_eq!(format_time_frames(61.5), "01:01:15");
/// ```
pub fn format_time_frames(s: f64) -> String {
    let m  = (s / 60.0) as u32;
    let sc = (s % 60.0) as u32;
    let fr = ((s * 30.0) as u32) % 30;
    format!("{m:02}:{sc:02}:{fr:02}")
}

/// Compact duration for segment rows.
///
/// | Range    | Format | Example |
/// |----------|--------|---------|
/// | ≥ 60 s   | `M:SS` | `3:07`  |
/// | < 60 s   | `S.Xs` | `4.2s`  |
///
/// ```
/// use dubcut_core::helpers::time::format_duration;
/// assert_eq!(format_duration(4.2),   "4.2s");
/// assert_eq!(format_duration(187.0), "3:07");
/// ```
pub fn format_duration(secs: f64) -> String {
    if secs >= 60.0 {
        format!("{}:{:02}", secs as u64 / 60, secs as u64 % 60)
    } else {
        format!("{secs:.1}s")
    }
}
