// crates/dubcut-core/src/lib.rs
//
// Pure review-session model — no egui, no HTTP.
// Serializable via serde. Used by both dubcut-ui and dubcut-api.
//
// To add a new editor concept:
//   1. Create a new module file here
//   2. Add `pub mod mymodule;` below
//   3. Emit a ReviewCommand for it from the UI and handle it in app.rs

pub mod commands;
pub mod coords;
pub mod helpers;
pub mod mixer;
pub mod state;

// Re-export the types that appear in almost every dubcut-ui import list.
pub use coords::TimeCoordinateSpace;
pub use mixer::{TrackAudioMixer, TrackKind};
pub use state::{ReviewState, ReviewTimeline, Segment, SegmentState};
