// crates/dubcut-core/src/commands.rs
//
// Every user action in DubCut is expressed as a ReviewCommand.
// Modules emit these; app.rs processes them after the UI pass.
// Adding a new feature = add a variant here + one match arm in app.rs.

use uuid::Uuid;

use crate::mixer::TrackKind;
use crate::state::{CardKind, SegmentState};

#[derive(Debug, Clone)]
pub enum ReviewCommand {
    // ── Playback ─────────────────────────────────────────────────────────────
    /// Clamped to [0, duration] by ReviewState::seek.
    Seek(f64),
    Play,
    Pause,
    Stop,

    // ── View ─────────────────────────────────────────────────────────────────
    SetZoom(f32),
    ZoomIn,
    ZoomOut,
    ToggleSnap,

    // ── Segments ─────────────────────────────────────────────────────────────
    SelectSegment(Option<Uuid>),
    /// Persisted to the backend; local state is patched on confirmation.
    SetSegmentState { id: Uuid, state: SegmentState },
    SetSegmentText  { id: Uuid, translated: String },
    SetSegmentTrim  { id: Uuid, trim_start: Option<f64>, trim_end: Option<f64> },
    KeepAll,
    DropAll,
    ResetAll,
    /// Drop every segment with end ≤ t (whole-segment containment).
    DropBefore(f64),
    /// Drop every segment with start ≥ t.
    DropAfter(f64),

    // ── Video trim ───────────────────────────────────────────────────────────
    /// None keeps the existing value for that end.
    SetVideoTrim { start: Option<f64>, end: Option<f64> },
    ResetTrim,

    // ── Audio tracks ─────────────────────────────────────────────────────────
    SetTrackMuted  { track: TrackKind, muted: bool },
    SetTrackSolo   { track: TrackKind, solo: bool },
    SetTrackVolume { track: TrackKind, volume: f32 },
    /// Fetch the amplitude envelope for a track. De-duplicated against any
    /// in-flight request for the same track by the worker.
    GenerateWaveform(TrackKind),

    // ── Cards ────────────────────────────────────────────────────────────────
    /// Look up a card and show it in the card panel. Supersedes any lookup
    /// already in flight. `force_refresh` bypasses the local card cache.
    OpenCard { kind: CardKind, card_id: String, force_refresh: bool },
    /// Open the card of an existing pin (no lookup — the payload is stored
    /// on the pin itself).
    OpenPinnedCard(Uuid),
    CloseCard,
    /// Pin the card currently shown in the panel to the selected segment at
    /// the playhead. Rejected with a capacity notice at 2 pins per segment.
    PinOpenCard,
    Unpin(Uuid),
    /// Edit a pin's note. The write to the backend is debounced (1.5 s after
    /// the last edit, last-edit-wins).
    SetPinNote { pin_id: Uuid, note: String },

    // ── Misc ─────────────────────────────────────────────────────────────────
    ClearStatus,
    DismissNotice(usize),
    /// Full re-fetch of the timeline from the backend.
    RefreshTimeline,
}
