// crates/dubcut-ui/src/context.rs
//
// AppContext owns all runtime handles that are NOT part of the serializable
// review state.  DubCutApp holds one of these plus a ReviewState and the
// module list — nothing else.
//
// Layout:
//   AppContext
//     ├── worker        — backend REST worker + result channel
//     ├── load          — timeline load lifecycle (spinner / error view)
//     ├── waveforms     — per-track normalized envelopes, fetched once
//     ├── open_card     — card panel contents + lookup-in-flight flag
//     ├── note_autosave — 1.5 s debounce for pin-note writes
//     └── mode_poller   — 3 s processing-status poll, runs only while Processing

use std::collections::HashMap;

use dubcut_api::{ApiError, ApiResult, BackendWorker, Debounce, Poller};
use dubcut_core::mixer::TrackKind;
use dubcut_core::state::{CardData, CardKind, ReviewState, TimelineMode};
use eframe::egui;
use uuid::Uuid;

use crate::dubcut_log;

const NOTE_DEBOUNCE: std::time::Duration = std::time::Duration::from_millis(1500);
const MODE_POLL:     std::time::Duration = std::time::Duration::from_secs(3);

/// Timeline load lifecycle. Drives the full-window spinner and error views
/// shown instead of the panels until a timeline is installed.
#[derive(Debug, PartialEq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Backend answered 404 for the timeline id — distinct view with a retry.
    NotFound,
    Failed(String),
}

/// Contents of the card panel. `data` is None while the lookup is in flight.
pub struct OpenCard {
    pub kind:     CardKind,
    pub card_id:  String,
    pub data:     Option<CardData>,
    pub loading:  bool,
    /// Set when the card was opened from (or has just been pinned as) an
    /// existing pin — gates the panel's pin/unpin affordances.
    pub from_pin: Option<Uuid>,
}

// ── AppContext ────────────────────────────────────────────────────────────────

pub struct AppContext {
    pub worker: BackendWorker,

    pub load: LoadState,

    /// Normalized amplitude envelopes keyed by track. Filled by Waveform
    /// results; a missing key means not fetched yet (or fetch in flight —
    /// the worker de-duplicates).
    pub waveforms: HashMap<TrackKind, Vec<f32>>,

    /// Dismissible failure notices, newest last.
    pub notices: Vec<String>,

    pub open_card: Option<OpenCard>,

    /// Pin-note autosave: every SetPinNote re-arms the debounce and replaces
    /// the pending payload, so only the final text after a 1.5 s pause is
    /// written (last-edit-wins).
    pub note_autosave: Debounce,
    pub pending_note:  Option<(Uuid, String)>,

    pub mode_poller: Poller,
}

impl AppContext {
    pub fn new(worker: BackendWorker) -> Self {
        Self {
            worker,
            load:          LoadState::Loading,
            waveforms:     HashMap::new(),
            notices:       Vec::new(),
            open_card:     None,
            note_autosave: Debounce::new(NOTE_DEBOUNCE),
            pending_note:  None,
            mode_poller:   Poller::new(MODE_POLL),
        }
    }

    /// Request envelopes for every track we don't have yet. The worker drops
    /// duplicates for tracks already in flight, so calling this repeatedly
    /// is harmless.
    pub fn request_missing_waveforms(&self) {
        for track in TrackKind::ALL {
            if !self.waveforms.contains_key(&track) {
                self.worker.generate_waveform(track);
            }
        }
    }

    /// Flush any pending note write and stop all background activity.
    /// Called once from on_exit. The flush is best-effort — the request
    /// thread races the shutdown flag, so a note edited in the final 1.5 s
    /// may not land.
    pub fn teardown(&mut self) {
        if let Some((pin_id, note)) = self.pending_note.take() {
            self.note_autosave.cancel();
            self.worker.save_pin_note(pin_id, note);
        }
        self.mode_poller.stop();
        self.worker.shutdown();
    }

    /// Drain the worker result channel and fold everything into state or the
    /// context caches.  Called once per frame from `app::update`, before the
    /// panels draw.
    ///
    /// This is the single translation layer between raw `ApiResult` traffic
    /// and UI-visible state — the timeline, envelopes, pins, and failure
    /// notices all land here.
    pub fn ingest_results(&mut self, state: &mut ReviewState, ctx: &egui::Context) {
        while let Ok(result) = self.worker.rx.try_recv() {
            match result {
                ApiResult::TimelineLoaded(timeline) => {
                    let processing = timeline.mode == TimelineMode::Processing;
                    state.install_timeline(*timeline);
                    self.load = LoadState::Ready;
                    self.request_missing_waveforms();
                    if processing && !self.mode_poller.is_running() {
                        self.mode_poller.start();
                    }
                    ctx.request_repaint();
                }

                ApiResult::Mode(mode) => {
                    let Some(tl) = state.timeline.as_mut() else { continue };
                    if tl.mode == mode {
                        continue;
                    }
                    // Processing → Ready means the segmentation just landed
                    // server-side; re-fetch so the segments appear.
                    if tl.mode == TimelineMode::Processing && mode == TimelineMode::Ready {
                        self.worker.load_timeline();
                    }
                    tl.mode = mode;
                    if mode != TimelineMode::Processing {
                        self.mode_poller.stop();
                    }
                    ctx.request_repaint();
                }

                // Local mirror applied only now, after the server confirmed.
                ApiResult::BulkUpdated { op, updated } => {
                    use dubcut_api::BulkOp;
                    if let Some(tl) = state.timeline.as_mut() {
                        let local = match op {
                            BulkOp::KeepAll       => tl.keep_all(),
                            BulkOp::DropAll       => tl.drop_all(),
                            BulkOp::ResetAll      => tl.reset_all(),
                            BulkOp::DropBefore(t) => tl.drop_before(t),
                            BulkOp::DropAfter(t)  => tl.drop_after(t),
                        };
                        if local as u64 != updated {
                            dubcut_log!(
                                "[app] bulk {} count mismatch: server {updated}, local {local}",
                                op.endpoint()
                            );
                        }
                        state.status = Some(format!("{} {} segments", op.verb(), updated));
                        ctx.request_repaint();
                    }
                }

                ApiResult::SegmentUpdated(seg) => {
                    if let Some(tl) = state.timeline.as_mut() {
                        if let Some(slot) = tl.segment_mut(seg.id) {
                            *slot = *seg;
                            ctx.request_repaint();
                        }
                    }
                }

                ApiResult::TrimUpdated { start, end } => {
                    if apply_trim(state, start, end) {
                        ctx.request_repaint();
                    }
                }

                ApiResult::Waveform { track, peaks } => {
                    self.waveforms.insert(track, peaks);
                    ctx.request_repaint();
                }

                ApiResult::PinCreated(pin) => {
                    if let Some(tl) = state.timeline.as_mut() {
                        let pin_id  = pin.id;
                        let card_id = pin.card_id.clone();
                        if tl.add_pin(*pin) {
                            state.status = Some("Card pinned".into());
                            // Mark the open card as pinned so the panel flips
                            // its pin button to unpin.
                            if let Some(card) = self.open_card.as_mut() {
                                if card.card_id == card_id && card.from_pin.is_none() {
                                    card.from_pin = Some(pin_id);
                                }
                            }
                        } else {
                            dubcut_log!("[app] pin {pin_id} refused locally — cap already reached");
                        }
                        ctx.request_repaint();
                    }
                }

                ApiResult::PinRemoved(pin_id) => {
                    if let Some(tl) = state.timeline.as_mut() {
                        tl.remove_pin(pin_id);
                    }
                    if let Some(card) = self.open_card.as_mut() {
                        if card.from_pin == Some(pin_id) {
                            card.from_pin = None;
                        }
                    }
                    ctx.request_repaint();
                }

                ApiResult::NoteSaved(pin_id) => {
                    dubcut_log!("[api] note saved for pin {pin_id}");
                }

                ApiResult::Card { generation, data } => {
                    // Superseded lookups are dropped without rendering.
                    if generation != self.worker.card_generation() {
                        continue;
                    }
                    if let Some(card) = self.open_card.as_mut() {
                        card.data    = Some(data);
                        card.loading = false;
                        ctx.request_repaint();
                    }
                }

                ApiResult::ProgressSaved(pos) => {
                    dubcut_log!("[api] progress persisted at {pos:.1}s");
                }

                ApiResult::Failed { what, err } => self.handle_failure(state, what, err),
            }
        }
    }

    fn handle_failure(&mut self, state: &mut ReviewState, what: &'static str, err: ApiError) {
        match (what, &err) {
            ("timeline", ApiError::NotFound) => {
                self.load = LoadState::NotFound;
                self.mode_poller.stop();
            }
            ("timeline", _) => {
                // Only fatal while nothing is loaded — a failed background
                // refresh keeps the current view and just posts a notice.
                if state.timeline.is_none() {
                    self.load = LoadState::Failed(err.to_string());
                } else {
                    self.notices.push(format!("timeline refresh: {err}"));
                }
            }
            (_, ApiError::Capacity) => {
                state.status = Some("Pin limit reached (2 per segment)".into());
            }
            (_, ApiError::Cancelled) => {}
            ("card lookup", _) => {
                if let Some(card) = self.open_card.as_mut() {
                    card.loading = false;
                }
                self.notices.push(format!("card lookup: {err}"));
            }
            _ => {
                self.notices.push(format!("{what}: {err}"));
            }
        }
        dubcut_log!("[api] {what} failed: {err}");
    }
}

/// Fold a server-confirmed video trim into state, pulling the playhead back
/// inside the playable window. The window bounds come off the wire, so an
/// inverted pair (end < start) must degrade to the start rather than panic.
fn apply_trim(state: &mut ReviewState, start: f64, end: Option<f64>) -> bool {
    let Some(tl) = state.timeline.as_mut() else { return false };
    tl.video_trim_start = start;
    tl.video_trim_end   = end;
    let playable_end = tl.playable_end().max(start);
    state.current_time = state.current_time.max(start).min(playable_end);
    state.status = Some("Trim updated".into());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use dubcut_core::state::ReviewTimeline;

    fn state_with_timeline() -> ReviewState {
        let mut st = ReviewState::default();
        st.install_timeline(ReviewTimeline {
            id:               Uuid::new_v4(),
            duration:         100.0,
            segments:         Vec::new(),
            video_trim_start: 0.0,
            video_trim_end:   None,
            pinned_cards:     Vec::new(),
            mode:             TimelineMode::Ready,
        });
        st
    }

    #[test]
    fn trim_update_pulls_playhead_into_window() {
        let mut st = state_with_timeline();
        st.current_time = 80.0;
        assert!(apply_trim(&mut st, 10.0, Some(60.0)));
        assert_eq!(st.current_time, 60.0);
        st.current_time = 2.0;
        apply_trim(&mut st, 10.0, Some(60.0));
        assert_eq!(st.current_time, 10.0);
    }

    #[test]
    fn inverted_trim_window_from_server_does_not_panic() {
        // end < start is a malformed payload, not a local state; the playhead
        // degrades to the trim start instead of aborting.
        let mut st = state_with_timeline();
        st.current_time = 30.0;
        assert!(apply_trim(&mut st, 50.0, Some(5.0)));
        assert_eq!(st.current_time, 50.0);
    }

    #[test]
    fn trim_update_without_timeline_is_ignored() {
        let mut st = ReviewState::default();
        assert!(!apply_trim(&mut st, 10.0, None));
        assert!(st.status.is_none());
    }
}
