// crates/dubcut-core/src/state.rs
// Pure review data — no egui, no HTTP, no runtime handles.
// Serializable via serde with the backend's camelCase field names, so the
// same structs double as wire payloads in dubcut-api.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coords::TimeCoordinateSpace;
use crate::mixer::TrackAudioMixer;

/// Per-segment pin cap. The backend enforces this with HTTP 409; the UI
/// checks it locally too so the common case never round-trips just to fail.
pub const MAX_PINS_PER_SEGMENT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentState {
    Keep,
    Drop,
    Undecided,
}

/// One machine-generated speech segment. Created server-side during
/// processing; never deleted locally, only reset to `Undecided`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id:              Uuid,
    /// Seconds. Invariant: start < end.
    pub start:           f64,
    pub end:             f64,
    pub source_text:     String,
    pub translated_text: String,
    pub state:           SegmentState,
    /// Optional per-segment trim, within [start, end].
    #[serde(default)]
    pub trim_start:      Option<f64>,
    #[serde(default)]
    pub trim_end:        Option<f64>,
}

impl Segment {
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Word,
    Entity,
    Idiom,
    Insight,
}

impl CardKind {
    /// Path component in the card-lookup URL.
    pub fn as_str(self) -> &'static str {
        match self {
            CardKind::Word    => "word",
            CardKind::Entity  => "entity",
            CardKind::Idiom   => "idiom",
            CardKind::Insight => "insight",
        }
    }
}

/// Card payload — a tagged sum over the closed set of card shapes, dispatched
/// by the `cardType` discriminant the backend sends. Never guessed structurally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cardType", content = "cardData", rename_all = "lowercase")]
pub enum CardData {
    Word {
        term:       String,
        #[serde(default)]
        reading:    Option<String>,
        definition: String,
    },
    Entity {
        name:    String,
        summary: String,
    },
    Idiom {
        phrase:  String,
        meaning: String,
    },
    Insight {
        title: String,
        body:  String,
    },
}

impl CardData {
    pub fn kind(&self) -> CardKind {
        match self {
            CardData::Word { .. }    => CardKind::Word,
            CardData::Entity { .. }  => CardKind::Entity,
            CardData::Idiom { .. }   => CardKind::Idiom,
            CardData::Insight { .. } => CardKind::Insight,
        }
    }

    /// Headline string for markers and the card panel title.
    pub fn title(&self) -> &str {
        match self {
            CardData::Word { term, .. }     => term,
            CardData::Entity { name, .. }   => name,
            CardData::Idiom { phrase, .. }  => phrase,
            CardData::Insight { title, .. } => title,
        }
    }

    /// Body string shown under the title.
    pub fn body(&self) -> &str {
        match self {
            CardData::Word { definition, .. } => definition,
            CardData::Entity { summary, .. }  => summary,
            CardData::Idiom { meaning, .. }   => meaning,
            CardData::Insight { body, .. }    => body,
        }
    }
}

/// A card pinned to a segment. `timestamp` is the anchor instant; the
/// `[display_start, display_end]` window is what the marker lane renders,
/// and may be wider than the instant for on-screen presence.
/// Invariant: display_start ≤ timestamp ≤ display_end.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedCard {
    pub id:            Uuid,
    #[serde(flatten)]
    pub card:          CardData,
    /// Backend identifier of the dictionary entry this pin references.
    pub card_id:       String,
    pub segment_id:    Uuid,
    pub timestamp:     f64,
    pub display_start: f64,
    pub display_end:   f64,
    #[serde(default)]
    pub note:          Option<String>,
}

/// Processing status reported by the backend. Polled while `Processing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineMode {
    Processing,
    Ready,
    Failed,
}

impl Default for TimelineMode {
    fn default() -> Self { TimelineMode::Ready }
}

/// The reviewable timeline as the backend owns it.
/// Invariant: 0 ≤ video_trim_start ≤ (video_trim_end ?? duration) ≤ duration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewTimeline {
    pub id:               Uuid,
    pub duration:         f64,
    pub segments:         Vec<Segment>,
    #[serde(default)]
    pub video_trim_start: f64,
    #[serde(default)]
    pub video_trim_end:   Option<f64>,
    #[serde(default)]
    pub pinned_cards:     Vec<PinnedCard>,
    #[serde(default)]
    pub mode:             TimelineMode,
}

impl ReviewTimeline {
    pub fn segment(&self, id: Uuid) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn segment_mut(&mut self, id: Uuid) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|s| s.id == id)
    }

    /// End of the playable range: the trim end when set, else full duration.
    pub fn playable_end(&self) -> f64 {
        self.video_trim_end.unwrap_or(self.duration)
    }

    pub fn pin_count(&self, segment_id: Uuid) -> usize {
        self.pinned_cards.iter().filter(|p| p.segment_id == segment_id).count()
    }

    pub fn can_pin(&self, segment_id: Uuid) -> bool {
        self.pin_count(segment_id) < MAX_PINS_PER_SEGMENT
    }

    // ── Local mirrors of server-confirmed mutations ───────────────────────────
    // Applied only AFTER the backend reports success; app.rs never calls them
    // optimistically. Each returns the count changed so it can be checked
    // against the server-reported `updated`.

    pub fn keep_all(&mut self) -> usize {
        self.set_all(SegmentState::Keep)
    }

    pub fn drop_all(&mut self) -> usize {
        self.set_all(SegmentState::Drop)
    }

    pub fn reset_all(&mut self) -> usize {
        self.set_all(SegmentState::Undecided)
    }

    fn set_all(&mut self, state: SegmentState) -> usize {
        for s in &mut self.segments {
            s.state = state;
        }
        self.segments.len()
    }

    /// Drop every segment wholly before `t` (end ≤ t). A segment straddling
    /// the cutoff is left untouched — strict whole-segment containment, no
    /// splitting or partial trim.
    pub fn drop_before(&mut self, t: f64) -> usize {
        let mut n = 0;
        for s in &mut self.segments {
            if s.end <= t {
                s.state = SegmentState::Drop;
                n += 1;
            }
        }
        n
    }

    /// Drop every segment wholly after `t` (start ≥ t).
    pub fn drop_after(&mut self, t: f64) -> usize {
        let mut n = 0;
        for s in &mut self.segments {
            if s.start >= t {
                s.state = SegmentState::Drop;
                n += 1;
            }
        }
        n
    }

    /// Set the playable video range. `None` keeps the existing value; both
    /// ends are clamped so the trim invariant always holds. Orthogonal to
    /// segment keep/drop state.
    pub fn set_video_trim(&mut self, start: Option<f64>, end: Option<f64>) {
        if let Some(s) = start {
            self.video_trim_start = s.clamp(0.0, self.playable_end());
        }
        if let Some(e) = end {
            self.video_trim_end = Some(e.clamp(self.video_trim_start, self.duration));
        }
    }

    pub fn reset_trim(&mut self) {
        self.video_trim_start = 0.0;
        self.video_trim_end   = None;
    }

    /// Local pin insert — refused when the cap is already reached so state
    /// stays unchanged even if a stray 2xx slips past the server-side check.
    pub fn add_pin(&mut self, pin: PinnedCard) -> bool {
        if !self.can_pin(pin.segment_id) {
            return false;
        }
        self.pinned_cards.push(pin);
        true
    }

    pub fn remove_pin(&mut self, pin_id: Uuid) {
        self.pinned_cards.retain(|p| p.id != pin_id);
    }

    pub fn set_pin_note(&mut self, pin_id: Uuid, note: Option<String>) {
        if let Some(pin) = self.pinned_cards.iter_mut().find(|p| p.id == pin_id) {
            pin.note = note;
        }
    }

    /// Per-segment trim, clamped into the segment's own interval.
    pub fn set_segment_trim(&mut self, id: Uuid, trim_start: Option<f64>, trim_end: Option<f64>) {
        if let Some(s) = self.segment_mut(id) {
            s.trim_start = trim_start.map(|t| t.clamp(s.start, s.end));
            s.trim_end   = trim_end.map(|t| t.clamp(s.start, s.end));
        }
    }
}

// ── ReviewState ───────────────────────────────────────────────────────────────

/// Everything the UI reads each frame. One instance owned by the app;
/// modules receive it immutably and emit ReviewCommands.
///
/// Runtime-only fields are `#[serde(skip)]` — the coordinate space (zoom is
/// ephemeral by design) and the mixer never survive a session, and the
/// timeline itself is re-fetched from the backend on launch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewState {
    #[serde(skip)]
    pub timeline:         Option<ReviewTimeline>,
    pub current_time:     f64,
    #[serde(skip)]
    pub is_playing:       bool,
    pub selected_segment: Option<Uuid>,
    #[serde(skip)]
    pub coords:           TimeCoordinateSpace,
    #[serde(skip)]
    pub mixer:            TrackAudioMixer,
    /// Transient status line (bulk-op confirmations, pin-cap notices).
    /// Auto-cleared after 3 s by the timeline module.
    #[serde(skip)]
    pub status:           Option<String>,
    /// Last playhead position persisted to the backend. A new write fires
    /// only once current_time has advanced ≥ 10 s past this.
    #[serde(skip)]
    pub last_persisted_time: f64,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            timeline:            None,
            current_time:        0.0,
            is_playing:          false,
            selected_segment:    None,
            coords:              TimeCoordinateSpace::default(),
            mixer:               TrackAudioMixer::default(),
            status:              None,
            last_persisted_time: 0.0,
        }
    }
}

impl ReviewState {
    pub fn duration(&self) -> f64 {
        self.timeline.as_ref().map(|t| t.duration).unwrap_or(0.0)
    }

    /// Clamp-and-set the playhead. Seeks outside [0, duration] are absorbed
    /// here, never surfaced as errors.
    pub fn seek(&mut self, t: f64) {
        self.current_time = t.clamp(0.0, self.duration());
    }

    /// Install a freshly fetched timeline and re-derive the coordinate-space
    /// duration from it. Zoom and scroll are preserved across refreshes so a
    /// background re-fetch doesn't yank the view.
    pub fn install_timeline(&mut self, timeline: ReviewTimeline) {
        self.coords.duration = timeline.duration;
        self.current_time    = self.current_time.clamp(0.0, timeline.duration);
        self.timeline        = Some(timeline);
    }

    pub fn selected(&self) -> Option<&Segment> {
        let tl = self.timeline.as_ref()?;
        self.selected_segment.and_then(|id| tl.segment(id))
    }

    /// The segment currently under the playhead, if any.
    pub fn segment_at_playhead(&self) -> Option<&Segment> {
        let tl = self.timeline.as_ref()?;
        tl.segments.iter().find(|s| s.contains(self.current_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, state: SegmentState) -> Segment {
        Segment {
            id:              Uuid::new_v4(),
            start,
            end,
            source_text:     String::new(),
            translated_text: String::new(),
            state,
            trim_start:      None,
            trim_end:        None,
        }
    }

    fn timeline(segments: Vec<Segment>) -> ReviewTimeline {
        ReviewTimeline {
            id:               Uuid::new_v4(),
            duration:         120.0,
            segments,
            video_trim_start: 0.0,
            video_trim_end:   None,
            pinned_cards:     Vec::new(),
            mode:             TimelineMode::Ready,
        }
    }

    fn word_pin(segment_id: Uuid, timestamp: f64) -> PinnedCard {
        PinnedCard {
            id: Uuid::new_v4(),
            card: CardData::Word {
                term:       "hello".into(),
                reading:    None,
                definition: "greeting".into(),
            },
            card_id:       "w-hello".into(),
            segment_id,
            timestamp,
            display_start: timestamp - 1.0,
            display_end:   timestamp + 1.0,
            note:          None,
        }
    }

    #[test]
    fn keep_all_counts_every_segment() {
        let mut tl = timeline(vec![
            seg(0.0, 1.0, SegmentState::Drop),
            seg(1.0, 2.0, SegmentState::Undecided),
            seg(2.0, 3.0, SegmentState::Keep),
        ]);
        assert_eq!(tl.keep_all(), 3);
        assert!(tl.segments.iter().all(|s| s.state == SegmentState::Keep));
    }

    #[test]
    fn drop_before_uses_strict_containment() {
        // Segment straddling t=5 (4..6) must be untouched.
        let mut tl = timeline(vec![
            seg(0.0, 2.0, SegmentState::Keep),
            seg(2.0, 5.0, SegmentState::Undecided),
            seg(4.0, 6.0, SegmentState::Keep),
            seg(6.0, 8.0, SegmentState::Undecided),
        ]);
        assert_eq!(tl.drop_before(5.0), 2);
        assert_eq!(tl.segments[0].state, SegmentState::Drop);
        assert_eq!(tl.segments[1].state, SegmentState::Drop); // end == t counts
        assert_eq!(tl.segments[2].state, SegmentState::Keep);
        assert_eq!(tl.segments[3].state, SegmentState::Undecided);
    }

    #[test]
    fn drop_after_uses_strict_containment() {
        let mut tl = timeline(vec![
            seg(0.0, 2.0, SegmentState::Keep),
            seg(4.0, 6.0, SegmentState::Keep),
            seg(5.0, 7.0, SegmentState::Undecided),
        ]);
        assert_eq!(tl.drop_after(5.0), 1);
        assert_eq!(tl.segments[0].state, SegmentState::Keep);
        assert_eq!(tl.segments[1].state, SegmentState::Keep); // straddles, untouched
        assert_eq!(tl.segments[2].state, SegmentState::Drop); // start == t counts
    }

    #[test]
    fn drop_before_leaves_trim_untouched() {
        let mut tl = timeline(vec![seg(0.0, 2.0, SegmentState::Keep)]);
        let id = tl.segments[0].id;
        tl.set_segment_trim(id, Some(0.5), Some(1.5));
        tl.drop_before(3.0);
        assert_eq!(tl.segments[0].trim_start, Some(0.5));
        assert_eq!(tl.segments[0].trim_end, Some(1.5));
    }

    #[test]
    fn reset_trim_is_idempotent() {
        let mut tl = timeline(vec![]);
        tl.set_video_trim(Some(10.0), Some(90.0));
        tl.reset_trim();
        assert_eq!(tl.video_trim_start, 0.0);
        assert_eq!(tl.video_trim_end, None);
        tl.reset_trim();
        assert_eq!(tl.video_trim_start, 0.0);
        assert_eq!(tl.video_trim_end, None);
    }

    #[test]
    fn video_trim_keeps_omitted_end() {
        let mut tl = timeline(vec![]);
        tl.set_video_trim(Some(10.0), Some(90.0));
        tl.set_video_trim(Some(20.0), None);
        assert_eq!(tl.video_trim_start, 20.0);
        assert_eq!(tl.video_trim_end, Some(90.0));
    }

    #[test]
    fn video_trim_invariant_holds_under_bad_input() {
        let mut tl = timeline(vec![]);
        tl.set_video_trim(Some(-5.0), Some(500.0));
        assert_eq!(tl.video_trim_start, 0.0);
        assert_eq!(tl.video_trim_end, Some(120.0));
        tl.set_video_trim(Some(80.0), Some(40.0));
        // end clamps up to start, never below
        assert!(tl.video_trim_start <= tl.video_trim_end.unwrap());
    }

    #[test]
    fn third_pin_on_same_segment_is_refused() {
        let mut tl = timeline(vec![seg(10.0, 14.0, SegmentState::Keep)]);
        let sid = tl.segments[0].id;
        assert!(tl.add_pin(word_pin(sid, 12.4)));
        assert!(tl.add_pin(word_pin(sid, 13.0)));
        assert!(!tl.add_pin(word_pin(sid, 13.5)));
        assert_eq!(tl.pin_count(sid), 2);
    }

    #[test]
    fn seek_clamps_to_duration() {
        let mut st = ReviewState::default();
        st.install_timeline(timeline(vec![]));
        st.seek(999.0);
        assert_eq!(st.current_time, 120.0);
        st.seek(-3.0);
        assert_eq!(st.current_time, 0.0);
    }

    #[test]
    fn pinned_card_wire_shape_round_trips() {
        let pin = word_pin(Uuid::new_v4(), 12.4);
        let json = serde_json::to_value(&pin).unwrap();
        assert_eq!(json["cardType"], "word");
        assert_eq!(json["cardData"]["term"], "hello");
        assert!(json["displayStart"].is_number());
        let back: PinnedCard = serde_json::from_value(json).unwrap();
        assert_eq!(back.card, pin.card);
    }

    #[test]
    fn card_payload_dispatches_on_discriminant() {
        let entity: CardData = serde_json::from_str(
            r#"{"cardType":"entity","cardData":{"name":"Kyoto","summary":"City in Japan"}}"#,
        )
        .unwrap();
        assert_eq!(entity.kind(), CardKind::Entity);
        assert_eq!(entity.title(), "Kyoto");
    }
}
