// crates/dubcut-api/src/types.rs
//
// Types that flow across the channel between dubcut-api and dubcut-ui,
// plus the request payloads the client serializes. No egui.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dubcut_core::mixer::TrackKind;
use dubcut_core::state::{CardData, PinnedCard, ReviewTimeline, Segment, TimelineMode};

use crate::error::ApiError;

/// A bulk segment operation as the backend exposes it. DropBefore/DropAfter
/// carry the cutoff so the local mirror can be applied on confirmation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BulkOp {
    KeepAll,
    DropAll,
    ResetAll,
    DropBefore(f64),
    DropAfter(f64),
}

impl BulkOp {
    /// Path under `segments/`.
    pub fn endpoint(self) -> &'static str {
        match self {
            BulkOp::KeepAll       => "keep-all",
            BulkOp::DropAll       => "drop-all",
            BulkOp::ResetAll      => "reset-all",
            BulkOp::DropBefore(_) => "drop-before",
            BulkOp::DropAfter(_)  => "drop-after",
        }
    }

    /// Status-line verb ("Kept 10 segments").
    pub fn verb(self) -> &'static str {
        match self {
            BulkOp::KeepAll                            => "Kept",
            BulkOp::DropAll                            => "Dropped",
            BulkOp::ResetAll                           => "Reset",
            BulkOp::DropBefore(_) | BulkOp::DropAfter(_) => "Dropped",
        }
    }
}

/// Results sent from BackendWorker threads to the UI.
pub enum ApiResult {
    TimelineLoaded(Box<ReviewTimeline>),
    /// Processing-status poll result.
    Mode(TimelineMode),
    /// Server confirmed a bulk op and reported the affected count.
    BulkUpdated { op: BulkOp, updated: u64 },
    /// Server confirmed a per-segment edit and returned the segment.
    SegmentUpdated(Box<Segment>),
    /// Server-confirmed video trim state.
    TrimUpdated { start: f64, end: Option<f64> },
    /// Normalized amplitude envelope, [0, 1], fixed resolution.
    Waveform { track: TrackKind, peaks: Vec<f32> },
    PinCreated(Box<PinnedCard>),
    PinRemoved(Uuid),
    NoteSaved(Uuid),
    /// Card lookup result, stamped with the generation it was issued under.
    /// Ingest drops it when a newer generation exists.
    Card { generation: u64, data: CardData },
    ProgressSaved(f64),
    /// Any failed request, tagged with what was being attempted.
    Failed { what: &'static str, err: ApiError },
}

// ── Wire payloads ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdatedCount {
    pub updated: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimState {
    #[serde(default)]
    pub video_trim_start: f64,
    #[serde(default)]
    pub video_trim_end:   Option<f64>,
}

/// Body of `POST pin`. Flattening CardData contributes the `cardType` and
/// `cardData` keys the backend expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRequest {
    #[serde(flatten)]
    pub card:          CardData,
    pub card_id:       String,
    pub segment_id:    Uuid,
    pub timestamp:     f64,
    pub display_start: f64,
    pub display_end:   f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_request_carries_discriminant() {
        let req = PinRequest {
            card: CardData::Idiom {
                phrase:  "break the ice".into(),
                meaning: "ease initial tension".into(),
            },
            card_id:       "i-42".into(),
            segment_id:    Uuid::new_v4(),
            timestamp:     12.4,
            display_start: 11.4,
            display_end:   13.4,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["cardType"], "idiom");
        assert_eq!(json["cardData"]["phrase"], "break the ice");
        assert!(json["segmentId"].is_string());
    }

    #[test]
    fn bulk_endpoints() {
        assert_eq!(BulkOp::KeepAll.endpoint(), "keep-all");
        assert_eq!(BulkOp::DropBefore(5.0).endpoint(), "drop-before");
    }
}
