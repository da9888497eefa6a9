// crates/dubcut-api/src/client.rs
//
// Blocking REST client against the dubbing backend. One Agent shared by all
// worker threads; every method is a single request/response pair returning
// the error taxonomy in error.rs. No retries here — the retry policy (never
// automatic for mutations) lives with the UI.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;

use dubcut_core::mixer::TrackKind;
use dubcut_core::state::{
    CardData, CardKind, PinnedCard, ReviewTimeline, Segment, SegmentState, TimelineMode,
};

use crate::error::ApiError;
use crate::types::{PinRequest, TrimState, UpdatedCount};

const DEFAULT_BACKEND:  &str = "http://127.0.0.1:8787/api";
const DEFAULT_TIMELINE: &str = "demo";

pub struct BackendClient {
    agent:       ureq::Agent,
    base:        String,
    timeline_id: String,
}

impl BackendClient {
    /// Base URL from `DUBCUT_BACKEND`, timeline id from `DUBCUT_TIMELINE`,
    /// local-dev defaults otherwise.
    pub fn from_env() -> Self {
        let base = std::env::var("DUBCUT_BACKEND")
            .unwrap_or_else(|_| DEFAULT_BACKEND.to_string());
        let timeline_id = std::env::var("DUBCUT_TIMELINE")
            .unwrap_or_else(|_| DEFAULT_TIMELINE.to_string());
        Self::new(base, timeline_id)
    }

    pub fn new(base: impl Into<String>, timeline_id: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(15))
            .build();
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { agent, base, timeline_id: timeline_id.into() }
    }

    pub fn timeline_id(&self) -> &str {
        &self.timeline_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}/timeline/{}/{}", self.base, self.timeline_id, path)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let resp = self.agent.get(url).call()?;
        Ok(resp.into_json::<T>()?)
    }

    // ── Timeline ─────────────────────────────────────────────────────────────

    pub fn fetch_timeline(&self) -> Result<ReviewTimeline, ApiError> {
        self.get_json(&format!("{}/timeline/{}", self.base, self.timeline_id))
    }

    /// Cheap status poll — deserializes only the `mode` field out of the
    /// timeline payload.
    pub fn fetch_mode(&self) -> Result<TimelineMode, ApiError> {
        #[derive(serde::Deserialize)]
        struct ModeProbe {
            #[serde(default)]
            mode: TimelineMode,
        }
        let probe: ModeProbe =
            self.get_json(&format!("{}/timeline/{}", self.base, self.timeline_id))?;
        Ok(probe.mode)
    }

    /// Persist the playhead position. Callers debounce by distance (≥ 10 s
    /// advanced) before invoking this.
    pub fn save_progress(&self, position: f64) -> Result<(), ApiError> {
        self.agent
            .put(&self.url("progress"))
            .send_json(json!({ "position": position }))?;
        Ok(())
    }

    // ── Segments ─────────────────────────────────────────────────────────────

    /// Run a bulk op and return the server-reported affected count.
    pub fn bulk(&self, op: crate::types::BulkOp) -> Result<u64, ApiError> {
        use crate::types::BulkOp;
        let url = self.url(&format!("segments/{}", op.endpoint()));
        let resp = match op {
            BulkOp::DropBefore(t) | BulkOp::DropAfter(t) => {
                self.agent.post(&url).send_json(json!({ "t": t }))?
            }
            _ => self.agent.post(&url).send_json(json!({}))?,
        };
        let count: UpdatedCount = resp.into_json()?;
        Ok(count.updated)
    }

    pub fn set_segment_state(
        &self,
        id: uuid::Uuid,
        state: SegmentState,
    ) -> Result<Segment, ApiError> {
        let resp = self
            .agent
            .post(&self.url(&format!("segments/{id}/state")))
            .send_json(json!({ "state": state }))?;
        Ok(resp.into_json()?)
    }

    pub fn set_segment_text(
        &self,
        id: uuid::Uuid,
        translated: &str,
    ) -> Result<Segment, ApiError> {
        let resp = self
            .agent
            .post(&self.url(&format!("segments/{id}/text")))
            .send_json(json!({ "translatedText": translated }))?;
        Ok(resp.into_json()?)
    }

    pub fn set_segment_trim(
        &self,
        id: uuid::Uuid,
        trim_start: Option<f64>,
        trim_end: Option<f64>,
    ) -> Result<Segment, ApiError> {
        let resp = self
            .agent
            .post(&self.url(&format!("segments/{id}/trim")))
            .send_json(json!({ "trimStart": trim_start, "trimEnd": trim_end }))?;
        Ok(resp.into_json()?)
    }

    // ── Video trim ───────────────────────────────────────────────────────────

    /// Omitted fields keep their server-side value.
    pub fn set_trim(
        &self,
        start: Option<f64>,
        end: Option<f64>,
    ) -> Result<TrimState, ApiError> {
        let mut body = serde_json::Map::new();
        if let Some(s) = start {
            body.insert("start".into(), json!(s));
        }
        if let Some(e) = end {
            body.insert("end".into(), json!(e));
        }
        let resp = self
            .agent
            .post(&self.url("trim/set"))
            .send_json(serde_json::Value::Object(body))?;
        Ok(resp.into_json()?)
    }

    pub fn reset_trim(&self) -> Result<TrimState, ApiError> {
        let resp = self.agent.post(&self.url("trim/reset")).send_json(json!({}))?;
        Ok(resp.into_json()?)
    }

    // ── Waveforms ────────────────────────────────────────────────────────────

    /// Raw amplitude envelope for one track. Normalization to the fixed
    /// column count happens in waveform.rs on the worker thread.
    pub fn fetch_waveform(&self, track: TrackKind) -> Result<Vec<f32>, ApiError> {
        let resp = self
            .agent
            .get(&self.url("waveform"))
            .query("track", track.as_str())
            .call()?;
        Ok(resp.into_json()?)
    }

    // ── Pins ─────────────────────────────────────────────────────────────────

    /// Fails with ApiError::Capacity (HTTP 409) at the per-segment cap.
    pub fn create_pin(&self, req: &PinRequest) -> Result<PinnedCard, ApiError> {
        let resp = self.agent.post(&self.url("pin")).send_json(req)?;
        Ok(resp.into_json()?)
    }

    pub fn remove_pin(&self, pin_id: uuid::Uuid) -> Result<(), ApiError> {
        self.agent.delete(&self.url(&format!("unpin/{pin_id}"))).call()?;
        Ok(())
    }

    pub fn save_pin_note(&self, pin_id: uuid::Uuid, note: &str) -> Result<(), ApiError> {
        self.agent
            .request("PATCH", &self.url(&format!("pin/{pin_id}/note")))
            .send_json(json!({ "note": note }))?;
        Ok(())
    }

    // ── Card lookup ──────────────────────────────────────────────────────────

    /// Dictionary lookup. `force_refresh` bypasses the backend's cache as
    /// well as ours.
    pub fn lookup_card(
        &self,
        kind: CardKind,
        card_id: &str,
        force_refresh: bool,
    ) -> Result<CardData, ApiError> {
        let url = format!("{}/cards/{}/{}", self.base, kind.as_str(), card_id);
        let mut req = self.agent.get(&url);
        if force_refresh {
            req = req.query("forceRefresh", "true");
        }
        Ok(req.call()?.into_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let c = BackendClient::new("http://localhost:9999/api///", "tl-1");
        assert_eq!(c.url("trim/reset"), "http://localhost:9999/api/timeline/tl-1/trim/reset");
    }
}
