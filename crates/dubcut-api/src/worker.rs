// crates/dubcut-api/src/worker.rs
//
// BackendWorker: owns the result channel, the card-lookup generation
// counter, and the waveform in-flight set. All public API that dubcut-ui
// calls lives here. One thread per request; the UI drains `rx` once per
// frame.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use uuid::Uuid;

use dubcut_core::mixer::TrackKind;
use dubcut_core::state::{CardData, CardKind, SegmentState};

use crate::client::BackendClient;
use crate::types::{ApiResult, BulkOp, PinRequest};
use crate::waveform::normalize_envelope;

pub struct BackendWorker {
    /// Result channel drained by AppContext::ingest_results each frame.
    pub rx: Receiver<ApiResult>,
    tx:     Sender<ApiResult>,

    client:   Arc<BackendClient>,
    shutdown: Arc<AtomicBool>,

    /// Tracks with a waveform fetch currently in flight. A second
    /// generate_waveform for the same track while one is pending is a no-op
    /// — true request de-duplication, the caller just waits for the result
    /// already on its way.
    waveform_inflight: Arc<Mutex<HashSet<TrackKind>>>,

    /// Card-lookup generation. Each lookup is stamped with the value at
    /// issue time; opening another card or closing the panel bumps it, so a
    /// stale response can never overwrite the currently displayed card.
    card_generation: Arc<AtomicU64>,

    /// Completed lookups keyed by (kind, card_id). Bypassed by force_refresh.
    card_cache: Arc<Mutex<HashMap<(CardKind, String), CardData>>>,
}

impl BackendWorker {
    pub fn new(client: BackendClient) -> Self {
        let (tx, rx) = bounded(256);
        Self {
            rx,
            tx,
            client:            Arc::new(client),
            shutdown:          Arc::new(AtomicBool::new(false)),
            waveform_inflight: Arc::new(Mutex::new(HashSet::new())),
            card_generation:   Arc::new(AtomicU64::new(0)),
            card_cache:        Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn timeline_id(&self) -> &str {
        self.client.timeline_id()
    }

    /// Set the shutdown flag. Running threads finish their current request
    /// but the pre-send guard stops their results from landing — no write
    /// may land after teardown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Orphan any in-flight card lookup as well.
        self.card_generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Spawn one request thread: run `work`, send its result unless shutdown
    /// raced in, tag failures with `what` for the notice line.
    fn spawn<T, F, R>(&self, what: &'static str, work: F, into: R)
    where
        T: Send + 'static,
        F: FnOnce(&BackendClient) -> Result<T, crate::error::ApiError> + Send + 'static,
        R: FnOnce(T) -> ApiResult + Send + 'static,
    {
        let tx     = self.tx.clone();
        let sd     = self.shutdown.clone();
        let client = Arc::clone(&self.client);
        thread::spawn(move || {
            if sd.load(Ordering::Relaxed) {
                return;
            }
            let result = work(&client);
            if sd.load(Ordering::Relaxed) {
                return;
            }
            let msg = match result {
                Ok(v)    => into(v),
                Err(err) => ApiResult::Failed { what, err },
            };
            let _ = tx.send(msg);
        });
    }

    // ── Timeline ─────────────────────────────────────────────────────────────

    pub fn load_timeline(&self) {
        self.spawn(
            "timeline",
            |c| c.fetch_timeline(),
            |tl| ApiResult::TimelineLoaded(Box::new(tl)),
        );
    }

    /// One status-poll request. Driven by the UI's Poller on a 3 s interval.
    pub fn poll_mode(&self) {
        self.spawn("status", |c| c.fetch_mode(), ApiResult::Mode);
    }

    pub fn save_progress(&self, position: f64) {
        self.spawn(
            "progress",
            move |c| c.save_progress(position).map(|_| position),
            ApiResult::ProgressSaved,
        );
    }

    // ── Segments ─────────────────────────────────────────────────────────────

    pub fn run_bulk(&self, op: BulkOp) {
        self.spawn(
            "bulk edit",
            move |c| c.bulk(op),
            move |updated| ApiResult::BulkUpdated { op, updated },
        );
    }

    pub fn set_segment_state(&self, id: Uuid, state: SegmentState) {
        self.spawn(
            "segment update",
            move |c| c.set_segment_state(id, state),
            |seg| ApiResult::SegmentUpdated(Box::new(seg)),
        );
    }

    pub fn set_segment_text(&self, id: Uuid, translated: String) {
        self.spawn(
            "segment update",
            move |c| c.set_segment_text(id, &translated),
            |seg| ApiResult::SegmentUpdated(Box::new(seg)),
        );
    }

    pub fn set_segment_trim(&self, id: Uuid, trim_start: Option<f64>, trim_end: Option<f64>) {
        self.spawn(
            "segment update",
            move |c| c.set_segment_trim(id, trim_start, trim_end),
            |seg| ApiResult::SegmentUpdated(Box::new(seg)),
        );
    }

    // ── Video trim ───────────────────────────────────────────────────────────

    pub fn set_trim(&self, start: Option<f64>, end: Option<f64>) {
        self.spawn(
            "trim",
            move |c| c.set_trim(start, end),
            |t| ApiResult::TrimUpdated { start: t.video_trim_start, end: t.video_trim_end },
        );
    }

    pub fn reset_trim(&self) {
        self.spawn(
            "trim",
            |c| c.reset_trim(),
            |t| ApiResult::TrimUpdated { start: t.video_trim_start, end: t.video_trim_end },
        );
    }

    // ── Waveforms ────────────────────────────────────────────────────────────

    /// Fetch the envelope for `track` unless a fetch for it is already in
    /// flight. The in-flight entry is cleared on success and failure alike
    /// so an explicit regenerate can always be issued afterwards.
    pub fn generate_waveform(&self, track: TrackKind) {
        {
            let mut inflight = self.waveform_inflight.lock();
            if !inflight.insert(track) {
                eprintln!("[api] waveform {} already in flight — deduped", track.as_str());
                return;
            }
        }

        let tx       = self.tx.clone();
        let sd       = self.shutdown.clone();
        let client   = Arc::clone(&self.client);
        let inflight = Arc::clone(&self.waveform_inflight);
        thread::spawn(move || {
            let result = if sd.load(Ordering::Relaxed) {
                None
            } else {
                Some(client.fetch_waveform(track))
            };
            inflight.lock().remove(&track);

            let Some(result) = result else { return };
            if sd.load(Ordering::Relaxed) {
                return;
            }
            let msg = match result {
                Ok(samples) => {
                    let peaks = normalize_envelope(&samples);
                    eprintln!("[api] waveform {} — {} cols", track.as_str(), peaks.len());
                    ApiResult::Waveform { track, peaks }
                }
                Err(err) => ApiResult::Failed { what: "waveform", err },
            };
            let _ = tx.send(msg);
        });
    }

    // ── Pins ─────────────────────────────────────────────────────────────────

    pub fn create_pin(&self, req: PinRequest) {
        self.spawn(
            "pin",
            move |c| c.create_pin(&req),
            |pin| ApiResult::PinCreated(Box::new(pin)),
        );
    }

    pub fn remove_pin(&self, pin_id: Uuid) {
        self.spawn(
            "unpin",
            move |c| c.remove_pin(pin_id).map(|_| pin_id),
            ApiResult::PinRemoved,
        );
    }

    pub fn save_pin_note(&self, pin_id: Uuid, note: String) {
        self.spawn(
            "note save",
            move |c| c.save_pin_note(pin_id, &note).map(|_| pin_id),
            ApiResult::NoteSaved,
        );
    }

    // ── Card lookup ──────────────────────────────────────────────────────────

    /// Start a card lookup, superseding any lookup already in flight. The
    /// result is stamped with the new generation; AppContext drops results
    /// whose stamp is older than the current generation, so the superseded
    /// response is discarded silently — never rendered, never surfaced.
    pub fn lookup_card(&self, kind: CardKind, card_id: String, force_refresh: bool) {
        let generation = self.card_generation.fetch_add(1, Ordering::Relaxed) + 1;

        if !force_refresh {
            if let Some(data) = self.card_cache.lock().get(&(kind, card_id.clone())) {
                let _ = self.tx.send(ApiResult::Card { generation, data: data.clone() });
                return;
            }
        }

        let tx    = self.tx.clone();
        let sd    = self.shutdown.clone();
        let gen_c = Arc::clone(&self.card_generation);
        let cache = Arc::clone(&self.card_cache);
        let client = Arc::clone(&self.client);
        thread::spawn(move || {
            if sd.load(Ordering::Relaxed) {
                return;
            }
            let result = client.lookup_card(kind, &card_id, force_refresh);

            // Superseded while we were waiting — drop on the floor.
            if gen_c.load(Ordering::Relaxed) != generation || sd.load(Ordering::Relaxed) {
                return;
            }
            let msg = match result {
                Ok(data) => {
                    cache.lock().insert((kind, card_id), data.clone());
                    ApiResult::Card { generation, data }
                }
                Err(err) => ApiResult::Failed { what: "card lookup", err },
            };
            let _ = tx.send(msg);
        });
    }

    /// The generation the next ingested card result must carry to be shown.
    pub fn card_generation(&self) -> u64 {
        self.card_generation.load(Ordering::Relaxed)
    }

    /// Abort any in-flight lookup (panel closed, another card opened by pin).
    pub fn cancel_card_lookup(&self) {
        self.card_generation.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker() -> BackendWorker {
        // Port 9 (discard) — nothing listens; only used for tests that never
        // actually complete a request.
        BackendWorker::new(BackendClient::new("http://127.0.0.1:9/api", "t"))
    }

    #[test]
    fn waveform_requests_are_deduplicated() {
        let w = worker();
        w.waveform_inflight.lock().insert(TrackKind::Original);
        // Marked in flight — this call must not spawn (and must not clear the marker).
        w.generate_waveform(TrackKind::Original);
        assert!(w.waveform_inflight.lock().contains(&TrackKind::Original));
    }

    #[test]
    fn cancel_bumps_generation() {
        let w = worker();
        let g0 = w.card_generation();
        w.cancel_card_lookup();
        assert_eq!(w.card_generation(), g0 + 1);
    }

    #[test]
    fn cached_card_is_served_without_a_request() {
        let w = worker();
        let data = CardData::Word {
            term:       "hola".into(),
            reading:    None,
            definition: "hello".into(),
        };
        w.card_cache.lock().insert((CardKind::Word, "w-1".into()), data.clone());

        w.lookup_card(CardKind::Word, "w-1".into(), false);
        match w.rx.recv_timeout(std::time::Duration::from_secs(1)) {
            Ok(ApiResult::Card { generation, data: got }) => {
                assert_eq!(generation, w.card_generation());
                assert_eq!(got, data);
            }
            other => panic!("expected cached Card result, got {:?}", other.is_ok()),
        }
    }
}
