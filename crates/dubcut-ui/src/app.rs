// src/app.rs (dubcut-ui)
use crate::context::{AppContext, LoadState, OpenCard};
use crate::modules::{
    card_panel::CardPanelModule, segment_list::SegmentListModule, timeline::TimelineModule,
    ReviewModule,
};
use crate::theme::configure_style;
use dubcut_api::{BackendClient, BackendWorker, BulkOp, PinRequest};
use dubcut_core::commands::ReviewCommand;
use dubcut_core::state::{ReviewState, TimelineMode};
use eframe::egui;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct AppStorage {
    review: ReviewState,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct DubCutApp {
    state:        ReviewState,
    context:      AppContext,
    // Panel modules as concrete types — eliminates per-frame name-string lookup
    // and makes typos a compile error instead of a silently blank panel.
    timeline:     TimelineModule,
    segment_list: SegmentListModule,
    card_panel:   CardPanelModule,
    /// Commands emitted by modules each frame, processed after the UI pass
    pending_cmds: Vec<ReviewCommand>,
}

impl DubCutApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        configure_style(&cc.egui_ctx);
        // Pin to dark mode — prevents egui overwriting our theme on OS light/dark changes.
        cc.egui_ctx.options_mut(|o| {
            o.theme_preference = egui::ThemePreference::Dark;
        });

        let state = cc.storage
            .and_then(|s| eframe::get_value::<AppStorage>(s, eframe::APP_KEY))
            .map(|d| d.review)
            .unwrap_or_default();

        let worker = BackendWorker::new(BackendClient::from_env());
        worker.load_timeline();

        Self {
            state,
            context:      AppContext::new(worker),
            timeline:     TimelineModule::new(),
            segment_list: SegmentListModule::new(),
            card_panel:   CardPanelModule::new(),
            pending_cmds: Vec::new(),
        }
    }

    /// The playable window: [video trim start, trim end or duration].
    fn playable_window(&self) -> (f64, f64) {
        self.state.timeline.as_ref()
            .map(|tl| (tl.video_trim_start, tl.playable_end()))
            .unwrap_or((0.0, 0.0))
    }

    fn process_command(&mut self, cmd: ReviewCommand) {
        match cmd {
            // ── Playback ─────────────────────────────────────────────────────
            ReviewCommand::Seek(t) => {
                let t = self.state.coords.snap_to_frame(t);
                self.state.seek(t);
            }
            ReviewCommand::Play => {
                let (start, end) = self.playable_window();
                if end > start
                    && (self.state.current_time >= end - 0.1 || self.state.current_time < start)
                {
                    self.state.current_time = start;
                }
                self.state.is_playing = true;
            }
            ReviewCommand::Pause => {
                self.state.is_playing = false;
            }
            ReviewCommand::Stop => {
                let (start, _) = self.playable_window();
                self.state.is_playing   = false;
                self.state.current_time = start;
            }

            // ── View ─────────────────────────────────────────────────────────
            ReviewCommand::SetZoom(z) => self.state.coords.set_zoom(z),
            ReviewCommand::ZoomIn     => self.state.coords.zoom_in(),
            ReviewCommand::ZoomOut    => self.state.coords.zoom_out(),
            ReviewCommand::ToggleSnap => {
                self.state.coords.snap_enabled = !self.state.coords.snap_enabled;
            }

            // ── Segments — persisted; local state patched on confirmation ────
            ReviewCommand::SelectSegment(id) => {
                self.state.selected_segment = id;
            }
            ReviewCommand::SetSegmentState { id, state } => {
                self.context.worker.set_segment_state(id, state);
            }
            ReviewCommand::SetSegmentText { id, translated } => {
                self.context.worker.set_segment_text(id, translated);
            }
            ReviewCommand::SetSegmentTrim { id, trim_start, trim_end } => {
                self.context.worker.set_segment_trim(id, trim_start, trim_end);
            }
            ReviewCommand::KeepAll       => self.context.worker.run_bulk(BulkOp::KeepAll),
            ReviewCommand::DropAll       => self.context.worker.run_bulk(BulkOp::DropAll),
            ReviewCommand::ResetAll      => self.context.worker.run_bulk(BulkOp::ResetAll),
            ReviewCommand::DropBefore(t) => self.context.worker.run_bulk(BulkOp::DropBefore(t)),
            ReviewCommand::DropAfter(t)  => self.context.worker.run_bulk(BulkOp::DropAfter(t)),

            // ── Video trim ───────────────────────────────────────────────────
            ReviewCommand::SetVideoTrim { start, end } => {
                self.context.worker.set_trim(start, end);
            }
            ReviewCommand::ResetTrim => {
                self.context.worker.reset_trim();
            }

            // ── Audio tracks — local-only, applied immediately ───────────────
            ReviewCommand::SetTrackMuted { track, muted } => {
                self.state.mixer.set_muted(track, muted);
            }
            ReviewCommand::SetTrackSolo { track, solo } => {
                self.state.mixer.set_solo(track, solo);
            }
            ReviewCommand::SetTrackVolume { track, volume } => {
                self.state.mixer.set_volume(track, volume);
            }
            ReviewCommand::GenerateWaveform(track) => {
                self.context.worker.generate_waveform(track);
            }

            // ── Cards ────────────────────────────────────────────────────────
            ReviewCommand::OpenCard { kind, card_id, force_refresh } => {
                // If this card is already pinned somewhere, keep the link so
                // the panel offers unpin instead of pin.
                let from_pin = self.state.timeline.as_ref().and_then(|tl| {
                    tl.pinned_cards.iter()
                        .find(|p| p.card_id == card_id && p.card.kind() == kind)
                        .map(|p| p.id)
                });
                self.context.open_card = Some(OpenCard {
                    kind,
                    card_id: card_id.clone(),
                    data:    None,
                    loading: true,
                    from_pin,
                });
                self.context.worker.lookup_card(kind, card_id, force_refresh);
            }
            ReviewCommand::OpenPinnedCard(pin_id) => {
                // The payload lives on the pin — no lookup. Any lookup in
                // flight is superseded so it can't overwrite this card.
                self.context.worker.cancel_card_lookup();
                let pin = self.state.timeline.as_ref()
                    .and_then(|tl| tl.pinned_cards.iter().find(|p| p.id == pin_id))
                    .cloned();
                if let Some(pin) = pin {
                    self.context.open_card = Some(OpenCard {
                        kind:     pin.card.kind(),
                        card_id:  pin.card_id.clone(),
                        data:     Some(pin.card.clone()),
                        loading:  false,
                        from_pin: Some(pin.id),
                    });
                    self.state.is_playing = false;
                    self.state.seek(pin.timestamp);
                }
            }
            ReviewCommand::CloseCard => {
                self.context.open_card = None;
                self.context.worker.cancel_card_lookup();
            }
            ReviewCommand::PinOpenCard => {
                self.pin_open_card();
            }
            ReviewCommand::Unpin(pin_id) => {
                self.context.worker.remove_pin(pin_id);
            }
            ReviewCommand::SetPinNote { pin_id, note } => {
                if let Some(tl) = self.state.timeline.as_mut() {
                    tl.set_pin_note(pin_id, Some(note.clone()));
                }
                // Replace any pending payload and restart the 1.5 s window —
                // only the final text after a typing pause is written.
                self.context.pending_note = Some((pin_id, note));
                self.context.note_autosave.arm();
            }

            // ── Misc ─────────────────────────────────────────────────────────
            ReviewCommand::ClearStatus => {
                self.state.status = None;
            }
            ReviewCommand::DismissNotice(i) => {
                if i < self.context.notices.len() {
                    self.context.notices.remove(i);
                }
            }
            ReviewCommand::RefreshTimeline => {
                // Only show the full-window spinner when nothing is loaded;
                // a background refresh keeps the current view.
                if self.state.timeline.is_none() {
                    self.context.load = LoadState::Loading;
                }
                self.context.worker.load_timeline();
            }
        }
    }

    /// Pin the card currently shown in the panel to the segment under the
    /// playhead, with a display window of ±1 s clamped into the segment.
    fn pin_open_card(&mut self) {
        let Some(card) = self.context.open_card.as_ref() else { return };
        let Some(data) = card.data.clone() else { return };

        let seg = self.state.segment_at_playhead().map(|s| (s.id, s.start, s.end));
        let Some((seg_id, seg_start, seg_end)) = seg else {
            self.state.status = Some("Move the playhead into a segment to pin".into());
            return;
        };

        // Local cap check before the request — the backend enforces it too
        // (409), but there's no reason to round-trip a doomed pin.
        let can_pin = self.state.timeline.as_ref()
            .map(|tl| tl.can_pin(seg_id))
            .unwrap_or(false);
        if !can_pin {
            self.state.status = Some("Pin limit reached (2 per segment)".into());
            return;
        }

        let t = self.state.current_time;
        self.context.worker.create_pin(PinRequest {
            card:          data,
            card_id:       card.card_id.clone(),
            segment_id:    seg_id,
            timestamp:     t,
            display_start: (t - 1.0).max(seg_start),
            display_end:   (t + 1.0).min(seg_end),
        });
    }

    /// Per-frame scheduling: the status poll, the note-autosave debounce,
    /// and the 10 s playhead-progress persistence.
    fn tick_schedules(&mut self) {
        if self.context.mode_poller.due() {
            self.context.worker.poll_mode();
        }
        if self.context.note_autosave.fire_due() {
            if let Some((pin_id, note)) = self.context.pending_note.take() {
                self.context.worker.save_pin_note(pin_id, note);
            }
        }
        // Persist watch progress once the playhead has advanced ≥ 10 s past
        // the last write. Scrubbing backwards never triggers a write.
        if self.state.timeline.is_some()
            && self.state.current_time - self.state.last_persisted_time >= 10.0
        {
            self.context.worker.save_progress(self.state.current_time);
            self.state.last_persisted_time = self.state.current_time;
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel")
            .exact_height(36.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new("✂ DubCut")
                            .strong().size(15.0).color(crate::theme::ACCENT),
                    );
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("timeline: {}", self.context.worker.timeline_id()))
                            .size(11.0).weak(),
                    );
                    if let Some(tl) = &self.state.timeline {
                        match tl.mode {
                            TimelineMode::Processing => {
                                ui.spinner();
                                ui.label(
                                    egui::RichText::new("processing…")
                                        .size(11.0)
                                        .color(crate::theme::ACCENT),
                                );
                            }
                            TimelineMode::Failed => {
                                ui.label(
                                    egui::RichText::new("⚠ processing failed")
                                        .size(11.0)
                                        .color(egui::Color32::from_rgb(230, 110, 100)),
                                );
                            }
                            TimelineMode::Ready => {}
                        }
                    }
                    if ui.small_button("⟳")
                        .on_hover_text("Re-fetch the timeline")
                        .clicked()
                    {
                        self.pending_cmds.push(ReviewCommand::RefreshTimeline);
                    }

                    // Failure notices, newest last, each dismissible.
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let notices: Vec<(usize, String)> = self.context.notices.iter()
                            .cloned().enumerate().rev().take(2).collect();
                        for (i, notice) in notices {
                            if ui.small_button("✕").clicked() {
                                self.pending_cmds.push(ReviewCommand::DismissNotice(i));
                            }
                            ui.label(
                                egui::RichText::new(notice)
                                    .size(10.0)
                                    .color(egui::Color32::from_rgb(230, 150, 90)),
                            );
                        }
                    });
                });
            });
    }

    /// Full-window views shown while no timeline is installed.
    /// Returns true when the normal panels should be skipped this frame.
    fn load_gate(&mut self, ctx: &egui::Context) -> bool {
        match &self.context.load {
            LoadState::Ready => false,
            LoadState::Loading => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Loading timeline…");
                        });
                    });
                });
                true
            }
            LoadState::NotFound => {
                let id = self.context.worker.timeline_id().to_string();
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() * 0.35);
                        ui.label(
                            egui::RichText::new("Timeline not found")
                                .size(18.0)
                                .color(egui::Color32::from_rgb(230, 110, 100)),
                        );
                        ui.label(
                            egui::RichText::new(format!("No timeline with id \"{id}\" on the backend"))
                                .size(11.0).weak(),
                        );
                        ui.add_space(8.0);
                        if ui.button("⟳ Retry").clicked() {
                            self.pending_cmds.push(ReviewCommand::RefreshTimeline);
                        }
                    });
                });
                true
            }
            LoadState::Failed(msg) => {
                let msg = msg.clone();
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() * 0.35);
                        ui.label(
                            egui::RichText::new("Could not reach the backend")
                                .size(18.0)
                                .color(egui::Color32::from_rgb(230, 110, 100)),
                        );
                        ui.label(egui::RichText::new(msg).size(11.0).weak());
                        ui.add_space(8.0);
                        if ui.button("⟳ Retry").clicked() {
                            self.pending_cmds.push(ReviewCommand::RefreshTimeline);
                        }
                    });
                });
                true
            }
        }
    }

    /// Central pane: playhead readout plus the segment under it.
    fn review_readout(&self, ui: &mut egui::Ui) {
        use dubcut_core::helpers::time::format_time_frames;
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.2);
            ui.label(
                egui::RichText::new(format_time_frames(self.state.current_time))
                    .monospace()
                    .size(28.0)
                    .color(crate::theme::ACCENT),
            );
            ui.add_space(12.0);
            if let Some(seg) = self.state.segment_at_playhead() {
                ui.label(
                    egui::RichText::new(&seg.source_text)
                        .size(13.0)
                        .color(crate::theme::DARK_TEXT_DIM),
                );
                ui.add_space(4.0);
                ui.label(egui::RichText::new(&seg.translated_text).size(16.0));
            } else {
                ui.label(
                    egui::RichText::new("no segment at playhead")
                        .size(11.0)
                        .weak(),
                );
            }
        });
    }
}

// ── eframe::App ───────────────────────────────────────────────────────────────

impl eframe::App for DubCutApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        // Runtime-only fields are #[serde(skip)] on ReviewState itself — the
        // timeline is re-fetched on launch, so only position and selection
        // survive the session.
        eframe::set_value(storage, eframe::APP_KEY, &AppStorage { review: self.state.clone() });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.context.teardown();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.context.ingest_results(&mut self.state, ctx);
        self.tick_schedules();

        self.top_bar(ctx);

        if !self.load_gate(ctx) {
            egui::TopBottomPanel::bottom("timeline_panel")
                .resizable(true)
                .min_height(220.0)
                .default_height(280.0)
                .show(ctx, |ui| {
                    self.timeline.ui(ui, &self.state, &self.context, &mut self.pending_cmds);
                });

            egui::SidePanel::left("segment_panel")
                .resizable(true)
                .default_width(320.0)
                .min_width(240.0)
                .show(ctx, |ui| {
                    self.segment_list.ui(ui, &self.state, &self.context, &mut self.pending_cmds);
                });

            egui::SidePanel::right("card_panel")
                .resizable(true)
                .default_width(260.0)
                .min_width(200.0)
                .show(ctx, |ui| {
                    self.card_panel.ui(ui, &self.state, &self.context, &mut self.pending_cmds);
                });

            egui::CentralPanel::default().show(ctx, |ui| {
                self.review_readout(ui);
            });
        }

        // ── Process commands emitted by modules this frame ────────────────────
        let cmds: Vec<ReviewCommand> = self.pending_cmds.drain(..).collect();
        for cmd in cmds {
            self.process_command(cmd);
        }

        // ── Playback clock ────────────────────────────────────────────────────
        if self.state.is_playing {
            let dt = ctx.input(|i| i.stable_dt as f64);
            self.state.current_time += dt;
            let (_, end) = self.playable_window();
            if end > 0.0 && self.state.current_time >= end {
                self.state.current_time = end;
                self.state.is_playing   = false;
            }
            ctx.request_repaint();
        }

        // Timers (poll, debounce) must fire without user input.
        if self.context.mode_poller.is_running() || self.context.note_autosave.is_armed() {
            ctx.request_repaint_after(std::time::Duration::from_millis(200));
        }
    }
}
