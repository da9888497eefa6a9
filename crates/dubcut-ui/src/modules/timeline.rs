// crates/dubcut-ui/src/modules/timeline.rs
use super::ReviewModule;
use crate::context::AppContext;
use crate::helpers::format::fit_label;
use crate::theme::{
    segment_fill, track_tint, ACCENT, DARK_BG_0, DARK_BG_2, DARK_BORDER, DARK_TEXT_DIM,
    PIN_MARKER, SEG_SELECTED,
};
use dubcut_core::commands::ReviewCommand;
use dubcut_core::coords::FPS;
use dubcut_core::helpers::time::{format_time, format_time_frames};
use dubcut_core::mixer::TrackKind;
use dubcut_core::state::{ReviewState, SegmentState};
use egui::{Align2, Color32, FontId, Id, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

// Lane geometry (pixels). The header column mirrors these so its rows line
// up with the scrollable lanes.
const RULER_H:    f32 = 26.0;
const SEGMENT_H:  f32 = 48.0;
const PIN_H:      f32 = 24.0;
const AUDIO_H:    f32 = 42.0;
const LANE_GAP:   f32 = 2.0;
const HEADER_W:   f32 = 118.0;
/// Minimum rendered pin marker width, regardless of zoom.
const MIN_PIN_PX: f32 = 40.0;

/// In-progress per-segment trim handle drag. Accumulated locally and sent
/// to the backend once, on release — not per drag frame.
struct TrimDrag {
    id:         Uuid,
    trim_start: Option<f64>,
    trim_end:   Option<f64>,
}

pub struct TimelineModule {
    /// Last timeline position (seconds) for which a Seek was emitted.
    ///
    /// Used to deduplicate Seek commands during ruler and playhead-handle
    /// drags.  At low zoom levels many pixels of mouse movement map to
    /// sub-frame time deltas; we skip the emit when `|new_t - last_t| <
    /// 1/30 s` (one frame at 30 fps).
    ///
    /// Reset to a negative sentinel on construction.  Updated whenever a
    /// Seek is actually pushed so the filter stays tight.
    last_scrub_emitted_time: f64,

    trim_drag: Option<TrimDrag>,
}

impl TimelineModule {
    pub fn new() -> Self {
        Self {
            last_scrub_emitted_time: f64::NEG_INFINITY,
            trim_drag:               None,
        }
    }

    /// Emit a Seek unless it is within one frame of the last one sent.
    /// `force` bypasses the filter (click / drag start must feel instant).
    fn emit_seek(&mut self, t: f64, force: bool, cmd: &mut Vec<ReviewCommand>) {
        if force || (t - self.last_scrub_emitted_time).abs() >= 1.0 / FPS {
            cmd.push(ReviewCommand::Seek(t));
            self.last_scrub_emitted_time = t;
        }
    }
}

// ── Small styling helpers ──────────────────────────────────────────────────────

/// Standard toolbar button — consistent height, icon-forward.
fn tool_btn(label: impl Into<egui::WidgetText>) -> egui::Button<'static> {
    egui::Button::new(label).min_size(egui::vec2(0.0, 26.0))
}

impl ReviewModule for TimelineModule {
    fn name(&self) -> &str { "Timeline" }

    fn ui(&mut self, ui: &mut Ui, state: &ReviewState, ctx: &AppContext, cmd: &mut Vec<ReviewCommand>) {
        // Auto-clear the status line after 3 seconds (pure UI memory, no state mutation)
        if state.status.is_some() {
            let t = ui.input(|i| i.time);
            ui.memory_mut(|mem| {
                let key = egui::Id::new("status_time");
                let start = mem.data.get_temp_mut_or_insert_with(key, || t);
                if t - *start > 3.0 {
                    cmd.push(ReviewCommand::ClearStatus);
                    mem.data.remove::<f64>(key);
                }
            });
            ui.ctx().request_repaint();
        } else {
            ui.memory_mut(|mem| mem.data.remove::<f64>(egui::Id::new("status_time")));
        }

        // ── Keyboard shortcuts (suppressed while a text field has focus) ──────
        if !ui.ctx().wants_keyboard_input() {
            if ui.input(|i| i.key_pressed(egui::Key::Space)) {
                if state.is_playing { cmd.push(ReviewCommand::Pause); }
                else                { cmd.push(ReviewCommand::Play);  }
            }
            if ui.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
                cmd.push(ReviewCommand::Pause);
                cmd.push(ReviewCommand::Seek((state.current_time - 1.0 / FPS).max(0.0)));
            }
            if ui.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
                cmd.push(ReviewCommand::Pause);
                cmd.push(ReviewCommand::Seek(state.current_time + 1.0 / FPS));
            }
            // K / D / U — set review state of the selected segment
            if let Some(id) = state.selected_segment {
                for (key, seg_state) in [
                    (egui::Key::K, SegmentState::Keep),
                    (egui::Key::D, SegmentState::Drop),
                    (egui::Key::U, SegmentState::Undecided),
                ] {
                    if ui.input(|i| i.key_pressed(key)) {
                        cmd.push(ReviewCommand::SetSegmentState { id, state: seg_state });
                    }
                }
            }
        }

        ui.vertical(|ui| {
            self.toolbar(ui, state, cmd);
            ui.separator();

            ui.horizontal_top(|ui| {
                track_header_column(ui, state, ctx, cmd);
                egui::ScrollArea::horizontal()
                    .id_salt("review_timeline_scroll")
                    .show(ui, |ui| {
                        self.lanes(ui, state, ctx, cmd);
                    });
            });
        });
    }
}

impl TimelineModule {
    fn toolbar(&mut self, ui: &mut Ui, state: &ReviewState, cmd: &mut Vec<ReviewCommand>) {
        egui::Frame::new()
            .fill(DARK_BG_2)
            .inner_margin(egui::Margin::same(6))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    // ── Playback controls ─────────────────────────────────────
                    ui.group(|ui| {
                        if ui.add(tool_btn(if state.is_playing { "⏸" } else { "▶" })).clicked() {
                            if state.is_playing { cmd.push(ReviewCommand::Pause); }
                            else                { cmd.push(ReviewCommand::Play);  }
                        }
                        if ui.add(tool_btn("⏹")).clicked() {
                            cmd.push(ReviewCommand::Stop);
                        }
                    });

                    // ── Playhead bulk ops ─────────────────────────────────────
                    ui.group(|ui| {
                        let has_timeline = state.timeline.is_some();
                        if ui.add_enabled(has_timeline, tool_btn("⇤ Drop before"))
                            .on_hover_text("Drop every segment ending at or before the playhead")
                            .clicked()
                        {
                            cmd.push(ReviewCommand::DropBefore(state.current_time));
                        }
                        if ui.add_enabled(has_timeline, tool_btn("⇥ Drop after"))
                            .on_hover_text("Drop every segment starting at or after the playhead")
                            .clicked()
                        {
                            cmd.push(ReviewCommand::DropAfter(state.current_time));
                        }
                    });

                    // Snap toggle
                    if ui.selectable_label(state.coords.snap_enabled, "⌗ Snap")
                        .on_hover_text("Snap seeks to 30 fps frame boundaries")
                        .clicked()
                    {
                        cmd.push(ReviewCommand::ToggleSnap);
                    }

                    // ── Right side: zoom + status ─────────────────────────────
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add(tool_btn("🔍+")).clicked() {
                            cmd.push(ReviewCommand::ZoomIn);
                        }
                        if ui.add(tool_btn("🔍-")).clicked() {
                            cmd.push(ReviewCommand::ZoomOut);
                        }
                        ui.label(format!("Zoom: {:.0}px/s", state.coords.zoom));
                        ui.separator();
                        ui.label(
                            RichText::new(format_time_frames(state.current_time))
                                .monospace()
                                .color(ACCENT),
                        );
                        ui.separator();
                        if let Some(msg) = &state.status {
                            ui.label(
                                RichText::new(msg).size(10.0)
                                    .color(Color32::from_rgb(100, 220, 100)),
                            );
                        } else {
                            ui.label(
                                RichText::new("Space=Play  ⬅️➡️=Frame  K=Keep  D=Drop  U=Undecided")
                                    .size(9.0).color(Color32::from_gray(80)),
                            );
                        }
                    });
                });
            });
    }

    fn lanes(&mut self, ui: &mut Ui, state: &ReviewState, ctx: &AppContext, cmd: &mut Vec<ReviewCommand>) {
        let coords   = state.coords;
        let duration = state.duration();
        // Lane width gets a 60 s floor so short timelines still fill the
        // panel; ticks and culling use the real duration.
        let total_w  = coords.time_to_pixels(duration.max(60.0)) + 200.0;
        let total_h  = RULER_H + SEGMENT_H + PIN_H
            + (AUDIO_H + LANE_GAP) * TrackKind::ALL.len() as f32
            + LANE_GAP * 2.0;

        let (rect, response) = ui.allocate_exact_size(egui::vec2(total_w, total_h), Sense::click());
        // `.clone()` gives an owned Painter (egui Painter is Arc-backed)
        // so ui is free for mutable calls like ui.interact later.
        let painter = ui.painter().clone();

        painter.rect_filled(rect, 0.0, DARK_BG_0);

        // The visible time window, derived from how far the ScrollArea has
        // scrolled us out of the clip rect. Everything below culls to it.
        let clip = ui.clip_rect();
        let (vis_start, vis_end) = {
            let mut view = coords;
            view.scroll_x = (clip.min.x - rect.min.x).max(0.0);
            view.duration = duration;
            view.visible_time_range(clip.width())
        };

        let seg_top   = rect.min.y + RULER_H + LANE_GAP;
        let pin_top   = seg_top + SEGMENT_H + LANE_GAP;
        let audio_top = pin_top + PIN_H + LANE_GAP;

        self.draw_ruler(ui, &painter, rect, state, vis_start, vis_end, cmd);
        self.draw_audio_lanes(&painter, rect, audio_top, state, ctx, duration, vis_start, vis_end);
        self.draw_pins(ui, &painter, rect, pin_top, state, cmd);
        self.draw_segments(ui, &painter, rect, seg_top, state, vis_start, vis_end, cmd);
        draw_trim_shade(&painter, rect, state);
        self.draw_playhead(ui, &painter, rect, state, cmd);

        // Background click = deselect
        if response.clicked() {
            cmd.push(ReviewCommand::SelectSegment(None));
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_ruler(
        &mut self,
        ui:        &mut Ui,
        painter:   &egui::Painter,
        rect:      Rect,
        state:     &ReviewState,
        vis_start: f64,
        vis_end:   f64,
        cmd:       &mut Vec<ReviewCommand>,
    ) {
        let coords   = state.coords;
        let duration = state.duration();
        let ruler_rect = Rect::from_min_size(rect.min, egui::vec2(rect.width(), RULER_H));
        painter.rect_filled(ruler_rect, 0.0, Color32::from_rgb(16, 16, 20));

        let interval = coords.tick_interval();
        let sub      = coords.sub_tick_interval();

        // Sub-ticks first so majors paint over them. A sub-tick landing
        // within 1 ms of a major is skipped — it would double-draw. Nothing
        // is drawn past the timeline's end even though the lane is wider.
        let mut s = (vis_start / sub).floor() * sub;
        while s <= (vis_end + sub).min(duration) {
            let nearest_major = (s / interval).round() * interval;
            if (s - nearest_major).abs() >= 1e-3 && s >= 0.0 {
                let x = rect.min.x + coords.time_to_pixels(s);
                painter.line_segment(
                    [Pos2::new(x, rect.min.y + RULER_H * 0.65),
                     Pos2::new(x, rect.min.y + RULER_H)],
                    Stroke::new(1.0, Color32::from_gray(50)));
            }
            s += sub;
        }

        let high_zoom = coords.zoom >= 200.0;
        let mut s = (vis_start / interval).floor() * interval;
        while s <= (vis_end + interval).min(duration) {
            if s >= 0.0 {
                let x = rect.min.x + coords.time_to_pixels(s);
                painter.line_segment(
                    [Pos2::new(x, rect.min.y), Pos2::new(x, rect.min.y + RULER_H)],
                    Stroke::new(1.0, Color32::from_gray(70)));
                // mm:ss normally; mm:ss:ff once individual frames are visible.
                let label = if high_zoom { format_time_frames(s) } else { format_time(s) };
                painter.text(Pos2::new(x + 3.0, rect.min.y + 3.0),
                    Align2::LEFT_TOP, label, FontId::monospace(10.0),
                    Color32::from_gray(140));
            }
            s += interval;
        }

        // Ruler click/drag → seek
        let ruler_resp = ui.interact(ruler_rect, Id::new("timeline_ruler"), Sense::click_and_drag());
        if ruler_resp.clicked() || ruler_resp.dragged() {
            if let Some(ptr) = ruler_resp.interact_pointer_pos() {
                let t = coords.pixels_to_time(ptr.x - rect.min.x).max(0.0);
                if ruler_resp.drag_started() || ruler_resp.clicked() {
                    cmd.push(ReviewCommand::Pause);
                    self.emit_seek(t, true, cmd);
                } else {
                    // Mid-drag: only emit when the cursor has moved at least one
                    // frame's worth of time — at low zoom many pixels map to the
                    // same 1/30 s bucket.
                    self.emit_seek(t, false, cmd);
                }
            }
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        } else if ruler_resp.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_segments(
        &mut self,
        ui:        &mut Ui,
        painter:   &egui::Painter,
        rect:      Rect,
        lane_top:  f32,
        state:     &ReviewState,
        vis_start: f64,
        vis_end:   f64,
        cmd:       &mut Vec<ReviewCommand>,
    ) {
        let Some(tl) = state.timeline.as_ref() else { return };
        let coords = state.coords;

        for seg in &tl.segments {
            if seg.end < vis_start || seg.start > vis_end {
                continue;
            }

            let x0 = rect.min.x + coords.time_to_pixels(seg.start);
            let x1 = rect.min.x + coords.time_to_pixels(seg.end);
            let seg_rect = Rect::from_min_max(
                Pos2::new(x0, lane_top),
                Pos2::new(x1.max(x0 + 2.0), lane_top + SEGMENT_H));

            let is_selected = state.selected_segment == Some(seg.id);
            let mut fill = segment_fill(seg.state);
            if seg.state == SegmentState::Drop {
                fill = fill.linear_multiply(0.6);
            }
            painter.rect_filled(seg_rect, 3.0, fill);

            // Per-segment trim dimming: the cut-away head/tail reads darker.
            // While a handle drag is live, preview the dragged values instead.
            let (trim_start, trim_end) = match &self.trim_drag {
                Some(d) if d.id == seg.id => (d.trim_start, d.trim_end),
                _ => (seg.trim_start, seg.trim_end),
            };
            if let Some(ts) = trim_start {
                if ts > seg.start {
                    let tx = rect.min.x + coords.time_to_pixels(ts);
                    painter.rect_filled(
                        Rect::from_min_max(seg_rect.min, Pos2::new(tx, seg_rect.max.y)),
                        0.0, Color32::from_black_alpha(140));
                }
            }
            if let Some(te) = trim_end {
                if te < seg.end {
                    let tx = rect.min.x + coords.time_to_pixels(te);
                    painter.rect_filled(
                        Rect::from_min_max(Pos2::new(tx, seg_rect.min.y), seg_rect.max),
                        0.0, Color32::from_black_alpha(140));
                }
            }

            painter.rect_stroke(seg_rect, 3,
                Stroke::new(if is_selected { 1.5 } else { 1.0 },
                    if is_selected { SEG_SELECTED } else { DARK_BORDER }),
                egui::StrokeKind::Outside);

            let width = seg_rect.width();
            if width > 30.0 {
                let caption = if seg.translated_text.is_empty() {
                    &seg.source_text
                } else {
                    &seg.translated_text
                };
                painter.text(seg_rect.min + Vec2::new(5.0, 6.0), Align2::LEFT_TOP,
                    fit_label(caption, width - 10.0),
                    FontId::proportional(11.0),
                    Color32::from_rgba_unmultiplied(255, 255, 255, 220));
            }
            if width > 50.0 {
                painter.text(seg_rect.right_bottom() - Vec2::new(4.0, 3.0),
                    Align2::RIGHT_BOTTOM, format!("{:.1}s", seg.duration()),
                    FontId::monospace(9.0),
                    Color32::from_rgba_unmultiplied(255, 255, 255, 130));
            }

            // ── Trim handles (selected segment only) ──────────────────────────
            // Dragging accumulates locally; the single backend write goes out
            // on release so a slow drag doesn't fire a request per frame.
            if is_selected {
                self.segment_trim_handles(ui, rect, seg_rect, seg, coords, cmd);
            }

            // ── Click / context menu ──────────────────────────────────────────
            let seg_resp = ui.interact(seg_rect, Id::new(("segment", seg.id)), Sense::click());
            if seg_resp.double_clicked() {
                cmd.push(ReviewCommand::Pause);
                cmd.push(ReviewCommand::Seek(seg.start));
            } else if seg_resp.clicked() {
                cmd.push(ReviewCommand::SelectSegment(Some(seg.id)));
            }
            seg_resp.context_menu(|ui| {
                ui.set_min_width(140.0);
                for (label, seg_state) in [
                    ("✔ Keep",      SegmentState::Keep),
                    ("✖ Drop",      SegmentState::Drop),
                    ("↺ Undecided", SegmentState::Undecided),
                ] {
                    if ui.button(label).clicked() {
                        cmd.push(ReviewCommand::SetSegmentState { id: seg.id, state: seg_state });
                        ui.close();
                    }
                }
            });
        }
    }

    fn segment_trim_handles(
        &mut self,
        ui:       &mut Ui,
        rect:     Rect,
        seg_rect: Rect,
        seg:      &dubcut_core::state::Segment,
        coords:   dubcut_core::coords::TimeCoordinateSpace,
        cmd:      &mut Vec<ReviewCommand>,
    ) {
        let trim_w = 7.0_f32;
        let left_rect = Rect::from_min_size(seg_rect.min, egui::vec2(trim_w, seg_rect.height()));
        let right_rect = Rect::from_min_max(
            Pos2::new(seg_rect.max.x - trim_w, seg_rect.min.y), seg_rect.max);

        let left  = ui.interact(left_rect,  Id::new(("seg_trim_l", seg.id)), Sense::drag());
        let right = ui.interact(right_rect, Id::new(("seg_trim_r", seg.id)), Sense::drag());

        if left.hovered() || right.hovered() || left.dragged() || right.dragged() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        }

        if left.drag_started() || right.drag_started() {
            self.trim_drag = Some(TrimDrag {
                id:         seg.id,
                trim_start: seg.trim_start,
                trim_end:   seg.trim_end,
            });
        }

        let pointer_time = |resp: &egui::Response| {
            resp.interact_pointer_pos()
                .map(|p| coords.pixels_to_time(p.x - rect.min.x))
        };

        let mut finished = false;
        if let Some(drag) = self.trim_drag.as_mut().filter(|d| d.id == seg.id) {
            if left.dragged() {
                if let Some(t) = pointer_time(&left) {
                    drag.trim_start = Some(t.clamp(seg.start, drag.trim_end.unwrap_or(seg.end)));
                }
            }
            if right.dragged() {
                if let Some(t) = pointer_time(&right) {
                    drag.trim_end = Some(t.clamp(drag.trim_start.unwrap_or(seg.start), seg.end));
                }
            }
            if left.drag_stopped() || right.drag_stopped() {
                cmd.push(ReviewCommand::SetSegmentTrim {
                    id:         seg.id,
                    trim_start: drag.trim_start,
                    trim_end:   drag.trim_end,
                });
                finished = true;
            }
        }
        if finished {
            self.trim_drag = None;
        }

        // Handle affordance
        let handle_col = Color32::from_rgba_unmultiplied(255, 255, 255, 90);
        ui.painter().rect_filled(left_rect.shrink2(egui::vec2(2.0, 0.0)),
            egui::CornerRadius { nw: 3, ne: 0, sw: 3, se: 0 }, handle_col);
        ui.painter().rect_filled(right_rect.shrink2(egui::vec2(2.0, 0.0)),
            egui::CornerRadius { nw: 0, ne: 3, sw: 0, se: 3 }, handle_col);
    }

    fn draw_pins(
        &mut self,
        ui:       &mut Ui,
        painter:  &egui::Painter,
        rect:     Rect,
        lane_top: f32,
        state:    &ReviewState,
        cmd:      &mut Vec<ReviewCommand>,
    ) {
        let Some(tl) = state.timeline.as_ref() else { return };
        let coords = state.coords;

        for pin in &tl.pinned_cards {
            let x0 = rect.min.x + coords.time_to_pixels(pin.display_start);
            let x1 = rect.min.x + coords.time_to_pixels(pin.display_end);
            // Enforce a minimum on-screen width, expanded around the window
            // center so tiny display windows stay clickable at low zoom.
            let (x0, x1) = if x1 - x0 < MIN_PIN_PX {
                let mid = (x0 + x1) * 0.5;
                (mid - MIN_PIN_PX * 0.5, mid + MIN_PIN_PX * 0.5)
            } else {
                (x0, x1)
            };
            let pin_rect = Rect::from_min_max(
                Pos2::new(x0, lane_top + 2.0),
                Pos2::new(x1, lane_top + PIN_H - 2.0));

            painter.rect_filled(pin_rect, 4.0, PIN_MARKER.linear_multiply(0.30));
            painter.rect_stroke(pin_rect, 4.0, Stroke::new(1.0, PIN_MARKER),
                egui::StrokeKind::Outside);
            painter.text(pin_rect.left_center() + Vec2::new(5.0, 0.0), Align2::LEFT_CENTER,
                fit_label(pin.card.title(), pin_rect.width() - 8.0),
                FontId::proportional(10.0), PIN_MARKER);

            // Anchor tick at the exact pinned instant — the marker body shows
            // the display window, which can be wider.
            let anchor_x = rect.min.x + coords.time_to_pixels(pin.timestamp);
            painter.line_segment(
                [Pos2::new(anchor_x, pin_rect.max.y),
                 Pos2::new(anchor_x, lane_top + PIN_H + 2.0)],
                Stroke::new(2.0, PIN_MARKER));

            let pin_resp = ui.interact(pin_rect, Id::new(("pin", pin.id)), Sense::click());
            let pin_resp = pin_resp.on_hover_ui(|ui| {
                ui.label(RichText::new(pin.card.title()).strong().size(11.0));
                if let Some(note) = &pin.note {
                    ui.label(RichText::new(note).size(10.0).color(DARK_TEXT_DIM));
                }
            });
            if pin_resp.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
            if pin_resp.clicked() {
                cmd.push(ReviewCommand::OpenPinnedCard(pin.id));
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_audio_lanes(
        &self,
        painter:   &egui::Painter,
        rect:      Rect,
        audio_top: f32,
        state:     &ReviewState,
        ctx:       &AppContext,
        duration:  f64,
        vis_start: f64,
        vis_end:   f64,
    ) {
        let coords = state.coords;
        for (i, &track) in TrackKind::ALL.iter().enumerate() {
            let y = audio_top + i as f32 * (AUDIO_H + LANE_GAP);
            let lane = Rect::from_min_size(
                Pos2::new(rect.min.x, y), egui::vec2(rect.width(), AUDIO_H));
            painter.rect_filled(lane, 0.0,
                if i % 2 == 0 { Color32::from_rgba_unmultiplied(255, 255, 255, 3) }
                else { Color32::TRANSPARENT });

            let Some(peaks) = ctx.waveforms.get(&track) else {
                painter.text(Pos2::new(rect.min.x + 8.0, lane.center().y),
                    Align2::LEFT_CENTER, "fetching waveform…",
                    FontId::proportional(10.0), DARK_TEXT_DIM);
                continue;
            };
            if peaks.is_empty() || duration <= 0.0 {
                continue;
            }

            let muted  = state.mixer.effective_muted(track);
            let volume = state.mixer.track(track).volume;
            let tint   = if muted {
                track_tint(track).linear_multiply(0.18)
            } else {
                track_tint(track)
            };

            // One column per on-screen pixel, sampled from the fixed-resolution
            // envelope through the time mapping — zoom-independent by design.
            let x_start = rect.min.x + coords.time_to_pixels(vis_start);
            let x_end   = rect.min.x + coords.time_to_pixels(vis_end.min(duration));
            let mid_y   = lane.center().y;
            let mut x = x_start;
            while x <= x_end {
                let t    = coords.pixels_to_time(x - rect.min.x);
                let idx  = ((t / duration) * peaks.len() as f64) as usize;
                let peak = peaks[idx.min(peaks.len() - 1)];
                let half = peak * volume * (AUDIO_H * 0.44);
                painter.line_segment(
                    [Pos2::new(x, mid_y - half), Pos2::new(x, mid_y + half)],
                    Stroke::new(1.0, tint));
                x += 1.0;
            }
        }
    }

    fn draw_playhead(
        &mut self,
        ui:      &mut Ui,
        painter: &egui::Painter,
        rect:    Rect,
        state:   &ReviewState,
        cmd:     &mut Vec<ReviewCommand>,
    ) {
        let coords = state.coords;
        let ph_x = rect.min.x + coords.time_to_pixels(state.current_time);
        painter.line_segment(
            [Pos2::new(ph_x + 1.0, rect.min.y), Pos2::new(ph_x + 1.0, rect.max.y)],
            Stroke::new(1.0, Color32::from_black_alpha(60)));
        painter.line_segment(
            [Pos2::new(ph_x, rect.min.y), Pos2::new(ph_x, rect.max.y)],
            Stroke::new(2.0, ACCENT));
        painter.add(egui::Shape::convex_polygon(
            vec![Pos2::new(ph_x - 6.0, rect.min.y),
                 Pos2::new(ph_x + 6.0, rect.min.y),
                 Pos2::new(ph_x, rect.min.y + 12.0)],
            ACCENT, Stroke::NONE));

        // Playhead handle drag — the handle is the exclusive drag owner while
        // held, so a drag wandering over segments or pins never re-targets.
        let handle_rect = Rect::from_center_size(
            Pos2::new(ph_x, rect.min.y + 6.0), egui::vec2(16.0, 16.0));
        let handle_resp = ui.interact(
            handle_rect, Id::new("playhead_handle"), Sense::click_and_drag());
        if handle_resp.dragged() {
            if let Some(ptr) = handle_resp.interact_pointer_pos() {
                let t = coords.pixels_to_time(ptr.x - rect.min.x).max(0.0);
                if handle_resp.drag_started() {
                    cmd.push(ReviewCommand::Pause);
                    self.emit_seek(t, true, cmd);
                } else {
                    // Same dedup as the ruler: skip sub-frame deltas mid-drag.
                    self.emit_seek(t, false, cmd);
                }
            }
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        } else if handle_resp.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        }
    }
}

/// Shade the regions the video trim cuts away, across every lane, with a
/// bright edge line at each trim boundary.
fn draw_trim_shade(painter: &egui::Painter, rect: Rect, state: &ReviewState) {
    let Some(tl) = state.timeline.as_ref() else { return };
    let coords = state.coords;
    let shade = Color32::from_black_alpha(120);

    if tl.video_trim_start > 0.0 {
        let x = rect.min.x + coords.time_to_pixels(tl.video_trim_start);
        painter.rect_filled(
            Rect::from_min_max(Pos2::new(rect.min.x, rect.min.y + RULER_H), Pos2::new(x, rect.max.y)),
            0.0, shade);
        painter.line_segment(
            [Pos2::new(x, rect.min.y + RULER_H), Pos2::new(x, rect.max.y)],
            Stroke::new(1.0, SEG_SELECTED));
    }
    if let Some(end) = tl.video_trim_end {
        if end < tl.duration {
            let x = rect.min.x + coords.time_to_pixels(end);
            let x_max = rect.min.x + coords.time_to_pixels(tl.duration);
            painter.rect_filled(
                Rect::from_min_max(Pos2::new(x, rect.min.y + RULER_H), Pos2::new(x_max, rect.max.y)),
                0.0, shade);
            painter.line_segment(
                [Pos2::new(x, rect.min.y + RULER_H), Pos2::new(x, rect.max.y)],
                Stroke::new(1.0, SEG_SELECTED));
        }
    }
}

/// Fixed left column: lane labels for the ruler/segment/pin rows and the
/// mute / solo / volume strip for each audio track.
fn track_header_column(ui: &mut Ui, state: &ReviewState, ctx: &AppContext, cmd: &mut Vec<ReviewCommand>) {
    ui.allocate_ui(egui::vec2(HEADER_W, 0.0), |ui| {
        ui.set_width(HEADER_W);
        ui.vertical(|ui| {
            // Spacers matching the ruler / segment / pin lanes.
            ui.allocate_space(egui::vec2(HEADER_W, RULER_H));
            ui.allocate_ui(egui::vec2(HEADER_W, SEGMENT_H), |ui| {
                ui.label(RichText::new("Segments").size(10.0).color(DARK_TEXT_DIM));
            });
            ui.allocate_ui(egui::vec2(HEADER_W, PIN_H), |ui| {
                ui.label(RichText::new("Pins").size(10.0).color(DARK_TEXT_DIM));
            });

            for track in TrackKind::ALL {
                ui.allocate_ui(egui::vec2(HEADER_W, AUDIO_H), |ui| {
                    let t = state.mixer.track(track);
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(track.label())
                                .size(10.0)
                                .color(track_tint(track)),
                        );
                        if ctx.waveforms.get(&track).is_none()
                            && ui.small_button("↻")
                                .on_hover_text("Fetch waveform")
                                .clicked()
                        {
                            cmd.push(ReviewCommand::GenerateWaveform(track));
                        }
                    });
                    ui.horizontal(|ui| {
                        if ui.selectable_label(t.muted, "M")
                            .on_hover_text("Mute")
                            .clicked()
                        {
                            cmd.push(ReviewCommand::SetTrackMuted { track, muted: !t.muted });
                        }
                        if ui.selectable_label(t.solo, "S")
                            .on_hover_text("Solo")
                            .clicked()
                        {
                            cmd.push(ReviewCommand::SetTrackSolo { track, solo: !t.solo });
                        }
                        let mut vol = t.volume;
                        if ui.add(
                            egui::Slider::new(&mut vol, 0.0..=1.0)
                                .show_value(false),
                        ).changed() {
                            cmd.push(ReviewCommand::SetTrackVolume { track, volume: vol });
                        }
                    });
                });
            }
        });
    });
}
