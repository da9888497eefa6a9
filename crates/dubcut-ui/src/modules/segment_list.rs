// crates/dubcut-ui/src/modules/segment_list.rs
//
// Left panel: the segment review list. Bulk keep/drop/reset, video trim
// controls, and one row per segment with inline translated-text editing.

use super::ReviewModule;
use crate::context::AppContext;
use crate::helpers::format::truncate;
use crate::theme::{segment_fill, ACCENT, DARK_BG_2, DARK_TEXT_DIM, SEG_SELECTED};
use dubcut_core::commands::ReviewCommand;
use dubcut_core::helpers::time::format_time;
use dubcut_core::state::{ReviewState, SegmentState};
use egui::{Color32, RichText, Stroke, Ui};
use uuid::Uuid;

pub struct SegmentListModule {
    /// Segment whose translated text is being edited, with the draft buffer.
    /// The SetSegmentText command goes out on Save, not per keystroke.
    editing: Option<(Uuid, String)>,
}

impl SegmentListModule {
    pub fn new() -> Self {
        Self { editing: None }
    }
}

impl ReviewModule for SegmentListModule {
    fn name(&self) -> &str { "Segments" }

    fn ui(&mut self, ui: &mut Ui, state: &ReviewState, _ctx: &AppContext, cmd: &mut Vec<ReviewCommand>) {
        let Some(tl) = state.timeline.as_ref() else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No timeline loaded").color(DARK_TEXT_DIM));
            });
            return;
        };

        // ── Header + tallies ──────────────────────────────────────────────────
        let kept = tl.segments.iter().filter(|s| s.state == SegmentState::Keep).count();
        let dropped = tl.segments.iter().filter(|s| s.state == SegmentState::Drop).count();
        let undecided = tl.segments.len() - kept - dropped;

        ui.horizontal(|ui| {
            ui.label(RichText::new("Segments").strong().size(13.0).color(ACCENT));
            ui.label(
                RichText::new(format!("{kept} keep · {dropped} drop · {undecided} open"))
                    .size(10.0)
                    .color(DARK_TEXT_DIM),
            );
        });

        // ── Bulk ops ──────────────────────────────────────────────────────────
        ui.horizontal(|ui| {
            if ui.button("✔ Keep all").clicked()  { cmd.push(ReviewCommand::KeepAll);  }
            if ui.button("✖ Drop all").clicked()  { cmd.push(ReviewCommand::DropAll);  }
            if ui.button("↺ Reset all").clicked() { cmd.push(ReviewCommand::ResetAll); }
        });

        // ── Video trim ────────────────────────────────────────────────────────
        egui::Frame::new()
            .fill(DARK_BG_2)
            .inner_margin(egui::Margin::same(6))
            .corner_radius(egui::CornerRadius::same(4))
            .show(ui, |ui| {
                ui.label(RichText::new("Video trim").size(10.0).color(DARK_TEXT_DIM));
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!(
                            "{} → {}",
                            format_time(tl.video_trim_start),
                            format_time(tl.playable_end()),
                        ))
                        .monospace()
                        .size(10.0),
                    );
                });
                ui.horizontal(|ui| {
                    if ui.small_button("⇤ start here")
                        .on_hover_text("Trim the video start to the playhead")
                        .clicked()
                    {
                        cmd.push(ReviewCommand::SetVideoTrim {
                            start: Some(state.current_time),
                            end:   None,
                        });
                    }
                    if ui.small_button("end here ⇥")
                        .on_hover_text("Trim the video end to the playhead")
                        .clicked()
                    {
                        cmd.push(ReviewCommand::SetVideoTrim {
                            start: None,
                            end:   Some(state.current_time),
                        });
                    }
                    if ui.small_button("reset").clicked() {
                        cmd.push(ReviewCommand::ResetTrim);
                    }
                });
            });

        ui.separator();

        // ── Segment rows ──────────────────────────────────────────────────────
        egui::ScrollArea::vertical()
            .id_salt("segment_list_scroll")
            .show(ui, |ui| {
                for seg in &tl.segments {
                    let is_selected = state.selected_segment == Some(seg.id);
                    let pin_count   = tl.pin_count(seg.id);

                    let frame = egui::Frame::new()
                        .fill(if is_selected { DARK_BG_2 } else { Color32::TRANSPARENT })
                        .stroke(if is_selected {
                            Stroke::new(1.0, SEG_SELECTED)
                        } else {
                            Stroke::NONE
                        })
                        .inner_margin(egui::Margin::same(5))
                        .corner_radius(egui::CornerRadius::same(4));

                    let inner = frame.show(ui, |ui| {
                        ui.horizontal(|ui| {
                            // State dot
                            let (rect, _) = ui.allocate_exact_size(
                                egui::vec2(8.0, 8.0), egui::Sense::hover());
                            ui.painter().circle_filled(
                                rect.center(), 4.0, segment_fill(seg.state));

                            ui.label(
                                RichText::new(format!(
                                    "{} – {}",
                                    format_time(seg.start),
                                    format_time(seg.end),
                                ))
                                .monospace()
                                .size(10.0)
                                .color(DARK_TEXT_DIM),
                            );
                            if pin_count > 0 {
                                ui.label(
                                    RichText::new(format!("📌{pin_count}"))
                                        .size(9.0)
                                        .color(crate::theme::PIN_MARKER),
                                );
                            }

                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    for (label, seg_state, hover) in [
                                        ("K", SegmentState::Keep,      "Keep"),
                                        ("D", SegmentState::Drop,      "Drop"),
                                        ("U", SegmentState::Undecided, "Undecided"),
                                    ] {
                                        if ui.selectable_label(seg.state == seg_state, label)
                                            .on_hover_text(hover)
                                            .clicked()
                                        {
                                            cmd.push(ReviewCommand::SetSegmentState {
                                                id:    seg.id,
                                                state: seg_state,
                                            });
                                        }
                                    }
                                },
                            );
                        });

                        ui.label(
                            RichText::new(truncate(&seg.source_text, 120))
                                .size(10.0)
                                .color(DARK_TEXT_DIM),
                        );

                        // Translated text: read-only label, or the open editor.
                        let editing_this = self.editing.as_ref()
                            .map(|(id, _)| *id == seg.id)
                            .unwrap_or(false);
                        if editing_this {
                            if let Some((_, draft)) = self.editing.as_mut() {
                                ui.add(
                                    egui::TextEdit::multiline(draft)
                                        .desired_rows(2)
                                        .desired_width(f32::INFINITY),
                                );
                            }
                            ui.horizontal(|ui| {
                                if ui.small_button("Save").clicked() {
                                    if let Some((id, draft)) = self.editing.take() {
                                        cmd.push(ReviewCommand::SetSegmentText {
                                            id,
                                            translated: draft,
                                        });
                                    }
                                }
                                if ui.small_button("Cancel").clicked() {
                                    self.editing = None;
                                }
                            });
                        } else {
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(truncate(&seg.translated_text, 120)).size(11.0),
                                );
                                if ui.small_button("✏")
                                    .on_hover_text("Edit translated text")
                                    .clicked()
                                {
                                    self.editing =
                                        Some((seg.id, seg.translated_text.clone()));
                                }
                            });
                        }
                    });

                    // Row click selects and jumps the playhead to the segment.
                    let row_resp = inner.response.interact(egui::Sense::click());
                    if row_resp.clicked() && !editing_this_row(&self.editing, seg.id) {
                        cmd.push(ReviewCommand::SelectSegment(Some(seg.id)));
                        cmd.push(ReviewCommand::Pause);
                        cmd.push(ReviewCommand::Seek(seg.start));
                    }
                }
            });
    }
}

fn editing_this_row(editing: &Option<(Uuid, String)>, id: Uuid) -> bool {
    editing.as_ref().map(|(eid, _)| *eid == id).unwrap_or(false)
}
