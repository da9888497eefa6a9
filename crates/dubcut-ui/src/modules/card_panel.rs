// crates/dubcut-ui/src/modules/card_panel.rs
//
// Right panel: card lookup, the currently open card, and the pinned-card
// list with debounced note editing.

use super::ReviewModule;
use crate::context::AppContext;
use crate::theme::{ACCENT, DARK_BG_2, DARK_BORDER, DARK_TEXT_DIM, PIN_MARKER};
use dubcut_core::commands::ReviewCommand;
use dubcut_core::helpers::time::format_time;
use dubcut_core::state::{CardKind, ReviewState};
use egui::{RichText, Stroke, Ui};
use uuid::Uuid;

fn kind_icon(kind: CardKind) -> &'static str {
    match kind {
        CardKind::Word    => "📖",
        CardKind::Entity  => "🏛",
        CardKind::Idiom   => "💬",
        CardKind::Insight => "💡",
    }
}

pub struct CardPanelModule {
    lookup_kind: CardKind,
    lookup_id:   String,
    /// Pin whose note editor is open, with the draft text. Every change
    /// emits SetPinNote; the backend write is debounced app-side.
    note_draft:  Option<(Uuid, String)>,
}

impl CardPanelModule {
    pub fn new() -> Self {
        Self {
            lookup_kind: CardKind::Word,
            lookup_id:   String::new(),
            note_draft:  None,
        }
    }
}

impl ReviewModule for CardPanelModule {
    fn name(&self) -> &str { "Cards" }

    fn ui(&mut self, ui: &mut Ui, state: &ReviewState, ctx: &AppContext, cmd: &mut Vec<ReviewCommand>) {
        ui.label(RichText::new("Cards").strong().size(13.0).color(ACCENT));

        // ── Lookup row ────────────────────────────────────────────────────────
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("card_kind")
                .selected_text(self.lookup_kind.as_str())
                .width(72.0)
                .show_ui(ui, |ui| {
                    for kind in [CardKind::Word, CardKind::Entity, CardKind::Idiom, CardKind::Insight] {
                        ui.selectable_value(&mut self.lookup_kind, kind, kind.as_str());
                    }
                });
            ui.add(
                egui::TextEdit::singleline(&mut self.lookup_id)
                    .hint_text("card id")
                    .desired_width(110.0),
            );
            if ui.add_enabled(!self.lookup_id.is_empty(), egui::Button::new("🔍"))
                .on_hover_text("Look up")
                .clicked()
            {
                cmd.push(ReviewCommand::OpenCard {
                    kind:          self.lookup_kind,
                    card_id:       self.lookup_id.clone(),
                    force_refresh: false,
                });
            }
        });

        ui.separator();

        // ── Open card ─────────────────────────────────────────────────────────
        if let Some(card) = &ctx.open_card {
            egui::Frame::new()
                .fill(DARK_BG_2)
                .stroke(Stroke::new(1.0, DARK_BORDER))
                .inner_margin(egui::Margin::same(8))
                .corner_radius(egui::CornerRadius::same(4))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(kind_icon(card.kind));
                        if let Some(data) = &card.data {
                            ui.label(RichText::new(data.title()).strong().size(12.0));
                        } else {
                            ui.label(
                                RichText::new(&card.card_id).size(11.0).color(DARK_TEXT_DIM),
                            );
                        }
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui.small_button("✕").on_hover_text("Close").clicked() {
                                    cmd.push(ReviewCommand::CloseCard);
                                }
                            },
                        );
                    });

                    if card.loading {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(RichText::new("looking up…").size(10.0).color(DARK_TEXT_DIM));
                        });
                    } else if let Some(data) = &card.data {
                        ui.label(RichText::new(data.body()).size(11.0));
                        // Word cards carry an optional reading line.
                        if let dubcut_core::state::CardData::Word {
                            reading: Some(reading), ..
                        } = data
                        {
                            ui.label(
                                RichText::new(reading).size(10.0).italics().color(DARK_TEXT_DIM),
                            );
                        }
                    }

                    ui.add_space(4.0);
                    ui.horizontal(|ui| {
                        if ui.small_button("↻ Refresh")
                            .on_hover_text("Re-fetch, bypassing the cache")
                            .clicked()
                        {
                            cmd.push(ReviewCommand::OpenCard {
                                kind:          card.kind,
                                card_id:       card.card_id.clone(),
                                force_refresh: true,
                            });
                        }

                        if let Some(pin_id) = card.from_pin {
                            if ui.small_button("📌 Unpin").clicked() {
                                cmd.push(ReviewCommand::Unpin(pin_id));
                            }
                        } else {
                            let at_segment = state.segment_at_playhead();
                            let can_pin = card.data.is_some()
                                && at_segment
                                    .map(|s| {
                                        state.timeline.as_ref()
                                            .map(|tl| tl.can_pin(s.id))
                                            .unwrap_or(false)
                                    })
                                    .unwrap_or(false);
                            let hover = if at_segment.is_none() {
                                "Move the playhead into a segment first"
                            } else if !can_pin {
                                "Pin limit reached (2 per segment)"
                            } else {
                                "Pin to the segment at the playhead"
                            };
                            if ui.add_enabled(can_pin, egui::Button::new("📌 Pin").small())
                                .on_hover_text(hover)
                                .on_disabled_hover_text(hover)
                                .clicked()
                            {
                                cmd.push(ReviewCommand::PinOpenCard);
                            }
                        }
                    });
                });
        } else {
            ui.label(
                RichText::new("Look up a card or click a pin marker")
                    .size(10.0)
                    .color(DARK_TEXT_DIM),
            );
        }

        ui.separator();

        // ── Pinned cards ──────────────────────────────────────────────────────
        let Some(tl) = state.timeline.as_ref() else { return };
        ui.label(
            RichText::new(format!("Pinned ({})", tl.pinned_cards.len()))
                .size(11.0)
                .color(PIN_MARKER),
        );

        egui::ScrollArea::vertical()
            .id_salt("pin_list_scroll")
            .show(ui, |ui| {
                for pin in &tl.pinned_cards {
                    egui::Frame::new()
                        .stroke(Stroke::new(1.0, DARK_BORDER))
                        .inner_margin(egui::Margin::same(6))
                        .corner_radius(egui::CornerRadius::same(4))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(kind_icon(pin.card.kind()));
                                ui.label(RichText::new(pin.card.title()).strong().size(11.0));
                                ui.label(
                                    RichText::new(format_time(pin.timestamp))
                                        .monospace()
                                        .size(9.0)
                                        .color(DARK_TEXT_DIM),
                                );
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui.small_button("🗑").on_hover_text("Unpin").clicked() {
                                            cmd.push(ReviewCommand::Unpin(pin.id));
                                        }
                                        if ui.small_button("👁").on_hover_text("Open").clicked() {
                                            cmd.push(ReviewCommand::OpenPinnedCard(pin.id));
                                        }
                                    },
                                );
                            });

                            // ── Note ──────────────────────────────────────────
                            let editing = self.note_draft.as_ref()
                                .map(|(id, _)| *id == pin.id)
                                .unwrap_or(false);
                            if editing {
                                let mut changed = false;
                                if let Some((_, draft)) = self.note_draft.as_mut() {
                                    changed = ui.add(
                                        egui::TextEdit::multiline(draft)
                                            .desired_rows(2)
                                            .desired_width(f32::INFINITY)
                                            .hint_text("note…"),
                                    ).changed();
                                }
                                if changed {
                                    if let Some((pin_id, draft)) = &self.note_draft {
                                        cmd.push(ReviewCommand::SetPinNote {
                                            pin_id: *pin_id,
                                            note:   draft.clone(),
                                        });
                                    }
                                }
                                if ui.small_button("Done").clicked() {
                                    self.note_draft = None;
                                }
                            } else {
                                ui.horizontal(|ui| {
                                    match &pin.note {
                                        Some(note) if !note.is_empty() => {
                                            ui.label(
                                                RichText::new(note).size(10.0).color(DARK_TEXT_DIM),
                                            );
                                        }
                                        _ => {
                                            ui.label(
                                                RichText::new("no note")
                                                    .size(9.0)
                                                    .weak()
                                                    .color(DARK_TEXT_DIM),
                                            );
                                        }
                                    }
                                    if ui.small_button("🗒").on_hover_text("Edit note").clicked() {
                                        self.note_draft = Some((
                                            pin.id,
                                            pin.note.clone().unwrap_or_default(),
                                        ));
                                    }
                                });
                            }
                        });
                }
            });
    }
}
