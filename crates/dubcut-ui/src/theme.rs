// src/theme.rs
use egui::{Context, Color32, Stroke, Visuals, Style};

// ── Palette ──────────────────────────────────────────────────────────────────
pub const ACCENT:        Color32 = Color32::from_rgb( 64, 196, 212);
pub const ACCENT_DIM:    Color32 = Color32::from_rgb( 30, 118, 130);
pub const ACCENT_HOVER:  Color32 = Color32::from_rgb(120, 224, 238);

pub const DARK_BG_0:     Color32 = Color32::from_rgb( 13,  14,  17);
pub const DARK_BG_1:     Color32 = Color32::from_rgb( 19,  21,  26);
pub const DARK_BG_2:     Color32 = Color32::from_rgb( 27,  30,  37);
pub const DARK_BG_3:     Color32 = Color32::from_rgb( 37,  41,  50);
pub const DARK_BG_4:     Color32 = Color32::from_rgb( 49,  54,  66);

pub const DARK_TEXT:     Color32 = Color32::from_rgb(218, 222, 230);
pub const DARK_TEXT_DIM: Color32 = Color32::from_rgb(118, 124, 140);
pub const DARK_BORDER:   Color32 = Color32::from_rgb( 54,  58,  72);

// Segment lane colors by review state.
pub const SEG_KEEP:      Color32 = Color32::from_rgb( 44, 132,  86);
pub const SEG_DROP:      Color32 = Color32::from_rgb(140,  56,  52);
pub const SEG_UNDECIDED: Color32 = Color32::from_rgb( 62,  72,  92);
pub const SEG_SELECTED:  Color32 = Color32::from_rgb(196, 132,  48);

// Audio lane waveform tints (original / dubbing / bgm).
pub const WAVE_ORIGINAL: Color32 = Color32::from_rgb(110, 170, 240);
pub const WAVE_DUBBING:  Color32 = Color32::from_rgb(100, 230, 160);
pub const WAVE_BGM:      Color32 = Color32::from_rgb(190, 140, 240);

pub const PIN_MARKER:    Color32 = Color32::from_rgb(230, 190,  80);

pub fn configure_style(ctx: &Context) {
    let mut style = Style::default();

    style.spacing.item_spacing     = egui::vec2(6.0, 5.0);
    style.spacing.window_margin    = egui::Margin::same(10);
    style.spacing.button_padding   = egui::vec2(10.0, 5.0);
    style.spacing.scroll.bar_width = 8.0;
    style.spacing.indent           = 12.0;

    let cr = egui::CornerRadius::same(4);

    let mut v = Visuals::dark();
    v.panel_fill             = DARK_BG_1;
    v.window_fill            = DARK_BG_2;
    v.faint_bg_color         = DARK_BG_0;
    v.extreme_bg_color       = DARK_BG_0;
    v.window_stroke          = Stroke::new(1.0, DARK_BORDER);

    v.selection.bg_fill      = ACCENT;
    v.selection.stroke       = Stroke::new(1.0, Color32::BLACK);
    v.hyperlink_color        = ACCENT_HOVER;

    v.widgets.noninteractive.bg_fill       = DARK_BG_2;
    v.widgets.noninteractive.bg_stroke     = Stroke::new(1.0, DARK_BORDER);
    v.widgets.noninteractive.fg_stroke     = Stroke::new(1.0, DARK_TEXT_DIM);
    v.widgets.noninteractive.corner_radius = cr;

    v.widgets.inactive.bg_fill             = DARK_BG_3;
    v.widgets.inactive.bg_stroke           = Stroke::new(1.0, DARK_BORDER);
    v.widgets.inactive.fg_stroke           = Stroke::new(1.0, DARK_TEXT);
    v.widgets.inactive.corner_radius       = cr;

    v.widgets.hovered.bg_fill              = DARK_BG_4;
    v.widgets.hovered.bg_stroke            = Stroke::new(1.0, ACCENT_DIM);
    v.widgets.hovered.fg_stroke            = Stroke::new(1.5, ACCENT_HOVER);
    v.widgets.hovered.corner_radius        = cr;

    v.widgets.active.bg_fill               = ACCENT_DIM;
    v.widgets.active.bg_stroke             = Stroke::new(1.0, ACCENT);
    v.widgets.active.fg_stroke             = Stroke::new(2.0, Color32::WHITE);
    v.widgets.active.corner_radius         = cr;

    v.widgets.open.bg_fill                 = DARK_BG_4;
    v.widgets.open.bg_stroke               = Stroke::new(1.0, ACCENT_DIM);
    v.widgets.open.fg_stroke               = Stroke::new(1.5, ACCENT_HOVER);
    v.widgets.open.corner_radius           = cr;

    v.override_text_color = Some(DARK_TEXT);

    ctx.set_visuals(v);
    ctx.set_style(style);

    ctx.style_mut(|s| {
        s.visuals.window_corner_radius = cr;
        s.visuals.menu_corner_radius   = cr;
    });
}

/// Segment body fill for a review state.
pub fn segment_fill(state: dubcut_core::state::SegmentState) -> Color32 {
    use dubcut_core::state::SegmentState;
    match state {
        SegmentState::Keep      => SEG_KEEP,
        SegmentState::Drop      => SEG_DROP,
        SegmentState::Undecided => SEG_UNDECIDED,
    }
}

/// Waveform tint for an audio track.
pub fn track_tint(track: dubcut_core::mixer::TrackKind) -> Color32 {
    use dubcut_core::mixer::TrackKind;
    match track {
        TrackKind::Original => WAVE_ORIGINAL,
        TrackKind::Dubbing  => WAVE_DUBBING,
        TrackKind::Bgm      => WAVE_BGM,
    }
}
