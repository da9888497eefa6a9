// crates/dubcut-core/src/mixer.rs
//
// TrackAudioMixer: per-track mute / solo / volume with DAW-style solo
// resolution.  Ephemeral, session-scoped — never serialized, never sent to
// the backend.  Stored mute flags are untouched by soloing, so clearing the
// last solo restores every track's effective mute exactly.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Original,
    Dubbing,
    Bgm,
}

impl TrackKind {
    pub const ALL: [TrackKind; 3] = [TrackKind::Original, TrackKind::Dubbing, TrackKind::Bgm];

    /// Wire name used in waveform query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            TrackKind::Original => "original",
            TrackKind::Dubbing  => "dubbing",
            TrackKind::Bgm      => "bgm",
        }
    }

    /// Track-header label.
    pub fn label(self) -> &'static str {
        match self {
            TrackKind::Original => "Original",
            TrackKind::Dubbing  => "Dubbed",
            TrackKind::Bgm      => "BGM",
        }
    }

    fn index(self) -> usize {
        match self {
            TrackKind::Original => 0,
            TrackKind::Dubbing  => 1,
            TrackKind::Bgm      => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackAudioState {
    pub muted:  bool,
    pub solo:   bool,
    pub volume: f32,
}

impl Default for TrackAudioState {
    fn default() -> Self {
        Self { muted: false, solo: false, volume: 1.0 }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TrackAudioMixer {
    tracks: [TrackAudioState; 3],
}

impl TrackAudioMixer {
    pub fn track(&self, kind: TrackKind) -> TrackAudioState {
        self.tracks[kind.index()]
    }

    pub fn set_muted(&mut self, kind: TrackKind, muted: bool) {
        self.tracks[kind.index()].muted = muted;
    }

    pub fn set_solo(&mut self, kind: TrackKind, solo: bool) {
        self.tracks[kind.index()].solo = solo;
    }

    /// Clamped to [0, 1].
    pub fn set_volume(&mut self, kind: TrackKind, volume: f32) {
        self.tracks[kind.index()].volume = volume.clamp(0.0, 1.0);
    }

    pub fn any_solo(&self) -> bool {
        self.tracks.iter().any(|t| t.solo)
    }

    /// A track is effectively muted when its own mute flag is set, or when
    /// some other track is soloed and this one is not.
    pub fn effective_muted(&self, kind: TrackKind) -> bool {
        let t = self.track(kind);
        t.muted || (self.any_solo() && !t.solo)
    }

    /// Playback gain for the track: 0 when effectively muted, volume otherwise.
    pub fn effective_volume(&self, kind: TrackKind) -> f32 {
        if self.effective_muted(kind) { 0.0 } else { self.track(kind).volume }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TrackKind::*;

    #[test]
    fn default_nothing_muted() {
        let m = TrackAudioMixer::default();
        for k in TrackKind::ALL {
            assert!(!m.effective_muted(k));
            assert_eq!(m.track(k).volume, 1.0);
        }
    }

    #[test]
    fn solo_silences_others_without_touching_mute_flags() {
        let mut m = TrackAudioMixer::default();
        m.set_solo(Dubbing, true);

        assert!(m.effective_muted(Original));
        assert!(m.effective_muted(Bgm));
        assert!(!m.effective_muted(Dubbing));
        // Stored flags unchanged.
        assert!(!m.track(Original).muted);
        assert!(!m.track(Bgm).muted);
    }

    #[test]
    fn clearing_solo_restores_stored_mutes_exactly() {
        let mut m = TrackAudioMixer::default();
        m.set_muted(Bgm, true);
        m.set_solo(Original, true);

        assert!(m.effective_muted(Dubbing));
        assert!(m.effective_muted(Bgm));

        m.set_solo(Original, false);
        assert!(!m.effective_muted(Original));
        assert!(!m.effective_muted(Dubbing));
        assert!(m.effective_muted(Bgm)); // its own mute flag survives
    }

    #[test]
    fn muted_solo_track_stays_muted() {
        // solo does not override the track's own mute flag
        let mut m = TrackAudioMixer::default();
        m.set_muted(Original, true);
        m.set_solo(Original, true);
        assert!(m.effective_muted(Original));
    }

    #[test]
    fn two_solos_both_audible() {
        let mut m = TrackAudioMixer::default();
        m.set_solo(Original, true);
        m.set_solo(Dubbing, true);
        assert!(!m.effective_muted(Original));
        assert!(!m.effective_muted(Dubbing));
        assert!(m.effective_muted(Bgm));
    }

    #[test]
    fn volume_clamps() {
        let mut m = TrackAudioMixer::default();
        m.set_volume(Bgm, 3.5);
        assert_eq!(m.track(Bgm).volume, 1.0);
        m.set_volume(Bgm, -1.0);
        assert_eq!(m.track(Bgm).volume, 0.0);
    }

    #[test]
    fn effective_volume_is_zero_when_muted() {
        let mut m = TrackAudioMixer::default();
        m.set_volume(Original, 0.7);
        m.set_solo(Dubbing, true);
        assert_eq!(m.effective_volume(Original), 0.0);
        assert_eq!(m.effective_volume(Dubbing), 1.0);
    }
}
