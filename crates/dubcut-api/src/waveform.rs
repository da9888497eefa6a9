// crates/dubcut-api/src/waveform.rs
//
// Envelope normalization for track waveforms. The backend returns a raw
// amplitude array of whatever length its analysis produced; we reduce it to
// a fixed column count in [0, 1] so the cached result is zoom-independent —
// renderers resample by mapping column index through time_to_pixels.

/// Fixed envelope resolution. One entry per column regardless of duration.
pub const ENVELOPE_COLS: usize = 1000;

/// Reduce `samples` to at most [`ENVELOPE_COLS`] peak values normalized to
/// [0, 1]. Empty input yields an empty envelope (rendered as a flat lane).
pub fn normalize_envelope(samples: &[f32]) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let block = (samples.len() / ENVELOPE_COLS).max(1);
    let peaks: Vec<f32> = samples
        .chunks(block)
        .take(ENVELOPE_COLS)
        .map(|chunk| chunk.iter().map(|s| s.abs()).fold(0.0f32, f32::max))
        .collect();

    let max = peaks.iter().fold(0.0f32, |a, &b| a.max(b));
    if max <= f32::EPSILON {
        // Silent track — keep the zeros rather than dividing by ~0.
        return peaks;
    }
    peaks.iter().map(|p| p / max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_bounded_and_capped() {
        let samples: Vec<f32> = (0..50_000).map(|i| ((i % 37) as f32 - 18.0) * 0.3).collect();
        let env = normalize_envelope(&samples);
        assert!(env.len() <= ENVELOPE_COLS);
        assert!(env.iter().all(|&p| (0.0..=1.0).contains(&p)));
        assert!(env.iter().any(|&p| p == 1.0)); // peak normalizes to exactly 1
    }

    #[test]
    fn short_input_keeps_one_peak_per_sample() {
        let env = normalize_envelope(&[0.1, -0.5, 0.25]);
        assert_eq!(env.len(), 3);
        assert_eq!(env[1], 1.0);
    }

    #[test]
    fn empty_input_yields_empty_envelope() {
        assert!(normalize_envelope(&[]).is_empty());
    }

    #[test]
    fn silence_stays_zero() {
        let env = normalize_envelope(&[0.0; 512]);
        assert!(env.iter().all(|&p| p == 0.0));
    }
}
