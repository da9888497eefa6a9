// crates/dubcut-core/src/coords.rs
//
// TimeCoordinateSpace: the bidirectional time ⇄ pixel mapping that every
// timeline renderer reads.  Parameterized by zoom (pixels per second),
// horizontal scroll, and timeline duration.
//
// Single-writer discipline: the timeline view owns the only mutable handle;
// renderers receive it by shared reference.  One gesture (zoom or scroll)
// is active at a time, so no interior mutability is needed.

use serde::{Deserialize, Serialize};

/// Frame rate used for snap-to-frame quantization. Fixed — the backend
/// renders everything at 30 fps regardless of source material.
pub const FPS: f64 = 30.0;

pub const MIN_ZOOM:  f32 = 10.0;
pub const MAX_ZOOM:  f32 = 500.0;
/// Multiplier applied by zoom_in / zoom_out.
pub const ZOOM_STEP: f32 = 1.5;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TimeCoordinateSpace {
    /// Pixels per second. Always within [MIN_ZOOM, MAX_ZOOM].
    pub zoom:         f32,
    /// Horizontal scroll offset in pixels, ≥ 0.
    pub scroll_x:     f32,
    /// Timeline duration in seconds. 0 until a timeline is loaded.
    pub duration:     f64,
    pub snap_enabled: bool,
}

impl Default for TimeCoordinateSpace {
    fn default() -> Self {
        Self {
            zoom:         50.0,
            scroll_x:     0.0,
            duration:     0.0,
            snap_enabled: true,
        }
    }
}

impl TimeCoordinateSpace {
    /// Seconds → pixels. Exact inverse of `pixels_to_time` up to f32 rounding.
    pub fn time_to_pixels(&self, t: f64) -> f32 {
        (t * self.zoom as f64) as f32
    }

    /// Pixels → seconds. `zoom` is clamped away from 0 so this never divides by zero.
    pub fn pixels_to_time(&self, px: f32) -> f64 {
        px as f64 / self.zoom as f64
    }

    /// Clamps silently — out-of-range zoom requests are never an error.
    pub fn set_zoom(&mut self, z: f32) {
        self.zoom = z.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    /// Quantize `t` to the nearest frame boundary at [`FPS`] when snapping is
    /// enabled; identity otherwise.
    pub fn snap_to_frame(&self, t: f64) -> f64 {
        if self.snap_enabled {
            (t * FPS).round() / FPS
        } else {
            t
        }
    }

    /// The time window currently visible in a viewport `viewport_w` pixels wide.
    /// Empty (start == end == 0) when no timeline is loaded.
    pub fn visible_time_range(&self, viewport_w: f32) -> (f64, f64) {
        let start = (self.scroll_x as f64 / self.zoom as f64).max(0.0);
        let end   = ((self.scroll_x + viewport_w) as f64 / self.zoom as f64).min(self.duration);
        (start.min(self.duration), end.max(0.0).min(self.duration))
    }

    /// Major ruler tick interval in seconds, adaptive on pixels-per-second.
    ///
    /// | zoom (px/s) | interval |
    /// |-------------|----------|
    /// | < 20        | 30 s     |
    /// | < 50        | 10 s     |
    /// | < 100       | 5 s      |
    /// | < 200       | 2 s      |
    /// | ≥ 200       | 1 s      |
    pub fn tick_interval(&self) -> f64 {
        if      self.zoom < 20.0  { 30.0 }
        else if self.zoom < 50.0  { 10.0 }
        else if self.zoom < 100.0 { 5.0  }
        else if self.zoom < 200.0 { 2.0  }
        else                      { 1.0  }
    }

    /// Minor gridline interval — a finer subdivision of the major interval.
    pub fn sub_tick_interval(&self) -> f64 {
        match self.tick_interval() {
            i if i == 30.0 => 10.0,
            i if i == 10.0 => 5.0,
            i if i == 5.0  => 1.0,
            i if i == 2.0  => 0.5,
            _              => 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(zoom: f32, duration: f64) -> TimeCoordinateSpace {
        TimeCoordinateSpace { zoom, scroll_x: 0.0, duration, snap_enabled: true }
    }

    #[test]
    fn time_pixel_round_trip() {
        let cs = space(73.0, 300.0);
        for t in [0.0, 0.5, 12.4, 119.97, 300.0] {
            let back = cs.pixels_to_time(cs.time_to_pixels(t));
            assert!((back - t).abs() < 1e-3, "t={t} came back as {back}");
        }
    }

    #[test]
    fn set_zoom_clamps_silently() {
        let mut cs = space(50.0, 60.0);
        cs.set_zoom(0.001);
        assert_eq!(cs.zoom, MIN_ZOOM);
        cs.set_zoom(1e9);
        assert_eq!(cs.zoom, MAX_ZOOM);
        cs.set_zoom(-3.0);
        assert_eq!(cs.zoom, MIN_ZOOM);
    }

    #[test]
    fn repeated_zoom_in_out_stays_in_bounds() {
        let mut cs = space(50.0, 60.0);
        for _ in 0..50 { cs.zoom_in(); }
        assert_eq!(cs.zoom, MAX_ZOOM);
        for _ in 0..50 { cs.zoom_out(); }
        assert_eq!(cs.zoom, MIN_ZOOM);
    }

    #[test]
    fn snap_rounds_to_thirtieths() {
        let cs = space(50.0, 60.0);
        assert!((cs.snap_to_frame(1.0 / 30.0 * 7.4) - 7.0 / 30.0).abs() < 1e-9);
        assert_eq!(cs.snap_to_frame(2.0), 2.0);
    }

    #[test]
    fn snap_disabled_is_identity() {
        let mut cs = space(50.0, 60.0);
        cs.snap_enabled = false;
        assert_eq!(cs.snap_to_frame(0.2468), 0.2468);
    }

    #[test]
    fn tick_interval_buckets() {
        assert_eq!(space(10.0,  0.0).tick_interval(), 30.0);
        assert_eq!(space(30.0,  0.0).tick_interval(), 10.0);
        // 50 falls in the <100 bucket, not <50.
        assert_eq!(space(50.0,  0.0).tick_interval(), 5.0);
        assert_eq!(space(150.0, 0.0).tick_interval(), 2.0);
        assert_eq!(space(400.0, 0.0).tick_interval(), 1.0);
    }

    #[test]
    fn sub_tick_subdivides_major() {
        assert_eq!(space(10.0,  0.0).sub_tick_interval(), 10.0);
        assert_eq!(space(30.0,  0.0).sub_tick_interval(), 5.0);
        assert_eq!(space(50.0,  0.0).sub_tick_interval(), 1.0);
        assert_eq!(space(150.0, 0.0).sub_tick_interval(), 0.5);
        assert_eq!(space(400.0, 0.0).sub_tick_interval(), 0.25);
    }

    #[test]
    fn visible_range_clamps_to_duration() {
        let mut cs = space(50.0, 10.0);
        cs.scroll_x = 100.0; // 2 s in
        let (start, end) = cs.visible_time_range(1000.0); // 20 s window
        assert!((start - 2.0).abs() < 1e-6);
        assert_eq!(end, 10.0);
    }

    #[test]
    fn short_timeline_range_ends_at_real_duration() {
        // A 10 s timeline in a viewport wide enough for a minute: the
        // visible range (and so the ruler) stops at 10 s, not the lane edge.
        let cs = space(50.0, 10.0);
        let (start, end) = cs.visible_time_range(3000.0);
        assert_eq!(start, 0.0);
        assert_eq!(end, 10.0);
    }

    #[test]
    fn zero_duration_has_empty_visible_range() {
        let cs = space(50.0, 0.0);
        let (start, end) = cs.visible_time_range(800.0);
        assert_eq!(start, 0.0);
        assert_eq!(end, 0.0);
    }
}
