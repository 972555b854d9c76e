// Pure sizing helpers shared by the resize listener and the GPU surface.

/// Canvas backing-store size for a CSS size and device pixel ratio. The ratio
/// is capped at `max_ratio`; each side is at least one pixel.
#[inline]
pub fn backing_size(css_width: f64, css_height: f64, pixel_ratio: f64, max_ratio: f64) -> (u32, u32) {
    let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
        pixel_ratio.min(max_ratio)
    } else {
        1.0
    };
    let w = (css_width.max(0.0) * ratio).round() as u32;
    let h = (css_height.max(0.0) * ratio).round() as u32;
    (w.max(1), h.max(1))
}

/// Container size in whole CSS pixels; `None` when the element has no layout.
#[inline]
pub fn container_size(connected: bool, client_width: i32, client_height: i32) -> Option<(u32, u32)> {
    if !connected || client_width < 0 || client_height < 0 {
        return None;
    }
    Some((client_width as u32, client_height as u32))
}

/// Frame delta in seconds clamped to `[0, max_sec]`.
#[inline]
pub fn clamp_frame_dt(dt_sec: f32, max_sec: f32) -> f32 {
    if dt_sec.is_finite() {
        dt_sec.clamp(0.0, max_sec)
    } else {
        0.0
    }
}
