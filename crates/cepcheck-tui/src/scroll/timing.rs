use std::time::{Duration, Instant};

/// Animation progress in [0, 1]
#[inline]
pub fn progress(start: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = start.elapsed().as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

#[inline]
pub fn is_complete(start: Instant, duration: Duration) -> bool {
    start.elapsed() >= duration
}

#[inline]
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Interpolate two scroll rows
#[inline]
pub fn lerp_u16(from: u16, to: u16, t: f64) -> u16 {
    lerp(from as f64, to as f64, t).round() as u16
}
