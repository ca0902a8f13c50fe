use std::time;

/// Seconds since `start`
pub fn time(start: time::Instant) -> f32 {
    start.elapsed().as_secs_f32()
}

/// Clamp to the unit interval
#[inline]
pub fn unit(v: f32) -> f32 {
    v.max(0.0).min(1.0)
}
