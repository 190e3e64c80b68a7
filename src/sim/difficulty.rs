//! Time-based difficulty ramp
//!
//! Stateless: everything is derived from elapsed run time each frame.

/// Linear ramp from 1x to `max_multiplier`, saturating at `ramp_duration_ms`
pub fn speed_multiplier(elapsed_ms: f64, ramp_duration_ms: f64, max_multiplier: f32) -> f32 {
    let progress = (elapsed_ms.max(0.0) / ramp_duration_ms).min(1.0) as f32;
    1.0 + progress * (max_multiplier - 1.0)
}

/// Frames between spawns; shrinks as the game speeds up, never below one
pub fn spawn_frequency(base_frequency: u32, speed_multiplier: f32) -> u32 {
    ((base_frequency as f32 / speed_multiplier).floor() as u32).max(1)
}
