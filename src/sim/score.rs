//! Score accrual
//!
//! One point per `1 / speed_multiplier` seconds, so scoring speeds up with
//! the game rather than following wall-clock time alone.

/// Award a point if enough time has passed since the last award.
///
/// Returns the new score and the new last-award timestamp.
pub fn tick(score: f64, now_ms: f64, last_update_ms: f64, speed_multiplier: f32) -> (f64, f64) {
    let elapsed_secs = (now_ms - last_update_ms) / 1000.0;
    if elapsed_secs >= 1.0 / speed_multiplier as f64 {
        (score + 1.0, now_ms)
    } else {
        (score, last_update_ms)
    }
}

/// Score as shown to the player
#[inline]
pub fn display(score: f64) -> u64 {
    score.max(0.0).floor() as u64
}
