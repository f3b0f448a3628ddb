pub(crate) mod bars;
pub(crate) mod glitter;
pub(crate) mod gradient;

use crate::color::Color;

pub trait LightingEffect {
    /// Fill every pixel for time `now_ms`. Returns false when the effect
    /// refused to draw and left `pixels` untouched.
    fn render(&self, now_ms: u64, pixels: &mut [Color]) -> bool;
}

/// Whole pixel steps the animation has advanced by `now_ms`.
fn step_offset(now_ms: u64, speed_ms: u64) -> u64 {
    if speed_ms == 0 {
        0
    } else {
        now_ms / speed_ms
    }
}
