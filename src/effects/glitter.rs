use rand::Rng;

use crate::color::{Color, WHITE};

/// Whether a drawn byte sparkles under `threshold`. 0 never does, and 255
/// still misses on a draw of exactly 255.
pub fn fires(draw: u8, threshold: u8) -> bool {
    draw < threshold
}

/// Maybe turn one random pixel white. Returns true if a pixel was changed.
pub fn sparkle<R: Rng + ?Sized>(pixels: &mut [Color], threshold: u8, rng: &mut R) -> bool {
    if pixels.is_empty() || !fires(rng.gen::<u8>(), threshold) {
        return false;
    }

    let index = rng.gen_range(0..pixels.len());
    pixels[index] = WHITE;
    true
}
