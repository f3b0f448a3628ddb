use crate::color::{Color, ColorScheme};
use crate::effects::{step_offset, LightingEffect};

/// Solid bands of scheme colors, `width` pixels each, sliding one pixel every
/// `speed_ms`.
pub struct Bars {
    scheme: &'static ColorScheme,
    width: usize,
    speed_ms: u64,
}

impl Bars {
    pub fn new(scheme: &'static ColorScheme, width: usize, speed_ms: u64) -> Bars {
        Bars {
            scheme,
            width,
            speed_ms,
        }
    }

    fn fits(&self, pixel_count: usize) -> bool {
        let count = self.scheme.count();
        count > 0 && self.width > 0 && self.width <= pixel_count / count
    }
}

impl LightingEffect for Bars {
    fn render(&self, now_ms: u64, pixels: &mut [Color]) -> bool {
        if !self.fits(pixels.len()) {
            return false;
        }

        let period = (self.scheme.count() * self.width) as u64;
        let offset = step_offset(now_ms, self.speed_ms) % period;
        for (i, pixel) in pixels.iter_mut().enumerate() {
            let index = ((i as u64 + offset) % period) as usize / self.width;
            *pixel = self.scheme.colors[index];
        }

        true
    }
}
