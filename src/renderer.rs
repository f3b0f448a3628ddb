use rand::rngs::ThreadRng;
use rand::Rng;

use crate::color::{Color, BLACK};
use crate::effects::bars::Bars;
use crate::effects::glitter;
use crate::effects::gradient::Gradient;
use crate::effects::LightingEffect;
use crate::options::{Pattern, TreeOptions};
use crate::strip::{self, LedStrip};

/// Owns the pixel buffer and turns the current options into frames.
pub struct TreeRenderer<R: Rng = ThreadRng> {
    pixels: Vec<Color>,
    rng: R,
}

impl TreeRenderer {
    pub fn new(pixel_count: usize) -> TreeRenderer {
        TreeRenderer::with_rng(pixel_count, rand::thread_rng())
    }
}

impl<R: Rng> TreeRenderer<R> {
    pub fn with_rng(pixel_count: usize, rng: R) -> TreeRenderer<R> {
        TreeRenderer {
            pixels: vec![BLACK; pixel_count],
            rng,
        }
    }

    fn effect(options: &TreeOptions) -> Box<dyn LightingEffect> {
        let scheme = options.color_scheme();
        match options.pattern() {
            Pattern::Bars => Box::new(Bars::new(scheme, options.bar_width(), options.speed_ms())),
            Pattern::Gradient => Box::new(Gradient::new(
                scheme,
                options.gradient_repeat(),
                options.speed_ms(),
            )),
        }
    }

    /// Draw one frame for `now_ms` and push it to `strip`, then maybe
    /// sparkle. A pattern that refuses the current options leaves the
    /// previous frame on the strip.
    pub fn render_frame(
        &mut self,
        options: &TreeOptions,
        now_ms: u64,
        strip: &mut dyn LedStrip,
    ) -> Result<(), String> {
        if Self::effect(options).render(now_ms, &mut self.pixels) {
            strip::show(strip, &self.pixels)?;
        }

        if glitter::sparkle(&mut self.pixels, options.glitter_chance(), &mut self.rng) {
            strip::show(strip, &self.pixels)?;
        }

        Ok(())
    }
}
