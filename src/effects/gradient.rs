use crate::color::{crossfade, interpolate, Color, ColorScheme};
use crate::effects::LightingEffect;

/// Smooth blend through the scheme colors, repeated `repeat` times along the
/// strip. Every second repetition runs backwards so neighbouring repetitions
/// meet in the same color.
pub struct Gradient {
    scheme: &'static ColorScheme,
    repeat: usize,
    speed_ms: u64,
}

/// Lengths derived from the strip size, in pixels.
struct Span {
    /// One full repetition ("lane").
    lane: usize,
    /// One color-to-color transition inside a lane.
    transition: usize,
}

impl Gradient {
    pub fn new(scheme: &'static ColorScheme, repeat: usize, speed_ms: u64) -> Gradient {
        Gradient {
            scheme,
            repeat,
            speed_ms,
        }
    }

    fn span(&self, pixel_count: usize) -> Span {
        let lane = pixel_count.div_ceil(self.repeat.max(1)).max(1);
        let transition = lane.div_ceil(self.scheme.count() - 1).max(1);
        Span { lane, transition }
    }

    /// Color at absolute position `j`, which may run past either end of the
    /// strip once the animation offset is added.
    fn color_at(&self, j: i64, span: &Span) -> Color {
        let colors = self.scheme.colors;
        let last = colors.len() - 1;

        let lane = j.div_euclid(span.lane as i64);
        let pos = j.rem_euclid(span.lane as i64) as usize;
        // Rounding up the spans can leave a short tail past the last transition
        let segment = (pos / span.transition).min(last - 1);
        let within = pos - segment * span.transition;

        let (start, end) = if lane.rem_euclid(2) == 1 {
            (last - segment, last - segment - 1)
        } else {
            (segment, segment + 1)
        };

        interpolate(colors[start], colors[end], within, span.transition)
    }
}

impl LightingEffect for Gradient {
    fn render(&self, now_ms: u64, pixels: &mut [Color]) -> bool {
        if self.scheme.count() < 2 {
            return false;
        }

        let span = self.span(pixels.len());

        if self.speed_ms == 0 {
            for (i, pixel) in pixels.iter_mut().enumerate() {
                *pixel = self.color_at(i as i64, &span);
            }
            return true;
        }

        // Fade from the previous step towards the current one over the
        // course of a step so motion does not jump a whole pixel at a time.
        let step = (now_ms / self.speed_ms) as i64;
        let fraction = (now_ms % self.speed_ms) as f32 / self.speed_ms as f32;
        for (i, pixel) in pixels.iter_mut().enumerate() {
            let j = i as i64 + step;
            let previous = self.color_at(j - 1, &span);
            let current = self.color_at(j, &span);
            *pixel = crossfade(previous, current, fraction);
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, SCHEMES};

    const SOLO: ColorScheme = ColorScheme {
        name: "solo",
        colors: &[Color::new(9, 9, 9)],
    };

    fn render_static(scheme: &'static ColorScheme, repeat: usize, len: usize) -> Vec<Color> {
        let mut pixels = vec![BLACK; len];
        assert!(Gradient::new(scheme, repeat, 0).render(0, &mut pixels));
        pixels
    }

    fn close(a: Color, b: Color) -> bool {
        a.red.abs_diff(b.red) <= 1 && a.green.abs_diff(b.green) <= 1 && a.blue.abs_diff(b.blue) <= 1
    }

    #[test]
    fn spans_round_up() {
        let gradient = Gradient::new(&SCHEMES[1], 7, 0);
        let span = gradient.span(300);
        assert_eq!(span.lane, 43);
        assert_eq!(span.transition, 22);
    }

    #[test]
    fn transition_moves_steadily_from_start_to_end() {
        // rgb across 60 pixels: red to green over 0..30, green to blue over 30..60
        let scheme = &SCHEMES[1];
        let pixels = render_static(scheme, 1, 60);

        assert_eq!(pixels[0], scheme.colors[0]);
        assert_eq!(pixels[30], scheme.colors[1]);
        assert!(pixels[29].green > 240 && pixels[29].red < 15);

        for pair in pixels[..31].windows(2) {
            assert!(pair[1].red <= pair[0].red);
            assert!(pair[1].green >= pair[0].green);
            assert_eq!(pair[1].blue, 0);
        }
    }

    #[test]
    fn odd_lanes_mirror_even_lanes() {
        let scheme = &SCHEMES[1];
        let pixels = render_static(scheme, 2, 60);
        let boundary = 30;

        assert_eq!(pixels[boundary], scheme.colors[2]);
        for k in 1..boundary {
            assert!(
                close(pixels[boundary + k], pixels[boundary - k]),
                "pixel {} = {:?}, pixel {} = {:?}",
                boundary + k,
                pixels[boundary + k],
                boundary - k,
                pixels[boundary - k]
            );
        }
    }

    #[test]
    fn crossfades_between_steps() {
        let scheme = &SCHEMES[2];
        let gradient = Gradient::new(scheme, 2, 100);
        let span = gradient.span(40);

        // On a step boundary the frame is exactly the previous step
        let mut pixels = vec![BLACK; 40];
        gradient.render(500, &mut pixels);
        for (i, pixel) in pixels.iter().enumerate() {
            assert_eq!(*pixel, gradient.color_at(i as i64 + 4, &span));
        }

        // Half way through, every channel sits between the two steps
        gradient.render(550, &mut pixels);
        for (i, pixel) in pixels.iter().enumerate() {
            let a = gradient.color_at(i as i64 + 4, &span);
            let b = gradient.color_at(i as i64 + 5, &span);
            assert!(pixel.red >= a.red.min(b.red) && pixel.red <= a.red.max(b.red));
            assert!(pixel.green >= a.green.min(b.green) && pixel.green <= a.green.max(b.green));
        }
    }

    #[test]
    fn first_frame_reaches_back_before_the_strip() {
        let gradient = Gradient::new(&SCHEMES[3], 3, 250);
        let mut pixels = vec![BLACK; 30];
        assert!(gradient.render(0, &mut pixels));
    }

    #[test]
    fn single_color_scheme_is_refused() {
        let sentinel = Color::new(1, 2, 3);
        let mut pixels = vec![sentinel; 20];
        assert!(!Gradient::new(&SOLO, 1, 0).render(0, &mut pixels));
        assert!(pixels.iter().all(|p| *p == sentinel));
    }
}
