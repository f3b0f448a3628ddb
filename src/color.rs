use palette::Mix;

pub type Color = palette::Srgb<u8>;

pub const BLACK: Color = Color::new(0, 0, 0);
pub const WHITE: Color = Color::new(255, 255, 255);

pub struct ColorScheme {
    pub name: &'static str,
    pub colors: &'static [Color],
}

impl ColorScheme {
    pub fn count(&self) -> usize {
        self.colors.len()
    }
}

// Table position is the scheme index used on the wire
pub const SCHEMES: [ColorScheme; 7] = [
    ColorScheme {
        name: "incandescent",
        colors: &[Color::new(255, 140, 20), Color::new(0, 0, 0)],
    },
    ColorScheme {
        name: "rgb",
        colors: &[
            Color::new(255, 0, 0),
            Color::new(0, 255, 0),
            Color::new(0, 0, 255),
        ],
    },
    ColorScheme {
        name: "christmas",
        colors: &[Color::new(255, 0, 0), Color::new(0, 255, 0)],
    },
    ColorScheme {
        name: "hanukkah",
        colors: &[Color::new(0, 0, 255), Color::new(255, 255, 255)],
    },
    ColorScheme {
        name: "kwanzaa",
        colors: &[
            Color::new(255, 0, 0),
            Color::new(0, 0, 0),
            Color::new(0, 255, 0),
        ],
    },
    ColorScheme {
        name: "rainbow",
        colors: &[
            Color::new(255, 0, 0),
            Color::new(255, 128, 0),
            Color::new(255, 255, 0),
            Color::new(0, 255, 0),
            Color::new(0, 0, 255),
            Color::new(128, 0, 255),
            Color::new(255, 0, 255),
        ],
    },
    ColorScheme {
        name: "fire",
        colors: &[
            Color::new(255, 0, 0),
            Color::new(255, 102, 0),
            Color::new(255, 192, 0),
        ],
    },
];

/// Affine rescale of `x` from `[in_min, in_max]` to `[out_min, out_max]`,
/// clamped to the output range.
pub fn map_range(x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if in_max == in_min {
        return out_min;
    }

    let mapped = out_min + (x - in_min) * (out_max - out_min) / (in_max - in_min);
    let (low, high) = if out_min <= out_max {
        (out_min, out_max)
    } else {
        (out_max, out_min)
    };
    mapped.clamp(low, high)
}

pub fn interpolate(start: Color, end: Color, pos: usize, range: usize) -> Color {
    let channel = |a: u8, b: u8| {
        map_range(pos as f32, 0.0, range as f32, a as f32, b as f32).round() as u8
    };

    Color::new(
        channel(start.red, end.red),
        channel(start.green, end.green),
        channel(start.blue, end.blue),
    )
}

pub fn crossfade(from: Color, to: Color, factor: f32) -> Color {
    let from = from.into_format::<f32>();
    let to = to.into_format::<f32>();
    from.mix(to, factor.clamp(0.0, 1.0)).into_format()
}
