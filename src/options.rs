use crate::color::{ColorScheme, SCHEMES};

pub const BAR_WIDTHS: [usize; 3] = [1, 3, 6];

// More repetitions make a smaller gradient, so this runs large to small
pub const GRADIENT_REPEATS: [usize; 3] = [12, 6, 2];

// Milliseconds per pixel step, 0 is static
pub const SPEEDS_MS: [u64; 4] = [0, 500, 250, 50];

pub const GLITTER_CHANCES: [u8; 4] = [0, 20, 60, 120];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    Bars,
    Gradient,
}

pub const PATTERNS: [Pattern; 2] = [Pattern::Bars, Pattern::Gradient];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigUpdate {
    Scheme(usize),
    Pattern(usize),
    Width(usize),
    Speed(usize),
    Glitter(usize),
}

impl ConfigUpdate {
    pub fn from_key_value(key: &str, value: usize) -> Option<ConfigUpdate> {
        match key {
            "scheme" => Some(ConfigUpdate::Scheme(value)),
            "pattern" => Some(ConfigUpdate::Pattern(value)),
            "width" => Some(ConfigUpdate::Width(value)),
            "speed" => Some(ConfigUpdate::Speed(value)),
            "glitter" => Some(ConfigUpdate::Glitter(value)),
            _ => None,
        }
    }
}

/// Lives on the main loop's stack. The request listener is the only writer
/// (through `apply`), the frame renderer the only reader, and both run on
/// the same thread, so no lock guards it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeOptions {
    pub scheme: usize,
    pub pattern: usize,
    pub width: usize,
    pub speed: usize,
    pub glitter: usize,
}

impl TreeOptions {
    pub fn new() -> TreeOptions {
        TreeOptions::default()
    }

    // Refusing out of range indices here lets rendering index without checking
    pub fn apply(&mut self, update: ConfigUpdate) -> Result<(), String> {
        let (field, value, limit) = match update {
            ConfigUpdate::Scheme(value) => (&mut self.scheme, value, SCHEMES.len()),
            ConfigUpdate::Pattern(value) => (&mut self.pattern, value, PATTERNS.len()),
            ConfigUpdate::Width(value) => (&mut self.width, value, BAR_WIDTHS.len()),
            ConfigUpdate::Speed(value) => (&mut self.speed, value, SPEEDS_MS.len()),
            ConfigUpdate::Glitter(value) => (&mut self.glitter, value, GLITTER_CHANCES.len()),
        };

        if value >= limit {
            return Err(format!(
                "{:?} out of range, expected an index below {}",
                update, limit
            ));
        }

        *field = value;
        Ok(())
    }

    pub fn color_scheme(&self) -> &'static ColorScheme {
        &SCHEMES[self.scheme]
    }

    pub fn pattern(&self) -> Pattern {
        PATTERNS[self.pattern]
    }

    pub fn bar_width(&self) -> usize {
        BAR_WIDTHS[self.width]
    }

    pub fn gradient_repeat(&self) -> usize {
        GRADIENT_REPEATS[self.width]
    }

    pub fn speed_ms(&self) -> u64 {
        SPEEDS_MS[self.speed]
    }

    pub fn glitter_chance(&self) -> u8 {
        GLITTER_CHANCES[self.glitter]
    }

    pub fn describe(&self) -> String {
        format!(
            "{} {:?}, width {}, speed {} ms, glitter {}",
            self.color_scheme().name,
            self.pattern(),
            self.width,
            self.speed_ms(),
            self.glitter_chance()
        )
    }
}
