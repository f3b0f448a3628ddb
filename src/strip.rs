use serde::Deserialize;

use crate::color::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    Rgb,
    Grb,
}

/// Pixels staged with `set_pixel` only become visible on `flush`.
pub trait LedStrip {
    fn len(&self) -> usize;
    fn set_pixel(&mut self, index: usize, color: Color);
    fn flush(&mut self) -> Result<(), String>;
}

pub fn show(strip: &mut dyn LedStrip, pixels: &[Color]) -> Result<(), String> {
    for (i, color) in pixels.iter().take(strip.len()).enumerate() {
        strip.set_pixel(i, *color);
    }
    strip.flush()
}

pub fn encode(color: Color, brightness: f32, order: ChannelOrder) -> [u8; 3] {
    let scale = |v: u8| (v as f32 * brightness).round().clamp(0.0, 255.0) as u8;
    let (r, g, b) = (scale(color.red), scale(color.green), scale(color.blue));
    match order {
        ChannelOrder::Rgb => [r, g, b],
        ChannelOrder::Grb => [g, r, b],
    }
}

#[cfg(test)]
pub struct MemoryStrip {
    pub staged: Vec<Color>,
    pub shown: Vec<Color>,
    pub flushes: usize,
}

#[cfg(test)]
impl MemoryStrip {
    pub fn new(len: usize) -> MemoryStrip {
        MemoryStrip {
            staged: vec![crate::color::BLACK; len],
            shown: vec![crate::color::BLACK; len],
            flushes: 0,
        }
    }
}

#[cfg(test)]
impl LedStrip for MemoryStrip {
    fn len(&self) -> usize {
        self.staged.len()
    }

    fn set_pixel(&mut self, index: usize, color: Color) {
        self.staged[index] = color;
    }

    fn flush(&mut self) -> Result<(), String> {
        self.shown = self.staged.clone();
        self.flushes += 1;
        Ok(())
    }
}
