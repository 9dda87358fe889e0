use image::RgbaImage;

use super::{gradient::Gradient, grid::Cell};

/// Thresholds deciding which pixels are treated as empty backdrop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundRule {
    /// Pixels with alpha below this are background.
    pub alpha_cutoff: u8,
    /// Pixels with every channel above this are background.
    pub light_cutoff: u8,
}

impl Default for BackgroundRule {
    fn default() -> Self {
        Self { alpha_cutoff: 128, light_cutoff: 245 }
    }
}

impl BackgroundRule {
    pub fn is_background(&self, [r, g, b, a]: [u8; 4]) -> bool {
        a < self.alpha_cutoff
            || (r > self.light_cutoff && g > self.light_cutoff && b > self.light_cutoff)
    }
}

pub struct GlyphMapper {
    gradient: Gradient,
    rule: BackgroundRule,
}

impl GlyphMapper {
    pub fn new(gradient: Gradient, rule: BackgroundRule) -> Self {
        Self { gradient, rule }
    }

    pub fn map_pixel(&self, rgba: [u8; 4]) -> Cell {
        if self.rule.is_background(rgba) {
            return Cell::background();
        }

        let [r, g, b, _] = rgba;
        let brightness = f64::from(r) * 0.299 + f64::from(g) * 0.587 + f64::from(b) * 0.114;
        let ch = self.gradient.glyph_for_brightness(brightness);
        Cell::new(ch, brightness.round().clamp(0.0, 255.0) as u8)
    }

    /// Maps every pixel of an already resized image into rows of cells.
    pub fn map_image(&self, image: &RgbaImage) -> Vec<Vec<Cell>> {
        image
            .rows()
            .map(|row| row.map(|pixel| self.map_pixel(pixel.0)).collect())
            .collect()
    }
}
