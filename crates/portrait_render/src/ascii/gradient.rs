use crate::PortraitError;

/// Glyph ramp ordered from darkest to lightest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gradient {
    chars: Vec<char>,
}

impl Gradient {
    pub fn new(chars: impl Into<String>) -> Result<Self, PortraitError> {
        let chars: Vec<char> = chars.into().chars().collect();
        if chars.len() < 2 {
            return Err(PortraitError::InvalidGradient(chars.len()));
        }
        Ok(Self { chars })
    }

    pub fn standard() -> Self {
        Self { chars: "@%#*+=-:. ".chars().collect() }
    }

    /// Ramp used for the fading shoulder extension, sparse to dense.
    pub fn taper() -> Self {
        Self { chars: ".:+*#".chars().collect() }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Picks the glyph for a brightness in `[0, 255]`, truncating toward the darker end.
    pub fn glyph_for_brightness(&self, brightness: f64) -> char {
        let levels = (self.chars.len() - 1) as f64;
        let idx = ((brightness / 255.0) * levels).floor().clamp(0.0, levels);
        self.char_at(idx as usize)
    }

    pub fn char_at(&self, index: usize) -> char {
        self.chars[index.min(self.chars.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_maps_dark_to_dense_glyphs() {
        let gradient = Gradient::standard();
        assert_eq!(gradient.glyph_for_brightness(0.0), '@');
        assert_eq!(gradient.glyph_for_brightness(254.9), '.');
        assert_eq!(gradient.glyph_for_brightness(255.0), ' ');
        assert_eq!(gradient.glyph_for_brightness(128.0), '+');
    }

    #[test]
    fn rejects_single_glyph_ramp() {
        assert!(matches!(Gradient::new("#"), Err(PortraitError::InvalidGradient(1))));
        assert_eq!(Gradient::new("01").unwrap().len(), 2);
    }
}
