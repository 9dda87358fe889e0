use super::{gradient::Gradient, grid::Cell};

/// Brightness assigned to synthesized shoulder cells.
const TAPER_BRIGHTNESS: u8 = 180;

/// Widens the lower rows of a portrait into fading "shoulders".
#[derive(Clone, Debug)]
pub struct ShoulderTaper {
    /// Fraction of the height where tapering begins.
    pub start: f64,
    /// Maximum cells a row may be extended on each side.
    pub max_extent: usize,
    pub glyphs: Gradient,
}

impl Default for ShoulderTaper {
    fn default() -> Self {
        Self { start: 0.65, max_extent: 18, glyphs: Gradient::taper() }
    }
}

impl ShoulderTaper {
    /// Surrounds every row with `max_extent` background cells on both sides.
    pub fn pad(&self, rows: &mut [Vec<Cell>]) {
        for row in rows.iter_mut() {
            let mut padded = Vec::with_capacity(row.len() + 2 * self.max_extent);
            padded.extend(std::iter::repeat(Cell::background()).take(self.max_extent));
            padded.append(row);
            padded.extend(std::iter::repeat(Cell::background()).take(self.max_extent));
            *row = padded;
        }
    }

    /// Extends the foreground outline of rows below the start row.
    pub fn apply(&self, rows: &mut [Vec<Cell>]) {
        let height = rows.len();
        let start_row = (height as f64 * self.start).floor() as usize;
        if start_row >= height {
            return;
        }

        for (y, row) in rows.iter_mut().enumerate().skip(start_row) {
            let Some(left) = row.iter().position(|cell| !cell.is_background) else {
                continue;
            };
            let Some(right) = row.iter().rposition(|cell| !cell.is_background) else {
                continue;
            };

            let progress = (y - start_row) as f64 / (height - start_row) as f64;
            let amount = (progress * self.max_extent as f64).ceil() as usize;

            for i in 1..=amount {
                let glyph = self.glyph_at(i, amount);
                if let Some(target) = left.checked_sub(i) {
                    if row[target].is_background {
                        row[target] = Cell::new(glyph, TAPER_BRIGHTNESS);
                    }
                }
                let target = right + i;
                if target < row.len() && row[target].is_background {
                    row[target] = Cell::new(glyph, TAPER_BRIGHTNESS);
                }
            }
        }
    }

    fn glyph_at(&self, step: usize, amount: usize) -> char {
        let intensity = 1.0 - step as f64 / amount as f64;
        let levels = self.glyphs.len();
        let idx = ((intensity * levels as f64).floor() as usize).min(levels - 1);
        self.glyphs.char_at(idx)
    }
}
