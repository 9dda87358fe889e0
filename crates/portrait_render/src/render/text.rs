use super::{GlyphPaint, Surface, SurfaceSpec};

/// A painted character cell of a [`TextSurface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextCell {
    pub ch: char,
    pub color: [u8; 3],
    pub alpha: f64,
}

/// Rasterizes glyph paints onto a fixed character raster.
///
/// Positions snap to the cell containing them and scaling is ignored.
#[derive(Clone, Debug)]
pub struct TextSurface {
    cell_width: f64,
    cell_height: f64,
    columns: usize,
    rows: usize,
    cells: Vec<Option<TextCell>>,
}

impl TextSurface {
    pub fn new(cell_width: f64, cell_height: f64) -> Self {
        Self { cell_width, cell_height, columns: 0, rows: 0, cells: Vec::new() }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&TextCell> {
        if column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column)?.as_ref()
    }

    /// Each raster row with unpainted cells as spaces.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.chunks(self.columns.max(1)).map(|row| {
            row.iter().map(|cell| cell.map(|cell| cell.ch).unwrap_or(' ')).collect::<String>()
        })
    }
}

impl Surface for TextSurface {
    fn acquire(&mut self, spec: &SurfaceSpec) -> bool {
        if self.cell_width <= 0.0 || self.cell_height <= 0.0 {
            return false;
        }
        // The raster ignores density, but the ratio must still be usable.
        if !spec.pixel_ratio.is_finite() || spec.pixel_ratio <= 0.0 {
            return false;
        }

        self.columns = (spec.width / self.cell_width).round().max(0.0) as usize;
        self.rows = (spec.height / self.cell_height).round().max(0.0) as usize;
        self.cells = vec![None; self.columns * self.rows];
        self.columns > 0 && self.rows > 0
    }

    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    fn fill_glyph(&mut self, paint: &GlyphPaint) {
        if paint.alpha <= 0.0 || paint.x < 0.0 || paint.y < 0.0 {
            return;
        }

        let column = (paint.x / self.cell_width).floor() as usize;
        let row = (paint.y / self.cell_height).floor() as usize;
        if column >= self.columns || row >= self.rows {
            return;
        }

        self.cells[row * self.columns + column] =
            Some(TextCell { ch: paint.glyph, color: paint.color, alpha: paint.alpha });
    }
}
