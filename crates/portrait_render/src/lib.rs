mod anim;
mod ascii;
mod config;
mod console;
mod image_pipeline;
mod render;
mod theme;

use std::path::Path;

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use log::debug;

pub use anim::{
    glitch::{burst_index, glitch, glitch_random, is_burst_active, Glitch},
    lens::{distort, intensity, smoothstep, LensDistortion, LENS_RADIUS},
    AnimationState, Point, PointerState, TIME_STEP,
};
pub use ascii::{
    gradient::Gradient,
    grid::{Cell, CharGrid},
    mapping::{BackgroundRule, GlyphMapper},
    taper::ShoulderTaper,
};
pub use config::{ConsoleConfig, DisplayConfig, GeneratorConfig, LinkCommand, PortraitConfig};
pub use console::{CommandHook, Console, ConsoleAction, ConsoleKey, HistoryEntry};
pub use image_pipeline::{
    loader::{is_supported_image, load_image},
    resize::{LayoutPolicy, TargetGeometry},
};
pub use render::{
    frame_loop::{FrameHandle, FrameQueue, FrameScheduler, PortraitLoop},
    text::{TextCell, TextSurface},
    CellTransform, GlyphPaint, Renderer, Surface, SurfaceSpec,
};
pub use theme::{theme_from_colorfgbg, Theme, ThemePreference, ThemeSwitch};

#[derive(Debug, thiserror::Error)]
pub enum PortraitError {
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed character grid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("unsupported layout dimensions")]
    InvalidLayout,
    #[error("character grid has no cells")]
    EmptyGrid,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("gradient needs at least two glyphs, got {0}")]
    InvalidGradient(usize),
}

/// Converts images into padded, shoulder-tapered character grids.
pub struct GridGenerator {
    mapper: GlyphMapper,
    taper: ShoulderTaper,
}

impl GridGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self, PortraitError> {
        let gradient = Gradient::new(config.gradient.as_str())?;
        let rule = BackgroundRule {
            alpha_cutoff: config.alpha_cutoff,
            light_cutoff: config.background_cutoff,
        };
        let taper = ShoulderTaper {
            start: config.taper_start,
            max_extent: config.max_taper,
            ..ShoulderTaper::default()
        };
        Ok(Self { mapper: GlyphMapper::new(gradient, rule), taper })
    }

    pub fn generate_path<P: AsRef<Path>>(
        &self,
        path: P,
        layout: LayoutPolicy,
    ) -> Result<CharGrid, PortraitError> {
        let image = load_image(path.as_ref())?;
        self.generate_image(&image, layout)
    }

    pub fn generate_image(
        &self,
        image: &DynamicImage,
        layout: LayoutPolicy,
    ) -> Result<CharGrid, PortraitError> {
        let (width, height) = image.dimensions();
        let geometry = layout.derive(width, height).ok_or(PortraitError::InvalidLayout)?;

        let (columns, rows) = (u32::from(geometry.columns), u32::from(geometry.rows));
        let resized = image.resize_exact(columns, rows, FilterType::Lanczos3).into_rgba8();

        let mut rows = self.mapper.map_image(&resized);
        self.taper.pad(&mut rows);
        self.taper.apply(&mut rows);

        let grid = CharGrid::from_rows(rows)?;
        debug!(
            "generated {}x{} grid from {}x{} source",
            grid.width(),
            grid.height(),
            width,
            height
        );
        Ok(grid)
    }

    /// Column and row count of `grid` before the side padding was added.
    pub fn unpadded_geometry(&self, grid: &CharGrid) -> TargetGeometry {
        let padding = u16::try_from(2 * self.taper.max_extent).unwrap_or(u16::MAX);
        TargetGeometry { columns: grid.width().saturating_sub(padding), rows: grid.height() }
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn generator(max_taper: usize) -> GridGenerator {
        let config = GeneratorConfig { max_taper, ..GeneratorConfig::default() };
        GridGenerator::new(&config).unwrap()
    }

    #[test]
    fn generated_grid_is_padded_and_aspect_correct() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 10, Rgba([0, 0, 0, 255])));
        let grid = generator(3).generate_image(&image, LayoutPolicy::FixedColumns(8)).unwrap();
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.width(), 8 + 2 * 3);
        assert!(grid.get(0, 0).unwrap().is_background);
        assert_eq!(grid.get(3, 0), Some(&Cell::new('@', 0)));
        assert_eq!(
            generator(3).unpadded_geometry(&grid),
            TargetGeometry { columns: 8, rows: 4 }
        );
    }

    #[test]
    fn transparent_image_yields_only_background() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(10, 10));
        let grid = generator(2).generate_image(&image, LayoutPolicy::FixedColumns(5)).unwrap();
        assert!(grid.cells().all(|(_, _, cell)| cell.is_background));
    }

    #[test]
    fn lower_rows_gain_shoulders() {
        let mut image = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        for y in 0..10 {
            for x in 4..6 {
                image.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let grid = generator(4)
            .generate_image(&DynamicImage::ImageRgba8(image), LayoutPolicy::FixedColumns(10))
            .unwrap();
        let top: usize = (0..grid.width())
            .filter(|x| !grid.get(*x, 0).unwrap().is_background)
            .count();
        let bottom: usize = (0..grid.width())
            .filter(|x| !grid.get(*x, grid.height() - 1).unwrap().is_background)
            .count();
        assert!(bottom > top, "top {top} bottom {bottom}");
    }

    #[test]
    fn invalid_gradient_is_rejected() {
        let config = GeneratorConfig { gradient: String::from("@"), ..GeneratorConfig::default() };
        assert!(matches!(GridGenerator::new(&config), Err(PortraitError::InvalidGradient(1))));
    }
}
