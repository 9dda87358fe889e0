//! Per-frame composition of glitch and lens effects onto a drawing surface.

pub mod frame_loop;
pub mod text;

use crate::anim::glitch::glitch;
use crate::anim::lens::distort;
use crate::anim::{AnimationState, Point};
use crate::ascii::grid::CharGrid;
use crate::config::DisplayConfig;
use crate::theme::Theme;

/// Size and font information handed to a surface before drawing.
///
/// `width` and `height` are logical units. Pixel-backed surfaces size their
/// backing store by `pixel_ratio` and rasterise glyphs with `font_px` and
/// `font_family`. Character surfaces only require a positive `pixel_ratio`.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceSpec {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
    pub font_px: f64,
    pub font_family: String,
}

/// A glyph ready to be painted, centred on `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphPaint {
    pub glyph: char,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub color: [u8; 3],
    pub alpha: f64,
}

/// Something glyphs can be painted onto.
pub trait Surface {
    /// Prepares the backing store. Returns `false` when no drawing context is available.
    fn acquire(&mut self, spec: &SurfaceSpec) -> bool;

    fn clear(&mut self);

    fn fill_glyph(&mut self, paint: &GlyphPaint);
}

/// Visual transform of one cell for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub color: [u8; 3],
    pub alpha: f64,
}

pub struct Renderer {
    grid: CharGrid,
    cell_width: f64,
    cell_height: f64,
    spec: SurfaceSpec,
    state: AnimationState,
    theme: Theme,
}

impl Renderer {
    pub fn new(grid: CharGrid, display: &DisplayConfig) -> Self {
        let spec = SurfaceSpec {
            width: f64::from(grid.width()) * display.cell_width,
            height: f64::from(grid.height()) * display.cell_height,
            pixel_ratio: display.pixel_ratio,
            font_px: display.font_px,
            font_family: display.font_family.clone(),
        };

        Self {
            grid,
            cell_width: display.cell_width,
            cell_height: display.cell_height,
            spec,
            state: AnimationState::default(),
            theme: Theme::default(),
        }
    }

    pub fn grid(&self) -> &CharGrid {
        &self.grid
    }

    pub fn surface_spec(&self) -> &SurfaceSpec {
        &self.spec
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AnimationState {
        &mut self.state
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn cell_center(&self, x: u16, y: u16) -> Point {
        Point::new(
            f64::from(x) * self.cell_width + self.cell_width / 2.0,
            f64::from(y) * self.cell_height + self.cell_height / 2.0,
        )
    }

    /// Grid cell containing a surface position, if any.
    pub fn cell_at(&self, point: Point) -> Option<(u16, u16)> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let x = (point.x / self.cell_width).floor();
        let y = (point.y / self.cell_height).floor();
        if x >= f64::from(self.grid.width()) || y >= f64::from(self.grid.height()) {
            return None;
        }
        Some((x as u16, y as u16))
    }

    /// Combines the glitch and, while hovering, the pointer lens for one cell.
    pub fn transform(&self, x: u16, y: u16) -> CellTransform {
        let glitch = glitch(x, y, self.state.time);
        let mut transform = CellTransform {
            scale: 1.0,
            offset_x: glitch.offset_x,
            offset_y: 0.0,
            color: self.theme.foreground(),
            alpha: glitch.alpha,
        };

        if let Some(pointer) = self.state.lens_center() {
            if let Some(lens) = distort(self.cell_center(x, y), pointer) {
                transform.scale *= lens.scale;
                transform.offset_x += lens.offset_x;
                transform.offset_y += lens.offset_y;
                transform.alpha = transform.alpha.max(lens.min_alpha);
            }
        }

        transform
    }

    /// Clears the surface and paints every foreground cell. Returns the paint count.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        surface.clear();

        let mut painted = 0;
        for (x, y, cell) in self.grid.cells() {
            if cell.is_background {
                continue;
            }

            let center = self.cell_center(x, y);
            let transform = self.transform(x, y);
            surface.fill_glyph(&GlyphPaint {
                glyph: cell.ch,
                x: center.x + transform.offset_x,
                y: center.y + transform.offset_y,
                scale: transform.scale,
                color: transform.color,
                alpha: transform.alpha,
            });
            painted += 1;
        }
        painted
    }

    pub fn advance(&mut self) {
        self.state.advance();
    }
}
