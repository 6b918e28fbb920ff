use image::{Rgba, RgbaImage, imageops};

use crate::{
    foundation::core::{Raster, Rgba8},
    foundation::error::{ChatstripError, ChatstripResult},
    layout::grid::{BORDER_WIDTH, GridCell, GridLayout},
};

/// Rendered panels in reading order, tiled `columns` per row.
#[derive(Clone, Debug)]
pub struct Comic {
    panels: Vec<Raster>,
    columns: usize,
}

impl Comic {
    pub fn new(panels: Vec<Raster>, columns: usize) -> ChatstripResult<Self> {
        if columns == 0 {
            return Err(ChatstripError::config("comic columns must be >= 1"));
        }
        Ok(Self { panels, columns })
    }

    pub fn panels(&self) -> &[Raster] {
        &self.panels
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn layout(&self) -> ChatstripResult<GridLayout> {
        let sizes: Vec<(u32, u32)> = self.panels.iter().map(Raster::size).collect();
        GridLayout::compute(&sizes, self.columns)
    }

    /// Flatten the whole strip into one raster.
    pub fn to_raster(&self) -> ChatstripResult<Raster> {
        render_grid(&self.panels, &self.layout()?)
    }
}

/// Tile `panels` into a grid of `columns` and draw it.
pub fn compose(panels: Vec<Raster>, columns: usize) -> ChatstripResult<Raster> {
    Comic::new(panels, columns)?.to_raster()
}

/// Draw panels onto a white canvas at their grid cells, each with a black border.
///
/// The canvas is a plain image buffer, so its size is only bounded by memory.
pub fn render_grid(panels: &[Raster], layout: &GridLayout) -> ChatstripResult<Raster> {
    if panels.len() != layout.cells.len() {
        return Err(ChatstripError::render(format!(
            "grid has {} cells for {} panels",
            layout.cells.len(),
            panels.len()
        )));
    }
    if layout.width == 0 || layout.height == 0 {
        return Ok(Raster::filled(1, 1, Rgba8::WHITE));
    }

    let white = Rgba(rgba(Rgba8::WHITE));
    let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, white);
    for (panel, cell) in panels.iter().zip(&layout.cells) {
        let tile = panel.to_opaque_rgba_image(Rgba8::WHITE)?;
        imageops::overlay(&mut canvas, &tile, i64::from(cell.x), i64::from(cell.y));
        draw_border(&mut canvas, cell);
    }

    // Every pixel is opaque, so straight and premultiplied bytes agree.
    Raster::new(layout.width, layout.height, canvas.into_raw())
}

/// Fill the outer `BORDER_WIDTH` pixels of `cell` black, as four bands.
fn draw_border(canvas: &mut RgbaImage, cell: &GridCell) {
    let t = BORDER_WIDTH.round() as u32;
    let (x, y, w, h) = (cell.x, cell.y, cell.width, cell.height);
    let bands = [
        (x, y, w, t.min(h)),
        (x, (y + h).saturating_sub(t).max(y), w, t.min(h)),
        (x, y, t.min(w), h),
        ((x + w).saturating_sub(t).max(x), y, t.min(w), h),
    ];
    for (bx, by, bw, bh) in bands {
        fill_rect(canvas, bx, by, bw, bh, Rgba(rgba(Rgba8::BLACK)));
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    let x1 = x.saturating_add(w).min(canvas.width());
    let y1 = y.saturating_add(h).min(canvas.height());
    for py in y..y1 {
        for px in x..x1 {
            canvas.put_pixel(px, py, color);
        }
    }
}

fn rgba(c: Rgba8) -> [u8; 4] {
    [c.r, c.g, c.b, c.a]
}

#[cfg(test)]
#[path = "../../tests/unit/render/comic.rs"]
mod tests;
