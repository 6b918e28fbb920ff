use crate::{
    foundation::core::Rect,
    foundation::error::{ChatstripError, ChatstripResult},
};

/// Horizontal gap between panels and around the grid.
pub const GRID_X_PADDING: u32 = 10;
/// Vertical gap between rows and around the grid.
pub const GRID_Y_PADDING: u32 = 10;
/// Panel border stroke width, drawn inside the panel bounds.
pub const BORDER_WIDTH: f64 = 3.0;

/// Placement of one panel on the comic canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl GridCell {
    pub fn rect(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x + self.width),
            f64::from(self.y + self.height),
        )
    }

    /// Path of a border stroke of `width` that stays inside the cell.
    pub fn border_rect(&self, width: f64) -> Rect {
        self.rect().inset(-width / 2.0)
    }
}

/// Canvas size and panel positions for a row-major grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub width: u32,
    pub height: u32,
    pub columns: usize,
    pub cells: Vec<GridCell>,
}

impl GridLayout {
    /// Lay out panels of the given `(width, height)` sizes, `columns` per row.
    ///
    /// Rows are as tall as their tallest panel. The canvas width is the widest row, counting the
    /// padding after every panel, plus one leading padding. The height is the sum of each row's
    /// height plus one padding; the first row starts one padding down, so the last row ends flush
    /// with the bottom edge.
    pub fn compute(sizes: &[(u32, u32)], columns: usize) -> ChatstripResult<Self> {
        if columns == 0 {
            return Err(ChatstripError::config("grid columns must be >= 1"));
        }

        let mut cells = Vec::with_capacity(sizes.len());
        let mut widest_row = 0u32;
        let mut height = 0u32;

        for row in sizes.chunks(columns) {
            let row_y = GRID_Y_PADDING + height;
            let mut row_width = 0u32;
            let mut row_height = 0u32;
            for &(w, h) in row {
                cells.push(GridCell {
                    x: GRID_X_PADDING + row_width,
                    y: row_y,
                    width: w,
                    height: h,
                });
                row_width += w + GRID_X_PADDING;
                row_height = row_height.max(h);
            }
            widest_row = widest_row.max(row_width);
            height += row_height + GRID_Y_PADDING;
        }

        Ok(Self {
            width: widest_row + GRID_X_PADDING,
            height,
            columns,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.cells.len().div_ceil(self.columns)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
