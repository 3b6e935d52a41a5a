//! Viewport geometry and column layout
//!
//! Sizes here are in terminal character cells; widths inside the table are
//! counted in Unicode code points.

pub mod column_width_calculator;

pub use column_width_calculator::{ColumnLayout, ColumnWidthMode};

/// Visible character grid the rendered table has to fit in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of records one frame can show, which is also the page step.
    /// The header takes one line and each record a data row plus a border,
    /// so this is `(height - 1) / 2` rather than the plain `height / 2`:
    /// a 24-row terminal pages by 11 records, not 12.
    pub fn record_capacity(&self) -> usize {
        (self.height.saturating_sub(1) / 2).max(1)
    }
}

impl From<(u16, u16)> for Viewport {
    fn from((width, height): (u16, u16)) -> Self {
        Self::new(width as usize, height as usize)
    }
}
