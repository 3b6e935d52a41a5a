use crate::data::window_reader::ColumnMetrics;
use serde::{Deserialize, Serialize};

/// Column width strategies for laying out a window of records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnWidthMode {
    /// Every column is as wide as the widest field in the window
    #[default]
    Uniform,
    /// Each column is as wide as its own widest field
    PerColumn,
}

impl ColumnWidthMode {
    /// Cycle to the next mode
    pub fn cycle(&self) -> Self {
        match self {
            ColumnWidthMode::Uniform => ColumnWidthMode::PerColumn,
            ColumnWidthMode::PerColumn => ColumnWidthMode::Uniform,
        }
    }

    /// Get display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            ColumnWidthMode::Uniform => "Uniform",
            ColumnWidthMode::PerColumn => "Per Column",
        }
    }
}

/// Resolved column widths for one window.
///
/// A rendered table line is one border glyph, then for every column its
/// cells followed by one border glyph, so column `i` starts at
/// `boundary(i) + 1` and the whole line is `table_width()` code points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    widths: Vec<usize>,
}

impl ColumnLayout {
    pub fn new(widths: Vec<usize>) -> Self {
        Self { widths }
    }

    pub fn from_metrics(metrics: &ColumnMetrics, mode: ColumnWidthMode) -> Self {
        let count = metrics.max_field_count();
        let widths = match mode {
            ColumnWidthMode::Uniform => vec![metrics.max_field_width(); count],
            ColumnWidthMode::PerColumn => (0..count)
                .map(|col| metrics.column_widths().get(col).copied().unwrap_or(0))
                .collect(),
        };
        Self { widths }
    }

    pub fn column_count(&self) -> usize {
        self.widths.len()
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Unclipped length of every rendered line
    pub fn table_width(&self) -> usize {
        self.widths.iter().sum::<usize>() + self.widths.len() + 1
    }

    /// Offsets of the left border glyph of every column
    pub fn boundaries(&self) -> impl Iterator<Item = usize> + '_ {
        self.widths.iter().scan(0, |offset, width| {
            let start = *offset;
            *offset += width + 1;
            Some(start)
        })
    }

    /// Largest useful horizontal shift for a viewport of `viewport_width`
    pub fn max_shift(&self, viewport_width: usize) -> usize {
        self.table_width().saturating_sub(viewport_width)
    }

    /// Shift after panning one column to the right. Stops once the table's
    /// right edge is inside the viewport.
    pub fn pan_right(&self, shift: usize, viewport_width: usize) -> usize {
        let max_shift = self.max_shift(viewport_width);
        if shift >= max_shift {
            return shift;
        }

        self.boundaries()
            .find(|&boundary| boundary > shift)
            .unwrap_or(max_shift)
            .min(max_shift)
    }

    /// Shift after panning one column to the left, floored at 0.
    /// Snaps to column boundaries: from a shift inside a column (e.g. the
    /// clamped maximum) it lands on that column's start, a step shorter than
    /// one full column.
    pub fn pan_left(&self, shift: usize) -> usize {
        self.boundaries()
            .take_while(|&boundary| boundary < shift)
            .last()
            .unwrap_or(0)
    }
}
