// Pure table rendering: records + layout in, printable lines out.
// Has no dependency on the terminal or on the file being viewed.

use crate::ui::viewport::{ColumnLayout, Viewport};

/// Glyph set for the table frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub top_left: char,
    pub top_junction: char,
    pub top_right: char,
    pub middle_left: char,
    pub middle_junction: char,
    pub middle_right: char,
    pub bottom_left: char,
    pub bottom_junction: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BorderGlyphs {
    pub fn heavy() -> Self {
        Self {
            top_left: '┏',
            top_junction: '┳',
            top_right: '┓',
            middle_left: '┣',
            middle_junction: '╋',
            middle_right: '┫',
            bottom_left: '┗',
            bottom_junction: '┻',
            bottom_right: '┛',
            horizontal: '━',
            vertical: '┃',
        }
    }

    /// Plain ASCII alternative for terminals without box-drawing support
    pub fn ascii() -> Self {
        Self {
            top_left: '+',
            top_junction: '+',
            top_right: '+',
            middle_left: '+',
            middle_junction: '+',
            middle_right: '+',
            bottom_left: '+',
            bottom_junction: '+',
            bottom_right: '+',
            horizontal: '-',
            vertical: '|',
        }
    }
}

impl Default for BorderGlyphs {
    fn default() -> Self {
        Self::heavy()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BorderKind {
    Header,
    Separator,
    Footer,
}

/// Turns a window of records into the lines of a bordered table
#[derive(Debug, Clone, Default)]
pub struct TableRenderer {
    glyphs: BorderGlyphs,
}

impl TableRenderer {
    pub fn new(glyphs: BorderGlyphs) -> Self {
        Self { glyphs }
    }

    /// Render records into at most `viewport.height` lines, each clipped to
    /// `viewport.width` code points after dropping `horizontal_shift`.
    ///
    /// A record is only emitted when its data row and the border below it both
    /// fit, and the last border is always the footer, so the frame is closed.
    pub fn render(
        &self,
        records: &[Vec<String>],
        layout: &ColumnLayout,
        viewport: Viewport,
        horizontal_shift: usize,
    ) -> Vec<String> {
        let separator = self.border_line(layout, BorderKind::Separator);
        let mut lines = vec![self.border_line(layout, BorderKind::Header)];

        for record in records {
            if lines.len() + 2 > viewport.height {
                break;
            }
            lines.push(self.data_line(record, layout));
            lines.push(separator.clone());
        }

        let footer = self.border_line(layout, BorderKind::Footer);
        if lines.len() > 1 {
            if let Some(last) = lines.last_mut() {
                *last = footer;
            }
        } else {
            lines.push(footer);
        }

        lines.truncate(viewport.height);
        lines
            .iter()
            .map(|line| clip_line(line, horizontal_shift, viewport.width))
            .collect()
    }

    fn border_line(&self, layout: &ColumnLayout, kind: BorderKind) -> String {
        let g = &self.glyphs;
        let (start, junction, end) = match kind {
            BorderKind::Header => (g.top_left, g.top_junction, g.top_right),
            BorderKind::Separator => (g.middle_left, g.middle_junction, g.middle_right),
            BorderKind::Footer => (g.bottom_left, g.bottom_junction, g.bottom_right),
        };

        let mut line = String::with_capacity(layout.table_width() * 3);
        line.push(start);
        let last = layout.column_count().saturating_sub(1);
        for (col, &width) in layout.widths().iter().enumerate() {
            line.extend(std::iter::repeat(g.horizontal).take(width));
            line.push(if col == last { end } else { junction });
        }
        line
    }

    /// Cells are right-aligned; missing trailing fields render as blank cells
    fn data_line(&self, record: &[String], layout: &ColumnLayout) -> String {
        let mut line = String::with_capacity(layout.table_width() * 2);
        line.push(self.glyphs.vertical);
        for (col, &width) in layout.widths().iter().enumerate() {
            let field = record.get(col).map(String::as_str).unwrap_or("");
            line.push_str(&pad_field(field, width));
            line.push(self.glyphs.vertical);
        }
        line
    }
}

/// Left-pad `field` with spaces to `width` code points
pub fn pad_field(field: &str, width: usize) -> String {
    format!("{:>width$}", field, width = width)
}

/// Drop the first `shift` code points and keep at most `width` of the rest
pub fn clip_line(line: &str, shift: usize, width: usize) -> String {
    line.chars().skip(shift).take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|f| f.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_three_row_table() {
        let rows = records(&[&["a", "b"], &["ccc", "d"], &["e", "ffff"]]);
        let layout = ColumnLayout::new(vec![4, 4]);
        let lines = TableRenderer::default().render(&rows, &layout, Viewport::new(80, 24), 0);

        assert_eq!(
            lines,
            vec![
                "┏━━━━┳━━━━┓",
                "┃   a┃   b┃",
                "┣━━━━╋━━━━┫",
                "┃ ccc┃   d┃",
                "┣━━━━╋━━━━┫",
                "┃   e┃ffff┃",
                "┗━━━━┻━━━━┛",
            ]
        );
    }

    #[test]
    fn test_zero_records_is_header_and_footer() {
        let layout = ColumnLayout::default();
        let lines = TableRenderer::default().render(&[], &layout, Viewport::new(80, 24), 0);
        assert_eq!(lines, vec!["┏", "┗"]);

        let layout = ColumnLayout::new(vec![2, 3]);
        let lines = TableRenderer::default().render(&[], &layout, Viewport::new(80, 24), 0);
        assert_eq!(lines, vec!["┏━━┳━━━┓", "┗━━┻━━━┛"]);
    }

    #[test]
    fn test_height_truncation_keeps_footer() {
        let rows = records(&[&["1"], &["2"], &["3"], &["4"]]);
        let layout = ColumnLayout::new(vec![1]);
        let lines = TableRenderer::default().render(&rows, &layout, Viewport::new(80, 6), 0);

        // Room for two records: header + 2 * (row + border) = 5 lines
        assert_eq!(lines, vec!["┏━┓", "┃1┃", "┣━┫", "┃2┃", "┗━┛"]);
    }

    #[test]
    fn test_tiny_heights() {
        let rows = records(&[&["x"]]);
        let layout = ColumnLayout::new(vec![1]);
        let renderer = TableRenderer::default();

        assert_eq!(renderer.render(&rows, &layout, Viewport::new(80, 2), 0), vec!["┏━┓", "┗━┛"]);
        assert_eq!(renderer.render(&rows, &layout, Viewport::new(80, 1), 0), vec!["┏━┓"]);
        assert!(renderer.render(&rows, &layout, Viewport::new(80, 0), 0).is_empty());
    }

    #[test]
    fn test_short_records_are_padded() {
        let rows = records(&[&["a", "b", "c"], &["d"]]);
        let layout = ColumnLayout::new(vec![1, 1, 1]);
        let lines = TableRenderer::default().render(&rows, &layout, Viewport::new(80, 24), 0);

        assert_eq!(lines[3], "┃d┃ ┃ ┃");
        assert_eq!(lines[3].chars().count(), layout.table_width());
    }

    #[test]
    fn test_width_clipping() {
        let rows = records(&[&["abc", "def"]]);
        let layout = ColumnLayout::new(vec![3, 3]);
        let lines = TableRenderer::default().render(&rows, &layout, Viewport::new(4, 24), 0);

        for line in &lines {
            assert_eq!(line.chars().count(), 4);
        }
        assert_eq!(lines[1], "┃abc");

        let shifted = TableRenderer::default().render(&rows, &layout, Viewport::new(4, 24), 4);
        assert_eq!(shifted[1], "┃def");
    }

    #[test]
    fn test_shift_past_line_end_is_empty() {
        let rows = records(&[&["a"]]);
        let layout = ColumnLayout::new(vec![1]);
        let lines = TableRenderer::default().render(&rows, &layout, Viewport::new(80, 24), 50);
        assert!(lines.iter().all(|line| line.is_empty()));
    }

    #[test]
    fn test_zero_width_terminal() {
        let rows = records(&[&["a"]]);
        let layout = ColumnLayout::new(vec![1]);
        let lines = TableRenderer::default().render(&rows, &layout, Viewport::new(0, 24), 0);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.is_empty()));
    }

    #[test]
    fn test_unicode_padding_and_clipping() {
        assert_eq!(pad_field("日本", 4), "  日本");
        assert_eq!(pad_field("é", 1), "é");
        assert_eq!(clip_line("┃日本語┃", 1, 2), "日本");
    }

    #[test]
    fn test_ascii_glyphs() {
        let rows = records(&[&["a"]]);
        let layout = ColumnLayout::new(vec![2]);
        let renderer = TableRenderer::new(BorderGlyphs::ascii());
        let lines = renderer.render(&rows, &layout, Viewport::new(80, 24), 0);
        assert_eq!(lines, vec!["+--+", "| a|", "+--+"]);
    }
}
