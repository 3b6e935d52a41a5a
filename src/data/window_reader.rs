/// Reads a bounded window of CSV records starting at an arbitrary byte offset
use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder};
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

/// Running column measurements for one window of records.
/// Widths are counted in Unicode code points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMetrics {
    max_field_count: usize,
    max_field_width: usize,
    column_widths: Vec<usize>,
}

impl ColumnMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the running maxima. Never shrinks.
    pub fn observe(&mut self, fields: &[String]) {
        self.max_field_count = self.max_field_count.max(fields.len());
        if self.column_widths.len() < fields.len() {
            self.column_widths.resize(fields.len(), 0);
        }

        for (col, field) in fields.iter().enumerate() {
            let width = field.chars().count();
            self.column_widths[col] = self.column_widths[col].max(width);
            self.max_field_width = self.max_field_width.max(width);
        }
    }

    pub fn max_field_count(&self) -> usize {
        self.max_field_count
    }

    /// Widest field seen in any column
    pub fn max_field_width(&self) -> usize {
        self.max_field_width
    }

    /// Widest field seen per column index
    pub fn column_widths(&self) -> &[usize] {
        &self.column_widths
    }
}

/// Records materialized from one read, plus the metrics measured over them
#[derive(Debug, Clone, Default)]
pub struct RecordWindow {
    pub records: Vec<Vec<String>>,
    pub metrics: ColumnMetrics,
    requested: usize,
}

impl RecordWindow {
    pub fn lines_read(&self) -> usize {
        self.records.len()
    }

    /// True when the source ran out before the requested count was filled
    pub fn reached_end(&self) -> bool {
        self.records.len() < self.requested
    }
}

/// Parses records with a permissive CSV reader: variable field counts and
/// sloppy quoting are accepted, invalid UTF-8 is replaced.
#[derive(Debug, Clone, Copy)]
pub struct WindowReader {
    delimiter: u8,
}

impl WindowReader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read up to `max_lines` records starting at `from_offset`.
    ///
    /// The source's stream position is restored before returning, so reading
    /// a window never moves anyone else's notion of the current position.
    pub fn read_window<R: Read + Seek>(
        &self,
        source: &mut R,
        from_offset: u64,
        max_lines: usize,
    ) -> Result<RecordWindow> {
        let restore_to = source
            .stream_position()
            .context("Failed to query file position")?;

        let window = self.read_records(source, from_offset, max_lines);

        source
            .seek(SeekFrom::Start(restore_to))
            .context("Failed to restore file position")?;

        let window = window?;
        debug!(
            target: "reader",
            "Read {} of {} records from byte {} ({} fields max, widest {})",
            window.lines_read(),
            max_lines,
            from_offset,
            window.metrics.max_field_count(),
            window.metrics.max_field_width()
        );
        Ok(window)
    }

    fn read_records<R: Read + Seek>(
        &self,
        source: &mut R,
        from_offset: u64,
        max_lines: usize,
    ) -> Result<RecordWindow> {
        source
            .seek(SeekFrom::Start(from_offset))
            .with_context(|| format!("Failed to seek to byte {}", from_offset))?;

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(source);

        let mut window = RecordWindow {
            records: Vec::with_capacity(max_lines),
            metrics: ColumnMetrics::new(),
            requested: max_lines,
        };
        let mut raw = ByteRecord::new();

        while window.records.len() < max_lines {
            let more = reader
                .read_byte_record(&mut raw)
                .with_context(|| format!("Failed to read record near byte {}", from_offset))?;
            if !more {
                break;
            }

            let fields: Vec<String> = raw.iter().map(display_field).collect();
            window.metrics.observe(&fields);
            window.records.push(fields);
        }

        Ok(window)
    }
}

/// Decode a raw field for display. Control characters become spaces so that
/// measured width and rendered width agree.
fn display_field(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
