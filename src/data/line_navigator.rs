// Byte-level line navigation over a seekable source.
// Works on raw bytes only; it never looks at field or record structure.

use anyhow::{Context, Result};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use tracing::trace;

/// Bytes fetched per read while scanning
const SCAN_CHUNK_SIZE: usize = 4096;

const NEWLINE: u8 = b'\n';

/// State of a backward scan, fed one byte at a time walking towards offset 0.
///
/// Starting from a line start, the byte just behind the cursor is the newline
/// that terminates the previous line. That run of newlines has to be consumed
/// first, then the previous line's own bytes, and only the newline after those
/// marks where the previous line begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// No byte consumed yet
    Start,
    /// Consuming the newline run that ends the previous line
    Newlines,
    /// Consuming the previous line's content
    Text,
}

/// Outcome of feeding one byte to a [`ScanPhase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStep {
    Continue(ScanPhase),
    /// The byte is the newline in front of the previous line
    Found,
}

impl ScanPhase {
    pub fn step(self, byte: u8) -> ScanStep {
        match (self, byte == NEWLINE) {
            (ScanPhase::Text, true) => ScanStep::Found,
            (_, true) => ScanStep::Continue(ScanPhase::Newlines),
            // Starting on content only happens at the end of a file whose last
            // line is unterminated; that line is the one to land on.
            (_, false) => ScanStep::Continue(ScanPhase::Text),
        }
    }
}

/// Forward scan state: the current line, then the newline run after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForwardPhase {
    Line,
    Newlines,
}

/// Moves a byte offset between logical line starts of a seekable source.
///
/// All positioning is absolute, so the source's own stream position carries no
/// meaning between calls.
pub struct LineNavigator<R> {
    source: R,
    chunk: Vec<u8>,
}

impl<R: Read + Seek> LineNavigator<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            chunk: vec![0; SCAN_CHUNK_SIZE],
        }
    }

    /// Byte offset of the end of the source
    pub fn end_offset(&mut self) -> Result<u64> {
        self.source
            .seek(SeekFrom::End(0))
            .context("Failed to seek to end of file")
    }

    /// Offset of the start of the line before the one starting at `offset`.
    /// Returns 0 when the scan reaches the start of the source.
    pub fn previous_line_start(&mut self, offset: u64) -> Result<u64> {
        let mut pos = offset.min(self.end_offset()?);
        let mut phase = ScanPhase::Start;

        while pos > 0 {
            let chunk_start = pos.saturating_sub(SCAN_CHUNK_SIZE as u64);
            let wanted = (pos - chunk_start) as usize;
            let read = self.read_at(chunk_start, wanted)?;

            for (i, &byte) in self.chunk[..read].iter().enumerate().rev() {
                match phase.step(byte) {
                    ScanStep::Found => {
                        let line_start = chunk_start + i as u64 + 1;
                        trace!(target: "navigation", "previous line start {} -> {}", offset, line_start);
                        return Ok(line_start);
                    }
                    ScanStep::Continue(next) => phase = next,
                }
            }
            pos = chunk_start;
        }

        trace!(target: "navigation", "previous line start {} -> 0 (start of file)", offset);
        Ok(0)
    }

    /// Offset of the start of the line after the one starting at `offset`.
    /// Returns the end offset when no further line exists.
    pub fn next_line_start(&mut self, offset: u64) -> Result<u64> {
        let mut pos = offset.min(self.end_offset()?);
        let mut phase = ForwardPhase::Line;

        loop {
            let read = self.read_at(pos, SCAN_CHUNK_SIZE)?;
            if read == 0 {
                trace!(target: "navigation", "next line start {} -> {} (end of file)", offset, pos);
                return Ok(pos);
            }

            for (i, &byte) in self.chunk[..read].iter().enumerate() {
                match (phase, byte) {
                    (_, NEWLINE) => phase = ForwardPhase::Newlines,
                    (ForwardPhase::Newlines, _) => {
                        let line_start = pos + i as u64;
                        trace!(target: "navigation", "next line start {} -> {}", offset, line_start);
                        return Ok(line_start);
                    }
                    (ForwardPhase::Line, _) => {}
                }
            }
            pos += read as u64;
        }
    }

    /// The underlying source, for structured reads that position themselves
    pub fn source_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Fill the scan chunk with up to `len` bytes from `offset`.
    /// A short count means the end of the source was reached.
    fn read_at(&mut self, offset: u64, len: usize) -> Result<usize> {
        self.source
            .seek(SeekFrom::Start(offset))
            .with_context(|| format!("Failed to seek to byte {}", offset))?;

        let len = len.min(self.chunk.len());
        let mut filled = 0;
        while filled < len {
            match self.source.read(&mut self.chunk[filled..len]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to read at byte {}", offset))
                }
            }
        }
        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn navigator(content: &str) -> LineNavigator<Cursor<Vec<u8>>> {
        LineNavigator::new(Cursor::new(content.as_bytes().to_vec()))
    }

    #[test]
    fn test_scan_phase_requires_text_before_stopping() {
        let phase = ScanPhase::Start;
        let ScanStep::Continue(phase) = phase.step(b'\n') else {
            panic!("first newline must not stop the scan");
        };
        assert_eq!(phase, ScanPhase::Newlines);
        assert_eq!(phase.step(b'\n'), ScanStep::Continue(ScanPhase::Newlines));
        assert_eq!(phase.step(b'x'), ScanStep::Continue(ScanPhase::Text));
        assert_eq!(ScanPhase::Text.step(b'x'), ScanStep::Continue(ScanPhase::Text));
        assert_eq!(ScanPhase::Text.step(b'\n'), ScanStep::Found);
    }

    #[test]
    fn test_scan_phase_starting_on_content() {
        assert_eq!(
            ScanPhase::Start.step(b'b'),
            ScanStep::Continue(ScanPhase::Text)
        );
    }

    #[test]
    fn test_next_line_start() {
        let mut nav = navigator("a,b\nccc,d\ne,ffff\n");
        assert_eq!(nav.next_line_start(0).unwrap(), 4);
        assert_eq!(nav.next_line_start(4).unwrap(), 10);
        // Last line: no further line, so the cursor lands on the end
        assert_eq!(nav.next_line_start(10).unwrap(), 17);
        assert_eq!(nav.next_line_start(17).unwrap(), 17);
    }

    #[test]
    fn test_previous_line_start() {
        let mut nav = navigator("a,b\nccc,d\ne,ffff\n");
        assert_eq!(nav.previous_line_start(17).unwrap(), 10);
        assert_eq!(nav.previous_line_start(10).unwrap(), 4);
        assert_eq!(nav.previous_line_start(4).unwrap(), 0);
        assert_eq!(nav.previous_line_start(0).unwrap(), 0);
    }

    #[test]
    fn test_empty_source() {
        let mut nav = navigator("");
        assert_eq!(nav.end_offset().unwrap(), 0);
        assert_eq!(nav.next_line_start(0).unwrap(), 0);
        assert_eq!(nav.previous_line_start(0).unwrap(), 0);
    }

    #[test]
    fn test_no_trailing_newline() {
        let mut nav = navigator("a\nb");
        assert_eq!(nav.next_line_start(0).unwrap(), 2);
        assert_eq!(nav.next_line_start(2).unwrap(), 3);
        assert_eq!(nav.previous_line_start(3).unwrap(), 2);
        assert_eq!(nav.previous_line_start(2).unwrap(), 0);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut nav = navigator("a\n\n\nb\nc\n");
        assert_eq!(nav.next_line_start(0).unwrap(), 4);
        assert_eq!(nav.previous_line_start(4).unwrap(), 0);
        assert_eq!(nav.previous_line_start(6).unwrap(), 4);
    }

    #[test]
    fn test_leading_newline() {
        let mut nav = navigator("\na\nb\n");
        assert_eq!(nav.previous_line_start(3).unwrap(), 1);
        assert_eq!(nav.previous_line_start(1).unwrap(), 0);
        assert_eq!(nav.next_line_start(0).unwrap(), 1);
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let mut nav = navigator("a\nb\n");
        assert_eq!(nav.previous_line_start(100).unwrap(), 2);
        assert_eq!(nav.next_line_start(100).unwrap(), 4);
    }

    #[test]
    fn test_lines_longer_than_a_chunk() {
        let long = "x".repeat(SCAN_CHUNK_SIZE * 2 + 17);
        let content = format!("{long}\n{long}\n{long}\n");
        let line_len = long.len() as u64 + 1;
        let mut nav = navigator(&content);

        assert_eq!(nav.next_line_start(0).unwrap(), line_len);
        assert_eq!(nav.next_line_start(line_len).unwrap(), line_len * 2);
        assert_eq!(nav.previous_line_start(line_len * 3).unwrap(), line_len * 2);
        assert_eq!(nav.previous_line_start(line_len * 2).unwrap(), line_len);
        assert_eq!(nav.previous_line_start(line_len).unwrap(), 0);
    }

    #[test]
    fn test_newline_on_chunk_boundary() {
        let first = "y".repeat(SCAN_CHUNK_SIZE - 1);
        let content = format!("{first}\nz\n");
        let mut nav = navigator(&content);

        assert_eq!(nav.next_line_start(0).unwrap(), SCAN_CHUNK_SIZE as u64);
        assert_eq!(
            nav.previous_line_start(SCAN_CHUNK_SIZE as u64 + 2).unwrap(),
            SCAN_CHUNK_SIZE as u64
        );
    }
}
