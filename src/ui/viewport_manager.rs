use anyhow::Result;
use std::io::{Read, Seek};
use tracing::{debug, info};

use crate::data::line_navigator::LineNavigator;
use crate::data::window_reader::{ColumnMetrics, WindowReader};
use crate::ui::actions::{Action, NavigateAction};
use crate::ui::table_renderer::TableRenderer;
use crate::ui::viewport::{ColumnLayout, ColumnWidthMode, Viewport};

/// Direction of a counted line jump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDirection {
    Forward,
    Backward,
}

/// One rendered viewport refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<String>,
    pub lines_read: usize,
    pub cursor_offset: u64,
    pub horizontal_shift: usize,
}

/// Owns the pager session state and turns commands into frames.
///
/// `cursor_offset` always sits on a line start (or on the end of the file),
/// column metrics always describe the window read at the last refresh.
pub struct ViewportManager<R> {
    navigator: LineNavigator<R>,
    reader: WindowReader,
    renderer: TableRenderer,
    width_mode: ColumnWidthMode,
    viewport: Viewport,

    cursor_offset: u64,
    horizontal_shift: usize,
    metrics: ColumnMetrics,
    layout: ColumnLayout,
}

impl<R: Read + Seek> ViewportManager<R> {
    pub fn new(source: R, delimiter: u8) -> Self {
        Self {
            navigator: LineNavigator::new(source),
            reader: WindowReader::new(delimiter),
            renderer: TableRenderer::default(),
            width_mode: ColumnWidthMode::default(),
            viewport: Viewport::new(80, 24),
            cursor_offset: 0,
            horizontal_shift: 0,
            metrics: ColumnMetrics::new(),
            layout: ColumnLayout::default(),
        }
    }

    pub fn with_renderer(mut self, renderer: TableRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_width_mode(mut self, mode: ColumnWidthMode) -> Self {
        self.width_mode = mode;
        self
    }

    pub fn cursor_offset(&self) -> u64 {
        self.cursor_offset
    }

    pub fn horizontal_shift(&self) -> usize {
        self.horizontal_shift
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            debug!(target: "render", "Viewport resized to {}x{}", viewport.width, viewport.height);
            self.viewport = viewport;
        }
    }

    pub fn width_mode(&self) -> ColumnWidthMode {
        self.width_mode
    }

    /// Metrics of the window read at the last refresh
    pub fn metrics(&self) -> &ColumnMetrics {
        &self.metrics
    }

    /// Layout of the window rendered at the last refresh
    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Records per page for the current viewport
    pub fn page_size(&self) -> usize {
        self.viewport.record_capacity()
    }

    /// Apply one action. `Quit` is left to the caller.
    pub fn apply(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Navigate(nav) => self.navigate(*nav)?,
            Action::CycleColumnWidthMode => self.cycle_width_mode(),
            Action::RefreshView | Action::Quit => {}
        }
        Ok(())
    }

    pub fn navigate(&mut self, action: NavigateAction) -> Result<()> {
        debug!(target: "navigation", "{:?} from byte {}", action, self.cursor_offset);
        match action {
            NavigateAction::Up(n) => self.jump_to_line(n, LineDirection::Backward)?,
            NavigateAction::Down(n) => self.jump_to_line(n, LineDirection::Forward)?,
            NavigateAction::Left(n) => (0..n).for_each(|_| self.pan_left()),
            NavigateAction::Right(n) => (0..n).for_each(|_| self.pan_right()),
            NavigateAction::PageUp => self.page_backward()?,
            NavigateAction::PageDown => self.page_forward()?,
            NavigateAction::HalfPageDown => self.half_page_forward()?,
            NavigateAction::Home => self.jump_to_start(),
            NavigateAction::End => self.jump_to_end()?,
        }
        Ok(())
    }

    /// Move down `n` lines, one line step at a time
    pub fn line_forward(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            let next = self.navigator.next_line_start(self.cursor_offset)?;
            if next == self.cursor_offset {
                break;
            }
            self.cursor_offset = next;
        }
        Ok(())
    }

    /// Move up `n` lines, one line step at a time
    pub fn line_backward(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            let previous = self.navigator.previous_line_start(self.cursor_offset)?;
            if previous == self.cursor_offset {
                break;
            }
            self.cursor_offset = previous;
        }
        Ok(())
    }

    pub fn page_forward(&mut self) -> Result<()> {
        self.line_forward(self.page_size())
    }

    pub fn page_backward(&mut self) -> Result<()> {
        self.line_backward(self.page_size())
    }

    pub fn half_page_forward(&mut self) -> Result<()> {
        self.line_forward(self.page_size() / 2)
    }

    pub fn jump_to_start(&mut self) {
        self.cursor_offset = 0;
    }

    /// Position the last page so it is fully populated
    pub fn jump_to_end(&mut self) -> Result<()> {
        self.cursor_offset = self.navigator.end_offset()?;
        self.line_backward(self.page_size())
    }

    /// Counted jump. Still walks line by line; there is no line index.
    pub fn jump_to_line(&mut self, n: usize, direction: LineDirection) -> Result<()> {
        match direction {
            LineDirection::Forward => self.line_forward(n),
            LineDirection::Backward => self.line_backward(n),
        }
    }

    pub fn pan_left(&mut self) {
        self.horizontal_shift = self.layout.pan_left(self.horizontal_shift);
    }

    pub fn pan_right(&mut self) {
        self.horizontal_shift = self
            .layout
            .pan_right(self.horizontal_shift, self.viewport.width);
    }

    pub fn cycle_width_mode(&mut self) {
        self.width_mode = self.width_mode.cycle();
        info!(target: "render", "Column width mode: {}", self.width_mode.display_name());
    }

    /// Read the window at the cursor, re-derive column metrics from it and
    /// render the frame.
    pub fn refresh(&mut self) -> Result<Frame> {
        let page_size = self.page_size();
        let window = self
            .reader
            .read_window(self.navigator.source_mut(), self.cursor_offset, page_size)?;

        self.layout = ColumnLayout::from_metrics(&window.metrics, self.width_mode);
        self.metrics = window.metrics.clone();
        self.horizontal_shift = self
            .horizontal_shift
            .min(self.layout.max_shift(self.viewport.width));

        let lines = self.renderer.render(
            &window.records,
            &self.layout,
            self.viewport,
            self.horizontal_shift,
        );

        Ok(Frame {
            lines,
            lines_read: window.lines_read(),
            cursor_offset: self.cursor_offset,
            horizontal_shift: self.horizontal_shift,
        })
    }
}
