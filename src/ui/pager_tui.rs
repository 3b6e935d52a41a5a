// Terminal front end: raw-mode setup, the key loop and incremental drawing.

use anyhow::{anyhow, Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyEventKind},
    execute, queue,
    style::Print,
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs::File;
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::config::config::Config;
use crate::ui::actions::Action;
use crate::ui::key_mapper::KeyMapper;
use crate::ui::session::{FrameSink, PagerSession};
use crate::ui::table_renderer::{BorderGlyphs, TableRenderer};
use crate::ui::viewport::Viewport;
use crate::ui::viewport_manager::{Frame, ViewportManager};

/// Draws frames on a crossterm terminal, rewriting only the rows that changed
/// since the previous frame.
pub struct TerminalSink<W: Write> {
    out: W,
    viewport: Option<Viewport>,
    /// What is currently on screen, row by row
    on_screen: Vec<String>,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            viewport: None,
            on_screen: Vec::new(),
        }
    }

    /// Echo a pending count on the bottom row
    pub fn show_count_prompt(&mut self, count: &str) -> Result<()> {
        let Some(viewport) = self.viewport else {
            return Ok(());
        };
        let row = viewport.height.saturating_sub(1);
        if self.on_screen.len() <= row {
            self.on_screen.resize(row + 1, String::new());
        }

        queue!(self.out, MoveTo(0, row as u16), Clear(ClearType::CurrentLine), Print(count))?;
        self.on_screen[row] = count.to_string();
        self.out.flush()?;
        Ok(())
    }

    fn draw(&mut self, lines: &[String], viewport: Viewport) -> Result<()> {
        let full_redraw = self.viewport != Some(viewport) || self.on_screen.is_empty();
        if full_redraw {
            queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;
            self.on_screen.clear();
        }

        let rows = lines.len().max(self.on_screen.len());
        for row in 0..rows {
            let line = lines.get(row).map(String::as_str).unwrap_or("");
            let current = self.on_screen.get(row).map(String::as_str);
            if !full_redraw && current == Some(line) {
                continue;
            }
            queue!(
                self.out,
                MoveTo(0, row as u16),
                Clear(ClearType::CurrentLine),
                Print(line)
            )?;
        }

        self.out.flush()?;
        self.on_screen = lines.to_vec();
        self.viewport = Some(viewport);
        Ok(())
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    fn viewport(&mut self) -> Result<Viewport> {
        let size = terminal::size().context("Failed to query terminal size")?;
        Ok(Viewport::from(size))
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let viewport = self.viewport()?;
        self.draw(&frame.lines, viewport)
    }
}

/// Interactive pager bound to one session
pub struct PagerTui<R> {
    session: PagerSession<R>,
    key_mapper: KeyMapper,
}

impl<R: Read + Seek> PagerTui<R> {
    pub fn new(session: PagerSession<R>) -> Self {
        Self {
            session,
            key_mapper: KeyMapper::new(),
        }
    }

    pub fn run(mut self) -> Result<()> {
        if let Err(e) = enable_raw_mode() {
            return Err(anyhow!("Failed to enable raw mode: {}", e));
        }

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(anyhow!("Failed to setup terminal: {}", e));
        }

        let mut sink = TerminalSink::new(stdout);
        let res = self.run_app(&mut sink);

        // Always restore terminal, even on error
        let _ = disable_raw_mode();
        let _ = execute!(sink.out, LeaveAlternateScreen, Show);

        res
    }

    fn run_app<W: Write>(&mut self, sink: &mut TerminalSink<W>) -> Result<()> {
        self.session.rerender(sink)?;

        loop {
            match event::read()? {
                Event::Key(key) => {
                    // Key release events would double-trigger every command
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    match self.key_mapper.map_key(key) {
                        Some(Action::Quit) => {
                            info!(target: "input", "Quit requested");
                            return Ok(());
                        }
                        Some(action) => self.session.dispatch(&action, sink)?,
                        None if self.key_mapper.is_collecting_count() => {
                            sink.show_count_prompt(self.key_mapper.get_count_buffer())?
                        }
                        // Unmapped key; repaint in case a count prompt is showing
                        None => self.session.rerender(sink)?,
                    }
                }
                Event::Resize(width, height) => {
                    debug!(target: "render", "Resize event {}x{}", width, height);
                    self.session.rerender(sink)?;
                }
                _ => {}
            }
        }
    }
}

/// Open `path` and page through it until the user quits
pub fn run_pager(path: &Path, delimiter: u8, config: &Config) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    info!(
        target: "navigation",
        "Paging {} with delimiter {:?}",
        path.display(),
        delimiter as char
    );

    let glyphs = if config.display.use_glyphs {
        BorderGlyphs::heavy()
    } else {
        BorderGlyphs::ascii()
    };
    let manager = ViewportManager::new(file, delimiter)
        .with_renderer(TableRenderer::new(glyphs))
        .with_width_mode(config.display.column_width_mode);

    PagerTui::new(PagerSession::new(manager)).run()
}
