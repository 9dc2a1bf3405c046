use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use super::{clip, Screen, TITLE_ROWS};

/// Full-screen display on the controlling terminal.
///
/// The alternate screen is entered on construction and left on drop, so the
/// final report lands on the normal screen.
pub struct TerminalScreen {
    out: Stdout,
}

impl TerminalScreen {
    pub fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Self { out })
    }

    fn draw_row(&mut self, row: u16, text: &str) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        if row >= rows {
            return Err(io::Error::new(io::ErrorKind::Other, "row is off screen"));
        }
        queue!(
            self.out,
            MoveTo(0, row),
            Clear(ClearType::CurrentLine),
            Print(clip(text, cols as usize))
        )?;
        self.out.flush()
    }

    fn draw_title(&mut self, text: &str) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        for row in 0..TITLE_ROWS.min(rows) {
            queue!(self.out, MoveTo(0, row), Clear(ClearType::CurrentLine))?;
        }
        let room = cols as usize * TITLE_ROWS.min(rows) as usize;
        queue!(self.out, MoveTo(0, 0), Print(clip(text, room)))?;
        self.out.flush()
    }
}

impl Screen for TerminalScreen {
    fn width(&self) -> Option<usize> {
        terminal::size().ok().map(|(cols, _)| cols as usize)
    }

    fn render_slot(&mut self, slot: usize, text: &str) {
        let row = TITLE_ROWS as usize + slot;
        if let Ok(row) = u16::try_from(row) {
            let _ = self.draw_row(row, text);
        }
    }

    fn render_title(&mut self, text: &str) {
        let _ = self.draw_title(text);
    }

    fn render_done(&mut self, slot: usize, text: &str) {
        self.render_slot(slot, text);
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show, LeaveAlternateScreen);
    }
}
