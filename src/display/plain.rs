use std::io::{self, Stdout, Write};

use super::Screen;

/// Line-printed output without cursor positioning.
///
/// Titles and completions are printed; per-slot refreshes would flood a log.
pub struct PlainScreen<W: Write = Stdout> {
    out: W,
}

impl PlainScreen<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> PlainScreen<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, line: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{}", line).and_then(|_| self.out.flush());
    }
}

impl<W: Write> Screen for PlainScreen<W> {
    fn width(&self) -> Option<usize> {
        None
    }

    fn render_slot(&mut self, _slot: usize, _text: &str) {}

    fn render_title(&mut self, text: &str) {
        self.print(format_args!("{}", text));
    }

    fn render_done(&mut self, slot: usize, text: &str) {
        self.print(format_args!("{:3}: {}", slot, text));
    }
}
