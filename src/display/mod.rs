//! Live status display.
//!
//! The pool talks to a [`Screen`]: one status row per slot and a two-row
//! title above them. Rendering never fails from the caller's point of view;
//! a row that cannot be drawn is simply skipped.
//!
//! - [`TerminalScreen`]: full-screen, cursor-addressed rendering via crossterm
//! - [`PlainScreen`]: line-printed output for cron jobs and pipes

pub mod plain;
pub mod terminal;

pub use plain::PlainScreen;
pub use terminal::TerminalScreen;

/// Rows reserved for the title above the first slot row.
pub const TITLE_ROWS: u16 = 2;

pub trait Screen {
    /// Width available to a slot row, or `None` when live slot rows are not
    /// shown at all.
    fn width(&self) -> Option<usize>;

    fn render_slot(&mut self, slot: usize, text: &str);

    fn render_title(&mut self, text: &str);

    fn render_done(&mut self, slot: usize, text: &str);
}

impl<S: Screen + ?Sized> Screen for Box<S> {
    fn width(&self) -> Option<usize> {
        (**self).width()
    }

    fn render_slot(&mut self, slot: usize, text: &str) {
        (**self).render_slot(slot, text)
    }

    fn render_title(&mut self, text: &str) {
        (**self).render_title(text)
    }

    fn render_done(&mut self, slot: usize, text: &str) {
        (**self).render_done(slot, text)
    }
}

/// Cut `text` to at most `max` characters, blanking control characters so a
/// stray `\r` or tab from job output cannot move the cursor.
pub fn clip(text: &str, max: usize) -> String {
    text.chars()
        .take(max)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
