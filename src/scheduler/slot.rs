use std::io;
use std::process::ExitStatus;
use std::time::{Duration, Instant};

use nix::sys::signal::Signal;
use tokio::process::Child;

use crate::display::Screen;
use crate::output::ResultFileSink;
use crate::scheduler::Job;

/// Seconds past the timeout after which SIGTERM replaces SIGINT.
const TERM_AFTER_SECS: f64 = 2.0;
/// Seconds past the timeout after which SIGKILL replaces SIGTERM.
const KILL_AFTER_SECS: f64 = 3.0;

pub const DONE_MARKER: &str = "Done";

/// Signal owed to a job that has been running for `elapsed`.
///
/// Recomputed from scratch on every tick: a job that ignores a signal gets
/// the same one again next tick, and a stronger one once it crosses the next
/// threshold.
pub fn escalation_signal(elapsed: Duration, timeout_secs: u64) -> Option<Signal> {
    if timeout_secs == 0 {
        return None;
    }
    let overtime = elapsed.as_secs_f64() - timeout_secs as f64;
    if overtime > KILL_AFTER_SECS {
        Some(Signal::SIGKILL)
    } else if overtime > TERM_AFTER_SECS {
        Some(Signal::SIGTERM)
    } else if overtime > 0.0 {
        Some(Signal::SIGINT)
    } else {
        None
    }
}

/// A pool slot occupied by one job.
#[derive(Debug)]
pub struct Slot {
    pub id: usize,
    pub job: Job,
    started: Instant,
    timeout_secs: u64,
    last_line: String,
    child: Option<Child>,
}

impl Slot {
    pub fn new(id: usize, job: Job, timeout_secs: u64) -> Self {
        Self {
            id,
            job,
            started: Instant::now(),
            timeout_secs,
            last_line: String::new(),
            child: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn last_line(&self) -> &str {
        &self.last_line
    }

    pub fn escalation(&self) -> Option<Signal> {
        escalation_signal(self.elapsed(), self.timeout_secs)
    }

    pub(crate) fn attach(&mut self, child: Child) {
        self.child = Some(child);
    }

    pub(crate) fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        match self.child.as_mut() {
            Some(child) => child.try_wait(),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "slot has no process attached",
            )),
        }
    }

    /// `(  7s) 12: argument ` followed by the job's latest output line, or
    /// its annotation when there is none.
    pub fn status_line(&self, width: usize, sink: &ResultFileSink) -> String {
        let mut line = format!(
            "({:3}s){:3}: {} ",
            self.elapsed().as_secs_f64().round() as u64,
            self.job.seq,
            self.job.argument
        );
        let room = width.saturating_sub(line.chars().count());
        let tail = if sink.dir().is_some() && room > 1 {
            sink.last_line(&self.job.argument)
        } else {
            None
        };
        line.push_str(tail.as_deref().unwrap_or(&self.job.annotation));
        line
    }

    pub fn render(&mut self, screen: &mut dyn Screen, sink: &ResultFileSink) {
        if let Some(width) = screen.width() {
            self.last_line = self.status_line(width, sink);
            screen.render_slot(self.id, &self.last_line);
        }
    }

    pub fn render_done(&mut self, screen: &mut dyn Screen) {
        self.last_line = DONE_MARKER.to_string();
        screen.render_done(self.id, DONE_MARKER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: f64) -> Duration {
        Duration::from_secs_f64(secs)
    }

    #[test]
    fn disabled_timeout_never_signals() {
        assert_eq!(escalation_signal(at(0.0), 0), None);
        assert_eq!(escalation_signal(at(86_400.0), 0), None);
    }

    #[test]
    fn escalation_bands() {
        assert_eq!(escalation_signal(at(4.9), 5), None);
        assert_eq!(escalation_signal(at(5.0), 5), None);
        assert_eq!(escalation_signal(at(5.1), 5), Some(Signal::SIGINT));
        assert_eq!(escalation_signal(at(7.0), 5), Some(Signal::SIGINT));
        assert_eq!(escalation_signal(at(7.1), 5), Some(Signal::SIGTERM));
        assert_eq!(escalation_signal(at(8.0), 5), Some(Signal::SIGTERM));
        assert_eq!(escalation_signal(at(8.1), 5), Some(Signal::SIGKILL));
        assert_eq!(escalation_signal(at(60.0), 5), Some(Signal::SIGKILL));
    }

    #[test]
    fn no_kill_by_two_and_a_half_seconds_overtime() {
        // Half-second ticks, timeout of 10s, observed up to 12.5s.
        let timeout = 10;
        let sent: Vec<Signal> = (1..=25)
            .map(|tick| at(tick as f64 * 0.5))
            .filter_map(|elapsed| escalation_signal(elapsed, timeout))
            .collect();

        assert!(sent.contains(&Signal::SIGINT));
        assert!(sent.contains(&Signal::SIGTERM));
        assert!(!sent.contains(&Signal::SIGKILL));
    }

    #[test]
    fn repeated_ticks_resend_the_same_signal() {
        let first = escalation_signal(at(3.5), 1);
        let second = escalation_signal(at(3.9), 1);
        assert_eq!(first, Some(Signal::SIGTERM));
        assert_eq!(first, second);
    }

    #[test]
    fn status_line_without_output_dir_uses_annotation() {
        let slot = Slot::new(0, Job::new(4, "host-a").with_annotation("lab box"), 0);
        let line = slot.status_line(80, &ResultFileSink::discard());
        assert_eq!(line, "(  0s)  4: host-a lab box");
    }

    #[test]
    fn status_line_prefers_latest_output() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("host-a.out"), "uptime 3 days\n").unwrap();
        let sink = ResultFileSink::new(Some(dir.path().to_path_buf()));

        let slot = Slot::new(1, Job::new(0, "host-a").with_annotation("lab"), 0);
        assert_eq!(slot.status_line(80, &sink), "(  0s)  0: host-a uptime 3 days");
        // No room left for output: fall back to the annotation.
        assert_eq!(slot.status_line(10, &sink), "(  0s)  0: host-a lab");
    }

    struct WideScreen;

    impl Screen for WideScreen {
        fn width(&self) -> Option<usize> {
            Some(80)
        }
        fn render_slot(&mut self, _slot: usize, _text: &str) {}
        fn render_title(&mut self, _text: &str) {}
        fn render_done(&mut self, _slot: usize, _text: &str) {}
    }

    #[test]
    fn last_line_tracks_what_was_drawn() {
        let mut slot = Slot::new(0, Job::new(0, "x"), 0);
        assert_eq!(slot.last_line(), "");

        slot.render(&mut WideScreen, &ResultFileSink::discard());
        assert_eq!(slot.last_line(), "(  0s)  0: x ");

        slot.render_done(&mut WideScreen);
        assert_eq!(slot.last_line(), DONE_MARKER);
    }

    #[test]
    fn try_wait_without_process_is_an_error() {
        let mut slot = Slot::new(0, Job::new(0, "x"), 0);
        assert!(slot.try_wait().is_err());
    }
}
