use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io;

use nix::sys::signal::kill;
use nix::unistd::Pid;
use tokio::process::Child;
use tokio::signal::unix::{signal, Signal as SignalStream, SignalKind};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::config::RunConfig;
use crate::display::Screen;
use crate::error::{PxargsError, Result};
use crate::output::ResultFileSink;
use crate::scheduler::{ExitOutcome, ExitStats, Job, Slot};

/// Fixed-width process pool.
///
/// Slot ids `0..capacity` are handed out lowest first until none are left;
/// from then on every acquisition waits for a running job to finish and
/// reuses its slot id. All bookkeeping (acquire, reap, tick) runs on the
/// caller's task, so the maps need no locking.
///
/// Must be created inside a tokio runtime with the time and signal drivers
/// enabled.
pub struct Pool {
    capacity: usize,
    timeout_secs: u64,
    free: BTreeSet<usize>,
    live: BTreeMap<u32, Slot>,
    /// Jobs that finished without ever running, waiting to be reaped.
    finished: VecDeque<(Slot, ExitOutcome)>,
    sink: ResultFileSink,
    ticker: Interval,
    sigchld: SignalStream,
}

impl Pool {
    /// `sink` must be the one the jobs' output streams were opened from, so
    /// status records land next to their `.out`/`.err` files.
    pub fn new(config: &RunConfig, sink: ResultFileSink) -> Result<Self> {
        let capacity = config.capacity.max(1);
        let mut ticker = interval_at(Instant::now() + config.tick_interval, config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let sigchld = signal(SignalKind::child()).map_err(PxargsError::Signal)?;

        Ok(Self {
            capacity,
            timeout_secs: config.timeout_secs,
            free: (0..capacity).collect(),
            live: BTreeMap::new(),
            finished: VecDeque::new(),
            sink,
            ticker,
            sigchld,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of running child processes.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Slot ids never handed out so far.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn is_idle(&self) -> bool {
        self.live.is_empty() && self.finished.is_empty()
    }

    pub fn sink(&self) -> &ResultFileSink {
        &self.sink
    }

    /// Bind `job` to a slot, waiting for a running job to finish when every
    /// slot id is taken.
    pub async fn acquire(
        &mut self,
        job: Job,
        screen: &mut dyn Screen,
        stats: &mut ExitStats,
    ) -> Result<Slot> {
        let id = match self.free.pop_first() {
            Some(id) => id,
            None => match self.reap(screen, stats).await? {
                Some((slot, _)) => slot.id,
                None => return Err(PxargsError::Exhausted),
            },
        };
        Ok(Slot::new(id, job, self.timeout_secs))
    }

    /// Start tracking the process spawned for `slot`.
    ///
    /// A failed spawn is not an error here: the reason goes to the job's
    /// `.err` file and the job is handed back by the next [`Pool::reap`] with
    /// the spawn-failure exit code.
    pub fn launch(&mut self, mut slot: Slot, spawned: io::Result<Child>) {
        match spawned {
            Ok(child) => match child.id() {
                Some(pid) => {
                    tracing::debug!(slot = slot.id, pid, argument = %slot.job.argument, "Job spawned");
                    slot.attach(child);
                    self.live.insert(pid, slot);
                }
                None => {
                    tracing::warn!(slot = slot.id, argument = %slot.job.argument, "Spawned job has no pid");
                    self.finished.push_back((slot, ExitOutcome::spawn_failure()));
                }
            },
            Err(e) => {
                tracing::warn!(slot = slot.id, argument = %slot.job.argument, error = %e, "Failed to spawn job");
                self.sink.note_spawn_error(&slot.job.argument, &e);
                self.finished.push_back((slot, ExitOutcome::spawn_failure()));
            }
        }
    }

    /// Wait for any job to finish and record its outcome.
    ///
    /// Ticks falling due while waiting are serviced in between and the wait
    /// carries on. Returns `None` once nothing is running.
    pub async fn reap(
        &mut self,
        screen: &mut dyn Screen,
        stats: &mut ExitStats,
    ) -> Result<Option<(Slot, ExitOutcome)>> {
        loop {
            if let Some((slot, outcome)) = self.next_finished()? {
                self.settle(&slot, outcome, stats);
                return Ok(Some((slot, outcome)));
            }
            if self.live.is_empty() {
                return Ok(None);
            }

            tokio::select! {
                _ = self.ticker.tick() => self.tick(screen),
                _ = self.sigchld.recv() => {}
            }
        }
    }

    /// Refresh every running slot's row and deliver whatever timeout signal
    /// it is owed right now.
    pub fn tick(&mut self, screen: &mut dyn Screen) {
        for (&pid, slot) in self.live.iter_mut() {
            slot.render(screen, &self.sink);

            let Some(sig) = slot.escalation() else {
                continue;
            };
            match kill(Pid::from_raw(pid as i32), sig) {
                Ok(()) => tracing::info!(
                    slot = slot.id,
                    pid,
                    signal = %sig,
                    argument = %slot.job.argument,
                    "Job over time, signal sent"
                ),
                Err(e) => tracing::debug!(pid, signal = %sig, error = %e, "Signal delivery failed"),
            }
        }
    }

    fn next_finished(&mut self) -> Result<Option<(Slot, ExitOutcome)>> {
        if let Some(done) = self.finished.pop_front() {
            return Ok(Some(done));
        }

        let mut exited = None;
        for (&pid, slot) in self.live.iter_mut() {
            if let Some(status) = slot
                .try_wait()
                .map_err(|source| PxargsError::Wait { pid, source })?
            {
                exited = Some((pid, ExitOutcome::from_status(status)));
                break;
            }
        }

        Ok(exited.and_then(|(pid, outcome)| {
            self.live.remove(&pid).map(|slot| (slot, outcome))
        }))
    }

    fn settle(&self, slot: &Slot, outcome: ExitOutcome, stats: &mut ExitStats) {
        if let Err(e) = self.sink.record(&slot.job.argument, outcome) {
            tracing::warn!(argument = %slot.job.argument, error = %e, "Failed to record job status");
        }
        stats.record(outcome);
        tracing::info!(
            slot = slot.id,
            argument = %slot.job.argument,
            outcome = %outcome,
            last_line = slot.last_line(),
            elapsed_ms = slot.elapsed().as_millis() as u64,
            "Job finished"
        );
    }
}
