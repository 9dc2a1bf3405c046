use crate::config::RunConfig;
use crate::display::Screen;
use crate::error::Result;
use crate::output::ResultFileSink;
use crate::scheduler::{ExitStats, Job, Pool};
use crate::worker::{CommandTemplate, JobExecutor};

/// Drives one run: submits every job through the pool in order, then waits
/// for the stragglers.
pub struct Runner<S: Screen> {
    config: RunConfig,
    executor: JobExecutor,
    screen: S,
}

impl<S: Screen> Runner<S> {
    pub fn new(config: RunConfig, template: CommandTemplate, screen: S) -> Self {
        let sink = ResultFileSink::new(config.output_dir.clone());
        Self {
            executor: JobExecutor::new(template, sink),
            config,
            screen,
        }
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn into_screen(self) -> S {
        self.screen
    }

    /// Run every job to completion and return the exit-code histogram.
    ///
    /// Individual job failures (non-zero exits, signal deaths, commands that
    /// cannot be executed) never abort the run; they only show up in the
    /// histogram and the result files.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be set up or a child process can
    /// no longer be polled.
    pub async fn run(&mut self, jobs: Vec<Job>) -> Result<ExitStats> {
        let mut pool = Pool::new(&self.config, self.executor.sink().clone())?;
        let mut stats = ExitStats::new();
        let total = jobs.len();

        tracing::info!(
            jobs = total,
            capacity = pool.capacity(),
            timeout_secs = self.config.timeout_secs,
            output_dir = ?self.config.output_dir,
            "Starting run"
        );

        for (index, job) in jobs.into_iter().enumerate() {
            let mut slot = pool.acquire(job, &mut self.screen, &mut stats).await?;
            slot.render(&mut self.screen, pool.sink());

            let argv = self.executor.command_line(&slot.job);
            self.screen
                .render_title(&format!("{}/{}:{}", index + 1, total, argv.join(" ")));

            let spawned = self.executor.spawn(&slot.job, &argv);
            pool.launch(slot, spawned);
        }

        while let Some((mut slot, _)) = pool.reap(&mut self.screen, &mut stats).await? {
            slot.render_done(&mut self.screen);
        }

        tracing::info!(total = stats.total(), "Run complete");
        Ok(stats)
    }
}
