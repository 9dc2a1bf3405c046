use std::io;
use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::output::ResultFileSink;
use crate::scheduler::Job;
use crate::worker::CommandTemplate;

/// Spawns one child process per job.
///
/// The command is executed directly (no shell) with the job's argument
/// substituted into the template. Standard output and error go to the job's
/// result files, standard input is closed.
#[derive(Debug, Clone)]
pub struct JobExecutor {
    template: CommandTemplate,
    sink: ResultFileSink,
}

impl JobExecutor {
    pub fn new(template: CommandTemplate, sink: ResultFileSink) -> Self {
        Self { template, sink }
    }

    /// Where this executor sends job output.
    pub fn sink(&self) -> &ResultFileSink {
        &self.sink
    }

    pub fn command_line(&self, job: &Job) -> Vec<String> {
        self.template.render(&job.argument)
    }

    /// Start `argv` for `job`. Does not wait for it.
    pub fn spawn(&self, job: &Job, argv: &[String]) -> io::Result<Child> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;
        let (stdout, stderr) = self.sink.streams(&job.argument)?;

        tracing::trace!(argument = %job.argument, ?argv, "Spawning job");

        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
    }
}
