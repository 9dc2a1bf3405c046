use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use pxargs::args::load_jobs;
use pxargs::config::{RunConfig, WipePolicy};
use pxargs::display::{PlainScreen, Screen, TerminalScreen};
use pxargs::error::{PxargsError, Result};
use pxargs::output::{confirm_on_terminal, prepare_output_dir};
use pxargs::runner::Runner;
use pxargs::scheduler::ExitStats;
use pxargs::shutdown::ShutdownSignals;
use pxargs::worker::CommandTemplate;

/// Output path meaning "discard all job output".
const NULL_OUTPUT: &str = "/dev/null";

#[derive(Parser, Debug)]
#[command(name = "pxargs")]
#[command(version)]
#[command(
    about = "Build and execute command lines from an argument list, in parallel, with live progress and per-job output files"
)]
#[command(after_help = "Lines of the argument list starting with '#' annotate the previous argument \
    on the progress display. Every '{}' in COMMAND is replaced by the argument.")]
struct Args {
    /// Run up to this many processes at a time
    #[arg(short = 'P', long = "max-procs", default_value_t = 30,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_procs: u32,

    /// Shuffle the argument list before execution
    #[arg(short, long)]
    randomize: bool,

    /// Argument file, one argument per line (default: stdin, requires -y with -o)
    #[arg(short = 'a', long = "args", value_name = "FILE")]
    args_file: Option<PathBuf>,

    /// Directory for per-job .out/.err/.status files; existing files in it are wiped.
    /// Without it (or with /dev/null) job output is discarded
    #[arg(short, long, value_name = "DIR", env = "PXARGS_OUTDIR")]
    output: Option<PathBuf>,

    /// Wipe an existing output directory without confirmation
    #[arg(short = 'y', long = "noprompt")]
    no_prompt: bool,

    /// Maximum seconds per command, 0 for unlimited. Overdue commands get
    /// SIGINT, then SIGTERM after 2 more seconds, then SIGKILL after 3
    #[arg(short, long, default_value_t = 0, value_name = "SECS")]
    timeout: u64,

    /// Print plain lines instead of the full-screen progress display
    #[arg(short, long)]
    plain: bool,

    /// Format of the final exit-code report
    #[arg(long, default_value = "table")]
    report: ReportFormat,

    /// Command and its initial arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true,
          value_name = "COMMAND")]
    command: Vec<String>,
}

#[derive(Debug, Clone, ValueEnum)]
enum ReportFormat {
    Table,
    Json,
}

fn output_dir(arg: Option<PathBuf>) -> Option<PathBuf> {
    arg.filter(|p| !p.as_os_str().is_empty() && p != Path::new(NULL_OUTPUT))
}

fn print_report(stats: &ExitStats, format: &ReportFormat) -> std::result::Result<(), serde_json::Error> {
    match format {
        ReportFormat::Table => println!("{}", stats),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(stats)?),
    }
    Ok(())
}

async fn run(args: Args) -> Result<ExitStats> {
    let output_dir = output_dir(args.output);
    if let Some(dir) = &output_dir {
        let policy = if args.no_prompt {
            WipePolicy::Force
        } else {
            WipePolicy::Prompt
        };
        prepare_output_dir(dir, policy, args.args_file.is_none(), confirm_on_terminal)?;
    }

    let jobs = load_jobs(args.args_file.as_deref(), args.randomize)?;

    let mut config = RunConfig::new(args.max_procs as usize).with_timeout(args.timeout);
    config.output_dir = output_dir;
    let template = CommandTemplate::new(args.command).with_placeholder(config.placeholder.clone());

    // Installed after the prompt and stdin reads so those stay interruptible.
    let mut shutdown = ShutdownSignals::install().map_err(PxargsError::Signal)?;

    let screen: Box<dyn Screen> = if args.plain || !io::stdout().is_terminal() {
        Box::new(PlainScreen::stdout())
    } else {
        Box::new(TerminalScreen::enter().map_err(PxargsError::Terminal)?)
    };

    let mut runner = Runner::new(config, template, screen);
    let result = tokio::select! {
        result = runner.run(jobs) => result,
        sig = shutdown.recv() => Err(PxargsError::Interrupted(sig)),
    };
    // Leave the full-screen display before anything else is printed.
    drop(runner);
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let report = args.report.clone();
    match run(args).await {
        Ok(stats) => match print_report(&stats, &report) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("pxargs: failed to write report: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("pxargs: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
