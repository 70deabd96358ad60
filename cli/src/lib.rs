//! evalsys command-line interface.
//!
//! [`run_cli`] parses arguments, sets up logging and the runtime context, runs
//! the command through [`core_async::bridge::run_to_drain`] and maps every
//! outcome to an [`ExitStatus`]:
//!
//! | Condition | Code |
//! |-----------|------|
//! | success, `--help`, `--version` | 0 |
//! | unhandled error | 1 |
//! | aborted with Ctrl-C | 2 |
//! | unknown subcommand | 2 |
//! | missing command | 3 |
//! | one unexpected extra argument | 4 |
//! | several unexpected extra arguments | 1 |

use std::ffi::OsString;
use std::future::Future;
use std::io::{self, Write};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use core_async::{bridge, signal};
use core_runtime::logging::{init_logging, LogFormat, LogLevel};
use core_runtime::{RuntimeConfig, RuntimeContext};

pub mod app;
pub mod exit;
#[cfg(test)]
mod tag;
pub mod version;

pub use exit::ExitStatus;
pub use version::VERSION;

#[derive(Debug, Parser)]
#[command(
    name = "evalsys",
    version = version::VERSION,
    about = "Tool to configure Linux based systems including population of dotfiles and package installation."
)]
pub struct Cli {
    /// Run in debug mode
    #[arg(short, long)]
    pub debug: bool,

    /// Only print the operations. Don't do anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Positionals the command does not take, including everything after `--`
    #[arg(hide = true)]
    pub extra: Vec<String>,
}

impl Cli {
    pub fn options(&self) -> app::Options {
        app::Options {
            debug: self.debug,
            dry_run: self.dry_run,
        }
    }
}

/// Runs the CLI with Ctrl-C as the abort signal.
pub fn run_cli<I, T>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> ExitStatus
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    run_cli_with_shutdown(args, out, err, async {
        if signal::ctrl_c().await.is_err() {
            // Without a signal handler there is nothing to wait for.
            std::future::pending::<()>().await;
        }
    })
}

/// Runs the CLI, aborting the command when `shutdown` resolves first.
pub fn run_cli_with_shutdown<I, T, S>(
    args: I,
    out: &mut dyn Write,
    err: &mut dyn Write,
    shutdown: S,
) -> ExitStatus
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    S: Future<Output = ()>,
{
    let status = match Cli::try_parse_from(args) {
        Ok(cli) if cli.extra.is_empty() => {
            let debug = cli.debug;
            execute(cli, out, err, shutdown).or_else(|e| report_error(err, &e, debug))
        }
        Ok(cli) => report_extra_arguments(&cli.extra, out, err),
        Err(parse_err) => report_parse_error(parse_err, out, err),
    };

    status.unwrap_or(ExitStatus::Failure)
}

fn execute<S>(
    cli: Cli,
    out: &mut dyn Write,
    err: &mut dyn Write,
    shutdown: S,
) -> anyhow::Result<ExitStatus>
where
    S: Future<Output = ()>,
{
    let options = cli.options();
    let config = RuntimeConfig::builder()
        .log_level(if options.debug {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        })
        .log_format(LogFormat::Compact)
        .build()?;

    if let Err(e) = init_logging(config.logging.clone()) {
        // An embedding host or test harness may own the global subscriber.
        tracing::debug!(error = %e, "keeping existing log subscriber");
    }

    let ctx = RuntimeContext::new(config)?;
    let outcome = bridge::run_to_drain(app::run(&ctx, options, out, shutdown))??;

    match outcome {
        app::Outcome::Completed => Ok(ExitStatus::Success),
        app::Outcome::Aborted => {
            writeln!(err, "Execution was aborted.")?;
            Ok(ExitStatus::Aborted)
        }
    }
}

fn report_extra_arguments(
    extra: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<ExitStatus> {
    match extra {
        [arg] => {
            write_help(out)?;
            writeln!(out, "\nGot unexpected extra argument ({})", arg)?;
            Ok(ExitStatus::ExtraArgument)
        }
        args => report_message(
            err,
            &format!("Got unexpected extra arguments ({})", args.join(" ")),
        ),
    }
}

fn report_parse_error(
    parse_err: clap::Error,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<ExitStatus> {
    match parse_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            write!(out, "{}", parse_err)?;
            Ok(ExitStatus::Success)
        }
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            write_help(out)?;
            writeln!(out, "\nError: Missing command.")?;
            Ok(ExitStatus::MissingCommand)
        }
        ErrorKind::InvalidSubcommand => {
            write!(err, "{}", parse_err)?;
            Ok(ExitStatus::Usage)
        }
        _ => report_message(err, &parse_error_message(&parse_err)),
    }
}

/// clap's rendered error without its own `error: ` header.
fn parse_error_message(parse_err: &clap::Error) -> String {
    let rendered = parse_err.to_string();
    rendered
        .strip_prefix("error: ")
        .unwrap_or(&rendered)
        .trim_end()
        .to_string()
}

fn write_help(out: &mut dyn Write) -> io::Result<()> {
    write!(out, "{}", Cli::command().render_help())
}

fn report_error<E>(err: &mut dyn Write, error: &E, debug: bool) -> io::Result<ExitStatus>
where
    E: std::fmt::Display + std::fmt::Debug + ?Sized,
{
    if debug {
        report_message(err, &format!("{:?}", error))
    } else {
        report_message(err, &error.to_string())
    }
}

fn report_message(err: &mut dyn Write, message: &str) -> io::Result<ExitStatus> {
    writeln!(err, "Error:")?;
    writeln!(err, "{}", message)?;
    Ok(ExitStatus::Failure)
}
