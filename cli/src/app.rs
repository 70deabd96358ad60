//! The `evalsys` command itself.

use std::future::Future;
use std::io::Write;
use std::pin::pin;

use futures::future::{self, Either};

use core_runtime::RuntimeContext;

/// Flags shared by every invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub debug: bool,
    pub dry_run: bool,
}

/// How the command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Aborted,
}

/// Runs the command, racing it against `shutdown`.
///
/// A shutdown request that is already pending wins over the command.
pub async fn run<W, S>(
    ctx: &RuntimeContext,
    options: Options,
    out: &mut W,
    shutdown: S,
) -> anyhow::Result<Outcome>
where
    W: Write + ?Sized,
    S: Future<Output = ()>,
{
    let shutdown = pin!(shutdown);
    let command = pin!(greet(ctx, options, out));

    match future::select(shutdown, command).await {
        Either::Left(((), _)) => {
            tracing::warn!("execution aborted");
            Ok(Outcome::Aborted)
        }
        Either::Right((result, _)) => result.map(|()| Outcome::Completed),
    }
}

async fn greet<W>(ctx: &RuntimeContext, options: Options, out: &mut W) -> anyhow::Result<()>
where
    W: Write + ?Sized,
{
    tracing::debug!(
        dry_run = options.dry_run,
        worker_threads = ctx.pool().size(),
        "running evalsys"
    );
    writeln!(out, "Hello World")?;
    Ok(())
}
