//! Background execution bridge demonstration
//!
//! Offloads a few blocking callables to the worker pool and spawns
//! fire-and-forget tasks that are drained before the program exits.
//!
//! Run with:
//! ```bash
//! cargo run -p core-runtime --example bridge_demo
//!
//! # JSON logs
//! cargo run -p core-runtime --example bridge_demo -- json
//! ```

use core_async::{task, time};
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use core_runtime::{RuntimeConfig, RuntimeContext};
use std::env;
use tracing::{info, warn};

#[core_async::main]
async fn main() {
    let format = match env::args().nth(1).as_deref() {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        _ => LogFormat::Pretty,
    };

    let logging = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Debug);

    let config = RuntimeConfig::builder()
        .worker_threads(2)
        .logging(logging.clone())
        .build()
        .expect("Failed to build config");

    init_logging(logging).expect("Failed to initialize logging");

    let ctx = RuntimeContext::new(config).expect("Failed to start runtime context");

    let checksum = ctx
        .run_in_background(|| {
            std::thread::sleep(std::time::Duration::from_millis(50));
            Ok::<_, std::io::Error>((1..=100u32).sum::<u32>())
        })
        .await
        .expect("checksum callable failed");
    info!(checksum, "blocking work finished without stalling the runtime");

    for id in 0..3u64 {
        task::spawn(async move {
            time::sleep(time::Duration::from_millis(20 * (id + 1))).await;
            info!(id, "fire-and-forget task finished");
        });
    }

    let failing = ctx.clone();
    task::spawn(async move {
        if let Err(err) = failing
            .run_in_background(|| Err::<(), _>(std::io::Error::other("simulated failure")))
            .await
        {
            warn!(error = %err, "background failure observed by its own task");
        }
    });

    info!("main returning; spawned tasks are drained before exit");
}
