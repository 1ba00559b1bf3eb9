//! # Example: standalone
//!
//! A single process with election turned off: the task starts as soon as the
//! manager is built and runs until Ctrl-C (or SIGTERM/SIGQUIT).
//!
//! ## Run
//! ```bash
//! cargo run --example standalone
//! ```

use std::sync::Arc;
use std::time::Duration;

use leadvisor::{Config, LogWriter, Manager, Subscribe, TaskError, TaskFn};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut cfg = Config::default();
    cfg.enable_manager = true;
    cfg.grace = Duration::from_secs(5);

    let task = TaskFn::arc("workflows", |ctx: CancellationToken| async move {
        loop {
            tokio::select! {
                _ = ctx.cancelled() => break,
                _ = tokio::time::sleep(Duration::from_secs(1)) => println!("working..."),
            }
        }
        println!("cancelled, saving checkpoint");
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok::<(), TaskError>(())
    });

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let manager = Manager::builder(cfg)
        .with_task(task)
        .with_subscribers(subs)
        .build()?;

    println!("press Ctrl-C to stop");
    manager.run_until_signal("127.0.0.1:15999").await?;
    Ok(())
}
