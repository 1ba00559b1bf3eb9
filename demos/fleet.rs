//! # Example: fleet
//!
//! Three managers contend on one in-process election. Only the leader runs the
//! `workflows` task; followers answer with a redirect. Leadership is revoked
//! twice to show failover, then everything shuts down.
//!
//! ## Flow
//! ```text
//! build() x3 ──► on_run(addr) x3 ──► one LeadershipAcquired
//!     revoke() ──► LeadershipLost ──► run cancelled ──► next LeadershipAcquired
//!     shutdown() x3 ──► ShutdownRequested ──► AllStoppedWithin
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=leadvisor=debug cargo run --example fleet
//! ```

use std::sync::Arc;
use std::time::Duration;

use leadvisor::{Config, LogWriter, Manager, MemoryElection, Route, Subscribe, TaskError, TaskFn};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

fn workflows(addr: String) -> leadvisor::TaskRef {
    TaskFn::arc("workflows", move |ctx: CancellationToken| {
        let addr = addr.clone();
        async move {
            let mut ticks = 0u64;
            while !ctx.is_cancelled() {
                ticks += 1;
                println!("[{addr}] reconciling workflows, tick {ticks}");
                tokio::select! {
                    _ = ctx.cancelled() => {}
                    _ = tokio::time::sleep(Duration::from_millis(200)) => {}
                }
            }
            println!("[{addr}] checkpointed after {ticks} ticks");
            Ok::<(), TaskError>(())
        }
    })
}

async fn print_routes(managers: &[(String, Arc<Manager>)]) {
    for (addr, m) in managers {
        match m.route().await {
            Ok(Route::Local) => println!("{addr}: serving locally"),
            Ok(Route::Redirect(to)) => println!("{addr}: redirect to {to}"),
            Err(e) => println!("{addr}: {e}"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut cfg = Config::default();
    cfg.enable_manager = true;
    cfg.use_election = true;
    cfg.grace = Duration::from_secs(2);
    let election = MemoryElection::new(cfg.election_name.clone());

    let mut managers = Vec::new();
    for port in 15991..=15993 {
        let addr = format!("127.0.0.1:{port}");
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
        let m = Manager::builder(cfg.clone())
            .with_task(workflows(addr.clone()))
            .with_election(Arc::new(election.clone()))
            .with_subscribers(subs)
            .build()?;
        m.on_run(&addr).await?;
        managers.push((addr, m));
    }

    for _ in 0..2 {
        tokio::time::sleep(Duration::from_millis(600)).await;
        print_routes(&managers).await;
        println!("revoking leader {:?}", election.holder());
        election.revoke();
    }

    tokio::time::sleep(Duration::from_millis(600)).await;
    print_routes(&managers).await;

    for (_, m) in &managers {
        m.shutdown().await?;
    }
    Ok(())
}
