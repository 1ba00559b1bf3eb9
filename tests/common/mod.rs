#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use leadvisor::{Config, TaskError, TaskFn, TaskRef};
use tokio_util::sync::CancellationToken;

/// Polls `cond` every few milliseconds, failing the test after 5s.
pub async fn eventually(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(tokio::time::Instant::now() < deadline, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

pub fn elected() -> Config {
    let mut cfg = Config::default();
    cfg.enable_manager = true;
    cfg.use_election = true;
    cfg.grace = Duration::from_millis(500);
    cfg.with_retry_delay(Duration::from_millis(20))
}

pub fn standalone() -> Config {
    let mut cfg = elected();
    cfg.use_election = false;
    cfg
}

/// Every run context handed to the task, in start order.
#[derive(Clone, Default)]
pub struct Runs(Arc<Mutex<Vec<CancellationToken>>>);

impl Runs {
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn live(&self) -> usize {
        self.0.lock().unwrap().iter().filter(|t| !t.is_cancelled()).count()
    }

    /// A task that records its context and runs until cancelled.
    pub fn task(&self, name: &'static str) -> TaskRef {
        let runs = self.0.clone();
        TaskFn::arc(name, move |ctx: CancellationToken| {
            runs.lock().unwrap().push(ctx.clone());
            async move {
                ctx.cancelled().await;
                Ok::<_, TaskError>(())
            }
        })
    }
}
