//! # Manager: host wiring for the three modes.
//!
//! [`Manager`] owns the event bus, the subscriber fan-out and, depending on
//! [`Config`], either nothing, a [`StandaloneRunner`] or a
//! [`LifecycleController`].
//!
//! ```text
//! build()
//!   ├─ enable_manager = false ──► Disabled   (ManagerDisabled, nothing else)
//!   ├─ use_election   = false ──► Standalone (run spawned immediately)
//!   └─ use_election   = true  ──► Elected    (controller created, idle)
//!
//! on_run(self_addr)            (once the listening address is known)
//!   └─ Elected: register(self_addr) ─► wire resolver ─► spawn election loop
//!
//! shutdown()
//!   ├─ hook.fire()  (cancel run, stop participation, wake retry sleep)
//!   └─ wait ≤ grace:
//!        ├─ Ok      ──► AllStoppedWithin
//!        └─ Timeout ──► GraceExceeded, abort leftovers, Err(GraceExceeded{stuck})
//! ```
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use leadvisor::{Config, Manager, MemoryElection, Route, TaskFn};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut cfg = Config::default();
//! cfg.enable_manager = true;
//! cfg.use_election = true;
//!
//! let election = MemoryElection::new(cfg.election_name.clone());
//! let task = TaskFn::arc("workflows", |ctx: CancellationToken| async move {
//!     ctx.cancelled().await;
//!     Ok(())
//! });
//!
//! let manager = Manager::builder(cfg)
//!     .with_task(task)
//!     .with_election(Arc::new(election))
//!     .build()?;
//!
//! manager.on_run("10.0.0.1:15999").await?;
//! # let mut state = manager.controller().unwrap().watch_state();
//! # state.wait_for(|s| *s == leadvisor::ControllerState::Leading).await?;
//! assert_eq!(manager.route().await?, Route::Local);
//!
//! manager.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::controller::{
    ControllerParams, ControllerState, LifecycleController, Sleeper, TokioSleeper,
};
use crate::core::{hook::TerminationHook, shutdown, standalone::StandaloneRunner};
use crate::election::Election;
use crate::error::{RedirectError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::redirect::{RedirectResolver, Route};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::tasks::TaskRef;

/// How the managed task is run in this process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Manager not constructed.
    Disabled,
    /// Runs unconditionally until shutdown.
    Standalone,
    /// Runs only while holding leadership.
    Elected,
}

impl Mode {
    fn from_config(cfg: &Config) -> Self {
        match (cfg.enable_manager, cfg.use_election) {
            (false, _) => Mode::Disabled,
            (true, false) => Mode::Standalone,
            (true, true) => Mode::Elected,
        }
    }

    /// Returns a stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Mode::Disabled => "disabled",
            Mode::Standalone => "standalone",
            Mode::Elected => "elected",
        }
    }
}

/// Builder for [`Manager`].
pub struct ManagerBuilder {
    cfg: Config,
    task: Option<TaskRef>,
    election: Option<Arc<dyn Election>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl ManagerBuilder {
    /// Creates a builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            task: None,
            election: None,
            subscribers: Vec::new(),
            sleeper: None,
        }
    }

    /// Sets the managed task.
    pub fn with_task(mut self, task: TaskRef) -> Self {
        self.task = Some(task);
        self
    }

    /// Sets the election backend (required in elected mode).
    pub fn with_election(mut self, election: Arc<dyn Election>) -> Self {
        self.election = Some(election);
        self
    }

    /// Sets event subscribers.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Replaces the retry delay mechanism (defaults to [`TokioSleeper`]).
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Builds the manager. Must be called inside a tokio runtime.
    ///
    /// In standalone mode the run is spawned here.
    pub fn build(self) -> Result<Arc<Manager>, RuntimeError> {
        let mode = Mode::from_config(&self.cfg);
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let listener_stop = CancellationToken::new();
        let listener = spawn_listener(
            bus.subscribe(),
            SubscriberSet::new(self.subscribers, bus.clone()),
            listener_stop.clone(),
        );

        let mut manager = Manager {
            mode,
            grace: self.cfg.grace,
            bus: bus.clone(),
            hook: None,
            controller: None,
            resolver: RedirectResolver::new(),
            started: AtomicBool::new(false),
            workers: Mutex::new(Vec::new()),
            listener: Mutex::new(Some(listener)),
            listener_stop,
        };

        if mode == Mode::Disabled {
            bus.publish(Event::new(EventKind::ManagerDisabled));
            return Ok(Arc::new(manager));
        }

        let task = self.task.ok_or(RuntimeError::MissingTask)?;
        let hook = Arc::new(TerminationHook::new(bus.clone()));

        if mode == Mode::Elected {
            let election = self.election.ok_or(RuntimeError::MissingElection)?;
            let params = ControllerParams {
                election_name: self.cfg.election_name.clone(),
                retry: self.cfg.retry,
                grace: self.cfg.grace,
                sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
            };
            manager.controller = Some(Arc::new(LifecycleController::new(
                election,
                task,
                params,
                bus,
                Arc::clone(&hook),
                manager.resolver.clone(),
            )));
        } else {
            let name = task.name().to_string();
            let runner = StandaloneRunner::new(task, bus, Arc::clone(&hook));
            manager.workers().push((name, runner.start()));
        }

        manager.hook = Some(hook);
        Ok(Arc::new(manager))
    }
}

/// Forwards bus events to the subscriber set until stopped, then drains it.
fn spawn_listener(
    mut rx: broadcast::Receiver<Event>,
    set: SubscriberSet,
    stop: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                res = rx.recv() => match res {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                },
                _ = stop.cancelled() => {
                    while let Ok(ev) = rx.try_recv() {
                        set.emit(&ev);
                    }
                    break;
                }
            }
        }
        set.shutdown().await;
    })
}

/// Owns the managed task's lifecycle in one process.
pub struct Manager {
    mode: Mode,
    grace: std::time::Duration,
    bus: Bus,
    hook: Option<Arc<TerminationHook>>,
    controller: Option<Arc<LifecycleController>>,
    resolver: RedirectResolver,
    started: AtomicBool,
    workers: Mutex<Vec<(String, JoinHandle<()>)>>,
    listener: Mutex<Option<JoinHandle<()>>>,
    listener_stop: CancellationToken,
}

impl Manager {
    /// Returns a builder.
    pub fn builder(cfg: Config) -> ManagerBuilder {
        ManagerBuilder::new(cfg)
    }

    fn workers(&self) -> MutexGuard<'_, Vec<(String, JoinHandle<()>)>> {
        self.workers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Second phase of start-up, once this process' address is known.
    ///
    /// In elected mode registers `self_addr` as the candidate identity and
    /// starts the election loop. A registration failure is reported on the
    /// bus and leaves the process serving without ever leading; it is not an
    /// error here. Once the termination hook fired, returns
    /// [`RuntimeError::ShuttingDown`] and starts nothing.
    pub async fn on_run(&self, self_addr: &str) -> Result<(), RuntimeError> {
        if self.hook.as_ref().is_some_and(|h| h.has_fired()) {
            return Err(RuntimeError::ShuttingDown);
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(RuntimeError::AlreadyStarted);
        }
        let Some(controller) = &self.controller else {
            return Ok(());
        };
        if let Some(handle) = controller.start(self_addr).await {
            self.workers().push((controller.task_name().to_string(), handle));
        }
        Ok(())
    }

    /// Fires the termination hook. Returns `false` when it had already fired
    /// or the manager is disabled.
    pub fn on_terminate(&self) -> bool {
        self.hook.as_ref().is_some_and(|h| h.fire())
    }

    /// Fires the hook and waits up to `grace` for everything to stop.
    ///
    /// Leftovers are aborted; their names are returned in
    /// [`RuntimeError::GraceExceeded`].
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.on_terminate();

        let workers: Vec<_> = self.workers().drain(..).collect();
        let res = self.wait_all_with_grace(workers).await;

        self.listener_stop.cancel();
        let listener = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(h) = listener {
            let _ = h.await;
        }
        res
    }

    async fn wait_all_with_grace(
        &self,
        mut workers: Vec<(String, JoinHandle<()>)>,
    ) -> Result<(), RuntimeError> {
        let grace = self.grace;
        let done = async {
            for (_, h) in workers.iter_mut() {
                let _ = h.await;
            }
        };
        let timed_out = tokio::time::timeout(grace, done).await.is_err();

        let mut stuck: Vec<String> = workers
            .iter()
            .filter(|(_, h)| timed_out && !h.is_finished())
            .map(|(name, _)| name.clone())
            .collect();
        // The controller bounds its own run by the same grace and may win the race.
        if let Some(c) = self.controller.as_ref().filter(|c| c.aborted_on_shutdown()) {
            if !stuck.iter().any(|n| n == c.task_name()) {
                stuck.push(c.task_name().to_string());
            }
        }
        if stuck.is_empty() {
            self.bus.publish(Event::new(EventKind::AllStoppedWithin));
            return Ok(());
        }

        self.bus.publish(
            Event::new(EventKind::GraceExceeded)
                .with_delay(grace)
                .with_reason(stuck.join(",")),
        );

        if let Some(c) = &self.controller {
            c.abort_run();
        }
        for (_, mut h) in workers.into_iter().filter(|(_, h)| !h.is_finished()) {
            // The election loop exits by itself once its run is gone.
            if self.controller.is_some() && tokio::time::timeout(grace, &mut h).await.is_ok() {
                continue;
            }
            h.abort();
            let _ = h.await;
        }
        Err(RuntimeError::GraceExceeded { grace, stuck })
    }

    /// Starts, waits for SIGINT/SIGTERM/SIGQUIT (Ctrl-C elsewhere), then shuts down.
    pub async fn run_until_signal(&self, self_addr: &str) -> Result<(), RuntimeError> {
        self.on_run(self_addr).await?;
        match shutdown::shutdown_signal().await {
            Ok(signal) => tracing::info!(target: "leadvisor", signal, "termination signal received"),
            Err(e) => {
                self.shutdown().await?;
                return Err(RuntimeError::Signal {
                    reason: e.to_string(),
                });
            }
        }
        self.shutdown().await
    }

    /// Configured mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Leader resolver for request redirection. Unwired outside elected mode.
    pub fn redirect(&self) -> RedirectResolver {
        self.resolver.clone()
    }

    /// Where manager requests should go.
    ///
    /// Standalone is always [`Route::Local`]; disabled has no leader at all.
    pub async fn route(&self) -> Result<Route, RedirectError> {
        match self.mode {
            Mode::Disabled => Err(RedirectError::unknown("manager disabled")),
            Mode::Standalone => Ok(Route::Local),
            Mode::Elected => self.resolver.route().await,
        }
    }

    /// Controller state in elected mode, `None` otherwise.
    pub fn state(&self) -> Option<ControllerState> {
        self.controller.as_ref().map(|c| c.state())
    }

    /// `true` when this process is supposed to be running the managed task.
    pub fn is_leading(&self) -> bool {
        match self.mode {
            Mode::Disabled => false,
            Mode::Standalone => !self.hook.as_ref().is_some_and(|h| h.has_fired()),
            Mode::Elected => self.state() == Some(ControllerState::Leading),
        }
    }

    /// The elected-mode controller.
    pub fn controller(&self) -> Option<&Arc<LifecycleController>> {
        self.controller.as_ref()
    }

    /// Receiver for raw runtime events.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::election::MemoryElection;
    use crate::error::TaskError;
    use crate::tasks::TaskFn;
    use std::time::Duration;

    fn cfg(enable: bool, elect: bool) -> Config {
        let mut cfg = Config::default();
        cfg.enable_manager = enable;
        cfg.use_election = elect;
        cfg.grace = Duration::from_secs(1);
        cfg
    }

    fn idle_task(name: &'static str) -> TaskRef {
        TaskFn::arc(name, |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Ok::<_, TaskError>(())
        })
    }

    #[tokio::test]
    async fn disabled_builds_nothing() {
        let m = Manager::builder(cfg(false, true)).build().unwrap();
        assert_eq!(m.mode(), Mode::Disabled);
        assert_eq!(m.state(), None);
        assert!(!m.is_leading());
        assert!(!m.on_terminate());
        assert!(m.route().await.is_err());
        m.on_run("self:1").await.unwrap();
        m.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn missing_pieces_are_build_errors() {
        assert!(matches!(
            Manager::builder(cfg(true, false)).build(),
            Err(RuntimeError::MissingTask)
        ));
        assert!(matches!(
            Manager::builder(cfg(true, true)).with_task(idle_task("t")).build(),
            Err(RuntimeError::MissingElection)
        ));
    }

    #[tokio::test]
    async fn on_run_twice_is_rejected() {
        let m = Manager::builder(cfg(true, true))
            .with_task(idle_task("t"))
            .with_election(Arc::new(MemoryElection::new("e")))
            .build()
            .unwrap();
        m.on_run("self:1").await.unwrap();
        assert!(matches!(
            m.on_run("self:1").await,
            Err(RuntimeError::AlreadyStarted)
        ));
        m.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn on_run_after_shutdown_is_rejected() {
        let election = MemoryElection::new("e");
        let m = Manager::builder(cfg(true, true))
            .with_task(idle_task("t"))
            .with_election(Arc::new(election.clone()))
            .build()
            .unwrap();
        m.shutdown().await.unwrap();

        assert!(matches!(
            m.on_run("self:1").await,
            Err(RuntimeError::ShuttingDown)
        ));
        assert!(m.workers().is_empty());
        assert_eq!(m.state(), Some(ControllerState::Idle));
        assert_eq!(election.holder(), None);
    }

    #[tokio::test]
    async fn standalone_routes_locally_and_stops_on_shutdown() {
        let m = Manager::builder(cfg(true, false))
            .with_task(idle_task("alone"))
            .build()
            .unwrap();
        assert_eq!(m.mode(), Mode::Standalone);
        assert!(m.is_leading());
        assert_eq!(m.route().await.unwrap(), Route::Local);
        assert!(!m.redirect().is_wired());

        m.shutdown().await.unwrap();
        assert!(!m.is_leading());
        assert!(!m.on_terminate());
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_run_is_reported_and_aborted() {
        let stubborn = TaskFn::arc("stubborn", |_ctx: CancellationToken| async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<_, TaskError>(())
        });
        let m = Manager::builder(cfg(true, false))
            .with_task(stubborn)
            .build()
            .unwrap();
        tokio::task::yield_now().await;

        match m.shutdown().await {
            Err(RuntimeError::GraceExceeded { grace, stuck }) => {
                assert_eq!(grace, Duration::from_secs(1));
                assert_eq!(stuck, vec!["stubborn".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
