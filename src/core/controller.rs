//! # Lifecycle controller: leadership in, cancellable runs out.
//!
//! Drives one candidacy through the election backend and runs the managed task
//! only while this process holds leadership.
//!
//! ## State machine
//! ```text
//!  Idle ──start(addr)──► Registering ──register Err──────────────────────► Stopped
//!                            │ Ok
//!                            ▼
//!              ┌───────► Waiting ──wait → Interrupted────────────────────► Stopped
//!              │            │  └──wait → other error: sleep(retry) ─┐
//!              │            │                        ▲              │
//!              │            │ wait → Acquired(tenure) └──────────────┘
//!              │            ▼
//!              │         Leading: spawn run(tenure.child_token())
//!              │            │
//!              │            ▼ tenure ends (revoked / resigned)
//!              │         cancel run, wait ≤ grace, abort if still running
//!              └────────────┘
//! ```
//!
//! ## Rules
//! - At most one run per process at any time: the next `wait_for_leadership`
//!   is issued only after the previous run finished or was aborted.
//! - At most one run per tenure: if the run ends on its own, the tenure is
//!   kept until it ends; no restart within the same term.
//! - Transient errors never stop the loop; `Interrupted` always does.
//! - The retry delay is a timed suspension through [`Sleeper`], never a busy wait.
//! - Every wait on a cancelled run is bounded by `grace`, whether the tenure
//!   ended or the termination hook fired, so the loop always reaches `Stopped`.
//! - Registration failures and transient wait errors are logged here, with
//!   or without subscribers on the bus.
//!
//! ## Consistency window
//! Cluster-wide exclusivity is the backend's guarantee plus this process'
//! reaction time: a revoked leader's run observes cancellation as soon as the
//! tenure token is cancelled, and is aborted after `grace` at the latest.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::Instrument;

use crate::core::{hook::TerminationHook, runner::run_once};
use crate::election::{Election, LeadershipContext, Participation, WaitOutcome};
use crate::error::ElectionError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::RetryPolicy;
use crate::redirect::RedirectResolver;
use crate::tasks::TaskRef;

/// Observable controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// Constructed, `start` not called yet.
    Idle,
    /// Registering the candidacy.
    Registering,
    /// Blocked in `wait_for_leadership` (or sleeping before the next wait).
    Waiting,
    /// Holding leadership; a run is (or was, this term) active.
    Leading,
    /// Terminal: registration failed or the election was interrupted.
    Stopped,
}

/// Decision taken after one `wait_for_leadership` call.
#[derive(Debug)]
pub enum Step {
    /// Start a run for this tenure.
    Lead(LeadershipContext),
    /// Sleep `delay`, then wait again.
    Retry {
        /// Time to sleep before the next wait.
        delay: Duration,
        /// The transient error being retried.
        error: ElectionError,
    },
    /// Leave the loop for good.
    Stop,
}

/// Pure transition function of the election loop.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use leadvisor::{step, ElectionError, RetryPolicy, Step, WaitOutcome};
///
/// let retry = RetryPolicy::fixed(Duration::from_secs(5));
/// match step(WaitOutcome::Transient(ElectionError::transient("timeout")), &retry) {
///     Step::Retry { delay, .. } => assert_eq!(delay, Duration::from_secs(5)),
///     other => panic!("unexpected {other:?}"),
/// }
/// assert!(matches!(step(WaitOutcome::Interrupted, &retry), Step::Stop));
/// ```
pub fn step(outcome: WaitOutcome, retry: &RetryPolicy) -> Step {
    match outcome {
        WaitOutcome::Acquired(tenure) => Step::Lead(tenure),
        WaitOutcome::Interrupted => Step::Stop,
        WaitOutcome::Transient(error) => Step::Retry {
            delay: retry.next(),
            error,
        },
    }
}

/// Delay mechanism used between transient failures.
#[async_trait]
pub trait Sleeper: Send + Sync + 'static {
    /// Suspends for `delay`.
    async fn sleep(&self, delay: Duration);
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await
    }
}

/// Parameters of a [`LifecycleController`].
pub(crate) struct ControllerParams {
    pub election_name: String,
    pub retry: RetryPolicy,
    pub grace: Duration,
    pub sleeper: Arc<dyn Sleeper>,
}

/// Elected lifecycle controller.
///
/// Owns the candidacy and the active tenure; other components only see the
/// [`RedirectResolver`] wired to it.
pub struct LifecycleController {
    election: Arc<dyn Election>,
    task: TaskRef,
    params: ControllerParams,
    bus: Bus,
    hook: Arc<TerminationHook>,
    resolver: RedirectResolver,
    state: watch::Sender<ControllerState>,
    runs: AtomicU32,
    active_run: Mutex<Option<AbortHandle>>,
    aborted_on_shutdown: AtomicBool,
}

impl LifecycleController {
    pub(crate) fn new(
        election: Arc<dyn Election>,
        task: TaskRef,
        params: ControllerParams,
        bus: Bus,
        hook: Arc<TerminationHook>,
        resolver: RedirectResolver,
    ) -> Self {
        let (state, _rx) = watch::channel(ControllerState::Idle);
        Self {
            election,
            task,
            params,
            bus,
            hook,
            resolver,
            state,
            runs: AtomicU32::new(0),
            active_run: Mutex::new(None),
            aborted_on_shutdown: AtomicBool::new(false),
        }
    }

    /// Current state.
    pub fn state(&self) -> ControllerState {
        *self.state.borrow()
    }

    /// Receiver notified on every state change.
    pub fn watch_state(&self) -> watch::Receiver<ControllerState> {
        self.state.subscribe()
    }

    /// Name of the managed task.
    pub fn task_name(&self) -> &str {
        self.task.name()
    }

    /// Number of runs started so far.
    pub fn runs_started(&self) -> u32 {
        self.runs.load(Ordering::SeqCst)
    }

    /// Aborts the current run, if any. Used by shutdown once its grace ran out.
    pub(crate) fn abort_run(&self) {
        if let Some(h) = self.active_run_slot().take() {
            h.abort();
        }
    }

    /// `true` once a run had to be aborted after the termination hook fired.
    pub(crate) fn aborted_on_shutdown(&self) -> bool {
        self.aborted_on_shutdown.load(Ordering::SeqCst)
    }

    fn active_run_slot(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.active_run.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, s: ControllerState) {
        self.state.send_replace(s);
    }

    /// Registers `candidate` and spawns the election loop.
    ///
    /// Returns `None` (and ends in [`ControllerState::Stopped`]) when the
    /// backend is unavailable; the process keeps serving but never leads.
    pub(crate) async fn start(self: &Arc<Self>, candidate: &str) -> Option<JoinHandle<()>> {
        self.set_state(ControllerState::Registering);

        let participation = match self.election.register(candidate).await {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(
                    target: "leadvisor",
                    candidate,
                    election = %self.params.election_name,
                    err = %e,
                    "cannot register for election, this process will not lead"
                );
                self.bus.publish(
                    Event::new(EventKind::RegistrationFailed)
                        .with_candidate(candidate)
                        .with_reason(format!("{}: {e}", self.params.election_name)),
                );
                self.set_state(ControllerState::Stopped);
                return None;
            }
        };
        self.bus
            .publish(Event::new(EventKind::Registered).with_candidate(candidate));

        self.hook.attach(Arc::clone(&participation));
        self.resolver.wire(Arc::clone(&participation));

        let me = Arc::clone(self);
        // The loop logs under the caller's span.
        Some(tokio::spawn(
            async move { me.election_loop(participation).await }.in_current_span(),
        ))
    }

    async fn election_loop(self: Arc<Self>, participation: Arc<dyn Participation>) {
        let candidate: Arc<str> = Arc::from(participation.candidate());
        let mut failures: u32 = 0;

        loop {
            self.set_state(ControllerState::Waiting);
            self.bus.publish(
                Event::new(EventKind::WaitingForLeadership).with_candidate(candidate.clone()),
            );

            let outcome = WaitOutcome::from(participation.wait_for_leadership().await);
            match step(outcome, &self.params.retry) {
                Step::Lead(tenure) => {
                    failures = 0;
                    self.lead(&candidate, tenure).await;
                }
                Step::Retry { delay, error } => {
                    failures = failures.saturating_add(1);
                    tracing::error!(
                        target: "leadvisor",
                        candidate = %candidate,
                        election = %self.params.election_name,
                        err = %error,
                        delay_ms = delay.as_millis() as u64,
                        attempt = failures,
                        "waiting for leadership failed, retrying"
                    );
                    self.bus.publish(
                        Event::new(EventKind::RetryScheduled)
                            .with_candidate(candidate.clone())
                            .with_reason(error.to_string())
                            .with_delay(delay)
                            .with_attempt(failures),
                    );
                    // Shutdown cuts the sleep short; the next wait then reports Interrupted.
                    tokio::select! {
                        _ = self.params.sleeper.sleep(delay) => {}
                        _ = self.hook.root().cancelled() => {}
                    }
                }
                Step::Stop => break,
            }
        }

        self.set_state(ControllerState::Stopped);
        self.bus.publish(
            Event::new(EventKind::ElectionStopped)
                .with_candidate(candidate)
                .with_reason("interrupted"),
        );
    }

    async fn lead(&self, candidate: &Arc<str>, tenure: LeadershipContext) {
        let term = tenure.term();
        let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(ControllerState::Leading);
        self.bus.publish(
            Event::new(EventKind::LeadershipAcquired)
                .with_candidate(candidate.clone())
                .with_term(term),
        );

        let ctx = tenure.run_context();
        self.hook.set_active(ctx.clone());

        let task = Arc::clone(&self.task);
        let bus = self.bus.clone();
        let run_ctx = ctx.clone();
        let mut handle = tokio::spawn(async move {
            let _ = run_once(task.as_ref(), run_ctx, run, Some(term), &bus).await;
        });
        *self.active_run_slot() = Some(handle.abort_handle());

        let mut finished = false;
        tokio::select! {
            _ = tenure.ended() => {}
            _ = self.hook.root().cancelled() => {}
            _ = &mut handle => {
                finished = true;
                // The run ended on its own; keep the tenure until it ends.
                tokio::select! {
                    _ = tenure.ended() => {}
                    _ = self.hook.root().cancelled() => {}
                }
            }
        }

        ctx.cancel();
        self.bus.publish(
            Event::new(EventKind::LeadershipLost)
                .with_candidate(candidate.clone())
                .with_term(term),
        );

        if !finished && self.await_run(handle, run, term).await && self.hook.has_fired() {
            self.aborted_on_shutdown.store(true, Ordering::SeqCst);
        }
        self.active_run_slot().take();
        self.hook.clear_active();
    }

    /// Waits up to `grace` for a cancelled run, aborting it afterwards.
    /// Returns `true` when the run had to be aborted.
    async fn await_run(&self, mut handle: JoinHandle<()>, run: u32, term: u64) -> bool {
        let grace = self.params.grace;
        if tokio::time::timeout(grace, &mut handle).await.is_ok() {
            return false;
        }
        handle.abort();
        let _ = handle.await;
        self.bus.publish(
            Event::new(EventKind::TaskAborted)
                .with_task(self.task.name())
                .with_attempt(run)
                .with_term(term)
                .with_delay(grace),
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::election::MemoryElection;
    use crate::error::TaskError;
    use crate::tasks::TaskFn;
    use std::collections::VecDeque;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;
    use tracing_test::traced_test;

    /// Backend replaying a fixed script of wait results, recording call times.
    struct Scripted {
        script: Mutex<VecDeque<Result<LeadershipContext, ElectionError>>>,
        calls: Mutex<Vec<Instant>>,
        stops: AtomicU32,
    }

    impl Scripted {
        fn new(script: Vec<Result<LeadershipContext, ElectionError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
                stops: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    struct ScriptedElection(Arc<Scripted>);

    #[async_trait]
    impl Election for ScriptedElection {
        async fn register(
            &self,
            _candidate: &str,
        ) -> Result<Arc<dyn Participation>, ElectionError> {
            Ok(Arc::new(ScriptedParticipation(self.0.clone())))
        }
    }

    struct ScriptedParticipation(Arc<Scripted>);

    #[async_trait]
    impl Participation for ScriptedParticipation {
        fn candidate(&self) -> &str {
            "self:1"
        }

        async fn wait_for_leadership(&self) -> Result<LeadershipContext, ElectionError> {
            self.0.calls.lock().unwrap().push(Instant::now());
            let next = self.0.script.lock().unwrap().pop_front();
            match next {
                Some(res) => res,
                None => Err(ElectionError::Interrupted),
            }
        }

        async fn current_holder(&self) -> Result<String, ElectionError> {
            Err(ElectionError::NoHolder)
        }

        fn stop(&self) {
            self.0.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Sleeper that records delays and returns immediately.
    #[derive(Default)]
    struct RecordingSleeper(Mutex<Vec<Duration>>);

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, delay: Duration) {
            self.0.lock().unwrap().push(delay);
        }
    }

    fn idle_task() -> TaskRef {
        TaskFn::arc("idle", |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Ok::<_, TaskError>(())
        })
    }

    fn controller(
        election: Arc<dyn Election>,
        task: TaskRef,
        sleeper: Arc<dyn Sleeper>,
    ) -> Arc<LifecycleController> {
        let bus = Bus::new(64);
        Arc::new(LifecycleController::new(
            election,
            task,
            ControllerParams {
                election_name: "e".to_string(),
                retry: RetryPolicy::fixed(Duration::from_secs(5)),
                grace: Duration::from_secs(1),
                sleeper,
            },
            bus.clone(),
            Arc::new(TerminationHook::new(bus)),
            RedirectResolver::new(),
        ))
    }

    #[test]
    fn step_maps_every_outcome() {
        let retry = RetryPolicy::fixed(Duration::from_secs(5));
        let tenure = LeadershipContext::new(1, CancellationToken::new());

        assert!(matches!(step(WaitOutcome::Acquired(tenure), &retry), Step::Lead(t) if t.term() == 1));
        assert!(matches!(step(WaitOutcome::Interrupted, &retry), Step::Stop));
        match step(WaitOutcome::Transient(ElectionError::transient("x")), &retry) {
            Step::Retry { delay, error } => {
                assert_eq!(delay, Duration::from_secs(5));
                assert_eq!(error, ElectionError::transient("x"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn interrupted_stops_without_further_waits() {
        let script = Scripted::new(vec![Err(ElectionError::Interrupted)]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let ctl = controller(
            Arc::new(ScriptedElection(script.clone())),
            idle_task(),
            sleeper.clone(),
        );

        let handle = ctl.start("self:1").await.expect("registered");
        handle.await.unwrap();

        assert_eq!(ctl.state(), ControllerState::Stopped);
        assert_eq!(script.calls().len(), 1);
        assert!(sleeper.0.lock().unwrap().is_empty());
        assert_eq!(ctl.runs_started(), 0);
    }

    #[tokio::test]
    async fn transient_errors_retry_through_the_sleeper() {
        let script = Scripted::new(vec![
            Err(ElectionError::transient("a")),
            Err(ElectionError::unavailable("b")),
            Err(ElectionError::NoHolder),
            Err(ElectionError::Interrupted),
        ]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let ctl = controller(
            Arc::new(ScriptedElection(script.clone())),
            idle_task(),
            sleeper.clone(),
        );

        ctl.start("self:1").await.unwrap().await.unwrap();

        assert_eq!(script.calls().len(), 4);
        assert_eq!(
            *sleeper.0.lock().unwrap(),
            vec![Duration::from_secs(5); 3]
        );
        assert_eq!(ctl.state(), ControllerState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn next_wait_only_after_the_configured_delay() {
        let script = Scripted::new(vec![
            Err(ElectionError::transient("etcd timeout")),
            Err(ElectionError::transient("etcd timeout")),
            Err(ElectionError::Interrupted),
        ]);
        let ctl = controller(
            Arc::new(ScriptedElection(script.clone())),
            idle_task(),
            Arc::new(TokioSleeper),
        );

        ctl.start("self:1").await.unwrap().await.unwrap();

        let calls = script.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[1] - calls[0] >= Duration::from_secs(5));
        assert!(calls[2] - calls[1] >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn registration_failure_stops_without_loop() {
        let election = MemoryElection::new("e");
        election.set_available(false);
        let ctl = controller(
            Arc::new(election.clone()),
            idle_task(),
            Arc::new(TokioSleeper),
        );

        assert!(ctl.start("self:1").await.is_none());
        assert_eq!(ctl.state(), ControllerState::Stopped);
        assert!(!ctl.resolver.is_wired());
        assert_eq!(election.term(), 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn registration_failure_is_logged_without_subscribers() {
        let election = MemoryElection::new("e");
        election.set_available(false);
        let ctl = controller(Arc::new(election), idle_task(), Arc::new(TokioSleeper));

        assert!(ctl.start("self:1").await.is_none());
        assert!(logs_contain("cannot register for election"));
        assert!(logs_contain("election=e"));
    }

    #[tokio::test]
    #[traced_test]
    async fn retried_wait_errors_are_logged_without_subscribers() {
        let script = Scripted::new(vec![
            Err(ElectionError::transient("etcd timeout")),
            Err(ElectionError::Interrupted),
        ]);
        let ctl = controller(
            Arc::new(ScriptedElection(script)),
            idle_task(),
            Arc::new(RecordingSleeper::default()),
        );

        ctl.start("self:1").await.unwrap().await.unwrap();
        assert!(logs_contain("waiting for leadership failed, retrying"));
        assert!(logs_contain("etcd timeout"));
    }

    async fn wait_for_runs(contexts: &Mutex<Vec<CancellationToken>>, n: usize) {
        while contexts.lock().unwrap().len() < n {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn revoke_cancels_run_and_next_tenure_gets_a_fresh_context() {
        let election = MemoryElection::new("e");
        let contexts: Arc<Mutex<Vec<CancellationToken>>> = Arc::default();
        let seen = contexts.clone();
        let task = TaskFn::arc("recorder", move |ctx: CancellationToken| {
            seen.lock().unwrap().push(ctx.clone());
            async move {
                ctx.cancelled().await;
                Ok::<_, TaskError>(())
            }
        });
        let ctl = controller(Arc::new(election.clone()), task, Arc::new(TokioSleeper));
        let mut state = ctl.watch_state();

        let handle = ctl.start("self:1").await.unwrap();
        wait_for_runs(&contexts, 1).await;

        election.set_available(false);
        let first = contexts.lock().unwrap()[0].clone();
        first.cancelled().await;
        state.wait_for(|s| *s == ControllerState::Waiting).await.unwrap();

        election.set_available(true);
        wait_for_runs(&contexts, 2).await;
        assert_eq!(ctl.state(), ControllerState::Leading);
        assert_eq!(ctl.runs_started(), 2);
        assert_eq!(election.term(), 2);

        let runs = contexts.lock().unwrap().clone();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].is_cancelled());
        assert!(!runs[1].is_cancelled());

        ctl.hook.fire();
        handle.await.unwrap();
        assert!(runs[1].is_cancelled());
        assert_eq!(ctl.state(), ControllerState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn run_ignoring_cancellation_is_aborted_after_grace() {
        let election = MemoryElection::new("e");
        let task = TaskFn::arc("stubborn", |_ctx: CancellationToken| async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<_, TaskError>(())
        });
        let ctl = controller(Arc::new(election.clone()), task, Arc::new(TokioSleeper));
        let mut state = ctl.watch_state();
        let mut events = ctl.bus.subscribe();

        let handle = ctl.start("self:1").await.unwrap();
        state.wait_for(|s| *s == ControllerState::Leading).await.unwrap();

        let revoked_at = Instant::now();
        election.revoke();
        state.wait_for(|s| *s == ControllerState::Leading && ctl.runs_started() == 2).await.unwrap();
        assert!(Instant::now() - revoked_at >= Duration::from_secs(1));

        let mut aborted = false;
        while let Ok(ev) = events.try_recv() {
            aborted |= ev.kind == EventKind::TaskAborted;
        }
        assert!(aborted);

        ctl.hook.fire();
        handle.await.unwrap();
        assert!(ctl.aborted_on_shutdown());
    }

    #[tokio::test(start_paused = true)]
    async fn hook_alone_bounds_a_run_ignoring_cancellation() {
        let election = MemoryElection::new("e");
        let task = TaskFn::arc("stubborn", |_ctx: CancellationToken| async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<_, TaskError>(())
        });
        let ctl = controller(Arc::new(election.clone()), task, Arc::new(TokioSleeper));
        let mut state = ctl.watch_state();
        let mut events = ctl.bus.subscribe();

        let _loop = ctl.start("self:1").await.unwrap();
        state.wait_for(|s| *s == ControllerState::Leading).await.unwrap();

        let fired_at = Instant::now();
        assert!(ctl.hook.fire());
        tokio::time::timeout(
            Duration::from_secs(5),
            state.wait_for(|s| *s == ControllerState::Stopped),
        )
        .await
        .expect("stopped within grace")
        .unwrap();

        let waited = Instant::now() - fired_at;
        assert!(waited >= Duration::from_secs(1) && waited < Duration::from_secs(2), "{waited:?}");
        assert!(ctl.aborted_on_shutdown());
        assert_eq!(election.holder(), None);

        let mut aborted = 0;
        while let Ok(ev) = events.try_recv() {
            if ev.kind == EventKind::TaskAborted {
                aborted += 1;
            }
        }
        assert_eq!(aborted, 1);
    }

    #[tokio::test]
    async fn run_ending_early_keeps_the_tenure() {
        let election = MemoryElection::new("e");
        let task = TaskFn::arc("short", |_ctx: CancellationToken| async move {
            Ok::<_, TaskError>(())
        });
        let ctl = controller(Arc::new(election.clone()), task, Arc::new(TokioSleeper));
        let mut state = ctl.watch_state();

        let handle = ctl.start("self:1").await.unwrap();
        state.wait_for(|s| *s == ControllerState::Leading).await.unwrap();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(ctl.state(), ControllerState::Leading);
        assert_eq!(ctl.runs_started(), 1);
        assert_eq!(election.holder().as_deref(), Some("self:1"));

        ctl.hook.fire();
        handle.await.unwrap();
        assert_eq!(election.holder(), None);
        assert_eq!(ctl.runs_started(), 1);
    }
}
