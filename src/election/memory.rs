//! # In-process election backend.
//!
//! [`MemoryElection`] provides mutual exclusion among candidates that share
//! one instance (cloning shares the state). It backs tests, demos and
//! single-host deployments, and exposes fault controls to simulate the
//! conditions a real backend produces:
//!
//! | Control              | Simulates                                           |
//! |----------------------|-----------------------------------------------------|
//! | [`revoke`]           | holder's session expired / connectivity lost        |
//! | [`set_available`]    | backend outage (register fails, waits fail)         |
//! | [`fail_next_waits`]  | sporadic transient errors                           |
//!
//! ## Rules
//! - The previous tenure's token is cancelled under the same lock that grants
//!   the next one, so [`live_tenures`] never exceeds 1.
//! - Terms are monotonic per election.
//! - A free lock goes to the earliest-registered candidate currently waiting,
//!   not to whichever waiter is scheduled first.
//! - Dropping a participation resigns it, like a closed session.
//!
//! [`revoke`]: MemoryElection::revoke
//! [`set_available`]: MemoryElection::set_available
//! [`fail_next_waits`]: MemoryElection::fail_next_waits
//! [`live_tenures`]: MemoryElection::live_tenures

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::election::{Election, LeadershipContext, Participation};
use crate::error::ElectionError;

struct Tenure {
    id: u64,
    identity: String,
    term: u64,
    token: CancellationToken,
}

struct State {
    available: bool,
    next_id: u64,
    term: u64,
    stopped: HashSet<u64>,
    waiting: BTreeSet<u64>,
    holder: Option<Tenure>,
    fail_waits: u32,
    granted: Vec<CancellationToken>,
}

impl State {
    fn end_tenure(&mut self) -> bool {
        match self.holder.take() {
            Some(t) => {
                t.token.cancel();
                true
            }
            None => false,
        }
    }
}

struct Shared {
    name: String,
    state: Mutex<State>,
    changed: watch::Sender<u64>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.changed.send_modify(|v| *v = v.wrapping_add(1));
    }
}

/// In-process election backend.
///
/// # Example
/// ```rust
/// use leadvisor::{Election, MemoryElection};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let election = MemoryElection::new("workflow-manager");
/// let p = election.register("10.0.0.1:15999").await?;
///
/// let tenure = p.wait_for_leadership().await?;
/// assert_eq!(p.current_holder().await?, "10.0.0.1:15999");
///
/// election.revoke();
/// assert!(!tenure.is_live());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MemoryElection {
    shared: Arc<Shared>,
}

impl MemoryElection {
    /// Creates an empty, available election.
    pub fn new(name: impl Into<String>) -> Self {
        let (changed, _rx) = watch::channel(0u64);
        Self {
            shared: Arc::new(Shared {
                name: name.into(),
                state: Mutex::new(State {
                    available: true,
                    next_id: 0,
                    term: 0,
                    stopped: HashSet::new(),
                    waiting: BTreeSet::new(),
                    holder: None,
                    fail_waits: 0,
                    granted: Vec::new(),
                }),
                changed,
            }),
        }
    }

    /// Election name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Ends the current tenure, if any. Returns whether one was ended.
    pub fn revoke(&self) -> bool {
        let ended = self.shared.state().end_tenure();
        self.shared.notify();
        ended
    }

    /// Toggles backend reachability. Going unavailable ends the current tenure.
    pub fn set_available(&self, available: bool) {
        {
            let mut st = self.shared.state();
            st.available = available;
            if !available {
                st.end_tenure();
            }
        }
        self.shared.notify();
    }

    /// Makes the next `n` calls to `wait_for_leadership` fail transiently.
    pub fn fail_next_waits(&self, n: u32) {
        self.shared.state().fail_waits = n;
    }

    /// Identity of the current holder, if any.
    pub fn holder(&self) -> Option<String> {
        self.shared.state().holder.as_ref().map(|t| t.identity.clone())
    }

    /// Number of granted tenures whose token is not cancelled.
    pub fn live_tenures(&self) -> usize {
        let mut st = self.shared.state();
        st.granted.retain(|t| !t.is_cancelled());
        st.granted.len()
    }

    /// Last granted term (0 before the first grant).
    pub fn term(&self) -> u64 {
        self.shared.state().term
    }
}

#[async_trait]
impl Election for MemoryElection {
    async fn register(&self, candidate: &str) -> Result<Arc<dyn Participation>, ElectionError> {
        let id = {
            let mut st = self.shared.state();
            if !st.available {
                return Err(ElectionError::unavailable(format!(
                    "election {:?} unreachable",
                    self.shared.name
                )));
            }
            st.next_id += 1;
            st.next_id
        };
        Ok(Arc::new(MemoryParticipation {
            id,
            identity: candidate.to_string(),
            shared: Arc::clone(&self.shared),
        }))
    }
}

/// Candidacy in a [`MemoryElection`].
pub struct MemoryParticipation {
    id: u64,
    identity: String,
    shared: Arc<Shared>,
}

impl MemoryParticipation {
    fn try_acquire(&self, st: &mut State) -> Option<Result<LeadershipContext, ElectionError>> {
        if st.stopped.contains(&self.id) {
            return Some(Err(ElectionError::Interrupted));
        }
        if !st.available {
            return Some(Err(ElectionError::transient("backend unreachable")));
        }
        match &st.holder {
            Some(t) if t.id == self.id => {
                Some(Ok(LeadershipContext::new(t.term, t.token.clone())))
            }
            Some(_) => None,
            None if st.waiting.first() != Some(&self.id) => None,
            None => {
                st.term += 1;
                let token = CancellationToken::new();
                st.granted.retain(|t| !t.is_cancelled());
                st.granted.push(token.clone());
                st.holder = Some(Tenure {
                    id: self.id,
                    identity: self.identity.clone(),
                    term: st.term,
                    token: token.clone(),
                });
                Some(Ok(LeadershipContext::new(st.term, token)))
            }
        }
    }
}

#[async_trait]
impl Participation for MemoryParticipation {
    fn candidate(&self) -> &str {
        &self.identity
    }

    async fn wait_for_leadership(&self) -> Result<LeadershipContext, ElectionError> {
        // Subscribe before the first check so no state change is missed.
        let mut rx = self.shared.changed.subscribe();
        {
            let mut st = self.shared.state();
            if st.fail_waits > 0 && !st.stopped.contains(&self.id) {
                st.fail_waits -= 1;
                return Err(ElectionError::transient("injected wait failure"));
            }
            st.waiting.insert(self.id);
        }
        let _queued = Queued {
            id: self.id,
            shared: &self.shared,
        };
        loop {
            let res = {
                let mut st = self.shared.state();
                self.try_acquire(&mut st)
            };
            if let Some(res) = res {
                if res.is_ok() {
                    self.shared.notify();
                }
                return res;
            }
            if rx.changed().await.is_err() {
                return Err(ElectionError::Interrupted);
            }
        }
    }

    async fn current_holder(&self) -> Result<String, ElectionError> {
        let st = self.shared.state();
        if !st.available {
            return Err(ElectionError::transient("backend unreachable"));
        }
        st.holder
            .as_ref()
            .map(|t| t.identity.clone())
            .ok_or(ElectionError::NoHolder)
    }

    fn stop(&self) {
        {
            let mut st = self.shared.state();
            st.stopped.insert(self.id);
            if st.holder.as_ref().is_some_and(|t| t.id == self.id) {
                st.end_tenure();
            }
        }
        self.shared.notify();
    }
}

impl Drop for MemoryParticipation {
    fn drop(&mut self) {
        self.stop();
        self.shared.state().stopped.remove(&self.id);
    }
}

/// Place in the wait queue; leaving it lets the next waiter in line try.
struct Queued<'a> {
    id: u64,
    shared: &'a Shared,
}

impl Drop for Queued<'_> {
    fn drop(&mut self) {
        let left = self.shared.state().waiting.remove(&self.id);
        if left {
            self.shared.notify();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn first_waiter_wins_and_second_blocks() {
        let election = MemoryElection::new("e");
        let a = election.register("a").await.unwrap();
        let b = election.register("b").await.unwrap();

        let ta = a.wait_for_leadership().await.unwrap();
        assert_eq!(ta.term(), 1);
        assert_eq!(b.current_holder().await.unwrap(), "a");

        let pending = tokio::time::timeout(Duration::from_millis(50), b.wait_for_leadership()).await;
        assert!(pending.is_err(), "b must not be granted while a holds");
        assert_eq!(election.live_tenures(), 1);
    }

    #[tokio::test]
    async fn revoke_hands_over_to_next_waiter() {
        let election = MemoryElection::new("e");
        let a = election.register("a").await.unwrap();
        let b = election.register("b").await.unwrap();

        let ta = a.wait_for_leadership().await.unwrap();
        let b2 = Arc::clone(&b);
        let waiter = tokio::spawn(async move { b2.wait_for_leadership().await.map(|c| c.term()) });
        tokio::task::yield_now().await;

        assert!(election.revoke());
        assert!(!ta.is_live());
        assert_eq!(waiter.await.unwrap().unwrap(), 2);
        assert_eq!(election.holder().as_deref(), Some("b"));
        assert_eq!(election.live_tenures(), 1);
    }

    #[tokio::test]
    async fn free_lock_goes_to_the_earliest_registered_waiter() {
        let election = MemoryElection::new("e");
        let a = election.register("a").await.unwrap();
        let b = election.register("b").await.unwrap();
        let c = election.register("c").await.unwrap();
        let _ta = a.wait_for_leadership().await.unwrap();

        let c2 = Arc::clone(&c);
        let wc = tokio::spawn(async move { c2.wait_for_leadership().await.map(|t| t.term()) });
        tokio::task::yield_now().await;
        let b2 = Arc::clone(&b);
        let wb = tokio::spawn(async move { b2.wait_for_leadership().await.map(|t| t.term()) });
        tokio::task::yield_now().await;

        assert!(election.revoke());
        assert_eq!(wb.await.unwrap().unwrap(), 2);
        assert_eq!(election.holder().as_deref(), Some("b"));
        assert!(!wc.is_finished());

        b.stop();
        assert_eq!(wc.await.unwrap().unwrap(), 3);
        assert_eq!(election.holder().as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn abandoned_wait_leaves_the_queue() {
        let election = MemoryElection::new("e");
        let a = election.register("a").await.unwrap();
        let b = election.register("b").await.unwrap();
        let c = election.register("c").await.unwrap();
        let _ta = a.wait_for_leadership().await.unwrap();

        let c2 = Arc::clone(&c);
        let wc = tokio::spawn(async move { c2.wait_for_leadership().await.map(|t| t.term()) });
        let pending = tokio::time::timeout(Duration::from_millis(20), b.wait_for_leadership()).await;
        assert!(pending.is_err());

        election.revoke();
        assert_eq!(wc.await.unwrap().unwrap(), 2);
        assert!(election.shared.state().waiting.is_empty());
    }

    #[tokio::test]
    async fn bookkeeping_stays_bounded() {
        let election = MemoryElection::new("e");
        let a = election.register("a").await.unwrap();
        for _ in 0..1000 {
            let tenure = a.wait_for_leadership().await.unwrap();
            assert!(election.revoke());
            assert!(!tenure.is_live());
        }
        assert_eq!(election.term(), 1000);
        assert!(election.shared.state().granted.len() <= 1);

        for i in 0..100 {
            let p = election.register(&format!("p{i}")).await.unwrap();
            p.stop();
        }
        drop(a);
        let st = election.shared.state();
        assert!(st.stopped.is_empty());
        assert!(st.waiting.is_empty());
    }

    #[tokio::test]
    async fn stop_interrupts_pending_and_future_waits() {
        let election = MemoryElection::new("e");
        let a = election.register("a").await.unwrap();
        let b = election.register("b").await.unwrap();
        let _ta = a.wait_for_leadership().await.unwrap();

        let b2 = Arc::clone(&b);
        let waiter = tokio::spawn(async move { b2.wait_for_leadership().await });
        tokio::task::yield_now().await;

        b.stop();
        assert_eq!(waiter.await.unwrap().unwrap_err(), ElectionError::Interrupted);
        assert_eq!(b.wait_for_leadership().await.unwrap_err(), ElectionError::Interrupted);
    }

    #[tokio::test]
    async fn stopping_the_holder_resigns() {
        let election = MemoryElection::new("e");
        let a = election.register("a").await.unwrap();
        let ta = a.wait_for_leadership().await.unwrap();

        a.stop();
        a.stop();
        assert!(!ta.is_live());
        assert_eq!(election.holder(), None);
        assert_eq!(a.current_holder().await.unwrap_err(), ElectionError::NoHolder);
    }

    #[tokio::test]
    async fn outage_fails_register_and_ends_tenure() {
        let election = MemoryElection::new("e");
        let a = election.register("a").await.unwrap();
        let ta = a.wait_for_leadership().await.unwrap();

        election.set_available(false);
        assert!(!ta.is_live());
        assert!(matches!(
            election.register("b").await,
            Err(ElectionError::BackendUnavailable { .. })
        ));
        assert!(a.wait_for_leadership().await.unwrap_err().is_transient());
        assert!(a.current_holder().await.is_err());

        election.set_available(true);
        assert_eq!(a.wait_for_leadership().await.unwrap().term(), 2);
    }

    #[tokio::test]
    async fn injected_failures_are_consumed_one_per_wait() {
        let election = MemoryElection::new("e");
        let a = election.register("a").await.unwrap();
        election.fail_next_waits(2);

        assert!(a.wait_for_leadership().await.is_err());
        assert!(a.wait_for_leadership().await.is_err());
        assert!(a.wait_for_leadership().await.is_ok());
    }

    #[tokio::test]
    async fn dropping_a_participation_resigns() {
        let election = MemoryElection::new("e");
        let a = election.register("a").await.unwrap();
        let ta = a.wait_for_leadership().await.unwrap();
        drop(a);
        assert!(!ta.is_live());
        assert_eq!(election.holder(), None);
    }
}
