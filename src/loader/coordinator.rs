//! Fetch coordination for a single row
//!
//! [`FetchCoordinator::refresh`] is invoked whenever one of the row's inputs
//! (record id, visibility, accessor) may have changed. It decides whether to
//! clear the slot, issue a fetch, debounce an id change, or coalesce with a
//! fetch that is already outstanding.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::slot::{FetchState, RecordCacheSlot, Ticket};
use super::{FailurePolicy, LoaderConfig};
use crate::error::Error;

/// Remote read operation for one kind of record.
///
/// One accessor is shared read-only by every row of a list, so implementations
/// must tolerate concurrent calls.
#[async_trait]
pub trait RecordAccessor: Send + Sync + 'static {
    type Id: Clone + Eq + Hash + Debug + Send + Sync + 'static;
    type Record: Clone + Send + Sync + 'static;

    /// Name used in log output
    fn name(&self) -> &'static str;

    async fn fetch(&self, id: &Self::Id) -> Result<Self::Record, Error>;
}

/// What a call to [`FetchCoordinator::refresh`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Preconditions were not met; the slot is empty
    Cleared,
    /// A fetch was issued for the current id
    Issued,
    /// The id changed; a fetch is scheduled after the debounce window
    Scheduled,
    /// A fetch for the current id is still outstanding
    InFlight,
}

/// Decides when a row (re)fetches and guards what gets written back
pub struct FetchCoordinator<A: RecordAccessor> {
    slot: RecordCacheSlot<A::Id, A::Record>,
    config: LoaderConfig,
    pending: Option<JoinHandle<()>>,
}

impl<A: RecordAccessor> FetchCoordinator<A> {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            slot: RecordCacheSlot::new(),
            config,
            pending: None,
        }
    }

    pub fn slot(&self) -> &RecordCacheSlot<A::Id, A::Record> {
        &self.slot
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Recompute the row's fetch decision from its current inputs.
    ///
    /// Must be called from within a tokio runtime; fetches run as spawned tasks.
    pub fn refresh(
        &mut self,
        record_id: Option<&A::Id>,
        is_visible: bool,
        accessor: Option<&Arc<A>>,
    ) -> RefreshOutcome {
        let (id, accessor) = match (record_id, accessor) {
            (Some(id), Some(accessor)) if is_visible => (id, accessor),
            _ => {
                self.cancel_pending();
                self.slot.reset(record_id.cloned());
                return RefreshOutcome::Cleared;
            }
        };

        let current = self.slot.record_id();
        if current.as_ref() != Some(id) {
            self.cancel_pending();
            self.slot.reset(Some(id.clone()));

            if current.is_some() && !self.config.debounce.is_zero() {
                self.schedule(id.clone(), Arc::clone(accessor));
                return RefreshOutcome::Scheduled;
            }
            self.issue(id.clone(), Arc::clone(accessor));
            return RefreshOutcome::Issued;
        }

        if self.slot.is_in_flight() {
            trace!(accessor = accessor.name(), record_id = ?id, "fetch already in flight");
            return RefreshOutcome::InFlight;
        }
        if self.has_pending() {
            return RefreshOutcome::Scheduled;
        }

        self.issue(id.clone(), Arc::clone(accessor));
        RefreshOutcome::Issued
    }

    /// Drop the cached record and make every outstanding fetch stale
    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.slot.reset(None);
    }

    fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn issue(&mut self, id: A::Id, accessor: Arc<A>) {
        let ticket = if self.config.keep_while_refreshing {
            self.slot.begin_refresh(id)
        } else {
            self.slot.begin(id)
        };
        debug!(
            accessor = accessor.name(),
            record_id = ?ticket.record_id(),
            generation = ticket.generation(),
            "issuing fetch"
        );
        tokio::spawn(run_fetch(
            self.slot.clone(),
            ticket,
            accessor,
            self.config.fetch_timeout,
            self.config.failure_policy,
        ));
    }

    fn schedule(&mut self, id: A::Id, accessor: Arc<A>) {
        let slot = self.slot.clone();
        let generation = slot.generation();
        let debounce = self.config.debounce;
        let timeout = self.config.fetch_timeout;
        let policy = self.config.failure_policy;

        debug!(
            accessor = accessor.name(),
            record_id = ?id,
            debounce_ms = debounce.as_millis() as u64,
            "record id changed, debouncing fetch"
        );

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if slot.generation() != generation || slot.record_id().as_ref() != Some(&id) {
                return;
            }
            let ticket = slot.begin(id);
            run_fetch(slot, ticket, accessor, timeout, policy).await;
        }));
    }
}

impl<A: RecordAccessor> Drop for FetchCoordinator<A> {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn run_fetch<A: RecordAccessor>(
    slot: RecordCacheSlot<A::Id, A::Record>,
    ticket: Ticket<A::Id>,
    accessor: Arc<A>,
    timeout: Duration,
    policy: FailurePolicy,
) {
    let (state, failure) =
        match tokio::time::timeout(timeout, accessor.fetch(ticket.record_id())).await {
            Ok(Ok(record)) => (FetchState::Ready(record), None),
            Ok(Err(e)) => (policy.failed_state(e.to_string()), Some(e)),
            Err(_) => {
                let e = Error::Timeout(timeout);
                (policy.failed_state(e.to_string()), Some(e))
            }
        };

    if !slot.apply(&ticket, state) {
        debug!(
            accessor = accessor.name(),
            record_id = ?ticket.record_id(),
            generation = ticket.generation(),
            "discarding stale fetch result"
        );
        return;
    }

    if let Some(e) = failure {
        warn!(
            accessor = accessor.name(),
            record_id = ?ticket.record_id(),
            transient = e.is_transient(),
            "fetch failed: {}",
            e
        );
    }
}

impl FailurePolicy {
    /// Slot state written after a failed fetch
    pub fn failed_state<V>(self, message: String) -> FetchState<V> {
        match self {
            FailurePolicy::Preserve => FetchState::Failed(message),
            FailurePolicy::Collapse => FetchState::Empty,
        }
    }
}
