//! Per-row record cache slot
//!
//! The slot holds the latest applied [`FetchState`] for one loader together with
//! the record id it belongs to and a generation counter. Every fetch is issued
//! against a [`Ticket`]; a result is only written back when its ticket still
//! matches the slot, so results from superseded ids (or from a torn-down row)
//! can never reach the render policy.

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Fetch lifecycle of a single record
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<V> {
    /// Nothing fetched for the current id
    Empty,
    /// A fetch has been issued and not yet applied
    Loading,
    /// The latest applied fetch succeeded
    Ready(V),
    /// The latest applied fetch failed
    Failed(String),
}

impl<V> FetchState<V> {
    pub fn is_empty(&self) -> bool {
        matches!(self, FetchState::Empty)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FetchState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchState::Failed(_))
    }

    /// The fetched record, if any
    pub fn value(&self) -> Option<&V> {
        match self {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            FetchState::Empty => "empty",
            FetchState::Loading => "loading",
            FetchState::Ready(_) => "ready",
            FetchState::Failed(_) => "failed",
        }
    }
}

impl<V> Default for FetchState<V> {
    fn default() -> Self {
        FetchState::Empty
    }
}

/// Proof that a fetch was issued for a given id at a given generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    generation: u64,
    record_id: K,
}

impl<K> Ticket<K> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn record_id(&self) -> &K {
        &self.record_id
    }
}

#[derive(Debug, Clone)]
struct SlotEntry<K, V> {
    record_id: Option<K>,
    generation: u64,
    in_flight: bool,
    state: FetchState<V>,
}

impl<K, V> Default for SlotEntry<K, V> {
    fn default() -> Self {
        Self {
            record_id: None,
            generation: 0,
            in_flight: false,
            state: FetchState::Empty,
        }
    }
}

/// Cache slot owned by one loader instance
///
/// Cloning a slot yields another handle to the same entry; fetch tasks hold a
/// clone so they can apply their result after the coordinator has moved on.
pub struct RecordCacheSlot<K, V> {
    inner: Arc<watch::Sender<SlotEntry<K, V>>>,
}

impl<K, V> Clone for RecordCacheSlot<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for RecordCacheSlot<K, V>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entry = self.inner.borrow();
        f.debug_struct("RecordCacheSlot")
            .field("record_id", &entry.record_id)
            .field("generation", &entry.generation)
            .field("in_flight", &entry.in_flight)
            .field("state", &entry.state.label())
            .finish()
    }
}

impl<K, V> RecordCacheSlot<K, V>
where
    K: Clone + PartialEq,
    V: Clone,
{
    /// Create an empty slot with no record id
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(SlotEntry::default());
        Self {
            inner: Arc::new(sender),
        }
    }

    /// Current state
    pub fn get(&self) -> FetchState<V> {
        self.inner.borrow().state.clone()
    }

    /// Overwrite the state without touching the generation
    pub fn set(&self, state: FetchState<V>) {
        self.inner.send_modify(|entry| entry.state = state);
    }

    /// Drop the cached value and invalidate every outstanding ticket
    pub fn clear(&self) {
        self.inner.send_if_modified(|entry| {
            if entry.state.is_empty() && !entry.in_flight {
                return false;
            }
            entry.generation += 1;
            entry.in_flight = false;
            entry.state = FetchState::Empty;
            true
        });
    }

    /// Re-key the slot to `record_id`, clearing it when the id changes
    pub fn reset(&self, record_id: Option<K>) {
        self.inner.send_if_modified(|entry| {
            if entry.record_id == record_id && entry.state.is_empty() && !entry.in_flight {
                return false;
            }
            entry.generation += 1;
            entry.record_id = record_id;
            entry.in_flight = false;
            entry.state = FetchState::Empty;
            true
        });
    }

    /// Mark the slot as loading `record_id` and hand out a ticket for the fetch
    pub fn begin(&self, record_id: K) -> Ticket<K> {
        self.begin_with(record_id, false)
    }

    /// Like [`begin`](Self::begin), but a Ready value for the same id stays
    /// visible until the new result is applied
    pub fn begin_refresh(&self, record_id: K) -> Ticket<K> {
        self.begin_with(record_id, true)
    }

    fn begin_with(&self, record_id: K, keep_ready: bool) -> Ticket<K> {
        let mut generation = 0;
        let id = record_id.clone();
        self.inner.send_modify(|entry| {
            let same_id = entry.record_id.as_ref() == Some(&id);
            entry.generation += 1;
            entry.in_flight = true;
            if !(keep_ready && same_id && entry.state.is_ready()) {
                entry.state = FetchState::Loading;
            }
            entry.record_id = Some(id);
            generation = entry.generation;
        });
        Ticket {
            generation,
            record_id,
        }
    }

    /// Apply a fetch result if its ticket is still current.
    ///
    /// Returns `false` (and leaves the slot untouched) for stale tickets.
    pub fn apply(&self, ticket: &Ticket<K>, state: FetchState<V>) -> bool {
        self.inner.send_if_modified(|entry| {
            if !Self::is_current(entry, ticket) {
                return false;
            }
            entry.in_flight = false;
            entry.state = state;
            true
        })
    }

    /// Whether `ticket` would still be accepted by [`apply`](Self::apply)
    pub fn accepts(&self, ticket: &Ticket<K>) -> bool {
        Self::is_current(&self.inner.borrow(), ticket)
    }

    fn is_current(entry: &SlotEntry<K, V>, ticket: &Ticket<K>) -> bool {
        entry.generation == ticket.generation && entry.record_id.as_ref() == Some(&ticket.record_id)
    }

    pub fn record_id(&self) -> Option<K> {
        self.inner.borrow().record_id.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.inner.borrow().in_flight
    }

    /// Watch state changes of this slot
    pub fn subscribe(&self) -> SlotWatch<K, V> {
        SlotWatch {
            receiver: self.inner.subscribe(),
        }
    }
}

impl<K, V> Default for RecordCacheSlot<K, V>
where
    K: Clone + PartialEq,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a slot, used by hosts that redraw on change
pub struct SlotWatch<K, V> {
    receiver: watch::Receiver<SlotEntry<K, V>>,
}

impl<K, V> SlotWatch<K, V>
where
    K: Clone,
    V: Clone,
{
    /// State as of the last notification
    pub fn state(&self) -> FetchState<V> {
        self.receiver.borrow().state.clone()
    }

    /// Wait for the next change. Returns `false` once the slot is gone.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Wait until the state satisfies `predicate`
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Option<FetchState<V>>
    where
        F: FnMut(&FetchState<V>) -> bool,
    {
        self.receiver
            .wait_for(|entry| predicate(&entry.state))
            .await
            .ok()
            .map(|entry| entry.state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot_is_empty() {
        let slot: RecordCacheSlot<u64, String> = RecordCacheSlot::new();
        assert!(slot.get().is_empty());
        assert_eq!(slot.record_id(), None);
        assert!(!slot.is_in_flight());
    }

    #[test]
    fn test_apply_with_current_ticket() {
        let slot: RecordCacheSlot<u64, String> = RecordCacheSlot::new();
        let ticket = slot.begin(42);
        assert!(slot.get().is_loading());
        assert!(slot.is_in_flight());

        assert!(slot.apply(&ticket, FetchState::Ready("lock".to_string())));
        assert_eq!(slot.get(), FetchState::Ready("lock".to_string()));
        assert!(!slot.is_in_flight());
    }

    #[test]
    fn test_reset_invalidates_outstanding_ticket() {
        let slot: RecordCacheSlot<u64, String> = RecordCacheSlot::new();
        let old = slot.begin(42);
        slot.reset(Some(43));

        assert!(!slot.accepts(&old));
        assert!(!slot.apply(&old, FetchState::Ready("stale".to_string())));
        assert!(slot.get().is_empty());
        assert_eq!(slot.record_id(), Some(43));
    }

    #[test]
    fn test_newer_ticket_for_same_id_wins() {
        let slot: RecordCacheSlot<u64, &'static str> = RecordCacheSlot::new();
        let first = slot.begin(7);
        let second = slot.begin(7);

        assert!(!slot.apply(&first, FetchState::Ready("first")));
        assert!(slot.apply(&second, FetchState::Ready("second")));
        assert_eq!(slot.get().value(), Some(&"second"));
    }

    #[test]
    fn test_begin_refresh_keeps_ready_value() {
        let slot: RecordCacheSlot<u64, &'static str> = RecordCacheSlot::new();
        let first = slot.begin(7);
        slot.apply(&first, FetchState::Ready("old"));

        let refresh = slot.begin_refresh(7);
        assert!(slot.is_in_flight());
        assert_eq!(slot.get().value(), Some(&"old"));
        assert!(!slot.accepts(&first));

        assert!(slot.apply(&refresh, FetchState::Ready("new")));
        assert_eq!(slot.get().value(), Some(&"new"));
        assert!(!slot.is_in_flight());

        // a different id never inherits the old value
        slot.begin_refresh(8);
        assert!(slot.get().is_loading());
    }

    #[test]
    fn test_clear_is_noop_when_already_empty() {
        let slot: RecordCacheSlot<u64, String> = RecordCacheSlot::new();
        slot.reset(Some(1));
        let generation = slot.generation();
        slot.clear();
        assert_eq!(slot.generation(), generation);

        slot.set(FetchState::Ready("x".to_string()));
        slot.clear();
        assert!(slot.get().is_empty());
        assert_eq!(slot.generation(), generation + 1);
    }
}
