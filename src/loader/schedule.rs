//! Scheduling policy: two triggers feeding one recompute

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::coordinator::{FetchCoordinator, RecordAccessor, RefreshOutcome};
use super::render::{render, RenderContext, RenderRecord, ViewModel};
use super::slot::{FetchState, SlotWatch};
use super::visibility::{IntersectionHandle, VisibilityTracker};
use super::LoaderConfig;

/// Events that cause a row to recompute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// The host observed a new intersection ratio
    IntersectionChange(f64),
    /// The periodic visibility recheck fired
    TimerTick,
}

/// One row: tracker, coordinator, current id and accessor
pub struct RecordLoader<A: RecordAccessor> {
    record_id: Option<A::Id>,
    accessor: Option<Arc<A>>,
    tracker: VisibilityTracker,
    coordinator: FetchCoordinator<A>,
}

impl<A: RecordAccessor> RecordLoader<A> {
    /// Construct a row. Nothing is fetched until the row becomes visible.
    pub fn new(record_id: Option<A::Id>, accessor: Option<Arc<A>>, config: LoaderConfig) -> Self {
        Self {
            record_id,
            accessor,
            tracker: VisibilityTracker::new(),
            coordinator: FetchCoordinator::new(config),
        }
    }

    /// Feed a trigger into the row.
    ///
    /// Intersection events only recompute when they flip visibility; timer
    /// ticks always recompute, which re-polls rows that stay visible.
    pub fn on_trigger(&mut self, trigger: Trigger) -> Option<RefreshOutcome> {
        match trigger {
            Trigger::IntersectionChange(ratio) => {
                if !self.tracker.observe(ratio) {
                    return None;
                }
            }
            Trigger::TimerTick => {
                self.tracker.recheck();
            }
        }
        Some(self.recompute())
    }

    /// Re-run the fetch decision from the current inputs
    pub fn recompute(&mut self) -> RefreshOutcome {
        self.coordinator.refresh(
            self.record_id.as_ref(),
            self.tracker.is_visible(),
            self.accessor.as_ref(),
        )
    }

    pub fn set_record_id(&mut self, record_id: Option<A::Id>) -> RefreshOutcome {
        self.record_id = record_id;
        self.recompute()
    }

    pub fn set_accessor(&mut self, accessor: Option<Arc<A>>) -> RefreshOutcome {
        self.accessor = accessor;
        self.recompute()
    }

    pub fn record_id(&self) -> Option<&A::Id> {
        self.record_id.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.tracker.is_visible()
    }

    pub fn intersection_handle(&self) -> IntersectionHandle {
        self.tracker.handle()
    }

    pub fn state(&self) -> FetchState<A::Record> {
        self.coordinator.slot().get()
    }

    pub fn subscribe(&self) -> SlotWatch<A::Id, A::Record> {
        self.coordinator.slot().subscribe()
    }

    pub fn config(&self) -> &LoaderConfig {
        self.coordinator.config()
    }

    /// Drop cached data; in-flight results for this row are discarded
    pub fn teardown(&mut self) {
        self.coordinator.teardown();
    }
}

impl<A> RecordLoader<A>
where
    A: RecordAccessor,
    A::Record: RenderRecord,
{
    pub fn view(&self, ctx: &RenderContext) -> ViewModel<<A::Record as RenderRecord>::View> {
        render(&self.state(), ctx)
    }
}

/// Drives a row from a channel of intersection events and the recheck timer
pub struct RowDriver<A: RecordAccessor> {
    loader: RecordLoader<A>,
    intersections: mpsc::Receiver<f64>,
    recheck: Duration,
}

impl<A: RecordAccessor> RowDriver<A> {
    pub fn new(loader: RecordLoader<A>, intersections: mpsc::Receiver<f64>) -> Self {
        let recheck = loader.config().visibility_recheck;
        Self {
            loader,
            intersections,
            recheck,
        }
    }

    /// Run until the intersection channel closes, then tear the row down
    pub async fn run(mut self) {
        let mut ticker = interval(self.recheck);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                event = self.intersections.recv() => match event {
                    Some(ratio) => {
                        self.loader.on_trigger(Trigger::IntersectionChange(ratio));
                    }
                    None => break,
                },
                _ = ticker.tick() => {
                    self.loader.on_trigger(Trigger::TimerTick);
                }
            }
        }

        debug!(record_id = ?self.loader.record_id(), "row driver stopped");
        self.loader.teardown();
    }
}
