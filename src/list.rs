//! List container owning one loader per row

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use futures::future::join_all;
use tracing::debug;

use crate::loader::{
    LoaderConfig, RecordAccessor, RecordLoader, RenderContext, RenderRecord, Trigger, ViewModel,
    Viewport,
};

/// Ordered rows of a record list laid out with a fixed row height
pub struct RecordList<A: RecordAccessor> {
    accessor: Option<Arc<A>>,
    config: LoaderConfig,
    row_height: f64,
    rows: Vec<RecordLoader<A>>,
    viewport: Option<Viewport>,
}

impl<A: RecordAccessor> RecordList<A> {
    pub fn new(accessor: Option<Arc<A>>, config: LoaderConfig, row_height: f64) -> Self {
        Self {
            accessor,
            config,
            row_height,
            rows: Vec::new(),
            viewport: None,
        }
    }

    /// Replace the displayed ids.
    ///
    /// Rows for ids that survive keep their loader (and cached record); rows for
    /// removed ids are torn down; new ids get a fresh loader.
    pub fn sync<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = A::Id>,
    {
        let mut existing: HashMap<A::Id, RecordLoader<A>> = self
            .rows
            .drain(..)
            .filter_map(|row| row.record_id().cloned().map(|id| (id, row)))
            .collect();

        let mut created = 0usize;
        for id in ids {
            let row = match existing.remove(&id) {
                Some(row) => row,
                None => {
                    created += 1;
                    RecordLoader::new(Some(id), self.accessor.clone(), self.config.clone())
                }
            };
            self.rows.push(row);
        }

        let removed = existing.len();
        for (_, mut row) in existing {
            row.teardown();
        }
        debug!(rows = self.rows.len(), created, removed, "record list synced");

        if let Some(viewport) = self.viewport {
            self.scroll(viewport);
        }
    }

    /// Feed every row its intersection with `viewport`. Returns the number of
    /// visible rows.
    pub fn scroll(&mut self, viewport: Viewport) -> usize {
        self.viewport = Some(viewport);
        let row_height = self.row_height;
        let mut visible = 0;
        for (index, row) in self.rows.iter_mut().enumerate() {
            let ratio = viewport.intersection_ratio(index as f64 * row_height, row_height);
            row.on_trigger(Trigger::IntersectionChange(ratio));
            if row.is_visible() {
                visible += 1;
            }
        }
        visible
    }

    /// Timer trigger for every row
    pub fn tick(&mut self) {
        for row in &mut self.rows {
            row.on_trigger(Trigger::TimerTick);
        }
    }

    /// Wait until no visible row is loading, or `limit` elapses. Returns
    /// whether every visible row settled in time.
    pub async fn settle(&self, limit: Duration) -> bool {
        let waits = self
            .rows
            .iter()
            .filter(|row| row.is_visible())
            .map(|row| {
                let mut watch = row.subscribe();
                async move { watch.wait_for(|state| !state.is_loading()).await }
            });
        tokio::time::timeout(limit, join_all(waits)).await.is_ok()
    }

    pub fn set_accessor(&mut self, accessor: Option<Arc<A>>) {
        self.accessor = accessor;
        for row in &mut self.rows {
            row.set_accessor(self.accessor.clone());
        }
    }

    pub fn ids(&self) -> Vec<A::Id> {
        self.rows
            .iter()
            .filter_map(|row| row.record_id().cloned())
            .collect()
    }

    pub fn row(&self, id: &A::Id) -> Option<&RecordLoader<A>> {
        self.rows.iter().find(|row| row.record_id() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<A> RecordList<A>
where
    A: RecordAccessor,
    A::Record: RenderRecord,
{
    /// Render every row in display order
    pub fn views(
        &self,
        ctx: &RenderContext,
    ) -> Vec<(A::Id, ViewModel<<A::Record as RenderRecord>::View>)> {
        self.rows
            .iter()
            .filter_map(|row| row.record_id().cloned().map(|id| (id, row.view(ctx))))
            .collect()
    }
}

/// Which locks a locker list shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockListQuery {
    /// Every lock, `0..count`
    All { count: u64 },
    /// Locks owned by an account
    Owner(Address),
    /// Locks the user pinned
    Watchlist(Vec<u64>),
    /// Search box text; only an address yields results
    Filter(String),
}

impl LockListQuery {
    /// Address to look up owned locks for, if the query is owner-based
    pub fn owner(&self) -> Option<Address> {
        match self {
            LockListQuery::Owner(address) => Some(*address),
            LockListQuery::Filter(text) => text.trim().parse::<Address>().ok(),
            _ => None,
        }
    }

    /// Ids that can be resolved without a chain read
    pub fn static_ids(&self) -> Option<Vec<u64>> {
        match self {
            LockListQuery::All { count } => Some((0..*count).collect()),
            LockListQuery::Watchlist(ids) => Some(ids.clone()),
            LockListQuery::Filter(_) if self.owner().is_none() => Some(Vec::new()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_only_matches_addresses() {
        let query = LockListQuery::Filter("pepe".to_string());
        assert_eq!(query.owner(), None);
        assert_eq!(query.static_ids(), Some(vec![]));

        let query =
            LockListQuery::Filter(" 0x4200000000000000000000000000000000000006 ".to_string());
        assert!(query.owner().is_some());
        assert_eq!(query.static_ids(), None);
    }

    #[test]
    fn test_static_ids() {
        assert_eq!(
            LockListQuery::All { count: 3 }.static_ids(),
            Some(vec![0, 1, 2])
        );
        assert_eq!(
            LockListQuery::Watchlist(vec![7, 2]).static_ids(),
            Some(vec![7, 2])
        );
    }
}
