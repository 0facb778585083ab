// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic paginated list queries.
//!
//! One parametric implementation replaces the per-resource fetch state that
//! would otherwise be copy-pasted five times: a [`QueryDescriptor`] in, a
//! [`Page`] out, with loading/error state, an at-most-one-in-flight fetch
//! policy, and change notifications for observers outside the owner's
//! subtree. Resource adapters plug in through [`PageSource`].

use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ApiResult;

/// Default page size for list queries.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Default sort: newest first.
pub const DEFAULT_SORT_KEY: &str = "id";

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter/pagination/sort state driving one list fetch. Owned by a
/// [`PagedQuery`] instance and mutated only through its setters; the service
/// layer never touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub filters: IndexMap<String, String>,
    /// Zero-based page index as sent on the wire.
    pub page: u32,
    pub page_size: u32,
    pub sort_key: String,
    pub sort_dir: SortDirection,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            filters: IndexMap::new(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort_key: DEFAULT_SORT_KEY.to_owned(),
            sort_dir: SortDirection::Desc,
        }
    }
}

impl QueryDescriptor {
    pub fn new(page_size: u32) -> Self {
        Self { page_size: page_size.max(1), ..Self::default() }
    }

    /// Builder-style initial filter.
    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(name.into(), value.into());
        self
    }

    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }

    /// Query-string pairs in the backend's convention: the filters, then
    /// `page`, `size`, and `sort=field,direction`.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> =
            self.filters.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        query.push(("page".to_owned(), self.page.to_string()));
        query.push(("size".to_owned(), self.page_size.to_string()));
        query.push(("sort".to_owned(), format!("{},{}", self.sort_key, self.sort_dir)));
        query
    }
}

/// One fetched page of a list resource plus pagination metadata. Replaced
/// wholesale on every successful fetch; never patched incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    /// Zero-based index of this page.
    pub page_index: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Build a page, deriving `total_pages = ceil(total_items / page_size)`.
    pub fn new(items: Vec<T>, total_items: u64, page_index: u32, page_size: u32) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            u32::try_from(total_items.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
        };
        Self { items, total_items, page_index, page_size, total_pages }
    }

    /// Wrap an unpaginated response as its own single page.
    pub fn single(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        let size = (items.len().max(1)) as u32;
        Self::new(items, total, 0, size)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { items: Vec::new(), total_items: 0, page_index: 0, page_size: 0, total_pages: 0 }
    }
}

/// Source of pages for one resource family.
pub trait PageSource {
    type Item;

    /// Fetch one page for the given descriptor.
    fn fetch_page(
        &self,
        descriptor: &QueryDescriptor,
    ) -> impl std::future::Future<Output = ApiResult<Page<Self::Item>>> + Send;
}

/// Lifecycle phase of a query instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Loading,
    Success,
    Failed,
}

/// Outcome of asking a query to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The fetch ran and its result was applied.
    Applied,
    /// Dropped: another fetch was already in flight. Callers re-trigger
    /// once the pending one settles.
    InFlight,
    /// The owning view was cancelled before the result could be applied.
    Cancelled,
}

struct QueryState<T> {
    page: Page<T>,
    phase: QueryPhase,
    error: Option<String>,
}

/// Point-in-time view of a query's state.
#[derive(Debug, Clone)]
pub struct QuerySnapshot<T> {
    pub page: Page<T>,
    pub phase: QueryPhase,
    pub error: Option<String>,
}

/// Bridges a [`QueryDescriptor`] to a [`Page`], exposing idempotent refresh
/// and dropping overlapping fetches.
///
/// Within one instance, responses apply in the order their requests were
/// accepted: a second request cannot start before the first finishes, so a
/// stale response can never overwrite a newer one. Distinct instances are
/// fully independent.
pub struct PagedQuery<S: PageSource> {
    source: S,
    descriptor: RwLock<QueryDescriptor>,
    state: RwLock<QueryState<S::Item>>,
    in_flight: AtomicBool,
    changed_tx: broadcast::Sender<QueryPhase>,
    cancel: CancellationToken,
}

impl<S: PageSource> PagedQuery<S> {
    /// A query in its initial `Loading` phase; no fetch has run yet.
    pub fn new(source: S, initial: QueryDescriptor) -> Self {
        let (changed_tx, _) = broadcast::channel(32);
        Self {
            source,
            descriptor: RwLock::new(initial),
            state: RwLock::new(QueryState {
                page: Page::default(),
                phase: QueryPhase::Loading,
                error: None,
            }),
            in_flight: AtomicBool::new(false),
            changed_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Create a query and immediately run the first fetch.
    pub async fn start(source: S, initial: QueryDescriptor) -> Self {
        let query = Self::new(source, initial);
        query.refresh().await;
        query
    }

    /// Token the owning view cancels when it goes away. After cancellation,
    /// in-flight results are discarded instead of touching defunct state.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Subscribe to phase transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<QueryPhase> {
        self.changed_tx.subscribe()
    }

    pub async fn descriptor(&self) -> QueryDescriptor {
        self.descriptor.read().await.clone()
    }

    /// Run one fetch with the current descriptor and apply the result.
    ///
    /// At most one fetch is in flight per instance: a refresh issued while
    /// one is pending is dropped, not queued or superseding. On success the
    /// page is replaced wholesale and the error cleared; on failure the
    /// previous page survives and the error message is recorded.
    pub async fn refresh(&self) -> FetchOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("fetch already in flight, dropping refresh");
            return FetchOutcome::InFlight;
        }

        let descriptor = self.descriptor.read().await.clone();
        {
            let mut state = self.state.write().await;
            state.phase = QueryPhase::Loading;
        }
        let _ = self.changed_tx.send(QueryPhase::Loading);

        let result = self.source.fetch_page(&descriptor).await;
        self.in_flight.store(false, Ordering::SeqCst);

        if self.cancel.is_cancelled() {
            debug!("view cancelled, discarding fetch result");
            return FetchOutcome::Cancelled;
        }

        let phase = {
            let mut state = self.state.write().await;
            match result {
                Ok(page) => {
                    state.page = page;
                    state.error = None;
                    state.phase = QueryPhase::Success;
                }
                Err(err) => {
                    state.error = Some(err.message);
                    state.phase = QueryPhase::Failed;
                }
            }
            state.phase
        };
        let _ = self.changed_tx.send(phase);
        FetchOutcome::Applied
    }

    // -- Mutators: each updates the descriptor and triggers exactly one
    // -- fetch. Every mutation except `set_page` goes back to the first
    // -- page so a stale offset is never applied to a new filter set.

    /// Set (or clear, with `None`) a named filter.
    pub async fn set_filter(&self, name: &str, value: Option<String>) -> FetchOutcome {
        {
            let mut descriptor = self.descriptor.write().await;
            match value {
                Some(v) => {
                    descriptor.filters.insert(name.to_owned(), v);
                }
                None => {
                    descriptor.filters.shift_remove(name);
                }
            }
            descriptor.page = 0;
        }
        self.refresh().await
    }

    /// Jump to a page, given the 1-based number pagination controls display.
    pub async fn set_page(&self, page: u32) -> FetchOutcome {
        {
            let mut descriptor = self.descriptor.write().await;
            descriptor.page = page.saturating_sub(1);
        }
        self.refresh().await
    }

    pub async fn set_page_size(&self, size: u32) -> FetchOutcome {
        {
            let mut descriptor = self.descriptor.write().await;
            descriptor.page_size = size.max(1);
            descriptor.page = 0;
        }
        self.refresh().await
    }

    pub async fn set_sort(&self, key: &str, dir: SortDirection) -> FetchOutcome {
        {
            let mut descriptor = self.descriptor.write().await;
            descriptor.sort_key = key.to_owned();
            descriptor.sort_dir = dir;
            descriptor.page = 0;
        }
        self.refresh().await
    }

    /// Drop all filters and restore the default page/sort, keeping the
    /// configured page size.
    pub async fn reset(&self) -> FetchOutcome {
        {
            let mut descriptor = self.descriptor.write().await;
            let page_size = descriptor.page_size;
            *descriptor = QueryDescriptor { page_size, ..QueryDescriptor::default() };
        }
        self.refresh().await
    }
}

impl<S: PageSource> PagedQuery<S>
where
    S::Item: Clone,
{
    pub async fn snapshot(&self) -> QuerySnapshot<S::Item> {
        let state = self.state.read().await;
        QuerySnapshot { page: state.page.clone(), phase: state.phase, error: state.error.clone() }
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
