//! Paginated list controller
//!
//! Keeps one list view in sync with its [`QueryState`]:
//!
//! - every query change derives a [`CacheKey`] from the scoped query string;
//! - a fresh cache hit is shown at once, otherwise a fetch starts and the
//!   previous page stays on screen until the new one arrives;
//! - only the response for the most recently requested key is displayed,
//!   whatever order responses come back in;
//! - invalidation of the list refetches the current key.
//!
//! [`ListState`] is the synchronous core. [`ListController`] drives it from a
//! tokio task fed by the filter reducer's watch channel and the cache's
//! invalidation broadcast.

use crate::cache::{CacheKey, FetchTicket, QueryCache};
use crate::page::{ListPage, PageRange};
use console_query::{Actor, QueryState, ScopedQuery};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::{self, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

/// Load status of a list view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListPhase {
    /// First fetch for a view with nothing to show yet.
    Loading,
    /// A fetch is running while previous data is displayed.
    Fetching,
    /// Nothing in flight.
    Idle,
    /// The last fetch failed. Previous data, if any, is still displayed.
    Error,
}

/// What the list view renders.
#[derive(Debug)]
pub struct ListSnapshot<T> {
    pub phase: ListPhase,
    pub data: Option<Arc<ListPage<T>>>,
    pub error: Option<String>,
    pub query: QueryState,
    pub key: CacheKey,
}

impl<T> Clone for ListSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            phase: self.phase,
            data: self.data.clone(),
            error: self.error.clone(),
            query: self.query.clone(),
            key: self.key.clone(),
        }
    }
}

impl<T> ListSnapshot<T> {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, ListPhase::Loading | ListPhase::Fetching)
    }

    #[must_use]
    pub fn rows(&self) -> &[T] {
        self.data.as_deref().map_or(&[], |page| page.data.as_slice())
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.data.as_ref().map_or(0, |page| page.total)
    }

    #[must_use]
    pub fn page_size(&self) -> NonZeroU32 {
        self.query.per_page()
    }

    #[must_use]
    pub fn current_page(&self) -> NonZeroU32 {
        self.query.current_page()
    }

    #[must_use]
    pub fn range(&self) -> PageRange {
        PageRange::new(self.total(), self.page_size(), self.current_page())
    }
}

/// Synchronous state machine behind a [`ListController`].
///
/// Methods that may need a network round-trip return the [`FetchTicket`] to
/// run; the caller performs the fetch and reports back through
/// [`ListState::settle`].
pub struct ListState<T> {
    list: Arc<str>,
    actor: Option<Actor>,
    cache: Arc<QueryCache>,
    query: QueryState,
    key: CacheKey,
    data: Option<Arc<ListPage<T>>>,
    error: Option<String>,
    pending: Option<FetchTicket>,
}

impl<T> ListState<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(
        list: impl Into<Arc<str>>,
        actor: Option<Actor>,
        cache: Arc<QueryCache>,
        query: QueryState,
    ) -> Self {
        let list = list.into();
        let key = key_for(&list, actor.as_ref(), &query);
        Self {
            list,
            actor,
            cache,
            query,
            key,
            data: None,
            error: None,
            pending: None,
        }
    }

    #[must_use]
    pub fn list(&self) -> &str {
        &self.list
    }

    #[must_use]
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Load the current key, from cache if fresh.
    pub fn start(&mut self) -> Option<FetchTicket> {
        self.sync(false)
    }

    /// Switch to a new query state.
    pub fn set_query(&mut self, query: QueryState) -> Option<FetchTicket> {
        let key = key_for(&self.list, self.actor.as_ref(), &query);
        self.query = query;
        if key == self.key {
            return None;
        }
        tracing::debug!(list = %self.list, query = key.query(), "list query changed");
        self.key = key;
        self.error = None;
        self.pending = None;
        self.sync(false)
    }

    /// The list was invalidated: refetch the current key.
    ///
    /// The new ticket supersedes any fetch already running for this view.
    pub fn invalidated(&mut self) -> Option<FetchTicket> {
        self.sync(true)
    }

    /// Report the outcome of a fetch.
    ///
    /// Returns `true` when the outcome was applied to the view. Outcomes for
    /// superseded tickets are discarded (successful ones may still fill the
    /// cache for their own key).
    pub fn settle(&mut self, ticket: &FetchTicket, outcome: Result<ListPage<T>, String>) -> bool {
        if self.pending.as_ref() != Some(ticket) {
            if let Ok(page) = outcome {
                self.cache.complete(ticket, Arc::new(page));
            }
            tracing::debug!(
                list = %self.list,
                query = ticket.key().query(),
                "discarding response for superseded query"
            );
            return false;
        }

        self.pending = None;
        match outcome {
            Ok(page) => {
                let page = Arc::new(page);
                self.cache.complete(ticket, Arc::clone(&page));
                self.data = Some(page);
                self.error = None;
            }
            Err(message) => {
                self.cache.fail(ticket);
                tracing::warn!(list = %self.list, error = %message, "list fetch failed");
                self.error = Some(message);
            }
        }
        true
    }

    #[must_use]
    pub fn phase(&self) -> ListPhase {
        match (&self.pending, &self.data, &self.error) {
            (Some(_), None, _) => ListPhase::Loading,
            (Some(_), Some(_), _) => ListPhase::Fetching,
            (None, _, Some(_)) => ListPhase::Error,
            (None, _, None) => ListPhase::Idle,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<T> {
        ListSnapshot {
            phase: self.phase(),
            data: self.data.clone(),
            error: self.error.clone(),
            query: self.query.clone(),
            key: self.key.clone(),
        }
    }

    fn sync(&mut self, force: bool) -> Option<FetchTicket> {
        if let Some(cached) = self.cache.get::<ListPage<T>>(&self.key) {
            self.data = Some(cached.value);
            if !cached.stale && !force {
                self.pending = None;
                return None;
            }
        }
        if !force && self.pending.as_ref().is_some_and(|t| t.key() == &self.key) {
            return None;
        }
        let ticket = self.cache.begin_fetch(&self.key);
        self.pending = Some(ticket.clone());
        Some(ticket)
    }
}

fn key_for(list: &Arc<str>, actor: Option<&Actor>, query: &QueryState) -> CacheKey {
    CacheKey::new(Arc::clone(list), ScopedQuery::build(actor, query).to_query_string())
}

type FetchOutcome<T> = (FetchTicket, Result<ListPage<T>, String>);

/// Handle to a mounted list view.
///
/// Dropping the handle (or calling [`ListController::unmount`]) stops the
/// driver; responses still in flight are abandoned.
pub struct ListController<T> {
    snapshots: watch::Receiver<ListSnapshot<T>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl<T> ListController<T>
where
    T: Send + Sync + 'static,
{
    /// Mount a list view.
    ///
    /// `fetcher` receives the canonical query string and returns one page.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F, Fut, E>(
        list: impl Into<Arc<str>>,
        actor: Option<Actor>,
        cache: Arc<QueryCache>,
        mut queries: watch::Receiver<QueryState>,
        fetcher: F,
    ) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ListPage<T>, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let query = queries.borrow_and_update().clone();
        let mut state = ListState::new(list, actor, cache, query);
        let first = state.start();
        let (publish, snapshots) = watch::channel(state.snapshot());
        let cancel = CancellationToken::new();

        let task = tokio::spawn(drive(
            state,
            first,
            queries,
            Arc::new(fetcher),
            publish,
            cancel.clone(),
        ));

        Self {
            snapshots,
            cancel,
            task: Some(task),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.snapshots.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<T>> {
        self.snapshots.clone()
    }

    /// Wait until no fetch is in flight and return that snapshot.
    ///
    /// Returns `None` if the controller stopped first.
    pub async fn settled(&self) -> Option<ListSnapshot<T>> {
        let mut rx = self.snapshots.clone();
        rx.wait_for(|s| !s.is_busy()).await.ok().map(|s| s.clone())
    }

    /// Stop the driver and wait for it to exit.
    pub async fn unmount(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
            && !err.is_cancelled()
        {
            tracing::warn!(error = %err, "list driver ended abnormally");
        }
    }
}

impl<T> Drop for ListController<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn drive<T, F, Fut, E>(
    mut state: ListState<T>,
    first: Option<FetchTicket>,
    mut queries: watch::Receiver<QueryState>,
    fetcher: Arc<F>,
    publish: watch::Sender<ListSnapshot<T>>,
    cancel: CancellationToken,
) where
    T: Send + Sync + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ListPage<T>, E>> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let mut invalidations = state.cache().subscribe_invalidations();
    let mut invalidations_open = true;
    let mut inflight = Inflight::new();

    if let Some(ticket) = first {
        inflight.launch(&fetcher, ticket);
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = queries.changed() => {
                if changed.is_err() {
                    tracing::debug!(list = state.list(), "query source closed");
                    break;
                }
                let query = queries.borrow_and_update().clone();
                if let Some(ticket) = state.set_query(query) {
                    inflight.launch(&fetcher, ticket);
                }
            }

            received = invalidations.recv(), if invalidations_open => {
                let refetch = match received {
                    Ok(list) => *list == *state.list(),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "invalidation receiver lagged");
                        true
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        invalidations_open = false;
                        false
                    }
                };
                if !refetch {
                    continue;
                }
                if let Some(ticket) = state.invalidated() {
                    inflight.launch(&fetcher, ticket);
                }
            }

            Some(joined) = inflight.tasks.join_next_with_id() => {
                let (ticket, outcome) = match joined {
                    Ok((id, (ticket, outcome))) => {
                        inflight.tickets.remove(&id);
                        (ticket, outcome)
                    }
                    Err(err) => {
                        let Some(ticket) = inflight.tickets.remove(&err.id()) else {
                            continue;
                        };
                        if err.is_cancelled() {
                            continue;
                        }
                        tracing::warn!(error = %err, "list fetch task panicked");
                        (ticket, Err(format!("fetch task failed: {err}")))
                    }
                };
                if !state.settle(&ticket, outcome) {
                    continue;
                }
            }
        }

        publish.send_replace(state.snapshot());
    }

    inflight.tasks.abort_all();
    tracing::debug!(list = state.list(), "list controller stopped");
}

/// Fetch tasks of one driver, with the ticket each task was started for.
struct Inflight<T> {
    tasks: JoinSet<FetchOutcome<T>>,
    tickets: HashMap<task::Id, FetchTicket>,
}

impl<T> Inflight<T>
where
    T: Send + Sync + 'static,
{
    fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            tickets: HashMap::new(),
        }
    }

    fn launch<F, Fut, E>(&mut self, fetcher: &Arc<F>, ticket: FetchTicket)
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ListPage<T>, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let fetcher = Arc::clone(fetcher);
        tracing::debug!(key = %ticket.key(), "starting list fetch");
        let task_ticket = ticket.clone();
        let handle = self.tasks.spawn(async move {
            let outcome = fetcher(task_ticket.key().query().to_owned())
                .await
                .map_err(|err| err.to_string());
            (task_ticket, outcome)
        });
        self.tickets.insert(handle.id(), ticket);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn query(page: u32) -> QueryState {
        QueryState::new(NonZeroU32::new(10).unwrap()).with_page(NonZeroU32::new(page).unwrap())
    }

    fn state() -> ListState<u32> {
        ListState::new("products", None, Arc::new(QueryCache::new()), query(1))
    }

    #[test]
    fn first_load_is_loading() {
        let mut s = state();
        assert!(s.start().is_some());
        assert_eq!(s.phase(), ListPhase::Loading);
    }

    #[test]
    fn previous_data_is_kept_while_fetching() {
        let mut s = state();
        let t1 = s.start().unwrap();
        s.settle(&t1, Ok(ListPage::new(vec![1, 2], 25)));

        let t2 = s.set_query(query(2)).unwrap();
        let snap = s.snapshot();
        assert_eq!(snap.phase, ListPhase::Fetching);
        assert_eq!(snap.rows(), &[1, 2]);

        s.settle(&t2, Ok(ListPage::new(vec![3], 25)));
        assert_eq!(s.snapshot().rows(), &[3]);
        assert_eq!(s.phase(), ListPhase::Idle);
    }

    #[test]
    fn out_of_order_response_is_discarded() {
        let mut s = state();
        let t1 = s.start().unwrap();
        let t2 = s.set_query(query(2)).unwrap();

        assert!(s.settle(&t2, Ok(ListPage::new(vec![2], 20))));
        assert!(!s.settle(&t1, Ok(ListPage::new(vec![1], 20))));

        assert_eq!(s.snapshot().rows(), &[2]);
        assert_eq!(s.snapshot().current_page().get(), 2);
    }

    #[test]
    fn superseded_response_still_fills_its_cache_slot() {
        let mut s = state();
        let t1 = s.start().unwrap();
        let key1 = s.key().clone();
        let _t2 = s.set_query(query(2)).unwrap();

        s.settle(&t1, Ok(ListPage::new(vec![1], 20)));

        assert!(s.cache().get::<ListPage<u32>>(&key1).is_some());
        // Going back is served from cache.
        assert!(s.set_query(query(1)).is_none());
        assert_eq!(s.snapshot().rows(), &[1]);
    }

    #[test]
    fn failure_keeps_data_and_reports_error() {
        let mut s = state();
        let t1 = s.start().unwrap();
        s.settle(&t1, Ok(ListPage::new(vec![1], 1)));
        let t2 = s.invalidated().unwrap();

        s.settle(&t2, Err("boom".to_owned()));

        let snap = s.snapshot();
        assert_eq!(snap.phase, ListPhase::Error);
        assert_eq!(snap.error.as_deref(), Some("boom"));
        assert_eq!(snap.rows(), &[1]);
    }

    #[test]
    fn same_key_does_not_refetch() {
        let mut s = state();
        let _t = s.start().unwrap();
        assert!(s.set_query(query(1)).is_none());
    }

    #[tokio::test]
    async fn panicking_fetch_settles_as_error() {
        let (_queries, rx) = watch::channel(query(1));
        let controller = ListController::spawn(
            "products",
            None,
            Arc::new(QueryCache::new()),
            rx,
            |query: String| async move {
                assert!(query.is_empty(), "fetcher blew up on {query}");
                Ok::<_, String>(ListPage::<u32>::new(vec![], 0))
            },
        );

        let snap = controller.settled().await.unwrap();

        assert_eq!(snap.phase, ListPhase::Error);
        assert!(snap.error.unwrap().starts_with("fetch task failed"));
        controller.unmount().await;
    }

    #[test]
    fn scoped_key_ignores_foreign_tenant() {
        let cache = Arc::new(QueryCache::new());
        let q = query(1).with_filter("tenantId", "9");
        let s: ListState<u32> = ListState::new("products", Some(Actor::manager(1, 7)), cache, q);
        assert_eq!(s.key().query(), "perPage=10&currentPage=1&tenantId=7");
    }
}
