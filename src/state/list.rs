//! Per-listing view state and the fetch/reconcile cycle.
//!
//! Every listing shares the same lifecycle: a fetch begins (loading set, a
//! ticket issued), the network call resolves, and the completion is
//! reconciled into the state. Completions carry the ticket they were issued
//! with; a completion whose ticket is no longer the latest is dropped, so a
//! slow stale response can never overwrite the result of a newer request.

use tracing::debug;

use crate::api::error::ApiError;
use crate::api::models::ListPage;
use crate::api::query::{ListQuery, PAGE_SIZE, skip_for_page};

/// Pagination position of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: u64,
    page_size: u64,
    total: u64,
}

impl PageState {
    /// Returns the current page number (1-based).
    #[must_use]
    pub const fn current(&self) -> u64 {
        self.current
    }

    /// Returns the fixed page size.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Returns the last total reported by the service.
    ///
    /// Authoritative only immediately after a successful fetch; it goes
    /// stale as soon as records mutate elsewhere.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the `skip` offset implied by the current page.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        skip_for_page(self.current)
    }

    /// Returns the number of pages implied by the current total.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        let pages = self.total.div_ceil(self.page_size);
        if pages == 0 { 1 } else { pages }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current: 1,
            page_size: PAGE_SIZE,
            total: 0,
        }
    }
}

/// Ticket identifying one issued fetch.
///
/// Tickets are ordered by issue time; only the most recently issued ticket
/// may apply its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
}

/// Result of reconciling a fetch completion.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The page was applied: items replaced, total updated.
    Applied,
    /// The completion belonged to a superseded request and was dropped.
    Stale,
    /// The fetch failed; previous items remain visible. The error is handed
    /// back for one-shot surfacing and is not stored.
    Failed(ApiError),
}

/// View state for one paginated listing.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    loading: bool,
    page: PageState,
    last_query: Option<ListQuery>,
    latest_seq: u64,
}

impl<T> ListState<T> {
    /// Creates an empty listing state at page 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            page: PageState {
                current: 1,
                page_size: PAGE_SIZE,
                total: 0,
            },
            last_query: None,
            latest_seq: 0,
        }
    }

    /// Returns the currently displayed items.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns true while a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the pagination position.
    #[must_use]
    pub const fn page(&self) -> &PageState {
        &self.page
    }

    /// Returns the parameters of the most recently issued fetch, used for
    /// refresh and post-delete re-fetches.
    #[must_use]
    pub const fn last_query(&self) -> Option<&ListQuery> {
        self.last_query.as_ref()
    }

    /// Moves the listing to a page and returns the query to issue for it,
    /// carrying over the given filters and sort.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPagination`] when `page` is zero.
    pub fn goto_page(&mut self, page: u64, template: &ListQuery) -> Result<ListQuery, ApiError> {
        let query = ListQuery::for_page(page)?
            .with_filters_from(template)
            .with_sort(template.sort().clone());
        self.page.current = page;
        Ok(query)
    }

    /// Begins a fetch: marks the listing as loading, records the query as
    /// the last-known parameters, and issues a ticket.
    pub fn begin_fetch(&mut self, query: ListQuery) -> FetchTicket {
        self.latest_seq += 1;
        self.loading = true;
        self.last_query = Some(query);
        FetchTicket {
            seq: self.latest_seq,
        }
    }

    /// Reconciles a fetch completion against the listing.
    ///
    /// Stale completions (ticket no longer the latest) are dropped without
    /// touching any state, including the loading flag, which remains owned
    /// by the most recent request. Failures clear the loading flag but leave
    /// the previous items visible.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ListPage<T>, ApiError>,
    ) -> FetchOutcome {
        if ticket.seq != self.latest_seq {
            debug!(
                ticket = ticket.seq,
                latest = self.latest_seq,
                "dropping stale fetch completion"
            );
            return FetchOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.items = page.items;
                self.page.total = page.total;
                FetchOutcome::Applied
            }
            Err(error) => FetchOutcome::Failed(error),
        }
    }

    /// Resets the listing to page 1, as a fresh search does.
    pub const fn reset_to_first_page(&mut self) {
        self.page.current = 1;
    }

    /// Test constructor seeding items and a total.
    #[cfg(any(test, feature = "test-support"))]
    pub fn seeded(items: Vec<T>, total: u64) -> Self {
        let mut state = Self::new();
        state.items = items;
        state.page.total = total;
        state
    }
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{FetchOutcome, ListState, PAGE_SIZE};
    use crate::api::error::ApiError;
    use crate::api::models::ListPage;
    use crate::api::query::ListQuery;

    fn query_for(page: u64) -> ListQuery {
        ListQuery::for_page(page).expect("page should be valid")
    }

    #[test]
    fn begin_fetch_sets_loading_and_records_query() {
        let mut state = ListState::<String>::new();
        let query = query_for(2).with_filter("title", "mario");
        let _ticket = state.begin_fetch(query.clone());

        assert!(state.is_loading(), "loading should be set at fetch begin");
        assert_eq!(state.last_query(), Some(&query));
    }

    #[test]
    fn successful_completion_replaces_items_and_total() {
        let mut state = ListState::<String>::seeded(vec!["old".to_owned()], 1);
        let ticket = state.begin_fetch(query_for(1));

        let outcome = state.complete_fetch(
            ticket,
            Ok(ListPage {
                items: vec!["a".to_owned(), "b".to_owned()],
                total: 25,
            }),
        );

        assert_eq!(outcome, FetchOutcome::Applied);
        assert!(!state.is_loading(), "loading should clear on success");
        assert_eq!(state.items(), ["a".to_owned(), "b".to_owned()]);
        assert_eq!(state.page().total(), 25);
        assert_eq!(state.page().total_pages(), 3);
    }

    #[test]
    fn failed_completion_keeps_previous_items_and_clears_loading() {
        let mut state = ListState::<String>::seeded(vec!["kept".to_owned()], 7);
        let ticket = state.begin_fetch(query_for(1));

        let outcome = state.complete_fetch(
            ticket,
            Err(ApiError::Network {
                message: "connection refused".to_owned(),
            }),
        );

        assert!(
            matches!(outcome, FetchOutcome::Failed(ApiError::Network { .. })),
            "error should be handed back for surfacing"
        );
        assert!(!state.is_loading(), "loading should clear on failure");
        assert_eq!(state.items(), ["kept".to_owned()]);
        assert_eq!(state.page().total(), 7, "total should be untouched");
    }

    #[test]
    fn stale_completion_is_dropped_entirely() {
        let mut state = ListState::<String>::new();
        let first = state.begin_fetch(query_for(1));
        let second = state.begin_fetch(query_for(2));

        // The newer request resolves first.
        let outcome = state.complete_fetch(
            second,
            Ok(ListPage {
                items: vec!["new".to_owned()],
                total: 11,
            }),
        );
        assert_eq!(outcome, FetchOutcome::Applied);

        // The superseded request resolves late; nothing may change.
        let stale = state.complete_fetch(
            first,
            Ok(ListPage {
                items: vec!["stale".to_owned()],
                total: 99,
            }),
        );
        assert_eq!(stale, FetchOutcome::Stale);
        assert_eq!(state.items(), ["new".to_owned()]);
        assert_eq!(state.page().total(), 11);
        assert!(!state.is_loading());
    }

    #[test]
    fn stale_completion_does_not_clear_loading_of_newer_request() {
        let mut state = ListState::<String>::new();
        let first = state.begin_fetch(query_for(1));
        let _second = state.begin_fetch(query_for(2));

        let outcome = state.complete_fetch(
            first,
            Err(ApiError::Network {
                message: "timed out".to_owned(),
            }),
        );
        assert_eq!(outcome, FetchOutcome::Stale);
        assert!(
            state.is_loading(),
            "loading belongs to the in-flight newer request"
        );
    }

    #[test]
    fn goto_page_carries_filters_and_sort_and_updates_skip() {
        let mut state = ListState::<String>::new();
        let template = query_for(1).with_filter("title", "zelda");
        let query = state
            .goto_page(4, &template)
            .expect("page should be valid");

        assert_eq!(query.skip(), 3 * PAGE_SIZE);
        assert_eq!(state.page().current(), 4);
        assert_eq!(state.page().skip(), 3 * PAGE_SIZE);
        assert_eq!(query.filters(), template.filters());
    }

    #[test]
    fn identical_fetches_yield_identical_displayed_state() {
        let mut first_state = ListState::<String>::new();
        let mut second_state = ListState::<String>::new();
        let page = ListPage {
            items: vec!["x".to_owned()],
            total: 1,
        };

        let t1 = first_state.begin_fetch(query_for(1));
        first_state.complete_fetch(t1, Ok(page.clone()));
        let t2 = second_state.begin_fetch(query_for(1));
        second_state.complete_fetch(t2, Ok(page));

        assert_eq!(first_state.items(), second_state.items());
        assert_eq!(first_state.page().total(), second_state.page().total());
    }
}
