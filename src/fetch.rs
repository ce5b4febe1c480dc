//! Fetch state machines - loading/error/pagination bookkeeping for async data
//!
//! Every fetch issued by the app actor is tagged with a request id from one
//! of these types. Responses carry the id back, and `resolve` applies a
//! result only when its id is the latest one issued, so a slow response can
//! never overwrite a newer one. There is no cancellation: superseded
//! requests run to completion and are discarded here.

/// Identifier tying a network response back to the fetch that issued it
pub type RequestId = u64;

/// State of a single asynchronous data source.
///
/// `data` survives failed refetches (stale-but-visible): an error replaces
/// the error slot, never the last good value.
#[derive(Clone, Debug, Default)]
pub struct Resource<T> {
    data: Option<T>,
    error: Option<String>,
    loading: bool,
    in_flight: Option<RequestId>,
    next_id: RequestId,
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Resource {
            data: None,
            error: None,
            loading: false,
            in_flight: None,
            next_id: 0,
        }
    }

    /// Start a (re)fetch. Concurrent calls are not coalesced: each call
    /// issues a fresh id and the newest one wins.
    pub fn begin(&mut self) -> RequestId {
        self.next_id += 1;
        self.loading = true;
        self.in_flight = Some(self.next_id);
        self.next_id
    }

    /// Apply a fetch result. Ignored unless `id` is the latest issued.
    pub fn resolve(&mut self, id: RequestId, result: Result<T, String>) {
        if self.in_flight != Some(id) {
            tracing::debug!(id, "discarding stale resource response");
            return;
        }
        self.in_flight = None;
        self.loading = false;
        match result {
            Ok(value) => {
                self.data = Some(value);
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
    }

    /// Record a failure that never reached the network (client-side
    /// validation). Loading state is untouched.
    pub fn reject_local(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Back to the pristine state. In-flight ids are invalidated, so a
    /// response arriving after a teardown is discarded.
    pub fn reset(&mut self) {
        self.data = None;
        self.error = None;
        self.loading = false;
        self.in_flight = None;
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// In-place access for local updates that mirror a confirmed remote
    /// write (e.g. a save/unsave acknowledged by the backend)
    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Whether a page fetch replaces the list or extends it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    More,
}

/// An issued page fetch: the id to tag the request with and the page to ask
/// the upstream for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub id: RequestId,
    pub page: u32,
    pub kind: LoadKind,
}

/// An accumulating, page-by-page list.
///
/// The initial load and "load more" keep separate in-flight flags so the UI
/// can show a full-screen spinner for one and a footer spinner for the
/// other. `has_more` clears only when a page comes back empty; a short but
/// non-empty page still allows one more fetch (which then terminates on the
/// empty page after it).
#[derive(Clone, Debug, Default)]
pub struct PagedList<T> {
    items: Vec<T>,
    page: u32,
    has_more: bool,
    error: Option<String>,
    loading: bool,
    loading_more: bool,
    in_flight: Option<(RequestId, LoadKind)>,
    next_id: RequestId,
}

impl<T> PagedList<T> {
    pub fn new() -> Self {
        PagedList {
            items: Vec::new(),
            page: 1,
            has_more: true,
            error: None,
            loading: false,
            loading_more: false,
            in_flight: None,
            next_id: 0,
        }
    }

    /// Start a load of page 1. The result replaces the list wholesale;
    /// until it arrives the previous items stay visible.
    pub fn begin_initial(&mut self) -> PageRequest {
        self.next_id += 1;
        self.page = 1;
        self.loading = true;
        self.loading_more = false;
        self.in_flight = Some((self.next_id, LoadKind::Initial));
        PageRequest {
            id: self.next_id,
            page: 1,
            kind: LoadKind::Initial,
        }
    }

    /// Start a load of the next page, or None if a load is already in
    /// flight or the list is exhausted. Calling twice in rapid succession
    /// therefore fetches the next page at most once.
    pub fn begin_more(&mut self) -> Option<PageRequest> {
        if self.loading || self.loading_more || !self.has_more {
            return None;
        }
        self.next_id += 1;
        self.page += 1;
        self.loading_more = true;
        self.in_flight = Some((self.next_id, LoadKind::More));
        Some(PageRequest {
            id: self.next_id,
            page: self.page,
            kind: LoadKind::More,
        })
    }

    /// Apply a page result. Ignored unless `id` is the latest issued.
    /// An empty page (including an empty first page) is a valid terminal
    /// state, not an error.
    pub fn resolve(&mut self, id: RequestId, result: Result<Vec<T>, String>) {
        let Some((expected, kind)) = self.in_flight else {
            tracing::debug!(id, "discarding page response with nothing in flight");
            return;
        };
        if expected != id {
            tracing::debug!(id, expected, "discarding stale page response");
            return;
        }
        self.in_flight = None;
        self.loading = false;
        self.loading_more = false;
        match result {
            Ok(batch) => {
                self.has_more = !batch.is_empty();
                match kind {
                    LoadKind::Initial => self.items = batch,
                    LoadKind::More => self.items.extend(batch),
                }
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
    }

    /// Restore the cursor and `has_more`, dropping any in-flight fetch.
    /// Items are kept until the follow-up initial load replaces them.
    pub fn reset(&mut self) {
        self.page = 1;
        self.has_more = true;
        self.error = None;
        self.loading = false;
        self.loading_more = false;
        self.in_flight = None;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Initial load in flight (full-screen spinner)
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Incremental load in flight (footer spinner)
    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }
}

/// Tracks a user-initiated refresh across several independent sources.
///
/// `refreshing` stays true until every source has settled, success or
/// failure alike; each source keeps its own error.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefreshGroup {
    pending: usize,
}

impl RefreshGroup {
    pub fn new() -> Self {
        RefreshGroup { pending: 0 }
    }

    /// Begin a refresh covering `sources` concurrent fetches
    pub fn start(&mut self, sources: usize) {
        self.pending = sources;
    }

    /// One source settled (terminal response received)
    pub fn settle_one(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    pub fn is_refreshing(&self) -> bool {
        self.pending > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_success_stores_data_and_clears_error() {
        let mut res: Resource<u32> = Resource::new();
        let id = res.begin();
        res.resolve(id, Err(String::from("boom")));
        assert_eq!(res.error(), Some("boom"));

        let id = res.begin();
        assert!(res.is_loading());
        res.resolve(id, Ok(7));
        assert_eq!(res.data(), Some(&7));
        assert_eq!(res.error(), None);
        assert!(!res.is_loading());
    }

    #[test]
    fn test_resource_failure_keeps_prior_data() {
        let mut res: Resource<u32> = Resource::new();
        let id = res.begin();
        res.resolve(id, Ok(7));

        let id = res.begin();
        res.resolve(id, Err(String::from("offline")));
        assert_eq!(res.data(), Some(&7));
        assert_eq!(res.error(), Some("offline"));
    }

    #[test]
    fn test_resource_latest_request_wins() {
        let mut res: Resource<u32> = Resource::new();
        let old = res.begin();
        let new = res.begin();
        res.resolve(new, Ok(2));
        res.resolve(old, Ok(1));
        assert_eq!(res.data(), Some(&2));
    }

    #[test]
    fn test_resource_reset_discards_in_flight() {
        let mut res: Resource<u32> = Resource::new();
        let id = res.begin();
        res.reset();
        res.resolve(id, Ok(9));
        assert_eq!(res.data(), None);
        assert!(!res.is_loading());
    }

    #[test]
    fn test_empty_first_page_is_terminal_not_error() {
        let mut list: PagedList<u32> = PagedList::new();
        let req = list.begin_initial();
        list.resolve(req.id, Ok(vec![]));
        assert!(list.items().is_empty());
        assert!(!list.has_more());
        assert_eq!(list.error(), None);
        assert!(list.begin_more().is_none());
    }

    #[test]
    fn test_load_more_noop_when_exhausted_or_in_flight() {
        let mut list: PagedList<u32> = PagedList::new();
        let req = list.begin_initial();
        list.resolve(req.id, Ok(vec![1, 2]));

        let first = list.begin_more().unwrap();
        assert_eq!(first.page, 2);
        // Second call while page 2 is in flight: no duplicate fetch
        assert!(list.begin_more().is_none());
        assert_eq!(list.page(), 2);

        list.resolve(first.id, Ok(vec![]));
        assert!(!list.has_more());
        assert!(list.begin_more().is_none());
        assert_eq!(list.items(), &[1, 2]);
    }

    #[test]
    fn test_short_page_keeps_has_more_until_empty_page() {
        let mut list: PagedList<u32> = PagedList::new();
        let req = list.begin_initial();
        list.resolve(req.id, Ok((0..20).collect()));
        assert!(list.has_more());
        assert_eq!(list.page(), 1);
        assert_eq!(list.items().len(), 20);

        // A 5-item page is short of a full page but still non-empty, so
        // another fetch is allowed
        let req = list.begin_more().unwrap();
        assert_eq!(req.page, 2);
        list.resolve(req.id, Ok((20..25).collect()));
        assert_eq!(list.items().len(), 25);
        assert!(list.has_more());

        let req = list.begin_more().unwrap();
        assert_eq!(req.page, 3);
        list.resolve(req.id, Ok(vec![]));
        assert_eq!(list.items().len(), 25);
        assert!(!list.has_more());
    }

    #[test]
    fn test_more_failure_keeps_items() {
        let mut list: PagedList<u32> = PagedList::new();
        let req = list.begin_initial();
        list.resolve(req.id, Ok(vec![1, 2, 3]));

        let req = list.begin_more().unwrap();
        list.resolve(req.id, Err(String::from("timeout")));
        assert_eq!(list.items(), &[1, 2, 3]);
        assert_eq!(list.error(), Some("timeout"));
        assert!(!list.is_loading_more());
    }

    #[test]
    fn test_reset_restores_cursor_and_has_more() {
        let mut list: PagedList<u32> = PagedList::new();
        let req = list.begin_initial();
        list.resolve(req.id, Ok(vec![1]));
        let req = list.begin_more().unwrap();
        list.resolve(req.id, Ok(vec![]));
        assert_eq!(list.page(), 2);
        assert!(!list.has_more());

        list.reset();
        assert_eq!(list.page(), 1);
        assert!(list.has_more());

        // A response from before the reset must not land
        let stale = list.begin_initial();
        list.reset();
        list.resolve(stale.id, Ok(vec![9, 9, 9]));
        assert_eq!(list.items(), &[1]);
    }

    #[test]
    fn test_initial_resolution_replaces_wholesale() {
        let mut list: PagedList<u32> = PagedList::new();
        let req = list.begin_initial();
        list.resolve(req.id, Ok(vec![1, 2]));

        list.reset();
        let req = list.begin_initial();
        // Old items remain visible while the refresh is in flight
        assert_eq!(list.items(), &[1, 2]);
        list.resolve(req.id, Ok(vec![5]));
        assert_eq!(list.items(), &[5]);
    }

    #[test]
    fn test_refresh_group_settles_regardless_of_outcome() {
        let mut group = RefreshGroup::new();
        let mut trending: Resource<Vec<u32>> = Resource::new();
        let mut popular: PagedList<u32> = PagedList::new();

        group.start(2);
        let trending_id = trending.begin();
        popular.reset();
        let page_req = popular.begin_initial();
        assert!(group.is_refreshing());

        trending.resolve(trending_id, Err(String::from("backend down")));
        group.settle_one();
        assert!(group.is_refreshing());

        popular.resolve(page_req.id, Ok(vec![1, 2, 3]));
        group.settle_one();
        assert!(!group.is_refreshing());

        assert_eq!(trending.error(), Some("backend down"));
        assert_eq!(popular.items(), &[1, 2, 3]);
        assert_eq!(popular.page(), 1);
    }
}
