//! Paginated list access with server refetch after every mutation.
//!
//! A [`ListResource`] owns the state of one list screen: the current page of
//! items, its pagination, the last error and the URL that produced them.
//! Mutations never patch `items` locally. After a successful create, update
//! or delete the list is fetched again, so what callers see is always what
//! the server returned.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use fleetflow_api::normalize::{normalize_collection, Normalized};
use fleetflow_api::types::{mutation_intent, Entity, Pagination, Resource, ResourceId, ResourceKind};
use fleetflow_api::{Client, ListQuery};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::FleetError;

/// Snapshot of a list screen.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    /// Error of the last fetch. Mutation errors are returned to the caller
    /// instead and never land here.
    pub error: Option<Arc<FleetError>>,
    pub pagination: Pagination,
    /// The URL the current items came from. Update and delete refetch it so
    /// the user stays on the page they were looking at.
    pub last_requested_url: String,
}

impl<T> ListState<T> {
    fn new(endpoint: &str) -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            pagination: Pagination::default(),
            last_requested_url: endpoint.to_string(),
        }
    }
}

/// List resource bound to one collection endpoint.
///
/// All methods take `&self`; share it behind an `Arc` to fetch from several
/// tasks. Only the response of the most recently issued fetch is applied,
/// and nothing is applied after [`ListResource::close`].
pub struct ListResource<T = Resource> {
    client: Arc<Client>,
    endpoint: String,
    /// Where `create` POSTs: the collection path, or the parent's path for
    /// a scoped child list.
    create_path: String,
    state: Mutex<ListState<T>>,
    latest: AtomicU64,
    active: AtomicBool,
}

impl<T> ListResource<T>
where
    T: DeserializeOwned + Clone,
{
    /// Creates the resource without fetching anything.
    pub fn new(client: Arc<Client>, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            state: Mutex::new(ListState::new(&endpoint)),
            client,
            create_path: collection_path(&endpoint).to_string(),
            endpoint,
            latest: AtomicU64::new(0),
            active: AtomicBool::new(true),
        }
    }

    /// Creates the resource and loads the first page.
    pub async fn open(client: Arc<Client>, endpoint: impl Into<String>) -> Self {
        let resource = Self::new(client, endpoint);
        resource.fetch(None).await;
        resource
    }

    pub fn for_kind(client: Arc<Client>, kind: ResourceKind) -> Self {
        Self::new(client, kind.endpoint())
    }

    /// Child list of one parent record, e.g. the lines of credit note 4:
    /// reads `/credit_note_items?credit_note_id=4` and creates new lines
    /// through `/credit_note_items/4`, the route the backend nests them under.
    pub fn scoped(
        client: Arc<Client>,
        kind: ResourceKind,
        parent_key: &str,
        parent: &ResourceId,
    ) -> Self {
        let endpoint = ListQuery::for_kind(kind)
            .with_filter(parent_key, &parent.to_string())
            .to_path();
        let mut resource = Self::new(client, endpoint);
        resource.create_path = kind.member(parent);
        resource
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn create_path(&self) -> &str {
        &self.create_path
    }

    /// A copy of the current state.
    pub fn state(&self) -> ListState<T> {
        self.lock().clone()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stops applying responses. Fetches still in flight are discarded when
    /// they settle.
    pub fn close(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// Loads `url`, or the endpoint when `None`.
    ///
    /// `url` may be a pagination link exactly as the server sent it,
    /// absolute or relative. Failures are stored in the state, not returned.
    pub async fn fetch(&self, url: Option<&str>) {
        if !self.is_active() {
            tracing::debug!("Ignoring fetch on closed list {}", self.endpoint);
            return;
        }
        let url = url.unwrap_or(&self.endpoint).to_string();
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock();
            state.loading = true;
            state.error = None;
            state.last_requested_url = url.clone();
        }
        let guard = SettleGuard {
            resource: self,
            seq,
        };

        let path = self.client.relative_reference(&url);
        let result = self.load(&path).await;

        if !guard.is_current() {
            tracing::debug!("Discarding stale response for {}", path);
            return;
        }
        let mut state = self.lock();
        match result {
            Ok((items, pagination)) => {
                state.items = items;
                state.pagination = pagination;
            }
            Err(e) => {
                state.error = Some(Arc::new(e));
                state.items.clear();
            }
        }
    }

    /// Runs `query` against this list: search, page and filters.
    pub async fn fetch_query(&self, query: &ListQuery) {
        self.fetch(Some(&query.to_path())).await;
    }

    /// Fetches the URL the current items came from again.
    pub async fn refetch(&self) {
        let url = self.lock().last_requested_url.clone();
        self.fetch(Some(&url)).await;
    }

    /// Follows the `next` link. Returns false when there is no next page.
    pub async fn next_page(&self) -> bool {
        let link = self.lock().pagination.next_link().map(str::to_string);
        match link {
            Some(link) => {
                self.fetch(Some(&link)).await;
                true
            }
            None => false,
        }
    }

    /// Follows the `prev` link. Returns false when there is no previous page.
    pub async fn prev_page(&self) -> bool {
        let link = self.lock().pagination.prev_link().map(str::to_string);
        match link {
            Some(link) => {
                self.fetch(Some(&link)).await;
                true
            }
            None => false,
        }
    }

    /// POSTs `intent` to [`ListResource::create_path`], then reloads the
    /// endpoint itself, which puts the list back on its first page.
    ///
    /// Server-assigned fields are stripped from the body. On failure the
    /// list is left as it was.
    pub async fn create<B>(&self, intent: &B) -> Result<Value, FleetError>
    where
        B: Serialize + ?Sized,
    {
        let body = mutation_intent(intent)?;
        let created = self.client.post(&self.create_path, &body).await?;
        self.fetch(None).await;
        Ok(created)
    }

    /// PUTs `item` to its member path, then reloads the current page.
    pub async fn update(&self, item: &T) -> Result<Value, FleetError>
    where
        T: Entity + Serialize,
    {
        let updated = self.client.put(&self.member_path(item.id()), item).await?;
        self.refetch().await;
        Ok(updated)
    }

    /// DELETEs the member, then reloads the current page.
    pub async fn delete(&self, id: &ResourceId) -> Result<Value, FleetError> {
        let deleted = self.client.del(&self.member_path(id)).await?;
        self.refetch().await;
        Ok(deleted)
    }

    /// `/invoice_items?invoice_id=4` addresses its members as `/invoice_items/{id}`.
    pub fn member_path(&self, id: &ResourceId) -> String {
        format!("{}/{}", collection_path(&self.endpoint), id)
    }

    async fn load(&self, path: &str) -> Result<(Vec<T>, Pagination), FleetError> {
        let payload = self.client.get(path).await?;
        let Normalized { items, pagination } = normalize_collection(payload);
        let items = items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok((items, pagination))
    }
}

/// `/invoice_items?invoice_id=4` -> `/invoice_items`.
fn collection_path(endpoint: &str) -> &str {
    endpoint
        .split('?')
        .next()
        .unwrap_or_default()
        .trim_end_matches('/')
}

impl<T> ListResource<T> {
    fn lock(&self) -> MutexGuard<'_, ListState<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    /// The response for `seq` may be applied: nothing newer was started and
    /// the resource is still open.
    fn is_current(&self, seq: u64) -> bool {
        self.active.load(Ordering::SeqCst) && self.is_latest(seq)
    }
}

/// Clears `loading` when the fetch that owns it settles, including when the
/// fetch future is dropped before completion.
struct SettleGuard<'a, T> {
    resource: &'a ListResource<T>,
    seq: u64,
}

impl<T> SettleGuard<'_, T> {
    fn is_current(&self) -> bool {
        self.resource.is_current(self.seq)
    }
}

impl<T> Drop for SettleGuard<'_, T> {
    fn drop(&mut self) {
        // A closed resource still settles; only a newer fetch owns `loading`.
        if self.resource.is_latest(self.seq) {
            self.resource.lock().loading = false;
        }
    }
}
