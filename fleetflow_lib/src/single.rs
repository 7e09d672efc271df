//! Single-payload access for detail screens.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use fleetflow_api::normalize::normalize_single;
use fleetflow_api::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::FleetError;

#[derive(Debug, Clone)]
pub struct SingleState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<Arc<FleetError>>,
}

impl<T> Default for SingleState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// One payload from one endpoint. The payload is whatever the single-value
/// normalization yields: the item array of a paginated envelope, or the
/// response itself. A failed fetch keeps the previous `data`.
pub struct SingleResource<T = Value> {
    client: Arc<Client>,
    endpoint: String,
    state: Mutex<SingleState<T>>,
    latest: AtomicU64,
    active: AtomicBool,
}

impl<T> SingleResource<T>
where
    T: DeserializeOwned + Clone,
{
    pub fn new(client: Arc<Client>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            state: Mutex::new(SingleState::default()),
            latest: AtomicU64::new(0),
            active: AtomicBool::new(true),
        }
    }

    /// Creates the resource and fetches it once.
    pub async fn open(client: Arc<Client>, endpoint: impl Into<String>) -> Self {
        let resource = Self::new(client, endpoint);
        resource.fetch().await;
        resource
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> SingleState<T> {
        self.lock().clone()
    }

    pub fn close(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub async fn fetch(&self) {
        if !self.active.load(Ordering::SeqCst) {
            return;
        }
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock();
            state.loading = true;
            state.error = None;
        }
        let guard = SettleGuard {
            resource: self,
            seq,
        };

        let result = self.load().await;
        if !guard.is_current() {
            tracing::debug!("Discarding stale response for {}", self.endpoint);
            return;
        }
        let mut state = self.lock();
        match result {
            Ok(data) => state.data = Some(data),
            Err(e) => state.error = Some(Arc::new(e)),
        }
    }

    /// Same as [`SingleResource::fetch`].
    pub async fn refetch(&self) {
        self.fetch().await;
    }

    async fn load(&self) -> Result<T, FleetError> {
        let payload = self.client.get(&self.endpoint).await?;
        Ok(serde_json::from_value(normalize_single(payload))?)
    }
}

impl<T> SingleResource<T> {
    fn lock(&self) -> MutexGuard<'_, SingleState<T>> {
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

struct SettleGuard<'a, T> {
    resource: &'a SingleResource<T>,
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
