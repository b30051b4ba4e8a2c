//! Resolving the contractor shown on the detail view.
//!
//! The record comes from the [`HandoffStore`] when the list view left one
//! there, otherwise from a single detail fetch.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use safecontractor_core::ContractorDetail;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::{ClientError, ContractorService, HandoffStore};

pub struct DetailResolver<S> {
    handoff: Arc<HandoffStore>,
    service: Arc<S>,
}

impl<S: ContractorService> DetailResolver<S> {
    pub fn new(handoff: Arc<HandoffStore>, service: Arc<S>) -> Self {
        Self { handoff, service }
    }

    /// Take the handed-off record for `key`, or fetch it.
    ///
    /// Suspends at most once, on the fetch. The handoff slot is consumed even
    /// if the caller later discards the result.
    pub async fn resolve(&self, key: &str) -> Result<ContractorDetail, ClientError> {
        if let Some(detail) = self.handoff.take(key) {
            debug!(key, "resolved from handoff");
            return Ok(detail);
        }
        info!(key, "no handoff payload, fetching detail");
        self.service.detail(key).await
    }
}

/// Detail view state. `Loading` always ends in exactly one of the others.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Resolved(ContractorDetail),
    Failed(String),
    NotFound,
}

impl DetailState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

impl From<Result<ContractorDetail, ClientError>> for DetailState {
    fn from(result: Result<ContractorDetail, ClientError>) -> Self {
        match result {
            Ok(detail) => Self::Resolved(detail),
            Err(ClientError::NotFound) => Self::NotFound,
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

/// Drives [`DetailState`] for one detail view.
///
/// Each [`mount`](Self::mount) re-enters `Loading`. A resolution that
/// finishes after the view was remounted or unmounted is dropped.
pub struct DetailScreen<S> {
    resolver: DetailResolver<S>,
    mounted: AtomicU64,
    state: watch::Sender<DetailState>,
}

impl<S: ContractorService> DetailScreen<S> {
    pub fn new(resolver: DetailResolver<S>) -> Self {
        let (state, _) = watch::channel(DetailState::Loading);
        Self {
            resolver,
            mounted: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    /// Mount the view for `key` and resolve it.
    ///
    /// Returns the terminal state, or `None` if the view moved on first.
    pub async fn mount(&self, key: &str) -> Option<DetailState> {
        let mount = self.mounted.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(DetailState::Loading);

        let state = DetailState::from(self.resolver.resolve(key).await);
        if self.mounted.load(Ordering::SeqCst) != mount {
            debug!(key, "detail view moved on, dropping resolution");
            return None;
        }
        self.state.send_replace(state.clone());
        Some(state)
    }

    /// Leave the view. Any resolution still in flight is dropped.
    pub fn unmount(&self) {
        self.mounted.fetch_add(1, Ordering::SeqCst);
    }
}
