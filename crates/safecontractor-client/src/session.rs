//! The search view: debounced input, last-triggered-wins result delivery,
//! and the handoff performed when a result is selected.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use safecontractor_core::{ClientConfig, QueryBuilder, SearchInput, SearchQuery, SearchResultItem};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{ContractorService, Debouncer, HandoffStore};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchOutcome {
    /// Nothing to search for; the result list is cleared.
    #[default]
    Idle,
    Results(Vec<SearchResultItem>),
    Failed(String),
}

/// What the search view currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    /// Sequence number of the search that produced this snapshot (0 = none yet).
    pub request: u64,
    pub query: Option<SearchQuery>,
    pub outcome: SearchOutcome,
}

/// Where to navigate after a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    /// Key the detail view resolves (the contractor name).
    pub key: String,
    /// Route path, e.g. `/contractor/Acme%20Co`.
    pub path: String,
}

impl NavigationTarget {
    pub fn for_contractor(name: &str) -> Self {
        Self {
            key: name.to_string(),
            path: format!("/contractor/{}", urlencoding::encode(name)),
        }
    }
}

struct Shared<S> {
    service: Arc<S>,
    builder: QueryBuilder,
    latest: AtomicU64,
    disposed: AtomicBool,
    snapshot: watch::Sender<SearchSnapshot>,
}

impl<S: ContractorService> Shared<S> {
    async fn run(&self, input: SearchInput) -> Option<SearchSnapshot> {
        let request = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(query) = self.builder.build(&input) else {
            return self.publish(request, None, SearchOutcome::Idle);
        };
        let outcome = match self.service.search(&query).await {
            Ok(items) => SearchOutcome::Results(items),
            Err(err) => SearchOutcome::Failed(err.to_string()),
        };
        self.publish(request, Some(query), outcome)
    }

    fn publish(
        &self,
        request: u64,
        query: Option<SearchQuery>,
        outcome: SearchOutcome,
    ) -> Option<SearchSnapshot> {
        if self.disposed.load(Ordering::SeqCst) {
            debug!(request, "search view disposed, dropping result");
            return None;
        }
        let latest = self.latest.load(Ordering::SeqCst);
        if request != latest {
            debug!(request, latest, "discarding stale search result");
            return None;
        }
        let snapshot = SearchSnapshot {
            request,
            query,
            outcome,
        };
        self.snapshot.send_replace(snapshot.clone());
        Some(snapshot)
    }
}

/// One search view's worth of state.
///
/// Results are published only for the most recently triggered search, so a
/// slow earlier response can never overwrite a faster later one. Dropping
/// the session disposes it.
pub struct SearchSession<S> {
    shared: Arc<Shared<S>>,
    debouncer: Debouncer<SearchInput>,
    handoff: Arc<HandoffStore>,
}

impl<S: ContractorService + 'static> SearchSession<S> {
    pub fn new(
        service: Arc<S>,
        handoff: Arc<HandoffStore>,
        builder: QueryBuilder,
        debounce: Duration,
    ) -> Self {
        let (snapshot, _) = watch::channel(SearchSnapshot::default());
        let shared = Arc::new(Shared {
            service,
            builder,
            latest: AtomicU64::new(0),
            disposed: AtomicBool::new(false),
            snapshot,
        });

        let runner = Arc::clone(&shared);
        let debouncer = Debouncer::new(debounce, move |input: SearchInput| {
            let runner = Arc::clone(&runner);
            async move {
                runner.run(input).await;
            }
        });

        Self {
            shared,
            debouncer,
            handoff,
        }
    }

    pub fn from_config(
        service: Arc<S>,
        handoff: Arc<HandoffStore>,
        config: &ClientConfig,
    ) -> Self {
        Self::new(service, handoff, config.query_builder(), config.debounce)
    }

    /// The input fields changed. The search fires once typing pauses.
    ///
    /// Returns `false` if the session is disposed.
    pub fn input_changed(&self, input: SearchInput) -> bool {
        self.debouncer.trigger(input)
    }

    /// Search now, skipping the debounce window (form submit).
    ///
    /// Any pending debounced search is cancelled. Returns the published
    /// snapshot, or `None` if a newer search or disposal overtook this one.
    pub async fn submit(&self, input: SearchInput) -> Option<SearchSnapshot> {
        if self.shared.disposed.load(Ordering::SeqCst) {
            return None;
        }
        self.debouncer.cancel();
        self.shared.run(input).await
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.shared.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.shared.snapshot.borrow().clone()
    }

    /// Select a result and prepare the detail view.
    ///
    /// With `prefetch`, the full record is fetched and left in the handoff
    /// store so the detail view can render without another round trip. A
    /// failed pre-fetch is logged and navigation goes ahead; the detail view
    /// then fetches for itself.
    pub async fn select_and_handoff(
        &self,
        item: &SearchResultItem,
        prefetch: bool,
    ) -> NavigationTarget {
        let target = NavigationTarget::for_contractor(&item.name);
        if prefetch {
            match self.shared.service.detail(&target.key).await {
                Ok(detail) => self.handoff.put(target.key.clone(), detail),
                Err(err) => {
                    warn!(key = %target.key, error = %err, "detail pre-fetch failed");
                }
            }
        }
        target
    }
}

impl<S> SearchSession<S> {
    /// Tear the view down: cancel any pending search and ignore in-flight
    /// results. Idempotent.
    pub fn dispose(&self) {
        self.shared.disposed.store(true, Ordering::SeqCst);
        self.debouncer.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.load(Ordering::SeqCst)
    }
}

impl<S> Drop for SearchSession<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
