//! Debounced dual search.
//!
//! One query fans out to the destination and treatment catalogs and the
//! hits are merged into a single result set with per-category counts.
//! [`SearchCoordinator`] adds the interactive behaviour: submissions are
//! debounced so a burst of keystrokes issues one remote lookup, and every
//! submission takes a sequence ticket so a response that arrives late can
//! never overwrite the results of a newer query.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use voyamed_store::{Destination, DestinationsRepo, StoreError, Treatment, TreatmentsRepo};
use voyamed_types::SearchQuery;

/// Merged catalog hits for one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub destinations: Vec<Destination>,
    pub treatments: Vec<Treatment>,
}

impl SearchResults {
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            destinations: Vec::new(),
            treatments: Vec::new(),
        }
    }

    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    pub fn treatment_count(&self) -> usize {
        self.treatments.len()
    }

    pub fn total_count(&self) -> usize {
        self.destinations.len() + self.treatments.len()
    }
}

/// Searches both catalogs for one query.
#[derive(Clone)]
pub struct SearchService {
    destinations: DestinationsRepo,
    treatments: TreatmentsRepo,
}

impl SearchService {
    pub fn new(destinations: DestinationsRepo, treatments: TreatmentsRepo) -> Self {
        Self {
            destinations,
            treatments,
        }
    }

    /// Runs both catalog searches concurrently and merges the hits.
    ///
    /// Queries below the minimum length return empty result sets without
    /// touching the remote store.
    pub async fn search(&self, raw_query: &str) -> Result<SearchResults, StoreError> {
        let Ok(query) = SearchQuery::new(raw_query) else {
            return Ok(SearchResults::empty(raw_query.trim()));
        };

        let (destinations, treatments) = tokio::join!(
            self.destinations.search(&query),
            self.treatments.search(&query)
        );

        Ok(SearchResults {
            query: query.as_str().to_owned(),
            destinations: destinations?,
            treatments: treatments?,
        })
    }
}

/// Monotonic ticket counter deciding whether a completion may still be
/// applied. A completion holding an old ticket is stale by definition.
#[derive(Default)]
struct ResponseGate {
    seq: AtomicU64,
}

impl ResponseGate {
    fn issue(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.seq.load(Ordering::SeqCst) == ticket
    }
}

/// Debounces query submissions and publishes results on a watch channel.
pub struct SearchCoordinator {
    service: Arc<SearchService>,
    debounce: Duration,
    gate: Arc<ResponseGate>,
    tx: watch::Sender<SearchResults>,
}

impl SearchCoordinator {
    pub fn new(service: SearchService, debounce: Duration) -> Self {
        let (tx, _rx) = watch::channel(SearchResults::default());
        Self {
            service: Arc::new(service),
            debounce,
            gate: Arc::new(ResponseGate::default()),
            tx,
        }
    }

    /// A receiver that observes every published result set.
    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.tx.subscribe()
    }

    /// The most recently published results.
    pub fn latest(&self) -> SearchResults {
        self.tx.borrow().clone()
    }

    /// Submits a query as typed. The lookup runs after the debounce quiet
    /// period, and only if no newer submission has arrived by then. A
    /// failed lookup keeps the previous results and is logged.
    pub fn submit(&self, raw_query: String) {
        let ticket = self.gate.issue();
        let service = Arc::clone(&self.service);
        let gate = Arc::clone(&self.gate);
        let tx = self.tx.clone();
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !gate.is_current(ticket) {
                return;
            }
            match service.search(&raw_query).await {
                Ok(results) => {
                    if gate.is_current(ticket) {
                        tx.send_replace(results);
                    } else {
                        tracing::debug!(query = %raw_query, "dropping stale search response");
                    }
                }
                Err(e) => tracing::error!(error = %e, query = %raw_query, "search failed"),
            }
        });
    }
}
