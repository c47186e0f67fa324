//! The address search box: submits lookups and keeps the candidate list.
//!
//! Failures never reach the caller. A failed lookup is logged and leaves an
//! empty candidate list behind, the same as a search that matched nothing.
//!
//! Lookups may overlap. By default each completed lookup replaces the list as
//! it arrives, so the last one to resolve wins even if it was submitted first.
//! With `cancel_superseded` set, starting a new lookup aborts the earlier ones
//! and stale results are dropped.

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::core::config::GeocoderConfig;
use crate::geocoding::{Geocoder, Place};
use crate::prelude::HashMap;
use crate::runtime::{self, AsyncHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    InFlight { pending: usize },
}

/// A lookup that finished and was applied to the candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub query: String,
    pub results: usize,
}

struct Completed {
    seq: u64,
    query: String,
    places: Vec<Place>,
}

pub struct AddressSearch {
    geocoder: Arc<dyn Geocoder>,
    limit: usize,
    cancel_superseded: bool,
    candidates: Vec<Place>,
    /// Spawned lookups whose result has not been collected, by sequence number
    outstanding: HashMap<u64, Box<dyn AsyncHandle>>,
    next_seq: u64,
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
}

impl AddressSearch {
    pub fn new(geocoder: Arc<dyn Geocoder>, config: &GeocoderConfig) -> Self {
        let (tx, rx) = unbounded();
        Self {
            geocoder,
            limit: config.limit,
            cancel_superseded: config.cancel_superseded,
            candidates: Vec::new(),
            outstanding: HashMap::default(),
            next_seq: 0,
            tx,
            rx,
        }
    }

    pub fn candidates(&self) -> &[Place] {
        &self.candidates
    }

    pub fn state(&self) -> SearchState {
        match self.outstanding.len() {
            0 => SearchState::Idle,
            pending => SearchState::InFlight { pending },
        }
    }

    /// Looks `query` up and replaces the candidates with the result
    pub async fn search(&mut self, query: &str) -> &[Place] {
        if self.cancel_superseded {
            self.cancel_outstanding();
        }
        let places = lookup(self.geocoder.as_ref(), query, self.limit).await;
        self.candidates = places;
        &self.candidates
    }

    /// Starts a lookup on the async runtime. Collect it with [`poll`](Self::poll).
    pub fn submit(&mut self, query: &str) {
        let seq = self.next_seq;
        self.next_seq += 1;

        if self.cancel_superseded {
            self.cancel_outstanding();
        }

        let geocoder = self.geocoder.clone();
        let limit = self.limit;
        let query = query.to_string();
        let tx = self.tx.clone();

        let spawned = runtime::spawn(async move {
            let places = lookup(geocoder.as_ref(), &query, limit).await;
            let _ = tx.send(Completed { seq, query, places });
        });

        match spawned {
            Ok(handle) => {
                self.outstanding.insert(seq, handle);
            }
            Err(e) => {
                log::error!("Error: could not start lookup: {}", e);
                self.candidates.clear();
            }
        }
    }

    /// Applies every lookup that finished since the last poll, in the order
    /// they resolved.
    pub fn poll(&mut self) -> Vec<SearchOutcome> {
        let mut applied = Vec::new();

        // Taken before draining: a finished task has already sent its result
        let finished: Vec<u64> = self
            .outstanding
            .iter()
            .filter(|(_, handle)| handle.is_finished())
            .map(|(seq, _)| *seq)
            .collect();

        while let Ok(done) = self.rx.try_recv() {
            let current = self.outstanding.remove(&done.seq).is_some();
            if self.cancel_superseded && !current {
                log::debug!("dropping stale results for {:?}", done.query);
                continue;
            }

            applied.push(SearchOutcome {
                query: done.query,
                results: done.places.len(),
            });
            self.candidates = done.places;
        }

        for seq in finished {
            if self.outstanding.remove(&seq).is_some() {
                log::error!("Error: lookup {} ended without a result", seq);
            }
        }

        applied
    }

    /// Aborts every running lookup so none of them can replace the candidates
    fn cancel_outstanding(&mut self) {
        for (_, handle) in self.outstanding.drain() {
            if !handle.is_finished() {
                log::debug!("cancelling superseded lookup");
                handle.cancel();
            }
        }
    }
}

/// One lookup with the silent-failure policy applied
async fn lookup(geocoder: &dyn Geocoder, query: &str, limit: usize) -> Vec<Place> {
    if query.trim().is_empty() {
        log::debug!("empty address, skipping lookup");
        return Vec::new();
    }

    match geocoder.search(query, limit).await {
        Ok(mut places) => {
            places.truncate(limit);
            places
        }
        Err(e) => {
            log::error!("Error: geocoding {:?} failed: {}", query, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MapError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers every query with a fixed list after an optional delay taken
    /// from the query text (`"slow"` waits 80ms, `"crash"` panics).
    struct FakeGeocoder {
        calls: AtomicUsize,
    }

    impl FakeGeocoder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn search(&self, query: &str, _limit: usize) -> Result<Vec<Place>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match query {
                "fail" => Err(MapError::Http {
                    status: 503,
                    url: "http://fake/search".to_string(),
                }),
                "slow" => {
                    tokio::time::sleep(Duration::from_millis(80)).await;
                    Ok(vec![Place::new(1.0, 1.0, "Slow")])
                }
                "crash" => panic!("geocoder crashed"),
                "many" => Ok((0..5)
                    .map(|i| Place::new(i as f64, i as f64, format!("Place {}", i)))
                    .collect()),
                other => Ok(vec![Place::new(2.0, 2.0, other)]),
            }
        }
    }

    fn config(cancel_superseded: bool) -> GeocoderConfig {
        GeocoderConfig {
            cancel_superseded,
            ..GeocoderConfig::default()
        }
    }

    async fn settle(search: &mut AddressSearch) -> Vec<SearchOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..100 {
            outcomes.extend(search.poll());
            if search.state() == SearchState::Idle {
                return outcomes;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("lookups did not settle");
    }

    #[tokio::test]
    async fn test_empty_query_skips_request() {
        let geocoder = FakeGeocoder::new();
        let mut search = AddressSearch::new(geocoder.clone(), &config(false));

        assert!(search.search("   ").await.is_empty());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_clears_candidates() {
        let mut search = AddressSearch::new(FakeGeocoder::new(), &config(false));
        assert_eq!(search.search("Berlin").await.len(), 1);

        assert!(search.search("fail").await.is_empty());
        assert!(search.candidates().is_empty());
    }

    #[tokio::test]
    async fn test_results_capped_at_limit() {
        let mut search = AddressSearch::new(FakeGeocoder::new(), &config(false));
        assert_eq!(search.search("many").await.len(), 3);
    }

    #[tokio::test]
    async fn test_submit_then_poll() {
        let mut search = AddressSearch::new(FakeGeocoder::new(), &config(false));
        search.submit("Berlin");
        assert_eq!(search.state(), SearchState::InFlight { pending: 1 });

        let outcomes = settle(&mut search).await;
        assert_eq!(
            outcomes,
            vec![SearchOutcome {
                query: "Berlin".to_string(),
                results: 1
            }]
        );
        assert_eq!(search.candidates()[0].display_name, "Berlin");
    }

    #[tokio::test]
    async fn test_last_resolved_wins() {
        let mut search = AddressSearch::new(FakeGeocoder::new(), &config(false));
        search.submit("slow");
        search.submit("Paris");
        assert_eq!(search.state(), SearchState::InFlight { pending: 2 });

        let outcomes = settle(&mut search).await;
        let order: Vec<_> = outcomes.iter().map(|o| o.query.as_str()).collect();
        assert_eq!(order, vec!["Paris", "slow"]);
        assert_eq!(search.candidates()[0].display_name, "Slow");
    }

    #[tokio::test]
    async fn test_cancel_superseded_keeps_latest() {
        let mut search = AddressSearch::new(FakeGeocoder::new(), &config(true));
        search.submit("slow");
        search.submit("Paris");
        assert_eq!(search.state(), SearchState::InFlight { pending: 1 });

        let outcomes = settle(&mut search).await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(search.candidates()[0].display_name, "Paris");

        // The aborted lookup never lands
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(search.poll().is_empty());
        assert_eq!(search.candidates()[0].display_name, "Paris");
    }

    #[tokio::test]
    async fn test_awaited_search_supersedes_submitted_ones() {
        let mut search = AddressSearch::new(FakeGeocoder::new(), &config(true));
        search.submit("slow");

        assert_eq!(search.search("Paris").await[0].display_name, "Paris");
        assert_eq!(search.state(), SearchState::Idle);

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(search.poll().is_empty());
        assert_eq!(search.candidates()[0].display_name, "Paris");
    }

    #[tokio::test]
    async fn test_crashed_lookup_does_not_stay_pending() {
        let mut search = AddressSearch::new(FakeGeocoder::new(), &config(false));
        assert_eq!(search.search("Berlin").await.len(), 1);

        search.submit("crash");
        assert_eq!(search.state(), SearchState::InFlight { pending: 1 });

        let outcomes = settle(&mut search).await;
        assert!(outcomes.is_empty());
        assert_eq!(search.state(), SearchState::Idle);
        assert_eq!(search.candidates()[0].display_name, "Berlin");
    }
}
