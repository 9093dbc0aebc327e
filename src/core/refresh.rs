//! Serializes and deduplicates concurrent price refreshes.

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::Mutex;

use crate::{
    api::source::CardSource,
    core::merge::{MergedEntry, merge},
    error::TariffError,
    prelude::*,
};

/// Per-operator single-flight refresh coordinator.
///
/// Each operator gets its own slot: at most one fetch runs at a time, and
/// callers arriving while a fetch is in flight wait behind the slot lock
/// and reuse the outcome it publishes. Different operators never contend.
pub struct Refresher<S> {
    source: S,
    maingau_customer: bool,
    slots: Mutex<HashMap<String, Arc<Slot>>>,
}

#[derive(Default)]
struct Slot {
    /// Bumped after every completed fetch, so a waiter can tell whether
    /// the fetch it waited behind published an outcome since call entry.
    epoch: AtomicU64,
    state: Mutex<SlotState>,
}

#[derive(Default)]
struct SlotState {
    outcome: Option<Result<Vec<MergedEntry>, TariffError>>,
    last_good: Option<Vec<MergedEntry>>,
}

impl<S: CardSource> Refresher<S> {
    pub fn new(source: S, maingau_customer: bool) -> Self {
        Self { source, maingau_customer, slots: Mutex::new(HashMap::new()) }
    }

    /// Fetch, merge, and return the operator's price lists.
    ///
    /// A call that arrives during an in-flight fetch for the same operator
    /// returns that fetch's result or error instead of fetching again.
    #[instrument(skip_all, fields(operator_id = operator_id, force_download = force_download))]
    pub async fn refresh(
        &self,
        operator_id: &str,
        force_download: bool,
    ) -> Result<Vec<MergedEntry>, TariffError> {
        let slot = self.slot(operator_id).await;
        let entered_at = slot.epoch.load(Ordering::Acquire);
        let mut state = slot.state.lock().await;

        if slot.epoch.load(Ordering::Acquire) != entered_at
            && let Some(outcome) = &state.outcome
        {
            debug!("reusing the outcome of the fetch we waited behind");
            return outcome.clone();
        }

        let outcome = match self.source.retrieve_cards(operator_id, force_download).await {
            Ok(prices) => {
                info!(n_ac = prices.ac.len(), n_dc = prices.dc.len(), "fetched");
                Ok(merge(&prices.operator, &prices.ac, &prices.dc, self.maingau_customer))
            }
            Err(error) => {
                error!("the fetch failed: {error:#}");
                Err(TariffError::fetch(&error))
            }
        };
        if let Ok(entries) = &outcome {
            state.last_good = Some(entries.clone());
        }
        state.outcome = Some(outcome.clone());
        slot.epoch.fetch_add(1, Ordering::Release);
        outcome
    }

    /// The most recent successful merge for the operator, if any. A failed
    /// refresh never clears it.
    pub async fn last_good(&self, operator_id: &str) -> Option<Vec<MergedEntry>> {
        let slot = self.slot(operator_id).await;
        let state = slot.state.lock().await;
        state.last_good.clone()
    }

    async fn slot(&self, operator_id: &str) -> Arc<Slot> {
        let mut slots = self.slots.lock().await;
        match slots.entry(operator_id.to_owned()) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => Arc::clone(entry.insert(Arc::new(Slot::default()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicBool, AtomicUsize},
        time::Duration,
    };

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::time::sleep;

    use super::*;
    use crate::core::{
        card::{ChargeCard, Operator, OperatorPrices},
        maingau,
    };

    struct FakeCatalog {
        calls: AtomicUsize,
        fail: AtomicBool,
        delay: Duration,
    }

    impl FakeCatalog {
        fn new(delay: Duration) -> Self {
            Self { calls: AtomicUsize::new(0), fail: AtomicBool::new(false), delay }
        }
    }

    #[async_trait]
    impl CardSource for FakeCatalog {
        async fn retrieve_cards(
            &self,
            operator_id: &str,
            _force_download: bool,
        ) -> Result<OperatorPrices> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            sleep(self.delay).await;
            ensure!(!self.fail.load(Ordering::SeqCst), "the catalog is down");
            Ok(OperatorPrices {
                operator: Operator {
                    identifier: operator_id.to_owned(),
                    name: operator_id.to_uppercase(),
                    image: None,
                },
                ac: vec![card("adac", 0.57)],
                dc: vec![card("adac", 0.66)],
            })
        }
    }

    fn card(identifier: &str, price: f64) -> ChargeCard {
        ChargeCard::builder()
            .identifier(identifier)
            .name(identifier.to_uppercase())
            .provider("Test")
            .price(price)
            .updated(Utc::now())
            .build()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_refreshes_share_one_fetch() -> Result {
        let refresher =
            Arc::new(Refresher::new(FakeCatalog::new(Duration::from_millis(100)), false));
        let background = tokio::spawn({
            let refresher = Arc::clone(&refresher);
            async move { refresher.refresh("enbw", false).await }
        });
        sleep(Duration::from_millis(20)).await;
        let second = refresher.refresh("enbw", false).await?;
        let first = background.await??;
        assert_eq!(first, second);
        assert_eq!(refresher.source.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_waiters_share_the_error() -> Result {
        let source = FakeCatalog::new(Duration::from_millis(100));
        source.fail.store(true, Ordering::SeqCst);
        let refresher = Arc::new(Refresher::new(source, false));
        let background = tokio::spawn({
            let refresher = Arc::clone(&refresher);
            async move { refresher.refresh("enbw", false).await }
        });
        sleep(Duration::from_millis(20)).await;
        let second = refresher.refresh("enbw", false).await;
        let first = background.await?;
        assert_eq!(first.unwrap_err(), second.unwrap_err());
        assert_eq!(refresher.source.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_sequential_refreshes_fetch_again() -> Result {
        let refresher = Refresher::new(FakeCatalog::new(Duration::ZERO), false);
        refresher.refresh("enbw", false).await?;
        refresher.refresh("enbw", true).await?;
        assert_eq!(refresher.source.calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_operators_do_not_coalesce() -> Result {
        let refresher =
            Arc::new(Refresher::new(FakeCatalog::new(Duration::from_millis(50)), false));
        let (first, second) =
            tokio::join!(refresher.refresh("enbw", false), refresher.refresh("ionity", false));
        first?;
        second?;
        assert_eq!(refresher.source.calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_the_last_good_merge() -> Result {
        let refresher = Refresher::new(FakeCatalog::new(Duration::ZERO), false);
        let merged = refresher.refresh("enbw", false).await?;
        refresher.source.fail.store(true, Ordering::SeqCst);
        let error = refresher.refresh("enbw", false).await.unwrap_err();
        assert!(matches!(error, TariffError::FetchFailed(_)));
        assert_eq!(refresher.last_good("enbw").await.as_deref(), Some(merged.as_slice()));
        Ok(())
    }

    #[tokio::test]
    async fn test_customer_rates_flow_into_the_merge() -> Result {
        let refresher = Refresher::new(FakeCatalog::new(Duration::ZERO), true);
        let entries = refresher.refresh("enbw", false).await?;
        assert!(entries.iter().any(|entry| entry.identifier == maingau::CARD_IDENTIFIER));
        Ok(())
    }
}
