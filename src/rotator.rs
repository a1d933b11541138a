use log::error;

use crate::cache::PriceCache;
use crate::sources::Asset;

/// Cycles through the assets of the current snapshot, one per call,
/// forever. Yields `None` when there is nothing to show.
pub struct AssetRotator {
    cache: PriceCache,
    cursor: usize,
}

impl AssetRotator {
    pub fn new(cache: PriceCache) -> AssetRotator {
        AssetRotator { cache, cursor: 0 }
    }

    pub async fn next(&mut self) -> Option<Asset> {
        let snapshot = match self.cache.get().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!("no price data available: {}", err);
                return None;
            }
        };
        if snapshot.is_empty() {
            return None;
        }
        // Reducing modulo the current length keeps the cursor valid when
        // a refresh shrinks the asset list.
        let index = self.cursor % snapshot.len();
        self.cursor = (index + 1) % snapshot.len();
        Some(snapshot.assets[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{FetchError, PriceSnapshot};
    use crate::testutil::{snapshot, ScriptedSource};
    use std::time::Duration;
    use tokio::time::advance;

    fn rotator_with(
        script: Vec<Result<PriceSnapshot, FetchError>>,
        ttl: Duration,
    ) -> AssetRotator {
        let cache = PriceCache::new(
            Box::new(ScriptedSource::new(script)),
            vec!["BTC".to_owned(), "ETH".to_owned()],
            "USD".to_owned(),
            ttl,
        );
        AssetRotator::new(cache)
    }

    async fn symbols_of(rotator: &mut AssetRotator, pulls: usize) -> Vec<String> {
        let mut seen = Vec::with_capacity(pulls);
        for _ in 0..pulls {
            seen.push(rotator.next().await.unwrap().symbol);
        }
        seen
    }

    #[tokio::test(start_paused = true)]
    async fn cycles_in_snapshot_order_and_wraps() {
        let mut rotator = rotator_with(
            vec![Ok(snapshot(&["BTC", "ETH", "DOGE"]))],
            Duration::from_secs(300),
        );
        let seen = symbols_of(&mut rotator, 4).await;
        assert_eq!(seen, ["BTC", "ETH", "DOGE", "BTC"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cursor_survives_a_shrinking_snapshot() {
        let ttl = Duration::from_secs(60);
        let mut rotator = rotator_with(
            vec![
                Ok(snapshot(&["A", "B", "C", "D", "E"])),
                Ok(snapshot(&["X", "Y"])),
            ],
            ttl,
        );

        // Four pulls leave the cursor at 4, past the end of the next list.
        let seen = symbols_of(&mut rotator, 4).await;
        assert_eq!(seen, ["A", "B", "C", "D"]);

        advance(ttl + Duration::from_secs(1)).await;
        let seen = symbols_of(&mut rotator, 3).await;
        assert_eq!(seen, ["X", "Y", "X"]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_snapshot_yields_none() {
        let mut rotator = rotator_with(
            vec![Ok(PriceSnapshot::new(Vec::new()))],
            Duration::from_secs(300),
        );
        assert!(rotator.next().await.is_none());
        assert!(rotator.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_a_cold_start_failure() {
        let mut rotator = rotator_with(
            vec![Err(FetchError::NoData), Ok(snapshot(&["BTC"]))],
            Duration::from_secs(300),
        );
        assert!(rotator.next().await.is_none());
        let asset = rotator.next().await.unwrap();
        assert_eq!(asset.symbol, "BTC");
    }
}
