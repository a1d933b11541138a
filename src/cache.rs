use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::sources::{FetchError, PriceSnapshot, PriceSource};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("price fetch failed and no cached data is available: {0}")]
    FetchFailed(#[source] FetchError),
}

pub struct PriceCache {
    source: Box<dyn PriceSource>,
    symbols: Vec<String>,
    currency: String,
    ttl: Duration,
    // Holding the lock across the fetch keeps concurrent readers from
    // issuing duplicate upstream requests.
    state: Mutex<Option<(Instant, Arc<PriceSnapshot>)>>,
}

impl PriceCache {
    pub fn new(
        source: Box<dyn PriceSource>,
        symbols: Vec<String>,
        currency: String,
        ttl: Duration,
    ) -> PriceCache {
        PriceCache {
            source,
            symbols,
            currency,
            ttl,
            state: Mutex::new(None),
        }
    }

    pub async fn get(&self) -> Result<Arc<PriceSnapshot>, CacheError> {
        let mut state = self.state.lock().await;
        if let Some((ref fetched, ref snapshot)) = *state {
            if fetched.elapsed() <= self.ttl {
                debug!("serving cached price data");
                return Ok(snapshot.clone());
            }
        }
        info!("price data missing or stale, fetching from {}", self.source.name());
        match self.source.fetch(&self.symbols, &self.currency).await {
            Ok(snapshot) => {
                debug!("cached {} assets from {}", snapshot.len(), self.source.name());
                let snapshot = Arc::new(snapshot);
                // Stamped after the fetch completes, so a slow upstream
                // cannot eat into the freshness window.
                *state = Some((Instant::now(), snapshot.clone()));
                Ok(snapshot)
            }
            Err(err) => match *state {
                // The stale snapshot stays untouched and keeps its old
                // timestamp; the next read retries the fetch.
                Some((_, ref snapshot)) => {
                    warn!(
                        "price refresh failed, serving {:?} old data: {}",
                        snapshot.age(),
                        err
                    );
                    Ok(snapshot.clone())
                }
                None => Err(CacheError::FetchFailed(err)),
            },
        }
    }
}
