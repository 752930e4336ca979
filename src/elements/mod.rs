mod cache;
mod error;
mod fetch;

pub use cache::ElementsCache;
pub use error::ElementsError;
pub use fetch::{parse_group, ElementsFetcher, TleSet};

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};

/// Live fetch with last-known-good fallback. Only a run with neither fresh
/// nor cached elements is fatal; everything else degrades and continues.
pub struct ElementsSource {
    fetcher: ElementsFetcher,
    cache: ElementsCache,
}

impl ElementsSource {
    pub fn new(
        urls: Vec<String>,
        timeout: Duration,
        cache_path: PathBuf,
    ) -> Result<Self, ElementsError> {
        Ok(Self {
            fetcher: ElementsFetcher::new(urls, timeout)?,
            cache: ElementsCache::new(cache_path),
        })
    }

    pub async fn load(&self) -> Result<HashMap<String, TleSet>, ElementsError> {
        let fetched = self.fetcher.fetch().await;
        if !fetched.is_empty() {
            if let Err(e) = self.cache.store(&fetched) {
                warn!("failed to update elements cache: {}", e);
            }
            return Ok(fetched);
        }

        warn!("all element sources failed, falling back to cached data");
        match self.cache.load() {
            Ok(cached) if !cached.is_empty() => {
                info!("loaded {} element sets from cache", cached.len());
                Ok(cached)
            }
            Ok(_) => Err(ElementsError::Unavailable),
            Err(e) => {
                warn!("cache unavailable: {}", e);
                Err(ElementsError::Unavailable)
            }
        }
    }
}
