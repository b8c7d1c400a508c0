//! Deterministic paged data layer behind the demo feeds

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use swipefeed_core::config::FeedConfig;
use swipefeed_core::{Error, FeedSource, PageOutcome, Result};
use swipefeed_tui::{FeedItem, FeedKind, FeedUpdate};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct DemoSource {
    kind: FeedKind,
    config: FeedConfig,
    tx: mpsc::UnboundedSender<FeedUpdate>,
    /// Pages delivered since the last refresh
    cursor: AtomicUsize,
    /// Bumped by every refresh so a page load that raced it is discarded
    generation: AtomicU64,
    operations: AtomicU32,
}

impl DemoSource {
    pub fn new(kind: FeedKind, config: FeedConfig, tx: mpsc::UnboundedSender<FeedUpdate>) -> Self {
        Self {
            kind,
            config,
            tx,
            cursor: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
            operations: AtomicU32::new(0),
        }
    }

    async fn simulate(&self, operation: &str) -> Result<()> {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
        let n = self.operations.fetch_add(1, Ordering::SeqCst) + 1;
        if self.config.fail_every > 0 && n % self.config.fail_every == 0 {
            warn!(feed = self.kind.title(), operation, "Simulated failure");
            return Err(Error::Source(format!("{} failed (simulated)", operation)));
        }
        Ok(())
    }

    fn page(&self, index: usize) -> Vec<FeedItem> {
        let now = Utc::now();
        (0..self.config.page_size)
            .map(|i| {
                let n = index * self.config.page_size + i + 1;
                let (title, detail) = match self.kind {
                    FeedKind::Social => (
                        format!("@user{}: post #{}", n % 17 + 1, n),
                        format!("{} likes, {} replies", (n * 37) % 500, (n * 11) % 40),
                    ),
                    FeedKind::Shop => (
                        format!("Product #{}", n),
                        format!("${}.{:02}, ships in {} days", 5 + (n * 13) % 95, (n * 7) % 100, n % 5 + 1),
                    ),
                };
                FeedItem {
                    id: Uuid::new_v4(),
                    title,
                    detail,
                    posted_at: now - chrono::Duration::minutes(n as i64 * 7),
                }
            })
            .collect()
    }

    fn publish(&self, update: FeedUpdate) {
        if self.tx.send(update).is_err() {
            debug!(feed = self.kind.title(), "Feed view gone; dropping update");
        }
    }
}

#[async_trait]
impl FeedSource for DemoSource {
    async fn refresh(&self) -> Result<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.simulate("refresh").await?;

        self.cursor.store(1, Ordering::SeqCst);
        self.publish(FeedUpdate::Replace(self.page(0)));
        Ok(())
    }

    async fn load_more(&self) -> Result<PageOutcome> {
        let generation = self.generation.load(Ordering::SeqCst);
        self.simulate("load more").await?;

        if generation != self.generation.load(Ordering::SeqCst) {
            debug!(feed = self.kind.title(), "Page load overtaken by refresh");
            return Ok(PageOutcome { exhausted: false });
        }

        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        if index >= self.config.pages {
            return Ok(PageOutcome { exhausted: true });
        }
        self.publish(FeedUpdate::Append(self.page(index)));
        Ok(PageOutcome {
            exhausted: index + 1 >= self.config.pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pages: usize, fail_every: u32) -> (DemoSource, mpsc::UnboundedReceiver<FeedUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = FeedConfig {
            page_size: 3,
            pages,
            latency_ms: 0,
            fail_every,
        };
        (DemoSource::new(FeedKind::Shop, config, tx), rx)
    }

    #[tokio::test]
    async fn test_pages_until_exhausted() {
        let (source, mut rx) = source(2, 0);

        assert!(!source.load_more().await.unwrap().exhausted);
        assert!(source.load_more().await.unwrap().exhausted);
        assert!(source.load_more().await.unwrap().exhausted);

        let mut titles = Vec::new();
        while let Ok(FeedUpdate::Append(items)) = rx.try_recv() {
            titles.extend(items.into_iter().map(|i| i.title));
        }
        assert_eq!(titles.len(), 6);
        assert_eq!(titles[0], "Product #1");
        assert_eq!(titles[5], "Product #6");
    }

    #[tokio::test]
    async fn test_refresh_restarts_paging() {
        let (source, mut rx) = source(2, 0);
        source.load_more().await.unwrap();
        source.load_more().await.unwrap();

        source.refresh().await.unwrap();
        assert!(source.load_more().await.unwrap().exhausted);

        let updates: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert!(matches!(updates[2], FeedUpdate::Replace(ref items) if items.len() == 3));
        assert!(matches!(updates[3], FeedUpdate::Append(ref items) if items[0].title == "Product #4"));
    }

    #[tokio::test]
    async fn test_fail_every_nth_operation() {
        let (source, mut rx) = source(10, 2);
        assert!(source.load_more().await.is_ok());
        let err = source.load_more().await.unwrap_err();
        assert!(matches!(err, Error::Source(_)));
        assert!(source.refresh().await.is_ok());
        assert!(source.refresh().await.is_err());

        // Failed operations publish nothing
        let updates: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(updates.len(), 2);
    }
}
