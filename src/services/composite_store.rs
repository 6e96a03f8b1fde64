use std::sync::Arc;
use tokio::sync::RwLock;

/// The most recent successful mosaic
#[derive(Clone)]
pub struct LatestComposite {
    /// Encoded PNG bytes
    pub png_bytes: Vec<u8>,
    /// Cells that received a tile
    pub placed: usize,
    /// Cells left showing the background
    pub skipped: usize,
    /// When this mosaic was generated
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Holds the latest successful mosaic for `/api/mosaic/latest`
pub struct CompositeStore {
    latest: Arc<RwLock<Option<LatestComposite>>>,
}

impl CompositeStore {
    pub fn new() -> Self {
        Self {
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the latest mosaic
    pub async fn store(&self, composite: LatestComposite) {
        let mut latest = self.latest.write().await;
        *latest = Some(composite);
    }

    /// Retrieve the latest mosaic, if any request has succeeded yet
    pub async fn get(&self) -> Option<LatestComposite> {
        let latest = self.latest.read().await;
        latest.clone()
    }
}

impl Default for CompositeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composite(tag: u8) -> LatestComposite {
        LatestComposite {
            png_bytes: vec![tag; 4],
            placed: 3,
            skipped: 1,
            generated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = CompositeStore::new();
        assert!(store.get().await.is_none());
    }

    #[tokio::test]
    async fn test_store_replaces_latest() {
        let store = CompositeStore::new();
        store.store(composite(1)).await;
        store.store(composite(2)).await;

        let latest = store.get().await.unwrap();
        assert_eq!(latest.png_bytes, vec![2; 4]);
        assert_eq!(latest.placed, 3);
    }
}
