use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shipwright_core::{Buyer, CoreError, CoreResult, Order, OrderSource};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads `order.{id}.json` and `buyer.{id}.json` documents from a directory
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn order_path(&self, order_id: u64) -> PathBuf {
        self.dir.join(format!("order.{}.json", order_id))
    }

    pub fn buyer_path(&self, buyer_id: u64) -> PathBuf {
        self.dir.join(format!("buyer.{}.json", buyer_id))
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> CoreResult<T> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                CoreError::NotFound(path.display().to_string())
            } else {
                CoreError::Io(e)
            }
        })?;
        debug!(path = %path.display(), bytes = raw.len(), "Loaded JSON document");
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl OrderSource for JsonFileSource {
    async fn load_order(&self, order_id: u64) -> CoreResult<Order> {
        Self::read_json(&self.order_path(order_id)).await
    }

    async fn load_buyer(&self, buyer_id: u64) -> CoreResult<Buyer> {
        Self::read_json(&self.buyer_path(buyer_id)).await
    }
}
