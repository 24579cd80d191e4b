use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::model::RawItem;

/// Read access to the concerts table.
#[async_trait]
pub trait ConcertStore: Send + Sync {
    /// Point read by concert id. `Ok(None)` when no item has that id.
    async fn get_by_id(&self, id: &str) -> Result<Option<RawItem>, StoreError>;

    /// Every item whose `dateTime` attribute is strictly greater than `now_epoch`.
    async fn scan_future_from(&self, now_epoch: i64) -> Result<Vec<RawItem>, StoreError>;
}

#[async_trait]
impl<T: ConcertStore + ?Sized> ConcertStore for Arc<T> {
    async fn get_by_id(&self, id: &str) -> Result<Option<RawItem>, StoreError> {
        (**self).get_by_id(id).await
    }

    async fn scan_future_from(&self, now_epoch: i64) -> Result<Vec<RawItem>, StoreError> {
        (**self).scan_future_from(now_epoch).await
    }
}

/// Concerts table held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryConcertStore {
    items: Vec<RawItem>,
}

impl MemoryConcertStore {
    pub fn new(items: Vec<RawItem>) -> Self {
        Self { items }
    }

    /// Loads a JSON array of raw concert objects.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[async_trait]
impl ConcertStore for MemoryConcertStore {
    async fn get_by_id(&self, id: &str) -> Result<Option<RawItem>, StoreError> {
        Ok(self
            .items
            .iter()
            .find(|item| item.get("id").and_then(Value::as_str) == Some(id))
            .cloned())
    }

    async fn scan_future_from(&self, now_epoch: i64) -> Result<Vec<RawItem>, StoreError> {
        Ok(self
            .items
            .iter()
            .filter(|item| {
                item.get("dateTime")
                    .and_then(Value::as_i64)
                    .is_some_and(|t| t > now_epoch)
            })
            .cloned()
            .collect())
    }
}
