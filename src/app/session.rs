use crate::domain::availability::WorkingHours;
use crate::domain::codec::PropertyCodec;
use crate::domain::store::{RecordStore, StoreConnector};
use crate::error::Result;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// A lazily connected store plus the settings every effect needs.
///
/// The store is connected on first use. A call that fails with a connection
/// error drops the store, reconnects and is retried exactly once.
pub struct Session {
    connector: Arc<dyn StoreConnector>,
    store: Mutex<Option<Arc<dyn RecordStore>>>,
    pub codec: PropertyCodec,
    pub working_hours: WorkingHours,
    pub recent_limit: usize,
}

impl Session {
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            connector,
            store: Mutex::new(None),
            codec: PropertyCodec::default(),
            working_hours: WorkingHours::default(),
            recent_limit: 10,
        }
    }

    #[must_use]
    pub fn with_codec(mut self, codec: PropertyCodec) -> Self {
        self.codec = codec;
        self
    }

    #[must_use]
    pub fn with_working_hours(mut self, hours: WorkingHours) -> Self {
        self.working_hours = hours;
        self
    }

    #[must_use]
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    async fn store(&self) -> Result<Arc<dyn RecordStore>> {
        let mut guard = self.store.lock().await;
        if let Some(store) = guard.as_ref() {
            return Ok(Arc::clone(store));
        }
        let store = self.connector.connect().await?;
        info!("store session initialized");
        *guard = Some(Arc::clone(&store));
        Ok(store)
    }

    async fn reset(&self) {
        *self.store.lock().await = None;
    }

    pub async fn call<T, F>(&self, op: F) -> Result<T>
    where
        F: Fn(Arc<dyn RecordStore>) -> BoxFuture<'static, Result<T>>,
    {
        let first = match self.store().await {
            Ok(store) => op(store).await,
            Err(e) => Err(e),
        };
        match first {
            Err(e) if e.is_connection() => {
                warn!(error = %e, "store call failed, reinitializing once");
                self.reset().await;
                let store = self.store().await?;
                op(store).await
            }
            other => other,
        }
    }
}
