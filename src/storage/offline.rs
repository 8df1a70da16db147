use async_trait::async_trait;
use bytes::Bytes;
use gallery_core::Result;

use super::ObjectStore;

/// Store that accepts and discards every object.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineStore;

#[async_trait]
impl ObjectStore for OfflineStore {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn put_object(&self, key: &str, body: Bytes) -> Result<()> {
        tracing::debug!("Offline: skipping upload of {} ({} bytes)", key, body.len());
        Ok(())
    }
}
