//! S3-style HTTP object store: `PUT {endpoint}/{bucket}/{key}`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use gallery_core::{Error, Result};
use reqwest::{Client, Url};

use super::ObjectStore;

pub struct HttpStore {
    client: Client,
    endpoint: Url,
    bucket: String,
    token: Option<String>,
}

impl HttpStore {
    pub fn new(
        endpoint: &str,
        bucket: &str,
        token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint.trim())
            .map_err(|e| Error::validation(format!("invalid storage endpoint {endpoint}: {e}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(Error::validation(format!(
                "storage endpoint is not a base URL: {endpoint}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::storage(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            bucket: bucket.trim().to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// URL an object is written to. Bucket and key are percent-encoded.
    pub fn object_url(&self, key: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Internal(format!("cannot extend URL {}", self.endpoint)))?
            .pop_if_empty()
            .push(&self.bucket)
            .push(key);
        Ok(url)
    }
}

fn content_type(key: &str) -> &'static str {
    let ext = key.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("avif") => "image/avif",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("tif" | "tiff") => "image/tiff",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl ObjectStore for HttpStore {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn put_object(&self, key: &str, body: Bytes) -> Result<()> {
        let url = self.object_url(key)?;
        tracing::debug!("PUT {} ({} bytes)", url, body.len());

        let mut request = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, content_type(key))
            .body(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::storage(format!("upload of {key} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::storage(format!(
                "upload of {key} failed ({status}): {body}"
            )));
        }

        Ok(())
    }
}
