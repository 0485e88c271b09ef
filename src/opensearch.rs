use crate::backend::{split_dsn, DsnError, LogBackend};
use crate::record::StoredLog;
use async_trait::async_trait;
use reqwest::Client;
use std::error::Error;

/// OpenSearch backend that sends records via the HTTP bulk API.
#[derive(Clone)]
pub struct OpenSearchSink {
    client: Client,
    /// Base URL of the OpenSearch cluster, e.g. "http://localhost:9200".
    base_url: String,
    /// Target index name.
    index: String,
}

impl OpenSearchSink {
    pub fn new(base_url: String, index: String) -> Self {
        OpenSearchSink {
            client: Client::new(),
            base_url,
            index,
        }
    }

    /// Build from `opensearch://host:port[/index]`, or `opensearchs://...`
    /// for HTTPS; index defaults to `logs`.
    pub fn from_dsn(dsn: &str) -> Result<Self, DsnError> {
        let parts = split_dsn(dsn)?;
        let base_url = parts.base_url();
        let index = parts
            .path
            .into_iter()
            .next()
            .unwrap_or_else(|| "logs".to_string());
        Ok(Self::new(base_url, index))
    }

    fn bulk_body(&self, record: &StoredLog) -> Result<String, serde_json::Error> {
        let action = serde_json::json!({ "index": { "_index": self.index } });
        Ok(format!(
            "{}\n{}\n",
            serde_json::to_string(&action)?,
            serde_json::to_string(record)?
        ))
    }
}

#[async_trait]
impl LogBackend for OpenSearchSink {
    async fn send(&self, record: &StoredLog) -> Result<(), Box<dyn Error + Send + Sync>> {
        let body = self.bulk_body(record)?;
        let url = format!("{}/_bulk", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            Err(format!("OpenSearch bulk insert failed with status {}: {}", status, text).into())
        }
    }
}
