use crate::backend::{split_dsn, DsnError, LogBackend};
use crate::record::StoredLog;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::error::Error;

/// Configuration for [`ClickHouseSink`].
///
/// The sink talks to ClickHouse over HTTP using the `JSONEachRow` format.
/// It supports both dedicated-table per service and shared-table modes by
/// toggling the `service_name` field and selected table.
#[derive(Clone, Debug)]
pub struct ClickHouseConfig {
    /// Base URL without query, e.g. "http://127.0.0.1:8123"
    pub url: String,
    pub database: String,
    pub table: String,
    pub service_name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl ClickHouseConfig {
    /// Build a config from `clickhouse://[user[:pass]@]host:port[/database[/table]]`,
    /// or `clickhouses://...` for HTTPS. Credentials are percent-decoded.
    ///
    /// Database defaults to `default`, table to `logs`.
    pub fn from_dsn(dsn: &str) -> Result<Self, DsnError> {
        let parts = split_dsn(dsn)?;
        let url = parts.base_url();
        let mut path = parts.path.into_iter();

        Ok(ClickHouseConfig {
            url,
            database: path.next().unwrap_or_else(|| "default".to_string()),
            table: path.next().unwrap_or_else(|| "logs".to_string()),
            service_name: None,
            user: parts.user,
            password: parts.password,
        })
    }
}

/// ClickHouse implementation of [`LogBackend`] using the HTTP interface.
#[derive(Clone)]
pub struct ClickHouseSink {
    client: Client,
    config: ClickHouseConfig,
}

impl ClickHouseSink {
    /// Construct a new sink instance using the provided configuration.
    pub fn new(config: ClickHouseConfig) -> Self {
        let client = Client::new();
        Self { client, config }
    }

    fn auth_query(&self) -> String {
        let mut query = String::new();
        if let Some(user) = &self.config.user {
            query.push_str(&format!("&user={}", urlencoding::encode(user)));
        }
        if let Some(password) = &self.config.password {
            query.push_str(&format!("&password={}", urlencoding::encode(password)));
        }
        query
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/?database={}&query=INSERT%20INTO%20{}%20FORMAT%20JSONEachRow{}",
            self.config.url,
            urlencoding::encode(&self.config.database),
            urlencoding::encode(&self.config.table),
            self.auth_query()
        )
    }

    fn map_record(&self, stored: &StoredLog) -> ClickHouseRow {
        let record = &stored.record;
        ClickHouseRow {
            timestamp: stored.timestamp.to_rfc3339(),
            level: record.level.as_str(),
            source: record.source.clone(),
            message: record.message.clone(),
            service_name: self
                .config
                .service_name
                .clone()
                .or_else(|| stored.service_name.clone()),
            metadata: record
                .metadata
                .as_ref()
                .map(|m| serde_json::to_string(m).unwrap_or_else(|_| "{}".to_string()))
                .unwrap_or_else(|| "{}".to_string()),
        }
    }

    /// Validate that the target ClickHouse table exists. This is optional
    /// and is not called automatically.
    ///
    /// **Returns**
    /// - `Ok(())` if the `DESCRIBE TABLE` query succeeded.
    /// - `Err(..)` if ClickHouse responded with a non-success status.
    pub async fn validate_schema(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let url = format!(
            "{}/?query={}{}",
            self.config.url,
            urlencoding::encode(&format!(
                "DESCRIBE TABLE {}.{} FORMAT JSON",
                self.config.database, self.config.table
            )),
            self.auth_query()
        );
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(format!("ClickHouse schema validation failed with status {}", resp.status()).into());
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct ClickHouseRow {
    timestamp: String,
    level: &'static str,
    source: String,
    message: String,
    service_name: Option<String>,
    metadata: String,
}

#[async_trait]
impl LogBackend for ClickHouseSink {
    async fn send(&self, record: &StoredLog) -> Result<(), Box<dyn Error + Send + Sync>> {
        let row = self.map_record(record);
        let body = serde_json::to_string(&row)? + "\n";
        let resp = self.client.post(self.endpoint()).body(body).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            Err(format!("ClickHouse insert failed with status {}: {}", status, text).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{LogLevel, LogRecord, Metadata};
    use serde_json::json;

    #[test]
    fn dsn_defaults() {
        let cfg = ClickHouseConfig::from_dsn("clickhouse://127.0.0.1:8123").unwrap();
        assert_eq!(cfg.url, "http://127.0.0.1:8123");
        assert_eq!(cfg.database, "default");
        assert_eq!(cfg.table, "logs");
        assert_eq!(cfg.user, None);
    }

    #[test]
    fn dsn_with_everything() {
        let cfg = ClickHouseConfig::from_dsn("clickhouse://default:pw@ch:8123/admin/app_logs").unwrap();
        assert_eq!(cfg.url, "http://ch:8123");
        assert_eq!(cfg.database, "admin");
        assert_eq!(cfg.table, "app_logs");
        assert_eq!(cfg.user.as_deref(), Some("default"));
        assert_eq!(cfg.password.as_deref(), Some("pw"));
    }

    #[test]
    fn endpoint_encodes_credentials() {
        let mut cfg = ClickHouseConfig::from_dsn("clickhouse://ch:8123").unwrap();
        cfg.user = Some("svc".to_string());
        cfg.password = Some("a&b".to_string());
        let sink = ClickHouseSink::new(cfg);
        assert_eq!(
            sink.endpoint(),
            "http://ch:8123/?database=default&query=INSERT%20INTO%20logs%20FORMAT%20JSONEachRow&user=svc&password=a%26b"
        );
    }

    #[test]
    fn encoded_dsn_password_is_encoded_once_in_endpoint() {
        let cfg = ClickHouseConfig::from_dsn("clickhouses://svc:p%40ss@ch:8443/admin").unwrap();
        assert_eq!(cfg.url, "https://ch:8443");
        assert_eq!(cfg.password.as_deref(), Some("p@ss"));

        let sink = ClickHouseSink::new(cfg);
        assert!(sink.endpoint().ends_with("&user=svc&password=p%40ss"));
    }

    #[test]
    fn row_serializes_metadata_as_string() {
        let cfg = ClickHouseConfig::from_dsn("clickhouse://ch:8123").unwrap();
        let sink = ClickHouseSink::new(cfg);
        let stored = StoredLog::new(
            LogRecord {
                level: LogLevel::Warning,
                message: "slow".to_string(),
                source: "db".to_string(),
                metadata: Some(Metadata::from([("ms".to_string(), json!(900))])),
            },
            Some("admin".to_string()),
        );

        let row = serde_json::to_value(sink.map_record(&stored)).unwrap();
        assert_eq!(row["level"], json!("warning"));
        assert_eq!(row["metadata"], json!("{\"ms\":900}"));
        assert_eq!(row["service_name"], json!("admin"));
    }
}
