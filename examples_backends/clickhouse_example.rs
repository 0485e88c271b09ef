use std::sync::Arc;

use app_log_emit::clickhouse::{ClickHouseConfig, ClickHouseSink};
use app_log_emit::dispatch::{ChannelSink, DispatchConfig};
use app_log_emit::record::Metadata;
use app_log_emit::{ErrorInfo, SourceLogger};
use serde_json::json;

#[tokio::main]
async fn main() {
    let config = ClickHouseConfig {
        url: "http://127.0.0.1:8123".to_string(),
        database: "default".to_string(),
        table: "admin_logs".to_string(),
        service_name: Some("booking-admin".to_string()),
        user: Some("default".to_string()),
        password: None,
    };
    let backend = Arc::new(ClickHouseSink::new(config));
    let (sink, handle) = ChannelSink::spawn(backend, DispatchConfig::default());

    let logger = SourceLogger::new(Arc::new(sink), "auth");
    let _ = logger.info("starting service", None);
    let _ = logger.error(
        "authentication failed",
        Some(&ErrorInfo::new("invalid password")),
        Some(Metadata::from([("userId".to_string(), json!(42))])),
    );

    drop(logger);
    let _ = handle.await;
}
