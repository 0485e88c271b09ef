use app_log_emit::dispatch::DispatchConfig;
use app_log_emit::init::{init_stdout_tracing, init_with_dsn};
use app_log_emit::{log_error, log_info, ErrorInfo};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_stdout_tracing()?;

    // Example DSN: opensearch://localhost:9200/logs
    let dsn = std::env::var("LOG_SINK_DSN")
        .unwrap_or_else(|_| "opensearch://localhost:9200/logs".to_string());
    let (sink, handle) = init_with_dsn(&dsn, DispatchConfig::default())?;

    log_info(&sink, "opensearch backend example started", "example", None)?;
    log_error(
        &sink,
        "simulated error sent via OpenSearch backend",
        "example",
        Some(&ErrorInfo::new("index unavailable")),
        None,
    )?;

    drop(sink);
    handle.await?;
    Ok(())
}
