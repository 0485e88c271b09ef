use std::sync::Arc;

use app_log_emit::backend::LogBackend;
use app_log_emit::dispatch::{ChannelSink, DispatchConfig};
use app_log_emit::record::StoredLog;
use app_log_emit::{log_error, log_info, ErrorInfo};
use async_trait::async_trait;

/// Example of integrating a completely custom backend by implementing
/// the `LogBackend` trait directly. Imagine this talks to some
/// proprietary DB for which this crate does not provide a built-in
/// backend.
struct MyCustomDbBackend;

#[async_trait]
impl LogBackend for MyCustomDbBackend {
    async fn send(&self, record: &StoredLog) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // Here you would call your own client library for the target DB.
        println!("[my-custom-db] {:?}", record);
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let (sink, handle) = ChannelSink::spawn(Arc::new(MyCustomDbBackend), DispatchConfig::default());

    let _ = log_info(&sink, "custom backend example started", "example", None);
    let _ = log_error(
        &sink,
        "simulated error sent via custom backend",
        "example",
        Some(&ErrorInfo::new("db = my-custom-db")),
        None,
    );

    drop(sink);
    let _ = handle.await;
}
