use std::sync::Arc;
use std::time::Instant;

use app_log_emit::backend::LogBackend;
use app_log_emit::dispatch::{ChannelSink, DispatchConfig};
use app_log_emit::log_warning;
use app_log_emit::record::StoredLog;
use async_trait::async_trait;
use tokio::time::Duration;

/// Backend that accepts everything, so only dispatch overhead is measured.
struct Discard;

#[async_trait]
impl LogBackend for Discard {
    async fn send(&self, _record: &StoredLog) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let config = DispatchConfig {
        channel_buffer: 50_000,
        batch_size: 1_000,
        flush_interval: Duration::from_millis(200),
        ..DispatchConfig::default()
    };
    let (sink, handle) = ChannelSink::spawn(Arc::new(Discard), config);
    let stats_sink = sink.clone();

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        let _ = log_warning(&sink, format!("custom load {}", i), "load", None);
        if i % 10_000 == 0 {
            tokio::task::yield_now().await;
        }
    }

    let elapsed = start.elapsed();
    drop(sink);
    let stats = stats_sink.stats();
    println!("custom config: offered {} records in {:?} (~{:.0} rec/s), accepted {}, dropped {}",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64(),
        stats.accepted(),
        stats.dropped()
    );

    drop(stats_sink);
    let _ = handle.await;
}
