use std::time::Instant;

use app_log_emit::dispatch::{ChannelSink, DispatchConfig};
use app_log_emit::error_info::ErrorInfo;
use app_log_emit::noop_sink::NoopSink;
use app_log_emit::{log_error, log_info};
use std::sync::Arc;

/// Measures the cost of building records, then of handing them to the
/// dispatcher, with default settings.
#[tokio::main]
async fn main() {
    let n: u64 = 100_000;
    let err = ErrorInfo::new("load test failure").with_stack("at main");

    let start = Instant::now();
    for i in 0..n {
        let _ = log_error(&NoopSink, format!("event {}", i), "load", Some(&err), None);
    }
    let elapsed = start.elapsed();
    println!("noop sink: built {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    let backend = Arc::new(app_log_emit::backend::StdoutBackend);
    let (sink, handle) = ChannelSink::spawn(backend, DispatchConfig::default());

    let start = Instant::now();
    let mut rejected = 0u64;
    for i in 0..n {
        if log_info(&sink, format!("event {}", i), "load", None).is_err() {
            rejected += 1;
        }
    }
    let elapsed = start.elapsed();
    eprintln!("channel sink: offered {} records in {:?}, {} rejected", n, elapsed, rejected);

    drop(sink);
    let _ = handle.await;
}
