use crate::backend::LogBackend;
use crate::record::{LogRecord, StoredLog};
use crate::sink::{LogSink, SinkError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};

/// Buffering, batching and retry settings for [`ChannelSink`].
///
/// **Fields**
/// - `channel_buffer`: maximum number of queued records before new ones
///   are rejected with [`DispatchError::ChannelFull`].
/// - `batch_size`: number of records handed to the backend per batch.
/// - `flush_interval`: longest time a partial batch waits before it is sent.
/// - `retry_backoff` / `max_backoff`: first and largest delay between
///   retries of a failing record; the delay doubles each attempt.
/// - `max_retries`: retries per record. When one record exhausts them the
///   unsent rest of its batch is dropped.
/// - `service_name`: stamped on every [`StoredLog`] for shared-table setups.
#[derive(Clone, Debug)]
pub struct DispatchConfig {
    pub channel_buffer: usize,
    pub batch_size: usize,
    pub flush_interval: Duration,
    pub retry_backoff: Duration,
    pub max_backoff: Duration,
    pub max_retries: u32,
    pub service_name: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 1024,
            batch_size: 128,
            flush_interval: Duration::from_secs(1),
            retry_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            max_retries: 5,
            service_name: None,
        }
    }
}

impl DispatchConfig {
    // Enforce minimal thresholds to avoid degenerate configs.
    fn clamped(mut self) -> Self {
        let min_interval = Duration::from_millis(10);
        self.channel_buffer = self.channel_buffer.max(16);
        self.batch_size = self.batch_size.max(1);
        self.flush_interval = self.flush_interval.max(min_interval);
        self.retry_backoff = self.retry_backoff.max(min_interval);
        self.max_backoff = self.max_backoff.max(self.retry_backoff);
        self
    }
}

/// Counters shared between a [`ChannelSink`] and its background task.
#[derive(Debug, Default)]
pub struct DispatchStats {
    /// Records enqueued by `create_log`.
    pub accepted: AtomicU64,
    /// Records rejected because the channel was full.
    pub dropped: AtomicU64,
    /// Records the backend acknowledged.
    pub delivered: AtomicU64,
    /// Records given up on after `max_retries`.
    pub failed: AtomicU64,
}

impl DispatchStats {
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Error returned by [`ChannelSink::create_log`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    #[error("log channel full, record dropped")]
    ChannelFull,

    #[error("log dispatcher has shut down")]
    Closed,
}

/// [`LogSink`] that hands records to a background task which batches them
/// into an asynchronous [`LogBackend`].
///
/// `create_log` never blocks: it stamps the record into a [`StoredLog`] and
/// `try_send`s it on a bounded channel. Clones share the same channel. Once
/// every clone is dropped the task drains what is queued, flushes the
/// backend and finishes.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: mpsc::Sender<StoredLog>,
    service_name: Option<String>,
    stats: Arc<DispatchStats>,
}

impl ChannelSink {
    /// Create a new sink and spawn the delivery task on the current tokio
    /// runtime.
    ///
    /// **Returns** the sink and the task handle; awaiting the handle after
    /// dropping all sink clones waits for the final flush.
    pub fn spawn(backend: Arc<dyn LogBackend>, config: DispatchConfig) -> (Self, JoinHandle<()>) {
        let config = config.clamped();
        let (tx, rx) = mpsc::channel::<StoredLog>(config.channel_buffer);
        let stats = Arc::new(DispatchStats::default());

        let service_name = config.service_name.clone();
        let handle = tokio::spawn(run(backend, rx, config, Arc::clone(&stats)));

        (
            Self {
                sender: tx,
                service_name,
                stats,
            },
            handle,
        )
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }
}

impl LogSink for ChannelSink {
    fn create_log(&self, record: LogRecord) -> Result<(), SinkError> {
        let stored = StoredLog::new(record, self.service_name.clone());
        match self.sender.try_send(stored) {
            Ok(()) => {
                self.stats.accepted.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("log channel full, dropping log record");
                Err(Box::new(DispatchError::ChannelFull))
            }
            Err(TrySendError::Closed(_)) => Err(Box::new(DispatchError::Closed)),
        }
    }
}

async fn run(
    backend: Arc<dyn LogBackend>,
    mut rx: mpsc::Receiver<StoredLog>,
    config: DispatchConfig,
    stats: Arc<DispatchStats>,
) {
    let mut batch = Vec::with_capacity(config.batch_size);
    let mut ticker = interval(config.flush_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(record) => {
                    batch.push(record);
                    if batch.len() >= config.batch_size {
                        send_batch(&*backend, &mut batch, &config, &stats).await;
                    }
                }
                None => break,
            },
            _ = ticker.tick() => {
                if !batch.is_empty() {
                    send_batch(&*backend, &mut batch, &config, &stats).await;
                }
            }
        }
    }

    if !batch.is_empty() {
        send_batch(&*backend, &mut batch, &config, &stats).await;
    }
    if let Err(e) = backend.flush().await {
        tracing::error!(error = %e, "error flushing log backend");
    }
}

/// Deliver `batch` in order, retrying from the first unsent record. Retry
/// count and backoff start over after every delivered record. The batch is
/// always empty on return.
async fn send_batch(
    backend: &dyn LogBackend,
    batch: &mut Vec<StoredLog>,
    config: &DispatchConfig,
    stats: &DispatchStats,
) {
    let mut sent = 0;
    let mut attempts = 0;
    let mut backoff = config.retry_backoff;

    while sent < batch.len() {
        match backend.send(&batch[sent]).await {
            Ok(()) => {
                sent += 1;
                attempts = 0;
                backoff = config.retry_backoff;
                stats.delivered.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) if attempts < config.max_retries => {
                attempts += 1;
                tracing::warn!(error = %e, attempt = attempts, ?backoff, "log backend send failed, retrying");
                sleep(backoff).await;
                backoff = std::cmp::min(backoff * 2, config.max_backoff);
            }
            Err(e) => {
                let lost = (batch.len() - sent) as u64;
                stats.failed.fetch_add(lost, Ordering::Relaxed);
                tracing::error!(error = %e, lost, "giving up on log batch");
                break;
            }
        }
    }
    batch.clear();
}
