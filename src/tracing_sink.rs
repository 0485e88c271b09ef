use crate::record::{LogLevel, LogRecord};
use crate::sink::{LogSink, SinkError};
use tracing::{error, info, warn};

/// Re-emits records as `tracing` events so they show up wherever the
/// installed subscriber writes (stdout via [`init_stdout_tracing`](crate::init::init_stdout_tracing)).
///
/// Metadata is rendered as a single JSON string field.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn create_log(&self, record: LogRecord) -> Result<(), SinkError> {
        let metadata = match &record.metadata {
            Some(map) => serde_json::to_string(map)?,
            None => String::new(),
        };
        let source = record.source.as_str();
        let message = record.message.as_str();

        match record.level {
            LogLevel::Info => info!(target: "app_log", source, metadata = %metadata, "{}", message),
            LogLevel::Warning => warn!(target: "app_log", source, metadata = %metadata, "{}", message),
            LogLevel::Error => error!(target: "app_log", source, metadata = %metadata, "{}", message),
        }
        Ok(())
    }
}
