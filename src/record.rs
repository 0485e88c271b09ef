use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key holding the error's message text on error records.
pub const ERROR_MESSAGE_KEY: &str = "errorMessage";

/// Metadata key holding the error's stack/cause text on error records.
pub const STACK_KEY: &str = "stack";

/// Free-form structured fields attached to a [`LogRecord`].
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Severity of a [`LogRecord`]. Chosen by the emit function, never by the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single application event as handed to a [`LogSink`](crate::sink::LogSink).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    /// Emitting subsystem, e.g. `"bookings"` or `"admin.organizations"`.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Envelope produced by [`ChannelSink`](crate::dispatch::ChannelSink) when a
/// record is accepted for delivery.
///
/// The timestamp is assigned by the sink at acceptance time; records
/// themselves carry none.
#[derive(Debug, Clone, Serialize)]
pub struct StoredLog {
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(flatten)]
    pub record: LogRecord,
}

impl StoredLog {
    pub fn new(record: LogRecord, service_name: Option<String>) -> Self {
        StoredLog {
            timestamp: Utc::now(),
            service_name,
            record,
        }
    }
}
