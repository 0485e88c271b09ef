//! Level-specific log emission helpers ([`emit::log_info`],
//! [`emit::log_warning`], [`emit::log_error`]) that build a normalized
//! [`record::LogRecord`] and forward it to an injected [`sink::LogSink`],
//! plus sinks and asynchronous backends to deliver those records.

pub mod record;
pub mod error_info;
pub mod sink;
pub mod emit;

pub mod noop_sink;
pub mod memory_sink;
pub mod tracing_sink;

pub mod backend;
pub mod dispatch;
pub mod env;
pub mod init;

#[cfg(feature = "clickhouse")]
pub mod clickhouse;

#[cfg(feature = "opensearch")]
pub mod opensearch;

pub use emit::{log_error, log_info, log_warning, SourceLogger};
pub use error_info::{ErrorFields, ErrorInfo};
pub use record::{LogLevel, LogRecord, Metadata};
pub use sink::{LogSink, SinkError};
