//! Level-specific entry points that build a [`LogRecord`] and forward it to
//! an injected [`LogSink`].
//!
//! None of these functions keep state or add fields of their own (no
//! timestamps, no counters): identical inputs always produce identical
//! records. Whatever the sink returns is returned as is.

use crate::error_info::ErrorFields;
use crate::record::{LogLevel, LogRecord, Metadata, ERROR_MESSAGE_KEY, STACK_KEY};
use crate::sink::{LogSink, SinkError};
use std::sync::Arc;

/// Emit an `info` record. `metadata` is forwarded unchanged, including
/// when absent.
pub fn log_info<S: LogSink + ?Sized>(
    sink: &S,
    message: impl Into<String>,
    source: impl Into<String>,
    metadata: Option<Metadata>,
) -> Result<(), SinkError> {
    sink.create_log(build(LogLevel::Info, message, source, metadata))
}

/// Emit a `warning` record. Same contract as [`log_info`].
pub fn log_warning<S: LogSink + ?Sized>(
    sink: &S,
    message: impl Into<String>,
    source: impl Into<String>,
    metadata: Option<Metadata>,
) -> Result<(), SinkError> {
    sink.create_log(build(LogLevel::Warning, message, source, metadata))
}

/// Emit an `error` record.
///
/// The forwarded metadata is the caller's metadata (or an empty map) with
/// `errorMessage` and `stack` set from `error`. Both keys are always
/// present and hold `null` when there is no error or the field is
/// unavailable. Caller keys of the same name are overwritten; the merge is
/// shallow.
pub fn log_error<S: LogSink + ?Sized>(
    sink: &S,
    message: impl Into<String>,
    source: impl Into<String>,
    error: Option<&dyn ErrorFields>,
    metadata: Option<Metadata>,
) -> Result<(), SinkError> {
    let mut merged = metadata.unwrap_or_default();
    let (error_message, stack) = match error {
        Some(err) => (err.error_message(), err.stack()),
        None => (None, None),
    };
    merged.insert(ERROR_MESSAGE_KEY.to_string(), error_message.into());
    merged.insert(STACK_KEY.to_string(), stack.into());

    sink.create_log(build(LogLevel::Error, message, source, Some(merged)))
}

fn build(
    level: LogLevel,
    message: impl Into<String>,
    source: impl Into<String>,
    metadata: Option<Metadata>,
) -> LogRecord {
    LogRecord {
        level,
        message: message.into(),
        source: source.into(),
        metadata,
    }
}

/// A sink paired with a fixed `source`, for subsystems that always log
/// under the same name.
pub struct SourceLogger<S: ?Sized> {
    sink: Arc<S>,
    source: String,
}

impl<S: ?Sized> Clone for SourceLogger<S> {
    fn clone(&self) -> Self {
        SourceLogger {
            sink: Arc::clone(&self.sink),
            source: self.source.clone(),
        }
    }
}

impl<S: LogSink + ?Sized> SourceLogger<S> {
    pub fn new(sink: Arc<S>, source: impl Into<String>) -> Self {
        SourceLogger {
            sink,
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn info(&self, message: impl Into<String>, metadata: Option<Metadata>) -> Result<(), SinkError> {
        log_info(&*self.sink, message, self.source.as_str(), metadata)
    }

    pub fn warning(&self, message: impl Into<String>, metadata: Option<Metadata>) -> Result<(), SinkError> {
        log_warning(&*self.sink, message, self.source.as_str(), metadata)
    }

    pub fn error(
        &self,
        message: impl Into<String>,
        error: Option<&dyn ErrorFields>,
        metadata: Option<Metadata>,
    ) -> Result<(), SinkError> {
        log_error(&*self.sink, message, self.source.as_str(), error, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_info::ErrorInfo;
    use crate::memory_sink::MemorySink;
    use serde_json::{json, Value};
    use std::io;

    fn meta(pairs: &[(&str, Value)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn info_passes_metadata_through() {
        let sink = MemorySink::new();
        let metadata = meta(&[("bookingId", json!("b-17")), ("seats", json!(3))]);

        log_info(&sink, "booking created", "bookings", Some(metadata.clone())).unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Info);
        assert_eq!(records[0].message, "booking created");
        assert_eq!(records[0].source, "bookings");
        assert_eq!(records[0].metadata, Some(metadata));
    }

    #[test]
    fn info_without_metadata_stays_absent() {
        let sink = MemorySink::new();
        log_info(&sink, "started", "server", None).unwrap();
        assert_eq!(sink.records()[0].metadata, None);
    }

    #[test]
    fn warning_uses_warning_level() {
        let sink = MemorySink::new();
        log_warning(&sink, "slow query", "db", Some(meta(&[("ms", json!(812))]))).unwrap();
        log_warning(&sink, "no metadata", "db", None).unwrap();

        let records = sink.records();
        assert_eq!(records[0].level, LogLevel::Warning);
        assert_eq!(records[0].metadata, Some(meta(&[("ms", json!(812))])));
        assert_eq!(records[1].level, LogLevel::Warning);
        assert_eq!(records[1].metadata, None);
    }

    #[test]
    fn error_without_metadata_has_only_derived_keys() {
        let sink = MemorySink::new();
        let err = ErrorInfo::new("boom").with_stack("at handler (bookings.rs:10)");

        log_error(&sink, "request failed", "api", Some(&err), None).unwrap();

        let record = &sink.records()[0];
        assert_eq!(record.level, LogLevel::Error);
        assert_eq!(
            record.metadata,
            Some(meta(&[
                ("errorMessage", json!("boom")),
                ("stack", json!("at handler (bookings.rs:10)")),
            ]))
        );
    }

    #[test]
    fn error_merges_caller_metadata() {
        let sink = MemorySink::new();
        let err = ErrorInfo::new("boom").with_stack("trace");

        log_error(
            &sink,
            "request failed",
            "api",
            Some(&err),
            Some(meta(&[("userId", json!(42))])),
        )
        .unwrap();

        assert_eq!(
            sink.records()[0].metadata,
            Some(meta(&[
                ("userId", json!(42)),
                ("errorMessage", json!("boom")),
                ("stack", json!("trace")),
            ]))
        );
    }

    #[test]
    fn error_without_error_object_keeps_keys_as_null() {
        let sink = MemorySink::new();
        log_error(&sink, "failed", "api", None, Some(meta(&[("userId", json!(42))]))).unwrap();

        let metadata = sink.records()[0].metadata.clone().unwrap();
        assert_eq!(metadata.get("userId"), Some(&json!(42)));
        assert_eq!(metadata.get("errorMessage"), Some(&Value::Null));
        assert_eq!(metadata.get("stack"), Some(&Value::Null));
        assert_eq!(metadata.len(), 3);
    }

    #[test]
    fn error_fields_overwrite_colliding_caller_keys() {
        let sink = MemorySink::new();
        let err = ErrorInfo::new("real");
        let caller = meta(&[
            ("errorMessage", json!({"nested": true})),
            ("stack", json!("caller stack")),
            ("keep", json!("me")),
        ]);

        log_error(&sink, "failed", "api", Some(&err), Some(caller)).unwrap();

        let metadata = sink.records()[0].metadata.clone().unwrap();
        assert_eq!(metadata["errorMessage"], json!("real"));
        assert_eq!(metadata["stack"], Value::Null);
        assert_eq!(metadata["keep"], json!("me"));
    }

    #[test]
    fn error_accepts_std_errors() {
        let sink = MemorySink::new();
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "forbidden");

        log_error(&sink, "upload failed", "files", Some(&err), None).unwrap();

        let metadata = sink.records()[0].metadata.clone().unwrap();
        assert_eq!(metadata["errorMessage"], json!("forbidden"));
        assert_eq!(metadata["stack"], Value::Null);
    }

    #[test]
    fn identical_calls_produce_identical_records() {
        let sink = MemorySink::new();
        let err = ErrorInfo::new("boom").with_stack("trace");
        for _ in 0..2 {
            log_info(&sink, "m", "s", Some(meta(&[("k", json!(1))]))).unwrap();
            log_warning(&sink, "m", "s", None).unwrap();
            log_error(&sink, "m", "s", Some(&err), None).unwrap();
        }

        let records = sink.records();
        assert_eq!(records.len(), 6);
        assert_eq!(records[..3], records[3..]);
    }

    #[test]
    fn sink_errors_are_returned_unchanged() {
        struct Refusing;
        impl LogSink for Refusing {
            fn create_log(&self, _record: LogRecord) -> Result<(), SinkError> {
                Err("storage unavailable".into())
            }
        }

        let err = log_info(&Refusing, "m", "s", None).unwrap_err();
        assert_eq!(err.to_string(), "storage unavailable");
        let err = log_error(&Refusing, "m", "s", None, None).unwrap_err();
        assert_eq!(err.to_string(), "storage unavailable");
    }

    #[test]
    fn source_logger_binds_source() {
        let sink = Arc::new(MemorySink::new());
        let logger = SourceLogger::new(Arc::clone(&sink), "admin.organizations");

        logger.info("organization updated", None).unwrap();
        logger.warning("quota nearly reached", None).unwrap();
        logger
            .error("delete failed", Some(&ErrorInfo::new("locked")), None)
            .unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.source == "admin.organizations"));
        assert_eq!(
            records.iter().map(|r| r.level).collect::<Vec<_>>(),
            vec![LogLevel::Info, LogLevel::Warning, LogLevel::Error]
        );
    }

    #[test]
    fn works_through_trait_objects() {
        let sink: Arc<dyn LogSink> = Arc::new(MemorySink::new());
        log_info(&sink, "m", "s", None).unwrap();
        log_info(sink.as_ref(), "m", "s", None).unwrap();
    }
}
