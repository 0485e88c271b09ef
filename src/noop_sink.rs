use crate::record::LogRecord;
use crate::sink::{LogSink, SinkError};

/// A sink that simply drops all records.
///
/// Useful for measuring the cost of building records without any
/// delivery, and for wiring where logging is switched off.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn create_log(&self, _record: LogRecord) -> Result<(), SinkError> {
        Ok(())
    }
}
