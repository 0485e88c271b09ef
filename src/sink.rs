use crate::record::LogRecord;
use std::error::Error;
use std::sync::Arc;

/// Error reported by a [`LogSink`]. Passed back to callers of the emit
/// functions unchanged.
pub type SinkError = Box<dyn Error + Send + Sync>;

/// Destination for [`LogRecord`]s built by the emit functions.
///
/// Implementations own persistence or delivery (storage, console, remote
/// collector). The emit functions call `create_log` exactly once per event
/// on the caller's thread, so implementations that talk to the network
/// should hand the record off (see [`ChannelSink`](crate::dispatch::ChannelSink))
/// rather than block.
pub trait LogSink: Send + Sync {
    /// Accept a single record.
    ///
    /// **Parameters**
    /// - `record`: freshly built record; ownership moves to the sink.
    ///
    /// **Returns**
    /// - `Ok(())` if the sink accepted the record.
    /// - `Err(..)` if the sink could not accept it. The emit functions
    ///   neither wrap nor swallow this error.
    fn create_log(&self, record: LogRecord) -> Result<(), SinkError>;
}

impl<T: LogSink + ?Sized> LogSink for &T {
    fn create_log(&self, record: LogRecord) -> Result<(), SinkError> {
        (**self).create_log(record)
    }
}

impl<T: LogSink + ?Sized> LogSink for Box<T> {
    fn create_log(&self, record: LogRecord) -> Result<(), SinkError> {
        (**self).create_log(record)
    }
}

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn create_log(&self, record: LogRecord) -> Result<(), SinkError> {
        (**self).create_log(record)
    }
}
