use std::error::Error;

/// Read-only view of an error as consumed by [`log_error`](crate::emit::log_error).
///
/// Either field may be unavailable; the emitter records a missing field as
/// JSON `null` rather than failing.
pub trait ErrorFields {
    /// Human-readable message of the error.
    fn error_message(&self) -> Option<String>;

    /// Stack or cause trace of the error, if any is known.
    fn stack(&self) -> Option<String>;
}

/// Every standard error exposes its `Display` text as the message and its
/// `source()` chain as the stack.
impl<E: Error + ?Sized> ErrorFields for E {
    fn error_message(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn stack(&self) -> Option<String> {
        render_cause_chain(self)
    }
}

/// Owned error snapshot for errors that do not come as a [`std::error::Error`]
/// value, e.g. a remote error payload or a captured backtrace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: Option<String>,
    pub stack: Option<String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorInfo {
            message: Some(message.into()),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Snapshot a boxed or borrowed error trait object.
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        ErrorInfo {
            message: Some(error.to_string()),
            stack: render_cause_chain(error),
        }
    }
}

impl ErrorFields for ErrorInfo {
    fn error_message(&self) -> Option<String> {
        self.message.clone()
    }

    fn stack(&self) -> Option<String> {
        self.stack.clone()
    }
}

fn render_cause_chain<E: Error + ?Sized>(error: &E) -> Option<String> {
    let mut lines = Vec::new();
    let mut cause = error.source();
    while let Some(err) = cause {
        lines.push(format!("caused by: {}", err));
        cause = err.source();
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
