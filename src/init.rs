use crate::backend::{make_backend, parse_dsn, BackendBuildError, DsnError};
use crate::dispatch::{ChannelSink, DispatchConfig};
use crate::env::{env_or, ConfigError, DEFAULT_DSN, LOG_SINK_DSN_ENV};
use tokio::task::JoinHandle;
use tracing::subscriber::SetGlobalDefaultError;

/// Error returned by [`init_from_env`].
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dsn(#[from] DsnError),

    #[error(transparent)]
    Backend(#[from] BackendBuildError),
}

/// Install a global `tracing` subscriber printing to stdout through the
/// `fmt` layer.
///
/// Covers both this crate's own diagnostics (dropped records, retries) and
/// records routed through [`TracingSink`](crate::tracing_sink::TracingSink).
pub fn init_stdout_tracing() -> Result<(), SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::fmt().finish();
    tracing::subscriber::set_global_default(subscriber)
}

/// Build a [`ChannelSink`] from explicit DSN and [`DispatchConfig`].
///
/// Must be called from within a tokio runtime; the delivery task is
/// spawned on it.
pub fn init_with_dsn(dsn: &str, config: DispatchConfig) -> Result<(ChannelSink, JoinHandle<()>), InitError> {
    let backend_config = parse_dsn(dsn)?;
    let backend = make_backend(&backend_config)?;
    tracing::debug!(kind = ?backend_config.kind, "log backend configured");
    Ok(ChannelSink::spawn(backend, config))
}

/// Build a [`ChannelSink`] from `LOG_SINK_DSN` (default `stdout://`) and
/// the other `LOG_SINK_*` variables.
///
/// This is the recommended entrypoint for typical services. Must be called
/// from within a tokio runtime.
pub fn init_from_env() -> Result<(ChannelSink, JoinHandle<()>), InitError> {
    let dsn = env_or(LOG_SINK_DSN_ENV, DEFAULT_DSN);
    let config = DispatchConfig::from_env()?;
    init_with_dsn(&dsn, config)
}
