//! Logger that forwards diagnostics to the global `tracing` subscriber.
use super::types::{EACH_TARGET, Level, Log, STAGE_TARGET};

/// Production logger.
///
/// Filtering by verbosity happens in the subscriber installed by
/// [`init_subscriber`](super::init_subscriber); this type only maps each
/// [`Level`] to a tracing level and target.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

impl Logger {
    /// Create a new logger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Log for Logger {
    fn log(&self, level: Level, msg: &str) {
        match level {
            Level::Error => tracing::error!("{msg}"),
            Level::Warn => tracing::warn!("{msg}"),
            Level::Links => tracing::info!(target: STAGE_TARGET, "{msg}"),
            Level::Plan => tracing::info!("{msg}"),
            Level::EachStow => tracing::debug!(target: EACH_TARGET, "{msg}"),
            Level::StowProcess => tracing::debug!("{msg}"),
            Level::Details => tracing::trace!("{msg}"),
        }
    }
}
