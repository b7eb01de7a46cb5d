//! Core logging types: diagnostic levels, verbosity, and the [`Log`] trait.
use tracing_subscriber::filter::{LevelFilter, Targets};

/// Tracing target for stage headers ("Planning stow").
pub const STAGE_TARGET: &str = "stowy::stage";
/// Tracing target for per-package progress ("running hook ...").
pub const EACH_TARGET: &str = "stowy::each";

/// Highest supported verbosity; larger values are clamped.
pub const MAX_VERBOSITY: u8 = 5;

/// Diagnostic levels, ordered from most to least severe.
///
/// Each level becomes visible at one verbosity step, mirroring the levels
/// that `stow -v` itself uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Always shown.
    Error,
    /// Always shown.
    Warn,
    /// Shown from verbosity 1: planning stages.
    Links,
    /// Shown from verbosity 2: hook batches and per-target invocations.
    Plan,
    /// Shown from verbosity 3: each hook statement and package.
    EachStow,
    /// Shown from verbosity 4: ownership and command details.
    StowProcess,
    /// Shown at verbosity 5: everything else.
    Details,
}

impl Level {
    /// The lowest verbosity at which this level is displayed.
    #[must_use]
    pub const fn min_verbosity(self) -> u8 {
        match self {
            Self::Error | Self::Warn => 0,
            Self::Links => 1,
            Self::Plan => 2,
            Self::EachStow => 3,
            Self::StowProcess => 4,
            Self::Details => 5,
        }
    }
}

/// Verbosity count from the command line, clamped to [`MAX_VERBOSITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Verbosity(u8);

impl Verbosity {
    /// Clamp a raw `-v` count.
    #[must_use]
    pub fn new(count: u8) -> Self {
        Self(count.min(MAX_VERBOSITY))
    }

    /// The clamped count.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether messages at `level` are displayed at this verbosity.
    #[must_use]
    pub const fn shows(self, level: Level) -> bool {
        self.0 >= level.min_verbosity()
    }

    /// Console filter matching this verbosity.
    #[must_use]
    pub fn filter(self) -> Targets {
        match self.0 {
            0 => Targets::new().with_default(LevelFilter::WARN),
            1 => Targets::new()
                .with_target(STAGE_TARGET, LevelFilter::INFO)
                .with_default(LevelFilter::WARN),
            2 => Targets::new().with_default(LevelFilter::INFO),
            3 => Targets::new()
                .with_target(EACH_TARGET, LevelFilter::DEBUG)
                .with_default(LevelFilter::INFO),
            4 => Targets::new().with_default(LevelFilter::DEBUG),
            _ => Targets::new().with_default(LevelFilter::TRACE),
        }
    }
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::Logger) forwards to `tracing`;
/// [`MemoryLog`](super::MemoryLog) keeps entries in memory so callers can
/// assert on what a run reported.
pub trait Log: Send + Sync {
    /// Log a message at an explicit level.
    fn log(&self, level: Level, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str) {
        self.log(Level::Error, msg);
    }
    /// Log a warning message.
    fn warn(&self, msg: &str) {
        self.log(Level::Warn, msg);
    }
    /// Log a stage header (major section).
    fn stage(&self, msg: &str) {
        self.log(Level::Links, msg);
    }
    /// Log an informational message.
    fn info(&self, msg: &str) {
        self.log(Level::Plan, msg);
    }
    /// Log per-package progress.
    fn debug(&self, msg: &str) {
        self.log(Level::EachStow, msg);
    }
    /// Log process-level details.
    fn detail(&self, msg: &str) {
        self.log(Level::StowProcess, msg);
    }
    /// Log the most verbose diagnostics.
    fn trace(&self, msg: &str) {
        self.log(Level::Details, msg);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_clamps_at_maximum() {
        assert_eq!(Verbosity::new(9).get(), MAX_VERBOSITY);
        assert_eq!(Verbosity::new(3).get(), 3);
    }

    #[test]
    fn quiet_shows_only_warnings_and_errors() {
        let v = Verbosity::new(0);
        assert!(v.shows(Level::Error));
        assert!(v.shows(Level::Warn));
        assert!(!v.shows(Level::Links));
    }

    #[test]
    fn each_step_reveals_one_level() {
        let levels = [
            Level::Links,
            Level::Plan,
            Level::EachStow,
            Level::StowProcess,
            Level::Details,
        ];
        for (i, level) in levels.iter().enumerate() {
            let step = u8::try_from(i).unwrap() + 1;
            assert!(Verbosity::new(step).shows(*level));
            assert!(!Verbosity::new(step - 1).shows(*level));
        }
    }

    #[test]
    fn filter_at_one_enables_only_stage_info() {
        let filter = Verbosity::new(1).filter();
        assert!(filter.would_enable(STAGE_TARGET, &tracing::Level::INFO));
        assert!(!filter.would_enable("stowy", &tracing::Level::INFO));
        assert!(filter.would_enable("stowy", &tracing::Level::WARN));
    }

    #[test]
    fn filter_at_three_enables_each_debug_only() {
        let filter = Verbosity::new(3).filter();
        assert!(filter.would_enable(EACH_TARGET, &tracing::Level::DEBUG));
        assert!(!filter.would_enable("stowy", &tracing::Level::DEBUG));
    }

    #[test]
    fn filter_at_max_enables_trace() {
        let filter = Verbosity::new(5).filter();
        assert!(filter.would_enable("stowy", &tracing::Level::TRACE));
    }
}
