//! Tracing subscriber setup: console formatter, run log file, and initialisation.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level as TraceLevel;

use super::types::{EACH_TARGET, STAGE_TARGET, Verbosity};
use super::utils::{format_utc_datetime, format_utc_time, log_file_path};

/// Collects the `message` field of an event.
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn message_of(event: &tracing::Event<'_>) -> String {
    let mut extractor = MessageExtractor::default();
    event.record(&mut extractor);
    extractor.message
}

/// Diagnostic level name of an event, as recorded in the run log.
fn tag(level: TraceLevel, target: &str) -> &'static str {
    match (level, target) {
        (TraceLevel::ERROR, _) => "error",
        (TraceLevel::WARN, _) => "warn",
        (TraceLevel::INFO, STAGE_TARGET) => "stage",
        (TraceLevel::INFO, _) => "plan",
        (TraceLevel::DEBUG, EACH_TARGET) => "each",
        (TraceLevel::DEBUG, _) => "proc",
        _ => "detail",
    }
}

/// Appends every event of one run to `stowy.log`, whatever the console shows.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the run log and write a header naming the version and working
    /// directory. Returns `None` when the log cannot be written.
    pub(super) fn new() -> Option<Self> {
        let path = log_file_path()?;
        let version = option_env!("STOWY_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
        let cwd = std::env::current_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        let header = format!(
            "# stowy {version} run at {} UTC in {cwd}\n",
            format_utc_datetime()
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let line = format!(
            "{} {:<6} {}",
            format_utc_time(),
            tag(*event.metadata().level(), event.metadata().target()),
            message_of(event)
        );
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console output: stage headers stand out, everything below plan level is dimmed.
struct StowyFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for StowyFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let msg = message_of(event);
        let metadata = event.metadata();
        match tag(*metadata.level(), metadata.target()) {
            "error" => writeln!(writer, "\x1b[31mstowy: error:\x1b[0m {msg}"),
            "warn" => writeln!(writer, "\x1b[33mstowy: warning:\x1b[0m {msg}"),
            "stage" => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            "plan" => writeln!(writer, "  {msg}"),
            _ => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Install the global subscriber for one run.
///
/// The console shows what `verbosity` allows, with warnings and errors on
/// stderr. The run log at `$XDG_CACHE_HOME/stowy/stowy.log` receives every
/// event. Call once, before anything logs.
pub fn init_subscriber(verbosity: Verbosity) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let make_writer = std::io::stderr
        .with_max_level(TraceLevel::WARN)
        .and(std::io::stdout.with_min_level(TraceLevel::INFO));

    let console_layer = fmt::layer()
        .event_format(StowyFormatter)
        .with_writer(make_writer)
        .with_filter(verbosity.filter());

    let file_layer = FileLayer::new().map(|l| l.with_filter(LevelFilter::TRACE));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
