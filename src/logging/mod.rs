//! Logging infrastructure: a caller-supplied diagnostic sink plus the
//! tracing subscriber that renders it on the console and in a log file.

mod logger;
mod memory;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use memory::{LogEntry, MemoryLog};
pub use subscriber::init_subscriber;
pub use types::{EACH_TARGET, Level, Log, MAX_VERBOSITY, STAGE_TARGET, Verbosity};
