use log::{LevelFilter, Log, Metadata, Record};
use std::{
    env::{args, var},
    io::{Write, stderr},
};
use very::runtime::{
    error::{self, ErrorKind, ScriptError},
    interpreter::{CodeManagement, context::Context},
};

/// The environment variable that selects the log level.
const LOG_VARIABLE: &str = "VERY_LOG";

/// Writes log records to standard error.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(stderr(), "[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {
        let _ = stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the logger at the level named by the environment, logging is off by default.
fn init_logging() {
    let level = var(LOG_VARIABLE)
        .ok()
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Off);

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> error::Result<()> {
    init_logging();

    let arguments: Vec<String> = args().skip(1).collect();

    let [path] = arguments.as_slice() else {
        return ScriptError::new_as_result(
            ErrorKind::CommandLine,
            None,
            "Invalid command line.".to_string(),
        );
    };

    let mut context = Context::new();

    context.process_source_file(path)
}
