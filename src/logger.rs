use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::sync::OnceLock;

/// Writes log records to stderr as `<label>: <message>`, with the
/// emitting module added at debug and trace level.
#[derive(Debug)]
pub struct Logger {
    max_level: Level,
}

impl Logger {
    pub fn new(max_level: Level) -> Self {
        Self { max_level }
    }

    fn format(record: &Record) -> String {
        let label = match record.level() {
            Level::Error => "error",
            Level::Warn => "warning",
            Level::Info => "note",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };

        if record.level() >= Level::Debug {
            format!("{label} [{}]: {}", record.target(), record.args())
        } else {
            format!("{label}: {}", record.args())
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
            && (metadata.level() <= Level::Info
                || metadata.target().starts_with(env!("CARGO_CRATE_NAME")))
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", Self::format(record));
        }
    }

    fn flush(&self) {}
}

/// Maps the number of `-v` flags to the most verbose level shown.
/// Warnings are always shown.
pub fn level_from_verbosity(count: u8) -> Result<Level, String> {
    match count {
        0 => Ok(Level::Warn),
        1 => Ok(Level::Info),
        2 => Ok(Level::Debug),
        3 => Ok(Level::Trace),
        _ => Err("too many occurrences of --verbose/-v".to_string()),
    }
}

pub fn init(max_level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();
    let logger: &'static Logger =
        LOGGER.get_or_init(|| Logger::new(max_level));

    log::set_logger(logger)
        .map(|()| log::set_max_level(LevelFilter::Trace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn level_from_verbosity_handles_all_counts() {
        #[rustfmt::skip]
        let table = &[
            (0, Ok(Level::Warn)),
            (1, Ok(Level::Info)),
            (2, Ok(Level::Debug)),
            (3, Ok(Level::Trace)),
            (4, Err("too many occurrences of --verbose/-v".to_string())),
        ];

        for (count, expected) in table.iter() {
            assert_eq!(level_from_verbosity(*count), *expected);
        }
    }

    #[test]
    fn enabled_respects_max_level() {
        let logger = Logger::new(Level::Warn);
        let metadata = |level| {
            Metadata::builder().level(level).target("senmon").build()
        };

        assert!(logger.enabled(&metadata(Level::Error)));
        assert!(logger.enabled(&metadata(Level::Warn)));
        assert!(!logger.enabled(&metadata(Level::Info)));
    }

    #[test]
    fn enabled_hides_debug_output_of_dependencies() {
        let logger = Logger::new(Level::Trace);
        let metadata = |level, target: &'static str| {
            Metadata::builder().level(level).target(target).build()
        };

        assert!(
            logger.enabled(&metadata(Level::Debug, "senmon::server"))
        );
        assert!(
            !logger.enabled(&metadata(Level::Debug, "ureq::unversioned"))
        );
        assert!(logger.enabled(&metadata(Level::Info, "ureq")));
    }

    #[test]
    fn format_adds_target_only_when_verbose() {
        let warn = Logger::format(
            &Record::builder()
                .level(Level::Warn)
                .target("senmon::main")
                .args(format_args!("no key"))
                .build(),
        );
        let debug = Logger::format(
            &Record::builder()
                .level(Level::Debug)
                .target("senmon::server")
                .args(format_args!("POST /"))
                .build(),
        );

        assert_eq!(warn, "warning: no key");
        assert_eq!(debug, "debug [senmon::server]: POST /");
    }
}
