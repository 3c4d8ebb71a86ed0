//! Log subscriber printing records with relative time stamps
pub use log::{debug, error, info, log, log_enabled, trace, warn, Level, LevelFilter};
use once_cell::sync::OnceCell;

static LOG: OnceCell<Log> = OnceCell::new();

/// Log configuration
pub struct Log {
    /// Initialization time (for relative time stamps)
    pub instant: std::time::Instant,
    /// Log level configuration for different targets, the first matching prefix wins
    pub targets: Vec<(String, LevelFilter)>,
}

/// Log subscription error
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Subscriber of this crate is already installed
    #[error("Log subscription must be initiated only once")]
    AlreadySubscribed,
    /// Another logger is installed
    #[error("Other log subscription already exists: {0}")]
    OtherLogger(#[from] log::SetLoggerError),
}

impl Default for Log {
    fn default() -> Self {
        Self {
            instant: std::time::Instant::now(),
            targets: vec![
                (String::from("winit"), LevelFilter::Warn),
                (String::from("videomodes"), LevelFilter::Info),
                (String::from(""), LevelFilter::Debug),
            ],
        }
    }
}

impl Log {
    /// Puts level filter for the target prefix in front of the others
    pub fn target(mut self, prefix: impl Into<String>, level_filter: LevelFilter) -> Self {
        self.targets.insert(0, (prefix.into(), level_filter));
        self
    }

    /// Returns level filter for the target
    pub fn level_filter(&self, target: &str) -> LevelFilter {
        self.targets
            .iter()
            .find(|(prefix, _)| prefix == "*" || target.starts_with(prefix.as_str()))
            .map(|(_, level_filter)| *level_filter)
            .unwrap_or(LevelFilter::Off)
    }

    fn max_level(&self) -> LevelFilter {
        self.targets
            .iter()
            .map(|(_, level_filter)| *level_filter)
            .max()
            .unwrap_or(LevelFilter::Off)
    }
}

impl log::Log for Log {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level().to_level_filter() <= self.level_filter(metadata.target())
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let elapsed = self.instant.elapsed().as_secs_f64();
            let level_mark = match record.level() {
                log::Level::Error => "!!",
                log::Level::Warn => "!~",
                log::Level::Info => "--",
                log::Level::Debug => "**",
                log::Level::Trace => "->",
            };
            println!(
                "{:.4} {} {} - {}",
                elapsed,
                level_mark,
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Installs the logger, fails if a logger is already installed
pub fn try_subscribe(logger: Log) -> Result<(), Error> {
    let max_level = logger.max_level();

    LOG.set(logger).map_err(|_| Error::AlreadySubscribed)?;
    if let Some(logger) = LOG.get() {
        log::set_logger(logger)?;
        log::set_max_level(max_level);
    }
    Ok(())
}

/// Installs the logger
///
/// Panics if a logger is already installed.
pub fn subscribe(logger: Log) {
    if let Err(err) = try_subscribe(logger) {
        panic!("{}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_target_wins() {
        let log = Log::default().target("videomodes::registry", LevelFilter::Trace);
        assert_eq!(log.level_filter("videomodes::registry"), LevelFilter::Trace);
        assert_eq!(log.level_filter("videomodes::output"), LevelFilter::Info);
        assert_eq!(log.level_filter("winit::platform"), LevelFilter::Warn);
        assert_eq!(log.level_filter("app"), LevelFilter::Debug);
    }

    #[test]
    fn wildcard_and_missing_targets() {
        let log = Log {
            instant: std::time::Instant::now(),
            targets: vec![(String::from("videomodes"), LevelFilter::Error)],
        };
        assert_eq!(log.level_filter("app"), LevelFilter::Off);
        assert_eq!(log.max_level(), LevelFilter::Error);

        let log = log.target("*", LevelFilter::Warn);
        assert_eq!(log.level_filter("videomodes"), LevelFilter::Warn);
        assert_eq!(log.level_filter("app"), LevelFilter::Warn);
        assert_eq!(log.max_level(), LevelFilter::Warn);
    }

    #[test]
    fn subscription_happens_once() {
        try_subscribe(Log::default()).unwrap();
        assert!(matches!(
            try_subscribe(Log::default()),
            Err(Error::AlreadySubscribed)
        ));
        info!("subscribed");
    }
}
