//! stderr logging
//!
//! Everything goes to stderr so that stdout only ever carries command output.
//! Debug records are written bare because they carry the request trace
//! (`>>> GET ...`, `<<< 200 (N bytes)`); warnings and errors get a level tag.

use fern::Dispatch;
use fern::colors::Color::{Blue, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use log::{Level, LevelFilter, SetLoggerError};
use std::io::stderr;

/// Level for this crate's own records.
pub fn level_for(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Install the global logger. Fails if a logger is already installed.
pub fn init(debug: bool) -> Result<(), SetLoggerError> {
    let colors = ColoredLevelConfig::new()
        .debug(Blue)
        .warn(Yellow)
        .error(Red);
    let use_colors = atty::is(atty::Stream::Stderr);

    Dispatch::new()
        .level(level_for(debug))
        // HTTP internals stay quiet even with --debug
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper", LevelFilter::Warn)
        .format(move |out, message, record| match record.level() {
            Level::Debug | Level::Trace | Level::Info => out.finish(format_args!("{}", message)),
            level if use_colors => {
                out.finish(format_args!("[{}] {}", colors.color(level), message))
            }
            level => out.finish(format_args!("[{}] {}", level, message)),
        })
        .chain(stderr())
        .apply()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Warn);
    }

    #[test]
    fn test_second_init_is_rejected() {
        // The first call may already have happened in another test thread.
        let _ = init(false);
        assert!(init(true).is_err());
    }
}
