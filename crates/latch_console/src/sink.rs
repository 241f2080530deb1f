// sink.rs - Host side of the injected console

use crate::ConsoleConfig;
use owo_colors::OwoColorize;
use std::cell::RefCell;
use std::io::Write;

/// Console method that produced a line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    Log,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Map the code passed by the script side; unknown codes log.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Level::Info,
            2 => Level::Warn,
            3 => Level::Error,
            _ => Level::Log,
        }
    }

    pub fn is_diagnostic(self) -> bool {
        matches!(self, Level::Warn | Level::Error)
    }
}

pub(crate) struct Sink {
    config: ConsoleConfig,
    stdout: RefCell<Box<dyn Write>>,
    stderr: RefCell<Box<dyn Write>>,
}

impl Sink {
    pub fn new(config: ConsoleConfig, stdout: Box<dyn Write>, stderr: Box<dyn Write>) -> Self {
        Self {
            config,
            stdout: RefCell::new(stdout),
            stderr: RefCell::new(stderr),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn write(&self, level: Level, location: &str, message: &str) {
        let body = if location.is_empty() {
            message.to_string()
        } else {
            format!("[{location}] {message}")
        };

        let body = match level {
            Level::Warn if self.config.colorize => body.yellow().to_string(),
            Level::Error if self.config.colorize => body.red().to_string(),
            _ => body,
        };

        let target = if level.is_diagnostic() {
            &self.stderr
        } else {
            &self.stdout
        };

        let mut out = target.borrow_mut();
        let written = writeln!(out, "{}{}", self.config.prefix, body).and_then(|_| out.flush());
        if let Err(err) = written {
            tracing::warn!(%err, ?level, "console write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_levels() {
        assert_eq!(Level::from_code(0), Level::Log);
        assert_eq!(Level::from_code(1), Level::Info);
        assert_eq!(Level::from_code(2), Level::Warn);
        assert_eq!(Level::from_code(3), Level::Error);
        assert_eq!(Level::from_code(99), Level::Log);
        assert!(Level::Error.is_diagnostic());
        assert!(!Level::Info.is_diagnostic());
    }
}
