//! Tracing bootstrap, run once at process start

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Logging settings resolved from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Level used when `RUST_LOG` is unset
    pub level: Level,

    /// Prefix events with their module path
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            with_target: false,
        }
    }
}

impl LogConfig {
    /// `-v` enables debug, `-vv` trace
    pub fn from_verbosity(verbose: u8) -> Self {
        let level = match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            with_target: verbose > 1,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_ascii_lowercase()))
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean.
pub fn init_tracing(config: &LogConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.with_target)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(1).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(5).level, Level::TRACE);
        assert!(LogConfig::from_verbosity(2).with_target);
        assert_eq!(LogConfig::default(), LogConfig::from_verbosity(0));
    }
}
