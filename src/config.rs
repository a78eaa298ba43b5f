//! Start-up configuration.
//!
//! Built from command-line flags, with `MEPA_STEP_LIMIT` and `MEPA_LOG` as
//! environment fallbacks. Flags win over the environment.

use crate::utils::log::{self, Level};
use mepa_derive::Error;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

pub const STEP_LIMIT_ENV: &str = "MEPA_STEP_LIMIT";
pub const LOG_LEVEL_ENV: &str = "MEPA_LOG";
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("{flag} requires an argument")]
    MissingValue { flag: String },

    #[error("invalid value '{value}' for {flag}")]
    InvalidValue { flag: String, value: String },

    #[error("unexpected argument: {arg}")]
    UnexpectedArgument { arg: String },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Source file loaded before the first prompt.
    pub file: Option<PathBuf>,
    /// Ceiling on executed instructions per `RUN`.
    pub step_limit: Option<u64>,
    /// Lines shown per `LIST` page.
    pub page_size: usize,
    pub log_level: Level,
    pub show_timestamp: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: None,
            step_limit: None,
            page_size: DEFAULT_PAGE_SIZE,
            log_level: Level::Info,
            show_timestamp: true,
        }
    }
}

fn parse_step_limit(flag: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

fn parse_page_size(flag: &str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            flag: flag.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_level(flag: &str, value: &str) -> Result<Level, ConfigError> {
    value.parse().map_err(|value| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value,
    })
}

impl Config {
    /// Builds a configuration from arguments (program name excluded) and an
    /// environment lookup.
    pub fn from_args<F>(args: &[String], env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = env(STEP_LIMIT_ENV) {
            config.step_limit = Some(parse_step_limit(STEP_LIMIT_ENV, &value)?);
        }
        if let Some(value) = env(LOG_LEVEL_ENV) {
            config.log_level = parse_level(LOG_LEVEL_ENV, &value)?;
        }

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                flag @ ("--file" | "-f") => {
                    config.file = Some(PathBuf::from(value_of(args, i, flag)?));
                    i += 2;
                }
                flag @ "--step-limit" => {
                    config.step_limit = Some(parse_step_limit(flag, value_of(args, i, flag)?)?);
                    i += 2;
                }
                flag @ "--page-size" => {
                    config.page_size = parse_page_size(flag, value_of(args, i, flag)?)?;
                    i += 2;
                }
                flag @ "--log-level" => {
                    config.log_level = parse_level(flag, value_of(args, i, flag)?)?;
                    i += 2;
                }
                "--no-timestamp" => {
                    config.show_timestamp = false;
                    i += 1;
                }
                other if !other.starts_with('-') && config.file.is_none() => {
                    config.file = Some(PathBuf::from(other));
                    i += 1;
                }
                other => {
                    return Err(ConfigError::UnexpectedArgument {
                        arg: other.to_string(),
                    });
                }
            }
        }

        Ok(config)
    }

    /// Applies the logging settings process-wide.
    pub fn apply_logging(&self) {
        log::set_level(self.log_level);
        log::SHOW_TIMESTAMP.store(self.show_timestamp, Ordering::Relaxed);
    }
}

fn value_of<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, ConfigError> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingValue {
            flag: flag.to_string(),
        })
}
