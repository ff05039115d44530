use std::io::{self, IsTerminal};
use std::time::SystemTime;

use anyhow::{Context, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::config::{CommonConfig, PathSet};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogsConfig {
    #[serde(default = "LogLevel::default")]
    pub level: LogLevel,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
pub enum LogLevel {
    #[serde(rename = "error")]
    Error,

    #[serde(rename = "warn")]
    Warn,

    #[serde(rename = "info")]
    #[default]
    Info,

    #[serde(rename = "debug")]
    Debug,
}

impl CommonConfig for LogsConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
        }
    }

    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        Ok(())
    }
}

impl LogsConfig {
    /// Installs the global logger. Colors are only used when stderr is a
    /// terminal.
    pub fn init(&self) -> Result<()> {
        let level = match self.level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        };

        let is_terminal = io::stderr().is_terminal();
        let colors = ColoredLevelConfig::new()
            .info(Color::Green)
            .debug(Color::Magenta);

        fern::Dispatch::new()
            .format(move |out, message, record| {
                let now = humantime::format_rfc3339_millis(SystemTime::now());
                if is_terminal {
                    out.finish(format_args!(
                        "{now} [{}] {message}",
                        colors.color(record.level())
                    ))
                } else {
                    out.finish(format_args!("{now} [{}] {message}", record.level()))
                }
            })
            .level(level)
            .chain(io::stderr())
            .apply()
            .context("init logger")?;

        Ok(())
    }
}
