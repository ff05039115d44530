use std::path::PathBuf;

use anyhow::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};

use super::SqliteConnection;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SqliteConfig {
    /// Keep everything in memory. Data is lost when the process exits.
    #[serde(default)]
    pub memory: bool,

    /// Database file, supports `~` and environment variables. Defaults to
    /// `finrepo.db` under the data directory.
    #[serde(default)]
    pub path: Option<String>,

    #[serde(skip)]
    file: PathBuf,
}

impl CommonConfig for SqliteConfig {
    fn default() -> Self {
        Self {
            memory: false,
            path: None,
            file: PathBuf::new(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        if self.memory {
            return Ok(());
        }

        self.file = match self.path {
            Some(ref path) => PathBuf::from(expandenv("path", path)?),
            None => ps.data_path.join("finrepo.db"),
        };

        Ok(())
    }
}

impl SqliteConfig {
    pub fn build(&self) -> Result<SqliteConnection> {
        if self.memory {
            warn!("Using in-memory sqlite database, the data will be lost when the process exits");
            return SqliteConnection::memory();
        }

        info!("Using sqlite database: {}", self.file.display());
        SqliteConnection::open(&self.file)
    }
}
