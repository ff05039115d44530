use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{CommonConfig, PathSet};

use super::sqlite::config::SqliteConfig;
use super::{Database, UnionConnection};

/// Database configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DbConfig {
    /// Database type to use
    #[serde(default = "DbConfig::default_name")]
    pub name: DbType,

    /// SQLite configuration, only valid when database type is sqlite
    #[serde(default = "SqliteConfig::default")]
    pub sqlite: SqliteConfig,
}

/// Database type
#[derive(Debug, Deserialize, Serialize, Clone)]
pub enum DbType {
    /// Use SQLite database
    #[serde(rename = "sqlite")]
    Sqlite,
}

impl CommonConfig for DbConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            sqlite: SqliteConfig::default(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        self.sqlite.complete(ps).context("sqlite")?;
        Ok(())
    }
}

impl DbConfig {
    pub fn build(&self) -> Result<Database> {
        let conn = match self.name {
            DbType::Sqlite => UnionConnection::Sqlite(self.sqlite.build()?),
        };
        Ok(Database::new(conn))
    }

    fn default_name() -> DbType {
        DbType::Sqlite
    }
}
