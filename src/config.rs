use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs, io};

use anyhow::{bail, Context, Result};
use clap::Args;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::authz::config::AuthzConfig;
use crate::context::AuthzContext;
use crate::db::config::DbConfig;
use crate::logs::LogsConfig;

/// Directories the process reads configuration from and keeps data in.
pub struct PathSet {
    pub config_path: PathBuf,
    pub data_path: PathBuf,
}

impl PathSet {
    pub fn new(config_path: Option<PathBuf>, data_path: Option<PathBuf>) -> Result<Self> {
        let is_root = unsafe { libc::geteuid() == 0 };

        let config_path = if let Some(path) = config_path {
            path
        } else if let Ok(path) = env::var("FINREPO_CONFIG") {
            PathBuf::from(path)
        } else if is_root {
            PathBuf::from("/etc/finrepo")
        } else {
            Self::home_dir()?.join(".config").join("finrepo")
        };

        let data_path = if let Some(path) = data_path {
            path
        } else if let Ok(path) = env::var("FINREPO_DATA") {
            PathBuf::from(path)
        } else if is_root {
            PathBuf::from("/var/lib/finrepo")
        } else {
            Self::home_dir()?.join(".local").join("share").join("finrepo")
        };

        ensure_dir_exists(&config_path)
            .with_context(|| format!("ensure config directory: {}", config_path.display()))?;
        ensure_dir_exists(&data_path)
            .with_context(|| format!("ensure data directory: {}", data_path.display()))?;

        Ok(Self {
            config_path,
            data_path,
        })
    }

    pub fn load_config<T, F>(&self, name: &str, default_func: F) -> Result<T>
    where
        T: CommonConfig + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.config_path.join(format!("{name}.toml"));
        let mut cfg: T = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s).context("parse config toml")?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("Config file for {name} not found, using defaults");
                default_func()
            }
            Err(err) => {
                return Err(err).context(format!("read config file: {}", path.display()));
            }
        };

        cfg.complete(self).context("validate config")?;
        Ok(cfg)
    }

    fn home_dir() -> Result<PathBuf> {
        match env::var_os("HOME").or_else(|| env::var_os("USERPROFILE")) {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => bail!("no home directory, use --config-path and --data-path"),
        }
    }
}

pub trait CommonConfig {
    fn default() -> Self;
    fn complete(&mut self, ps: &PathSet) -> Result<()>;
}

/// Command line flags shared by every command that needs configuration.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Config directory, default is `$FINREPO_CONFIG`, `/etc/finrepo` for root
    /// or `~/.config/finrepo`.
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Data directory, default is `$FINREPO_DATA`, `/var/lib/finrepo` for
    /// root or `~/.local/share/finrepo`.
    #[arg(long)]
    pub data_path: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn build_path_set(&self) -> Result<PathSet> {
        PathSet::new(self.config_path.clone(), self.data_path.clone())
    }

    pub fn load<T: CommonConfig + DeserializeOwned>(&self, name: &str) -> Result<T> {
        let ps = self.build_path_set()?;
        ps.load_config(name, T::default)
    }
}

/// Content of `finrepo.toml`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "DbConfig::default")]
    pub db: DbConfig,

    #[serde(default = "LogsConfig::default")]
    pub logs: LogsConfig,

    #[serde(default = "AuthzConfig::default")]
    pub authz: AuthzConfig,
}

impl CommonConfig for AppConfig {
    fn default() -> Self {
        Self {
            db: DbConfig::default(),
            logs: LogsConfig::default(),
            authz: AuthzConfig::default(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        self.db.complete(ps).context("db")?;
        self.logs.complete(ps).context("logs")?;
        self.authz.complete(ps).context("authz")?;
        Ok(())
    }
}

impl AppConfig {
    pub fn build_ctx(&self) -> Result<Arc<AuthzContext>> {
        let db = self.db.build().context("build database")?;
        let ctx = AuthzContext::build(&self.authz, Arc::new(db));
        Ok(Arc::new(ctx))
    }
}

/// See: [`shellexpand::full`].
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path_set(name: &str) -> PathSet {
        let root = env::temp_dir().join(format!("finrepo_authz_{name}"));
        let _ = fs::remove_dir_all(&root);
        PathSet::new(Some(root.join("config")), Some(root.join("data"))).unwrap()
    }

    #[test]
    fn test_load_default() {
        let ps = temp_path_set("default");
        let cfg: AppConfig = ps.load_config("finrepo", AppConfig::default).unwrap();

        assert!(!cfg.db.sqlite.memory);
        assert_eq!(cfg.authz.owner_permissions.len(), 2);
        assert!(cfg.authz.owner_permissions.contains("edit"));
        assert!(cfg.authz.default_rules.is_empty());
    }

    #[test]
    fn test_load_file() {
        let ps = temp_path_set("file");
        let content = r#"
[db.sqlite]
memory = true

[logs]
level = "debug"

[authz]
owner_permissions = ["read"]

[[authz.default_rules]]
resources = ["package", "release"]
verbs = ["read"]
"#;
        fs::write(ps.config_path.join("finrepo.toml"), content).unwrap();

        let cfg: AppConfig = ps.load_config("finrepo", AppConfig::default).unwrap();
        assert!(cfg.db.sqlite.memory);
        assert_eq!(cfg.authz.owner_permissions.len(), 1);
        assert_eq!(cfg.authz.default_rules.len(), 1);
        assert!(cfg.authz.default_rules[0].allows("release", "read"));

        let ctx = cfg.build_ctx().unwrap();
        assert!(ctx.registry().contains("Package"));
    }

    #[test]
    fn test_invalid_owner_permission() {
        let ps = temp_path_set("invalid");
        let content = r#"
[authz]
owner_permissions = ["edit package"]
"#;
        fs::write(ps.config_path.join("finrepo.toml"), content).unwrap();

        let err = ps
            .load_config("finrepo", AppConfig::default)
            .map(|_: AppConfig| ())
            .unwrap_err();
        assert!(format!("{err:#}").contains("invalid owner permission"));
    }

    #[test]
    fn test_expandenv() {
        env::set_var("FINREPO_TEST_DIR", "/srv/finrepo");
        let path = expandenv("path", "$FINREPO_TEST_DIR/finrepo.db").unwrap();
        assert_eq!(path, "/srv/finrepo/finrepo.db");
    }
}
