use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::db::types::{PackageRecord, ReleaseRecord, Transaction, UserRecord};

/// An API-facing entity that the ownership resolver can inspect and load.
///
/// Field aliases are the serde names, so `#[serde(rename = "...")]` is what
/// an owning-field path refers to. Reference fields must serialize an
/// unloaded value as `null`.
pub trait Model: Serialize + DeserializeOwned {
    /// Name used by indirect path steps, e.g. `[packageID,Package]`.
    const NAME: &'static str;

    /// Alias of the primary key field.
    const PRIMARY_KEY: &'static str = "id";

    /// Reference fields as `(alias, model name)` pairs.
    fn references() -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Loads the entity by primary key, populating its direct references.
    fn load(tx: &dyn Transaction, id: i64) -> Result<Self>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub admin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub name: String,

    #[serde(rename = "shortDescription")]
    pub short_description: String,

    #[serde(rename = "ownerID")]
    pub owner_id: i64,

    #[serde(default)]
    pub owner: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: i64,

    #[serde(rename = "packageID")]
    pub package_id: i64,

    pub version: String,

    #[serde(default)]
    pub package: Option<Package>,
}

impl Model for User {
    const NAME: &'static str = "User";

    fn load(tx: &dyn Transaction, id: i64) -> Result<Self> {
        let record = tx.get_user(id).with_context(|| format!("get user {id}"))?;
        Ok(record.into())
    }
}

impl Model for Package {
    const NAME: &'static str = "Package";

    fn references() -> &'static [(&'static str, &'static str)] {
        &[("owner", User::NAME)]
    }

    fn load(tx: &dyn Transaction, id: i64) -> Result<Self> {
        let record = tx
            .get_package(id)
            .with_context(|| format!("get package {id}"))?;
        let owner = User::load(tx, record.owner_id).context("load package owner")?;

        let mut package = Package::from(record);
        package.owner = Some(owner);
        Ok(package)
    }
}

impl Model for Release {
    const NAME: &'static str = "Release";

    fn references() -> &'static [(&'static str, &'static str)] {
        &[("package", Package::NAME)]
    }

    fn load(tx: &dyn Transaction, id: i64) -> Result<Self> {
        let record = tx
            .get_release(id)
            .with_context(|| format!("get release {id}"))?;
        let package = Package::load(tx, record.package_id).context("load release package")?;

        let mut release = Release::from(record);
        release.package = Some(package);
        Ok(release)
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            admin: record.admin,
        }
    }
}

impl From<PackageRecord> for Package {
    fn from(record: PackageRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            short_description: record.short_description,
            owner_id: record.owner_id,
            owner: None,
        }
    }
}

impl From<ReleaseRecord> for Release {
    fn from(record: ReleaseRecord) -> Self {
        Self {
            id: record.id,
            package_id: record.package_id,
            version: record.version,
            package: None,
        }
    }
}
