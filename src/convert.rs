use log::debug;

use crate::authz::Authorizable;
use crate::db::types::{PackageRecord, ReleaseRecord, UserRecord};
use crate::inspect::Object;
use crate::types::model::{Model, Package, Release, User};

/// Storage representation of an API object, the form permissions are checked
/// against.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageObject {
    User(UserRecord),
    Package(PackageRecord),
    Release(ReleaseRecord),
}

impl Authorizable for StorageObject {
    fn kind(&self) -> &'static str {
        match self {
            StorageObject::User(_) => "user",
            StorageObject::Package(_) => "package",
            StorageObject::Release(_) => "release",
        }
    }

    fn id(&self) -> i64 {
        match self {
            StorageObject::User(user) => user.id,
            StorageObject::Package(package) => package.id,
            StorageObject::Release(release) => release.id,
        }
    }

    fn owner_id(&self) -> Option<i64> {
        match self {
            StorageObject::User(user) => Some(user.id),
            StorageObject::Package(package) => Some(package.owner_id),
            StorageObject::Release(_) => None,
        }
    }
}

/// Converts `object` to its storage representation. Returns `None` for plain
/// mappings, unknown models, and objects whose fields do not fit their model.
pub fn to_storage(object: &Object) -> Option<StorageObject> {
    let model = object.model()?;
    if model == User::NAME {
        decode::<User>(object).map(|user| StorageObject::User(UserRecord::from(&user)))
    } else if model == Package::NAME {
        decode::<Package>(object).map(|package| StorageObject::Package(PackageRecord::from(&package)))
    } else if model == Release::NAME {
        decode::<Release>(object).map(|release| StorageObject::Release(ReleaseRecord::from(&release)))
    } else {
        debug!("No storage representation for model {model}");
        None
    }
}

fn decode<M: Model>(object: &Object) -> Option<M> {
    match object.clone().into_model::<M>() {
        Ok(model) => Some(model),
        Err(err) => {
            debug!("Convert {} object to storage failed: {err:#}", M::NAME);
            None
        }
    }
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            admin: user.admin,
            update_time: 0,
        }
    }
}

impl From<&Package> for PackageRecord {
    fn from(package: &Package) -> Self {
        Self {
            id: package.id,
            name: package.name.clone(),
            short_description: package.short_description.clone(),
            owner_id: package.owner_id,
            update_time: 0,
        }
    }
}

impl From<&Release> for ReleaseRecord {
    fn from(release: &Release) -> Self {
        Self {
            id: release.id,
            package_id: release.package_id,
            version: release.version.clone(),
            update_time: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_to_storage() {
        let package = Package {
            id: 42,
            name: String::from("fin-utils"),
            short_description: String::from("Utilities"),
            owner_id: 7,
            owner: None,
        };
        let object = Object::from_model(&package).unwrap();
        let storage = to_storage(&object).unwrap();
        assert_eq!(storage.kind(), "package");
        assert_eq!(storage.id(), 42);
        assert_eq!(storage.owner_id(), Some(7));

        let user = Object::typed("User", json!({"id": 3, "name": "bob", "admin": false})).unwrap();
        let storage = to_storage(&user).unwrap();
        assert_eq!(storage.kind(), "user");
        assert_eq!(storage.owner_id(), Some(3));

        let release =
            Object::typed("Release", json!({"id": 5, "packageID": 42, "version": "1.0.0"}))
                .unwrap();
        let storage = to_storage(&release).unwrap();
        assert_eq!(storage.kind(), "release");
        assert_eq!(storage.owner_id(), None);
    }

    #[test]
    fn test_no_representation() {
        let mapping = Object::mapping(json!({"id": 42, "ownerID": 7})).unwrap();
        assert_eq!(to_storage(&mapping), None);

        let unknown = Object::typed("Tag", json!({"id": 1})).unwrap();
        assert_eq!(to_storage(&unknown), None);

        let broken = Object::typed("Package", json!({"id": "not a number"})).unwrap();
        assert_eq!(to_storage(&broken), None);
    }
}
