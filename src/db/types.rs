use anyhow::Result;

use crate::types::role::RoleRule;

pub trait Connection<'a, T>
where
    T: Transaction + 'a,
{
    fn transaction(&'a mut self) -> Result<T>;
}

/// Storage operations needed by the authorization engine. Every `get_*` is a
/// point lookup by primary key and fails when the row does not exist.
pub trait Transaction {
    fn create_user(&self, params: CreateUserParams) -> Result<i64>;
    fn get_user(&self, id: i64) -> Result<UserRecord>;

    fn create_package(&self, params: CreatePackageParams) -> Result<i64>;
    fn get_package(&self, id: i64) -> Result<PackageRecord>;

    fn create_release(&self, params: CreateReleaseParams) -> Result<i64>;
    fn get_release(&self, id: i64) -> Result<ReleaseRecord>;

    fn create_role(&self, role: &RoleRecord) -> Result<()>;
    fn create_user_role(&self, user_id: i64, role: &str) -> Result<()>;
    fn list_user_roles(&self, user_id: i64) -> Result<Vec<RoleRecord>>;

    fn commit(self) -> Result<()>;
    fn rollback(self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct CreateUserParams {
    pub name: String,
    pub admin: bool,
    pub update_time: u64,
}

#[derive(Debug, Default)]
pub struct CreatePackageParams {
    pub name: String,
    pub short_description: String,
    pub owner_id: i64,
    pub update_time: u64,
}

#[derive(Debug, Default)]
pub struct CreateReleaseParams {
    pub package_id: i64,
    pub version: String,
    pub update_time: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub admin: bool,
    pub update_time: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageRecord {
    pub id: i64,
    pub name: String,
    pub short_description: String,
    pub owner_id: i64,
    pub update_time: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseRecord {
    pub id: i64,
    pub package_id: i64,
    pub version: String,
    pub update_time: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleRecord {
    pub name: String,
    pub rules: Vec<RoleRule>,
    pub update_time: u64,
}
