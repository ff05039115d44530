mod package;
mod release;
mod role;
mod user;

pub mod config;

use std::path::Path;

use anyhow::Result;
use rusqlite::Connection as RawConnection;
use rusqlite::Transaction as RawTransaction;

use crate::db::types::{
    Connection, CreatePackageParams, CreateReleaseParams, CreateUserParams, PackageRecord,
    ReleaseRecord, RoleRecord, Transaction, UserRecord,
};

/// SQLite-based storage, suitable for single-node deployments. Supports both
/// file-based and in-memory databases.
pub struct SqliteConnection {
    conn: RawConnection,
}

pub struct SqliteTransaction<'a> {
    tx: RawTransaction<'a>,
}

impl SqliteConnection {
    /// Opens a SQLite database file, creating it and its tables if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = RawConnection::open(path)?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    pub fn memory() -> Result<Self> {
        let conn = RawConnection::open_in_memory()?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    fn init_tables(conn: &RawConnection) -> Result<()> {
        user::create_table(conn)?;
        package::create_table(conn)?;
        release::create_table(conn)?;
        role::create_table(conn)?;
        Ok(())
    }
}

impl<'a> Connection<'a, SqliteTransaction<'a>> for SqliteConnection {
    fn transaction(&'a mut self) -> Result<SqliteTransaction<'a>> {
        let tx = self.conn.transaction()?;
        Ok(SqliteTransaction { tx })
    }
}

impl Transaction for SqliteTransaction<'_> {
    fn create_user(&self, params: CreateUserParams) -> Result<i64> {
        user::create(&self.tx, params)
    }

    fn get_user(&self, id: i64) -> Result<UserRecord> {
        user::get(&self.tx, id)
    }

    fn create_package(&self, params: CreatePackageParams) -> Result<i64> {
        package::create(&self.tx, params)
    }

    fn get_package(&self, id: i64) -> Result<PackageRecord> {
        package::get(&self.tx, id)
    }

    fn create_release(&self, params: CreateReleaseParams) -> Result<i64> {
        release::create(&self.tx, params)
    }

    fn get_release(&self, id: i64) -> Result<ReleaseRecord> {
        release::get(&self.tx, id)
    }

    fn create_role(&self, role: &RoleRecord) -> Result<()> {
        role::create(&self.tx, role)
    }

    fn create_user_role(&self, user_id: i64, role: &str) -> Result<()> {
        role::create_user_role(&self.tx, user_id, role)
    }

    fn list_user_roles(&self, user_id: i64) -> Result<Vec<RoleRecord>> {
        role::list_user_roles(&self.tx, user_id)
    }

    fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::db::tests::run_tests;
    use crate::db::{Database, UnionConnection};

    use super::*;

    #[test]
    fn test_memory() {
        let conn = SqliteConnection::memory().unwrap();
        let db = Database::new(UnionConnection::Sqlite(conn));

        run_tests(&db);
    }

    #[test]
    fn test_file() {
        let path = "/tmp/test_finrepo_authz.db";
        let _ = fs::remove_file(path);

        let conn = SqliteConnection::open(Path::new(path)).unwrap();
        let db = Database::new(UnionConnection::Sqlite(conn));

        run_tests(&db);

        fs::remove_file(path).unwrap();
    }
}
