mod sqlite;

#[cfg(test)]
mod tests;

pub mod config;
pub mod types;

use std::cell::RefCell;
use std::sync::Mutex;

use anyhow::{bail, Result};
use sqlite::{SqliteConnection, SqliteTransaction};
use types::{
    Connection, CreatePackageParams, CreateReleaseParams, CreateUserParams, PackageRecord,
    ReleaseRecord, RoleRecord, Transaction, UserRecord,
};

/// Storage handle shared by every request. Each call to
/// [`Database::with_transaction`] takes the connection exclusively.
pub struct Database {
    conn: Mutex<RefCell<UnionConnection>>,
}

impl Database {
    pub fn new(conn: UnionConnection) -> Self {
        Self {
            conn: Mutex::new(RefCell::new(conn)),
        }
    }

    /// Opens an in-memory SQLite database with all tables created.
    pub fn memory() -> Result<Self> {
        let conn = SqliteConnection::memory()?;
        Ok(Self::new(UnionConnection::Sqlite(conn)))
    }

    /// Runs `f` inside a transaction. The transaction is committed when `f`
    /// succeeds and rolled back otherwise.
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn Transaction) -> Result<T>,
    {
        let conn = match self.conn.lock() {
            Ok(conn) => conn,
            Err(e) => bail!("failed to lock connection: {:#}", e),
        };
        let mut conn = conn.borrow_mut();
        let tx = conn.transaction()?;

        let result = f(&tx);

        if result.is_ok() {
            tx.commit()
        } else {
            tx.rollback()
        }?;

        result
    }
}

pub enum UnionConnection {
    Sqlite(SqliteConnection),
}

pub enum UnionTransaction<'a> {
    Sqlite(SqliteTransaction<'a>),
}

impl<'a> Connection<'a, UnionTransaction<'a>> for UnionConnection {
    fn transaction(&'a mut self) -> Result<UnionTransaction<'a>> {
        match self {
            UnionConnection::Sqlite(conn) => conn.transaction().map(UnionTransaction::Sqlite),
        }
    }
}

impl Transaction for UnionTransaction<'_> {
    fn create_user(&self, params: CreateUserParams) -> Result<i64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_user(params),
        }
    }

    fn get_user(&self, id: i64) -> Result<UserRecord> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_user(id),
        }
    }

    fn create_package(&self, params: CreatePackageParams) -> Result<i64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_package(params),
        }
    }

    fn get_package(&self, id: i64) -> Result<PackageRecord> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_package(id),
        }
    }

    fn create_release(&self, params: CreateReleaseParams) -> Result<i64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_release(params),
        }
    }

    fn get_release(&self, id: i64) -> Result<ReleaseRecord> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_release(id),
        }
    }

    fn create_role(&self, role: &RoleRecord) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_role(role),
        }
    }

    fn create_user_role(&self, user_id: i64, role: &str) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_user_role(user_id, role),
        }
    }

    fn list_user_roles(&self, user_id: i64) -> Result<Vec<RoleRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_user_roles(user_id),
        }
    }

    fn commit(self) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.commit(),
        }
    }

    fn rollback(self) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.rollback(),
        }
    }
}
