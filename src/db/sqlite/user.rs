use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection, Transaction};

use crate::db::types::{CreateUserParams, UserRecord};

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS user (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    admin INTEGER NOT NULL,
    update_time INTEGER NOT NULL
);
"#;

pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

pub fn create(tx: &Transaction, params: CreateUserParams) -> Result<i64> {
    let sql = "INSERT INTO user (name, admin, update_time) VALUES (?, ?, ?)";
    debug!("Database create_user: {sql}, {params:?}");
    tx.execute(sql, params![params.name, params.admin, params.update_time])?;
    Ok(tx.last_insert_rowid())
}

pub fn get(tx: &Transaction, id: i64) -> Result<UserRecord> {
    let sql = "SELECT id, name, admin, update_time FROM user WHERE id = ?";
    debug!("Database get_user: {sql}, {id}");
    let mut stmt = tx.prepare(sql)?;
    let user = stmt.query_row(params![id], |row| {
        Ok(UserRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            admin: row.get(2)?,
            update_time: row.get(3)?,
        })
    })?;
    Ok(user)
}
