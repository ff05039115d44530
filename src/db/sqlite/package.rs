use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection, Transaction};

use crate::db::types::{CreatePackageParams, PackageRecord};

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS package (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    short_description TEXT NOT NULL,
    owner_id INTEGER NOT NULL,
    update_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_package_owner_id ON package(owner_id);
"#;

pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

pub fn create(tx: &Transaction, params: CreatePackageParams) -> Result<i64> {
    let sql = r#"
    INSERT INTO package (name, short_description, owner_id, update_time)
    VALUES (?, ?, ?, ?)
    "#;
    debug!("Database create_package: {sql}, {params:?}");
    tx.execute(
        sql,
        params![
            params.name,
            params.short_description,
            params.owner_id,
            params.update_time,
        ],
    )?;
    Ok(tx.last_insert_rowid())
}

pub fn get(tx: &Transaction, id: i64) -> Result<PackageRecord> {
    let sql = r#"
    SELECT id, name, short_description, owner_id, update_time
    FROM package WHERE id = ?
    "#;
    debug!("Database get_package: {sql}, {id}");
    let mut stmt = tx.prepare(sql)?;
    let package = stmt.query_row(params![id], |row| {
        Ok(PackageRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            short_description: row.get(2)?,
            owner_id: row.get(3)?,
            update_time: row.get(4)?,
        })
    })?;
    Ok(package)
}
