use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection, Transaction};

use crate::db::types::{CreateReleaseParams, ReleaseRecord};

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS package_release (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    package_id INTEGER NOT NULL,
    version TEXT NOT NULL,
    update_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_package_release_package_id ON package_release(package_id);
"#;

pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

pub fn create(tx: &Transaction, params: CreateReleaseParams) -> Result<i64> {
    let sql = "INSERT INTO package_release (package_id, version, update_time) VALUES (?, ?, ?)";
    debug!("Database create_release: {sql}, {params:?}");
    tx.execute(
        sql,
        params![params.package_id, params.version, params.update_time],
    )?;
    Ok(tx.last_insert_rowid())
}

pub fn get(tx: &Transaction, id: i64) -> Result<ReleaseRecord> {
    let sql = "SELECT id, package_id, version, update_time FROM package_release WHERE id = ?";
    debug!("Database get_release: {sql}, {id}");
    let mut stmt = tx.prepare(sql)?;
    let release = stmt.query_row(params![id], |row| {
        Ok(ReleaseRecord {
            id: row.get(0)?,
            package_id: row.get(1)?,
            version: row.get(2)?,
            update_time: row.get(3)?,
        })
    })?;
    Ok(release)
}
