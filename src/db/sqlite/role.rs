use anyhow::{Context, Result};
use log::debug;
use rusqlite::{params, Connection, Row, Transaction};

use crate::db::types::RoleRecord;
use crate::types::role::RoleRule;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS role (
    name TEXT PRIMARY KEY NOT NULL,
    rules TEXT NOT NULL,
    update_time INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS user_role (
    user_id INTEGER NOT NULL,
    role_name TEXT NOT NULL,
    PRIMARY KEY (user_id, role_name)
);
"#;

pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

pub fn create(tx: &Transaction, role: &RoleRecord) -> Result<()> {
    let sql = "INSERT INTO role (name, rules, update_time) VALUES (?, ?, ?)";
    let rules = serde_json::to_string(&role.rules).context("encode role rules")?;
    debug!("Database create_role: {sql}, {}, {rules}", role.name);
    tx.execute(sql, params![role.name, rules, role.update_time])?;
    Ok(())
}

pub fn create_user_role(tx: &Transaction, user_id: i64, role: &str) -> Result<()> {
    let sql = "INSERT INTO user_role (user_id, role_name) VALUES (?, ?)";
    debug!("Database create_user_role: {sql}, {user_id}, {role}");
    tx.execute(sql, params![user_id, role])?;
    Ok(())
}

pub fn list_user_roles(tx: &Transaction, user_id: i64) -> Result<Vec<RoleRecord>> {
    let sql = r#"
    SELECT r.name, r.rules, r.update_time
    FROM role r JOIN user_role ur ON r.name = ur.role_name
    WHERE ur.user_id = ?
    ORDER BY r.name
    "#;
    debug!("Database list_user_roles: {sql}, {user_id}");
    let mut stmt = tx.prepare(sql)?;
    let rows = stmt
        .query_map(params![user_id], read_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(name, rules, update_time)| convert_record(name, rules, update_time))
        .collect()
}

fn read_row(row: &Row) -> rusqlite::Result<(String, String, u64)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn convert_record(name: String, rules: String, update_time: u64) -> Result<RoleRecord> {
    let rules: Vec<RoleRule> = serde_json::from_str(&rules)
        .with_context(|| format!("decode rules of role '{name}'"))?;
    Ok(RoleRecord {
        name,
        rules,
        update_time,
    })
}
