// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value settings operations.

use escrowd_core::EscrowdError;
use rusqlite::params;

use crate::database::Database;

/// Get a setting value by key.
pub async fn get_value(db: &Database, key: &str) -> Result<Option<String>, EscrowdError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            );
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set a setting value, inserting or overwriting.
pub async fn set_value(db: &Database, key: &str, value: &str) -> Result<(), EscrowdError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2) \
                 ON CONFLICT(key) DO UPDATE SET \
                 value = excluded.value, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
