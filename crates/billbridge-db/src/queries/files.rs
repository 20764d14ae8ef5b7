use chrono::Utc;
use rusqlite::{params, Row};

use billbridge_core::stored_file::StoredFile;

use crate::{Db, DbError};

fn row_to_file(row: &Row) -> rusqlite::Result<StoredFile> {
    Ok(StoredFile {
        id: row.get("id")?,
        filename: row.get("filename")?,
        store_key: row.get("store_key")?,
        size_bytes: row.get("size_bytes")?,
        created_at: row.get("created_at")?,
    })
}

impl Db {
    pub fn create_file(
        &self,
        id: &str,
        filename: &str,
        store_key: &str,
        size_bytes: i64,
    ) -> Result<StoredFile, DbError> {
        self.with_conn(|conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO files (id, filename, store_key, size_bytes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, filename, store_key, size_bytes, now],
            )?;
            let file = conn.query_row(
                "SELECT * FROM files WHERE id = ?1",
                params![id],
                row_to_file,
            )?;
            Ok(file)
        })
    }

    pub fn get_file(&self, id: &str) -> Result<StoredFile, DbError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM files WHERE id = ?1",
                params![id],
                row_to_file,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("file {id}")),
                other => DbError::Sqlite(other),
            })
        })
    }
}
