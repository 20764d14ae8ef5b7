use chrono::Utc;
use rusqlite::{params, Row};

use billbridge_core::attachment::FileAttachment;

use crate::{Db, DbError};

fn row_to_attachment(row: &Row) -> rusqlite::Result<FileAttachment> {
    Ok(FileAttachment {
        id: row.get("id")?,
        vendor_bill_id: row.get("vendor_bill_id")?,
        file_id: row.get("file_id")?,
        created_at: row.get("created_at")?,
    })
}

impl Db {
    pub fn attach_file(
        &self,
        vendor_bill_id: &str,
        file_id: &str,
    ) -> Result<FileAttachment, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO file_attachments (id, vendor_bill_id, file_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, vendor_bill_id, file_id, now],
            )?;
            let attachment = conn.query_row(
                "SELECT * FROM file_attachments WHERE id = ?1",
                params![id],
                row_to_attachment,
            )?;
            Ok(attachment)
        })
    }

    pub fn list_bill_attachments(
        &self,
        vendor_bill_id: &str,
    ) -> Result<Vec<FileAttachment>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM file_attachments WHERE vendor_bill_id = ?1
                 ORDER BY created_at DESC",
            )?;
            let attachments = stmt
                .query_map(params![vendor_bill_id], row_to_attachment)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(attachments)
        })
    }
}
