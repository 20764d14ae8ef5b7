use rusqlite::Connection;

use crate::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS vendor_bills (
            id                TEXT PRIMARY KEY,
            bill_number       TEXT NOT NULL,
            vendor_name       TEXT NOT NULL,
            work_order_number TEXT NOT NULL DEFAULT '',
            memo              TEXT NOT NULL DEFAULT '',
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_vendor_bills_work_order
            ON vendor_bills(work_order_number);

        CREATE TABLE IF NOT EXISTS files (
            id          TEXT PRIMARY KEY,
            filename    TEXT NOT NULL,
            store_key   TEXT NOT NULL,
            size_bytes  INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL
        );

        -- Generic attachment relation. No uniqueness on (vendor_bill_id,
        -- file_id): re-attaching the same file records a second relation.
        CREATE TABLE IF NOT EXISTS file_attachments (
            id              TEXT PRIMARY KEY,
            vendor_bill_id  TEXT NOT NULL REFERENCES vendor_bills(id) ON DELETE CASCADE,
            file_id         TEXT NOT NULL REFERENCES files(id) ON DELETE CASCADE,
            created_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_file_attachments_bill
            ON file_attachments(vendor_bill_id);
        ",
    )?;
    Ok(())
}
