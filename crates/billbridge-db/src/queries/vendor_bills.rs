use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use billbridge_core::vendor_bill::{CreateVendorBill, UpdateVendorBill, VendorBill};

use crate::{Db, DbError};

fn row_to_vendor_bill(row: &Row) -> rusqlite::Result<VendorBill> {
    Ok(VendorBill {
        id: row.get("id")?,
        bill_number: row.get("bill_number")?,
        vendor_name: row.get("vendor_name")?,
        work_order_number: row.get("work_order_number")?,
        memo: row.get("memo")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl Db {
    pub fn create_vendor_bill(&self, input: &CreateVendorBill) -> Result<VendorBill, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO vendor_bills
                     (id, bill_number, vendor_name, work_order_number, memo, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    input.bill_number,
                    input.vendor_name,
                    input.work_order_number,
                    input.memo,
                    now,
                    now
                ],
            )?;
            let bill = conn.query_row(
                "SELECT * FROM vendor_bills WHERE id = ?1",
                params![id],
                row_to_vendor_bill,
            )?;
            Ok(bill)
        })
    }

    pub fn get_vendor_bill(&self, id: &str) -> Result<VendorBill, DbError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM vendor_bills WHERE id = ?1",
                params![id],
                row_to_vendor_bill,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    DbError::NotFound(format!("vendor bill {id}"))
                }
                other => DbError::Sqlite(other),
            })
        })
    }

    /// Bounded lookup on the work-order business key: first matching row in
    /// store order, no explicit sort. Multiplicity is not detected.
    pub fn find_vendor_bill_id_by_work_order(
        &self,
        work_order_number: &str,
    ) -> Result<Option<String>, DbError> {
        self.with_conn(|conn| {
            let id = conn
                .query_row(
                    "SELECT id FROM vendor_bills WHERE work_order_number = ?1 LIMIT 1",
                    params![work_order_number],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(id)
        })
    }

    pub fn list_vendor_bills_by_work_order(
        &self,
        work_order_number: &str,
    ) -> Result<Vec<VendorBill>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM vendor_bills WHERE work_order_number = ?1")?;
            let bills = stmt
                .query_map(params![work_order_number], row_to_vendor_bill)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(bills)
        })
    }

    pub fn list_vendor_bills(&self) -> Result<Vec<VendorBill>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM vendor_bills ORDER BY created_at DESC")?;
            let bills = stmt
                .query_map([], row_to_vendor_bill)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(bills)
        })
    }

    pub fn update_vendor_bill(
        &self,
        id: &str,
        update: &UpdateVendorBill,
    ) -> Result<VendorBill, DbError> {
        let mut bill = self.get_vendor_bill(id)?;
        if let Some(vendor_name) = &update.vendor_name {
            bill.vendor_name = vendor_name.clone();
        }
        if let Some(work_order_number) = &update.work_order_number {
            bill.work_order_number = work_order_number.clone();
        }
        if let Some(memo) = &update.memo {
            bill.memo = memo.clone();
        }
        self.save_vendor_bill(&bill)
    }

    /// Persist a loaded record handle, refreshing `updated_at`.
    pub fn save_vendor_bill(&self, bill: &VendorBill) -> Result<VendorBill, DbError> {
        self.with_conn(|conn| {
            let now = Utc::now();
            let changed = conn.execute(
                "UPDATE vendor_bills
                 SET bill_number = ?2, vendor_name = ?3, work_order_number = ?4,
                     memo = ?5, updated_at = ?6
                 WHERE id = ?1",
                params![
                    bill.id,
                    bill.bill_number,
                    bill.vendor_name,
                    bill.work_order_number,
                    bill.memo,
                    now
                ],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("vendor bill {}", bill.id)));
            }
            let bill = conn.query_row(
                "SELECT * FROM vendor_bills WHERE id = ?1",
                params![bill.id],
                row_to_vendor_bill,
            )?;
            Ok(bill)
        })
    }
}
