use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;

use billbridge_core::attachment::FileAttachment;
use billbridge_core::stored_file::{CreateStoredFile, StoredFile};
use billbridge_core::vendor_bill::{CreateVendorBill, UpdateVendorBill, VendorBill};
use billbridge_db::Db;
use billbridge_store::{file_content_key, ObjectStore};

use crate::{FileCabinet, RecordSearch, RecordStore, ServiceError};

/// Local implementation backed by the embedded SQLite ledger and a blob
/// store for file content.
pub struct LocalService {
    db: Db,
    store: Arc<dyn ObjectStore>,
}

impl LocalService {
    pub fn new(db: Db, store: Arc<dyn ObjectStore>) -> Self {
        Self { db, store }
    }
}

impl From<billbridge_db::DbError> for ServiceError {
    fn from(e: billbridge_db::DbError) -> Self {
        match e {
            billbridge_db::DbError::NotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<billbridge_store::StoreError> for ServiceError {
    fn from(e: billbridge_store::StoreError) -> Self {
        match e {
            billbridge_store::StoreError::NotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

#[async_trait]
impl RecordStore for LocalService {
    async fn create_vendor_bill(
        &self,
        input: &CreateVendorBill,
    ) -> Result<VendorBill, ServiceError> {
        Ok(self.db.create_vendor_bill(input)?)
    }

    async fn load_vendor_bill(&self, id: &str) -> Result<VendorBill, ServiceError> {
        Ok(self.db.get_vendor_bill(id)?)
    }

    async fn update_vendor_bill(
        &self,
        id: &str,
        update: &UpdateVendorBill,
    ) -> Result<VendorBill, ServiceError> {
        Ok(self.db.update_vendor_bill(id, update)?)
    }

    async fn save_vendor_bill(&self, bill: &VendorBill) -> Result<VendorBill, ServiceError> {
        Ok(self.db.save_vendor_bill(bill)?)
    }

    async fn list_vendor_bills(&self) -> Result<Vec<VendorBill>, ServiceError> {
        Ok(self.db.list_vendor_bills()?)
    }

    async fn attach_file(
        &self,
        vendor_bill_id: &str,
        file_id: &str,
    ) -> Result<FileAttachment, ServiceError> {
        Ok(self.db.attach_file(vendor_bill_id, file_id)?)
    }

    async fn list_attachments(
        &self,
        vendor_bill_id: &str,
    ) -> Result<Vec<FileAttachment>, ServiceError> {
        Ok(self.db.list_bill_attachments(vendor_bill_id)?)
    }
}

#[async_trait]
impl RecordSearch for LocalService {
    async fn find_vendor_bill_by_work_order(
        &self,
        work_order_number: &str,
    ) -> Result<Option<String>, ServiceError> {
        Ok(self.db.find_vendor_bill_id_by_work_order(work_order_number)?)
    }

    async fn search_vendor_bills(
        &self,
        work_order_number: &str,
    ) -> Result<Vec<VendorBill>, ServiceError> {
        Ok(self.db.list_vendor_bills_by_work_order(work_order_number)?)
    }
}

#[async_trait]
impl FileCabinet for LocalService {
    async fn register_file(&self, input: &CreateStoredFile) -> Result<StoredFile, ServiceError> {
        let content = BASE64
            .decode(&input.content_base64)
            .map_err(|e| ServiceError::InvalidInput(format!("invalid base64 content: {e}")))?;

        let id = uuid::Uuid::new_v4().to_string();
        let key = file_content_key(&id, &input.filename);
        let size = content.len() as i64;
        self.store.put(&key, Bytes::from(content)).await?;
        Ok(self.db.create_file(&id, &input.filename, &key, size)?)
    }

    async fn load_file(&self, id: &str) -> Result<StoredFile, ServiceError> {
        Ok(self.db.get_file(id)?)
    }

    async fn read_content(&self, id: &str) -> Result<Bytes, ServiceError> {
        let file = self.db.get_file(id)?;
        Ok(self.store.get(&file.store_key).await?)
    }
}
