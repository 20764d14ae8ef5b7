use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use billbridge_core::attachment::FileAttachment;
use billbridge_core::stored_file::{CreateStoredFile, StoredFile};
use billbridge_core::vendor_bill::{CreateVendorBill, UpdateVendorBill, VendorBill};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// The bare fault text, without the variant prefix. This is what goes
    /// into the `error` field of a 500 outcome on the wire.
    pub fn detail(&self) -> &str {
        match self {
            ServiceError::NotFound(msg)
            | ServiceError::InvalidInput(msg)
            | ServiceError::Internal(msg) => msg,
        }
    }
}

/// Record persistence: load a vendor bill for mutation, save it back, and
/// maintain the generic file-attachment relation.
///
/// The batch processor and the HTTP routes program against this trait.
/// `LocalService` wraps the embedded SQLite ledger; `HttpService` talks to a
/// remote billbridge server.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_vendor_bill(&self, input: &CreateVendorBill)
        -> Result<VendorBill, ServiceError>;
    async fn load_vendor_bill(&self, id: &str) -> Result<VendorBill, ServiceError>;
    async fn update_vendor_bill(
        &self,
        id: &str,
        update: &UpdateVendorBill,
    ) -> Result<VendorBill, ServiceError>;
    async fn save_vendor_bill(&self, bill: &VendorBill) -> Result<VendorBill, ServiceError>;
    async fn list_vendor_bills(&self) -> Result<Vec<VendorBill>, ServiceError>;
    async fn attach_file(
        &self,
        vendor_bill_id: &str,
        file_id: &str,
    ) -> Result<FileAttachment, ServiceError>;
    async fn list_attachments(
        &self,
        vendor_bill_id: &str,
    ) -> Result<Vec<FileAttachment>, ServiceError>;
}

/// Keyed record search on the work-order business key.
#[async_trait]
pub trait RecordSearch: Send + Sync {
    /// Bounded lookup: the first match in store order, if any. Multiplicity
    /// is neither detected nor reported.
    async fn find_vendor_bill_by_work_order(
        &self,
        work_order_number: &str,
    ) -> Result<Option<String>, ServiceError>;

    async fn search_vendor_bills(
        &self,
        work_order_number: &str,
    ) -> Result<Vec<VendorBill>, ServiceError>;
}

/// The file cabinet: registered file metadata plus blob content.
#[async_trait]
pub trait FileCabinet: Send + Sync {
    async fn register_file(&self, input: &CreateStoredFile) -> Result<StoredFile, ServiceError>;
    async fn load_file(&self, id: &str) -> Result<StoredFile, ServiceError>;
    async fn read_content(&self, id: &str) -> Result<Bytes, ServiceError>;
}
