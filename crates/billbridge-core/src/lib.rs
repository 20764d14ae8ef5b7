pub mod attachment;
pub mod batch;
pub mod stored_file;
pub mod vendor_bill;

pub use attachment::FileAttachment;
pub use batch::{AttachmentBatch, AttachmentOutcome, WorkOrderFileLink};
pub use stored_file::{CreateStoredFile, StoredFile};
pub use vendor_bill::{CreateVendorBill, UpdateVendorBill, VendorBill};
