mod http;
mod local;
mod processor;
mod traits;

pub use http::HttpService;
pub use local::LocalService;
pub use processor::BatchAttachmentProcessor;
pub use traits::{FileCabinet, RecordSearch, RecordStore, ServiceError};
