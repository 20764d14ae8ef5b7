use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAttachment {
    pub id: String,
    pub vendor_bill_id: String,
    pub file_id: String,
    pub created_at: DateTime<Utc>,
}
