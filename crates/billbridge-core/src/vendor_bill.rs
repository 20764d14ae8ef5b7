use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorBill {
    pub id: String,
    pub bill_number: String,
    pub vendor_name: String,
    /// Business key set by the upstream work-order flow; empty when the bill
    /// did not originate from a work order.
    #[serde(default)]
    pub work_order_number: String,
    #[serde(default)]
    pub memo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVendorBill {
    pub bill_number: String,
    pub vendor_name: String,
    #[serde(default)]
    pub work_order_number: String,
    #[serde(default)]
    pub memo: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVendorBill {
    pub vendor_name: Option<String>,
    pub work_order_number: Option<String>,
    pub memo: Option<String>,
}
