use serde::{Deserialize, Serialize};

/// One work-order/file pair from the integration payload.
///
/// Field names on the wire (`WorkOrderNumber`, `NetSuiteFileId`) are owned by
/// the upstream integration platform and must not change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkOrderFileLink {
    #[serde(rename = "WorkOrderNumber", skip_serializing_if = "Option::is_none")]
    pub work_order_number: Option<String>,
    #[serde(rename = "NetSuiteFileId", skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

impl WorkOrderFileLink {
    pub fn new(work_order_number: &str, file_id: &str) -> Self {
        Self {
            work_order_number: Some(work_order_number.to_string()),
            file_id: Some(file_id.to_string()),
        }
    }
}

/// The full integration payload: an ordered batch of pairs under `preMapData`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttachmentBatch {
    #[serde(rename = "preMapData", default)]
    pub pre_map_data: Vec<WorkOrderFileLink>,
}

impl AttachmentBatch {
    pub fn new(links: Vec<WorkOrderFileLink>) -> Self {
        Self {
            pre_map_data: links,
        }
    }
}

/// Per-item adjudication returned to the caller. One outcome per input item,
/// in input order, except for the catastrophic-failure path which replaces
/// the whole response with a single 500 element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentOutcome {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_bill_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_attached: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AttachmentOutcome {
    pub fn attached(work_order_number: &str, vendor_bill_id: &str, file_id: &str) -> Self {
        Self {
            status_code: 200,
            message: "File attached successfully".into(),
            work_order_number: Some(work_order_number.to_string()),
            vendor_bill_id: Some(vendor_bill_id.to_string()),
            file_attached: Some(file_id.to_string()),
            error: None,
        }
    }

    pub fn missing_fields() -> Self {
        Self {
            status_code: 400,
            message: "Missing WorkOrderNumber or NetSuiteFileId".into(),
            work_order_number: None,
            vendor_bill_id: None,
            file_attached: None,
            error: None,
        }
    }

    pub fn bill_not_found(work_order_number: &str) -> Self {
        Self {
            status_code: 404,
            message: format!("Vendor Bill not found for WorkOrderNumber: {work_order_number}"),
            work_order_number: None,
            vendor_bill_id: None,
            file_attached: None,
            error: None,
        }
    }

    pub fn internal_error(detail: &str) -> Self {
        Self {
            status_code: 500,
            message: "Internal Server Error".into(),
            work_order_number: None,
            vendor_bill_id: None,
            file_attached: None,
            error: Some(detail.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn link_parses_upstream_field_names() {
        let link: WorkOrderFileLink = serde_json::from_value(json!({
            "WorkOrderNumber": "WO-1",
            "NetSuiteFileId": "55"
        }))
        .unwrap();
        assert_eq!(link.work_order_number.as_deref(), Some("WO-1"));
        assert_eq!(link.file_id.as_deref(), Some("55"));
    }

    #[test]
    fn link_tolerates_missing_fields() {
        let link: WorkOrderFileLink =
            serde_json::from_value(json!({ "WorkOrderNumber": "WO-2" })).unwrap();
        assert_eq!(link.work_order_number.as_deref(), Some("WO-2"));
        assert!(link.file_id.is_none());
    }

    #[test]
    fn batch_serializes_under_pre_map_data() {
        let batch = AttachmentBatch::new(vec![WorkOrderFileLink::new("WO-1", "55")]);
        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(
            value,
            json!({ "preMapData": [{ "WorkOrderNumber": "WO-1", "NetSuiteFileId": "55" }] })
        );
    }

    #[test]
    fn success_outcome_wire_shape() {
        let outcome = AttachmentOutcome::attached("WO-1", "900", "55");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({
                "statusCode": 200,
                "message": "File attached successfully",
                "workOrderNumber": "WO-1",
                "vendorBillId": "900",
                "fileAttached": "55"
            })
        );
    }

    #[test]
    fn failure_outcomes_omit_success_fields() {
        let missing = serde_json::to_value(AttachmentOutcome::missing_fields()).unwrap();
        assert_eq!(
            missing,
            json!({
                "statusCode": 400,
                "message": "Missing WorkOrderNumber or NetSuiteFileId"
            })
        );

        let not_found = serde_json::to_value(AttachmentOutcome::bill_not_found("WO-9")).unwrap();
        assert_eq!(not_found["statusCode"], 404);
        assert!(not_found["message"].as_str().unwrap().contains("WO-9"));

        let internal =
            serde_json::to_value(AttachmentOutcome::internal_error("boom")).unwrap();
        assert_eq!(
            internal,
            json!({
                "statusCode": 500,
                "message": "Internal Server Error",
                "error": "boom"
            })
        );
    }
}
