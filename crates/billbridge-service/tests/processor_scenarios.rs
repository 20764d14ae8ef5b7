//! Batch attachment scenarios against the local backend: in-memory SQLite
//! ledger plus a tempdir blob store.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;

use billbridge_core::stored_file::{CreateStoredFile, StoredFile};
use billbridge_core::vendor_bill::{CreateVendorBill, VendorBill};
use billbridge_db::Db;
use billbridge_service::{
    BatchAttachmentProcessor, FileCabinet, LocalService, RecordStore,
};
use billbridge_store::StoreConfig;

struct Harness {
    platform: Arc<LocalService>,
    processor: BatchAttachmentProcessor,
    _store_dir: tempfile::TempDir,
}

fn harness() -> Harness {
    let db = Db::open_in_memory().unwrap();
    let store_dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        endpoint_url: None,
        region: None,
        bucket: None,
        access_key_id: None,
        secret_access_key: None,
        local_data_dir: Some(store_dir.path().to_string_lossy().to_string()),
    };
    let store = billbridge_store::create_store(&config).unwrap();
    let platform = Arc::new(LocalService::new(db, store));
    let processor = BatchAttachmentProcessor::from_platform(platform.clone());
    Harness {
        platform,
        processor,
        _store_dir: store_dir,
    }
}

async fn seed_bill(platform: &LocalService, work_order: &str) -> VendorBill {
    platform
        .create_vendor_bill(&CreateVendorBill {
            bill_number: format!("VB-{work_order}"),
            vendor_name: "Acme Fabrication".into(),
            work_order_number: work_order.into(),
            memo: String::new(),
        })
        .await
        .unwrap()
}

async fn seed_file(platform: &LocalService, filename: &str) -> StoredFile {
    platform
        .register_file(&CreateStoredFile {
            filename: filename.into(),
            content_base64: BASE64.encode(b"%PDF-1.4 test"),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn single_item_attaches_and_reports_success() {
    let h = harness();
    let bill = seed_bill(&h.platform, "WO-1").await;
    let file = seed_file(&h.platform, "invoice.pdf").await;

    let payload = json!({
        "preMapData": [{ "WorkOrderNumber": "WO-1", "NetSuiteFileId": file.id }]
    });
    let outcomes = h.processor.process(&payload).await;

    assert_eq!(outcomes.len(), 1);
    let outcome = &outcomes[0];
    assert_eq!(outcome.status_code, 200);
    assert_eq!(outcome.message, "File attached successfully");
    assert_eq!(outcome.work_order_number.as_deref(), Some("WO-1"));
    assert_eq!(outcome.vendor_bill_id.as_deref(), Some(bill.id.as_str()));
    assert_eq!(outcome.file_attached.as_deref(), Some(file.id.as_str()));

    let attachments = h.platform.list_attachments(&bill.id).await.unwrap();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].file_id, file.id);
}

#[tokio::test]
async fn mixed_batch_adjudicates_every_item_in_order() {
    let h = harness();
    seed_bill(&h.platform, "WO-1").await;
    let bill2 = seed_bill(&h.platform, "WO-2").await;
    let file = seed_file(&h.platform, "invoice.pdf").await;

    let payload = json!({
        "preMapData": [
            { "WorkOrderNumber": "WO-1", "NetSuiteFileId": file.id },
            { "WorkOrderNumber": "WO-3" },
            { "WorkOrderNumber": "WO-9", "NetSuiteFileId": file.id },
            { "WorkOrderNumber": "WO-2", "NetSuiteFileId": file.id }
        ]
    });
    let outcomes = h.processor.process(&payload).await;

    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcomes[0].status_code, 200);
    assert_eq!(outcomes[1].status_code, 400);
    assert_eq!(
        outcomes[1].message,
        "Missing WorkOrderNumber or NetSuiteFileId"
    );
    assert_eq!(outcomes[2].status_code, 404);
    assert!(outcomes[2].message.contains("WO-9"));
    assert_eq!(outcomes[3].status_code, 200);

    // A soft failure mid-batch does not stop later items.
    let attachments = h.platform.list_attachments(&bill2.id).await.unwrap();
    assert_eq!(attachments.len(), 1);
}

#[tokio::test]
async fn empty_string_fields_count_as_missing() {
    let h = harness();
    seed_bill(&h.platform, "WO-1").await;

    let payload = json!({
        "preMapData": [{ "WorkOrderNumber": "WO-1", "NetSuiteFileId": "" }]
    });
    let outcomes = h.processor.process(&payload).await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status_code, 400);
}

#[tokio::test]
async fn non_object_item_counts_as_missing() {
    let h = harness();

    let payload = json!({ "preMapData": ["WO-1"] });
    let outcomes = h.processor.process(&payload).await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status_code, 400);
}

#[tokio::test]
async fn missing_empty_or_non_array_payload_collapses_to_500() {
    let h = harness();

    for payload in [
        json!({}),
        json!({ "preMapData": [] }),
        json!({ "preMapData": "WO-1" }),
        json!({ "somethingElse": true }),
    ] {
        let outcomes = h.processor.process(&payload).await;
        assert_eq!(outcomes.len(), 1, "payload: {payload}");
        assert_eq!(outcomes[0].status_code, 500);
        assert_eq!(outcomes[0].message, "Internal Server Error");
        assert_eq!(
            outcomes[0].error.as_deref(),
            Some("preMapData array is missing or empty")
        );
    }
}

#[tokio::test]
async fn unresolvable_work_order_reports_404() {
    let h = harness();
    let file = seed_file(&h.platform, "invoice.pdf").await;

    let payload = json!({
        "preMapData": [{ "WorkOrderNumber": "WO-9", "NetSuiteFileId": file.id }]
    });
    let outcomes = h.processor.process(&payload).await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status_code, 404);
    assert_eq!(
        outcomes[0].message,
        "Vendor Bill not found for WorkOrderNumber: WO-9"
    );
}

#[tokio::test]
async fn missing_file_aborts_batch_and_discards_earlier_outcomes() {
    let h = harness();
    let bill1 = seed_bill(&h.platform, "WO-1").await;
    seed_bill(&h.platform, "WO-2").await;
    let file = seed_file(&h.platform, "invoice.pdf").await;

    let payload = json!({
        "preMapData": [
            { "WorkOrderNumber": "WO-1", "NetSuiteFileId": file.id },
            { "WorkOrderNumber": "WO-2", "NetSuiteFileId": "no-such-file" }
        ]
    });
    let outcomes = h.processor.process(&payload).await;

    // The whole response collapses to the single 500 element; the outcome
    // already computed for the first item is gone.
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status_code, 500);
    assert_eq!(outcomes[0].message, "Internal Server Error");
    assert!(outcomes[0].error.as_deref().unwrap().contains("no-such-file"));

    // ...but the first item's attachment was already persisted. Partial
    // application is visible to the caller.
    let attachments = h.platform.list_attachments(&bill1.id).await.unwrap();
    assert_eq!(attachments.len(), 1);
}

#[tokio::test]
async fn rerun_attaches_again_rather_than_failing() {
    let h = harness();
    let bill = seed_bill(&h.platform, "WO-1").await;
    let file = seed_file(&h.platform, "invoice.pdf").await;

    let payload = json!({
        "preMapData": [{ "WorkOrderNumber": "WO-1", "NetSuiteFileId": file.id }]
    });

    let first = h.processor.process(&payload).await;
    let second = h.processor.process(&payload).await;
    assert_eq!(first[0].status_code, 200);
    assert_eq!(second[0].status_code, 200);

    let attachments = h.platform.list_attachments(&bill.id).await.unwrap();
    assert_eq!(attachments.len(), 2);
}

#[tokio::test]
async fn registered_file_content_roundtrips() {
    let h = harness();
    let file = seed_file(&h.platform, "invoice.pdf").await;
    assert_eq!(file.size_bytes, b"%PDF-1.4 test".len() as i64);

    let content = h.platform.read_content(&file.id).await.unwrap();
    assert_eq!(content.as_ref(), b"%PDF-1.4 test");
}

#[tokio::test]
async fn invalid_base64_is_rejected_as_invalid_input() {
    let h = harness();
    let err = h
        .platform
        .register_file(&CreateStoredFile {
            filename: "invoice.pdf".into(),
            content_base64: "not base64!!".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        billbridge_service::ServiceError::InvalidInput(_)
    ));
}
