//! Integration tests for HttpService against a real server.
//!
//! Each test spawns an in-process axum server on 127.0.0.1:0 with in-memory
//! SQLite and a tempdir blob store, then exercises the HTTP client layer
//! through the full request/response cycle.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;

use billbridge_core::batch::{AttachmentBatch, WorkOrderFileLink};
use billbridge_core::stored_file::{CreateStoredFile, StoredFile};
use billbridge_core::vendor_bill::{CreateVendorBill, UpdateVendorBill, VendorBill};
use billbridge_service::{
    BatchAttachmentProcessor, FileCabinet, HttpService, RecordSearch, RecordStore, ServiceError,
};

async fn spawn_server() -> String {
    let server = billbridge_server::test_helpers::spawn_test_server().await;
    server.base_url
}

fn sample_bill(work_order: &str) -> CreateVendorBill {
    CreateVendorBill {
        bill_number: format!("VB-{work_order}"),
        vendor_name: "Acme Fabrication".into(),
        work_order_number: work_order.into(),
        memo: String::new(),
    }
}

async fn seed_file(svc: &HttpService) -> StoredFile {
    svc.register_file(&CreateStoredFile {
        filename: "invoice.pdf".into(),
        content_base64: BASE64.encode(b"%PDF-1.4 test"),
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn health_check_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);
    svc.health_check().await.unwrap();
}

#[tokio::test]
async fn vendor_bill_crud_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    // Create
    let bill = svc.create_vendor_bill(&sample_bill("WO-1")).await.unwrap();
    assert_eq!(bill.bill_number, "VB-WO-1");
    assert_eq!(bill.work_order_number, "WO-1");

    // Load
    let fetched = svc.load_vendor_bill(&bill.id).await.unwrap();
    assert_eq!(fetched.id, bill.id);

    // List
    let all = svc.list_vendor_bills().await.unwrap();
    assert_eq!(all.len(), 1);

    // Update
    let updated = svc
        .update_vendor_bill(
            &bill.id,
            &UpdateVendorBill {
                memo: Some("matched to PO".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.memo, "matched to PO");

    // Search by work order
    let found = svc.find_vendor_bill_by_work_order("WO-1").await.unwrap();
    assert_eq!(found.as_deref(), Some(bill.id.as_str()));
    assert!(svc
        .find_vendor_bill_by_work_order("WO-9")
        .await
        .unwrap()
        .is_none());

    // Missing bill is a NotFound
    let err = svc.load_vendor_bill("nope").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn file_register_and_download_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    let file = seed_file(&svc).await;
    assert_eq!(file.filename, "invoice.pdf");
    assert_eq!(file.size_bytes, b"%PDF-1.4 test".len() as i64);

    let fetched = svc.load_file(&file.id).await.unwrap();
    assert_eq!(fetched.store_key, file.store_key);

    let content = svc.read_content(&file.id).await.unwrap();
    assert_eq!(content.as_ref(), b"%PDF-1.4 test");

    let err = svc
        .register_file(&CreateStoredFile {
            filename: "bad.pdf".into(),
            content_base64: "!!not-base64!!".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn single_attach_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    let bill = svc.create_vendor_bill(&sample_bill("WO-1")).await.unwrap();
    let file = seed_file(&svc).await;

    let attachment = svc.attach_file(&bill.id, &file.id).await.unwrap();
    assert_eq!(attachment.vendor_bill_id, bill.id);
    assert_eq!(attachment.file_id, file.id);

    let attachments = svc.list_attachments(&bill.id).await.unwrap();
    assert_eq!(attachments.len(), 1);

    // Dangling file id resolves to 404, not a constraint failure
    let err = svc.attach_file(&bill.id, "no-such-file").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn batch_attach_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    let bill = svc.create_vendor_bill(&sample_bill("WO-1")).await.unwrap();
    let file = seed_file(&svc).await;

    let outcomes = svc
        .attach_batch(&json!({
            "preMapData": [
                { "WorkOrderNumber": "WO-1", "NetSuiteFileId": file.id },
                { "WorkOrderNumber": "WO-9", "NetSuiteFileId": file.id },
                { "NetSuiteFileId": file.id }
            ]
        }))
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);

    assert_eq!(outcomes[0].status_code, 200);
    assert_eq!(outcomes[0].message, "File attached successfully");
    assert_eq!(outcomes[0].work_order_number.as_deref(), Some("WO-1"));
    assert_eq!(outcomes[0].vendor_bill_id.as_deref(), Some(bill.id.as_str()));
    assert_eq!(outcomes[0].file_attached.as_deref(), Some(file.id.as_str()));

    assert_eq!(outcomes[1].status_code, 404);
    assert!(outcomes[1].message.contains("WO-9"));

    assert_eq!(outcomes[2].status_code, 400);
    assert_eq!(
        outcomes[2].message,
        "Missing WorkOrderNumber or NetSuiteFileId"
    );

    let attachments = svc.list_attachments(&bill.id).await.unwrap();
    assert_eq!(attachments.len(), 1);
}

#[tokio::test]
async fn batch_shape_fault_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    for payload in [json!({}), json!({ "preMapData": [] })] {
        let outcomes = svc.attach_batch(&payload).await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status_code, 500);
        assert_eq!(outcomes[0].message, "Internal Server Error");
        assert_eq!(
            outcomes[0].error.as_deref(),
            Some("preMapData array is missing or empty")
        );
    }
}

// The processor composes over the capability traits, so it can run against
// a remote server through HttpService exactly as it does locally.
#[tokio::test]
async fn processor_over_http() {
    let url = spawn_server().await;
    let svc = Arc::new(HttpService::new(&url));

    let bill = svc.create_vendor_bill(&sample_bill("WO-1")).await.unwrap();
    let file = seed_file(&svc).await;

    let batch = AttachmentBatch::new(vec![WorkOrderFileLink::new("WO-1", &file.id)]);
    let processor = BatchAttachmentProcessor::from_platform(svc.clone());
    let outcomes = processor
        .process(&serde_json::to_value(&batch).unwrap())
        .await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status_code, 200);
    assert_eq!(outcomes[0].vendor_bill_id.as_deref(), Some(bill.id.as_str()));

    let attachments = svc.list_attachments(&bill.id).await.unwrap();
    assert_eq!(attachments.len(), 1);
}

// ---- Auth tests ----

#[tokio::test]
async fn auth_rejects_missing_or_wrong_key() {
    let (server, api_key) =
        billbridge_server::test_helpers::spawn_test_server_with_auth().await;

    // Health stays open
    let no_key = HttpService::new(&server.base_url);
    no_key.health_check().await.unwrap();

    // Protected routes require the key
    let err = no_key.list_vendor_bills().await.unwrap_err();
    assert!(err.to_string().contains("missing or invalid API key"));

    let wrong = HttpService::with_api_key(&server.base_url, "bb_wrong".into());
    let err = wrong.list_vendor_bills().await.unwrap_err();
    assert!(err.to_string().contains("missing or invalid API key"));

    let authed = HttpService::with_api_key(&server.base_url, api_key);
    let bills: Vec<VendorBill> = authed.list_vendor_bills().await.unwrap();
    assert!(bills.is_empty());
}
