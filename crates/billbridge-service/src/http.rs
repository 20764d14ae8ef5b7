use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

use billbridge_core::attachment::FileAttachment;
use billbridge_core::batch::AttachmentOutcome;
use billbridge_core::stored_file::{CreateStoredFile, StoredFile};
use billbridge_core::vendor_bill::{CreateVendorBill, UpdateVendorBill, VendorBill};

use crate::{FileCabinet, RecordSearch, RecordStore, ServiceError};

/// Async HTTP client implementation of the capability traits.
/// Connects to a running billbridge-server.
pub struct HttpService {
    base_url: String,
    client: Client,
    api_key: Option<String>,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
            api_key: None,
        }
    }

    pub fn with_api_key(base_url: &str, key: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
            api_key: Some(key),
        }
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {key}")),
            None => builder,
        }
    }

    /// Check if the server is reachable.
    /// Health endpoint is NOT authenticated.
    pub async fn health_check(&self) -> Result<(), ServiceError> {
        let resp = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::Internal(format!(
                "health check failed: {}",
                resp.status()
            )))
        }
    }

    /// Submit a raw integration payload to the batch entry point. The
    /// response is the full outcome array, including the single-element
    /// 500 shape on catastrophic failure.
    pub async fn attach_batch(
        &self,
        payload: &Value,
    ) -> Result<Vec<AttachmentOutcome>, ServiceError> {
        self.post_json("/api/attachments/batch", payload).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ServiceError> {
        let builder = self.client.get(format!("{}{path}", self.base_url));
        let resp = self
            .with_auth(builder)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn get_bytes(&self, path: &str) -> Result<Bytes, ServiceError> {
        let builder = self.client.get(format!("{}{path}", self.base_url));
        let resp = self
            .with_auth(builder)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            resp.bytes()
                .await
                .map_err(|e| ServiceError::Internal(format!("read body: {e}")))
        } else {
            Err(parse_error_with_status(status, resp).await)
        }
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let builder = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body);
        let resp = self
            .with_auth(builder)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn post_empty<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ServiceError> {
        let builder = self.client.post(format!("{}{path}", self.base_url));
        let resp = self
            .with_auth(builder)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn put_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let builder = self
            .client
            .put(format!("{}{path}", self.base_url))
            .json(body);
        let resp = self
            .with_auth(builder)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error_with_status(
    status: StatusCode,
    resp: reqwest::Response,
) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or(body);

    if status == StatusCode::NOT_FOUND {
        ServiceError::NotFound(msg)
    } else if status == StatusCode::BAD_REQUEST {
        ServiceError::InvalidInput(msg)
    } else {
        ServiceError::Internal(msg)
    }
}

#[async_trait]
impl RecordStore for HttpService {
    async fn create_vendor_bill(
        &self,
        input: &CreateVendorBill,
    ) -> Result<VendorBill, ServiceError> {
        self.post_json("/api/vendor-bills", input).await
    }

    async fn load_vendor_bill(&self, id: &str) -> Result<VendorBill, ServiceError> {
        self.get_json(&format!("/api/vendor-bills/{id}")).await
    }

    async fn update_vendor_bill(
        &self,
        id: &str,
        update: &UpdateVendorBill,
    ) -> Result<VendorBill, ServiceError> {
        self.put_json(&format!("/api/vendor-bills/{id}"), update)
            .await
    }

    async fn save_vendor_bill(&self, bill: &VendorBill) -> Result<VendorBill, ServiceError> {
        let update = UpdateVendorBill {
            vendor_name: Some(bill.vendor_name.clone()),
            work_order_number: Some(bill.work_order_number.clone()),
            memo: Some(bill.memo.clone()),
        };
        self.put_json(&format!("/api/vendor-bills/{}", bill.id), &update)
            .await
    }

    async fn list_vendor_bills(&self) -> Result<Vec<VendorBill>, ServiceError> {
        self.get_json("/api/vendor-bills").await
    }

    async fn attach_file(
        &self,
        vendor_bill_id: &str,
        file_id: &str,
    ) -> Result<FileAttachment, ServiceError> {
        self.post_empty(&format!(
            "/api/vendor-bills/{vendor_bill_id}/files/{file_id}"
        ))
        .await
    }

    async fn list_attachments(
        &self,
        vendor_bill_id: &str,
    ) -> Result<Vec<FileAttachment>, ServiceError> {
        self.get_json(&format!("/api/vendor-bills/{vendor_bill_id}/files"))
            .await
    }
}

#[async_trait]
impl RecordSearch for HttpService {
    async fn find_vendor_bill_by_work_order(
        &self,
        work_order_number: &str,
    ) -> Result<Option<String>, ServiceError> {
        let bills = self.search_vendor_bills(work_order_number).await?;
        Ok(bills.into_iter().next().map(|b| b.id))
    }

    async fn search_vendor_bills(
        &self,
        work_order_number: &str,
    ) -> Result<Vec<VendorBill>, ServiceError> {
        self.get_json(&format!(
            "/api/vendor-bills?work_order_number={work_order_number}"
        ))
        .await
    }
}

#[async_trait]
impl FileCabinet for HttpService {
    async fn register_file(&self, input: &CreateStoredFile) -> Result<StoredFile, ServiceError> {
        self.post_json("/api/files", input).await
    }

    async fn load_file(&self, id: &str) -> Result<StoredFile, ServiceError> {
        self.get_json(&format!("/api/files/{id}")).await
    }

    async fn read_content(&self, id: &str) -> Result<Bytes, ServiceError> {
        self.get_bytes(&format!("/api/files/{id}/content")).await
    }
}
