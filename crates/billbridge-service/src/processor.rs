use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use billbridge_core::batch::{AttachmentOutcome, WorkOrderFileLink};

use crate::{FileCabinet, RecordSearch, RecordStore, ServiceError};

const MISSING_BATCH: &str = "preMapData array is missing or empty";

/// Processes a batch of work-order/file pairs: for each pair, resolve the
/// matching vendor bill, attach the referenced file, save the record, and
/// report a per-item outcome.
///
/// Items are handled strictly sequentially. Malformed items (400) and
/// unresolved work orders (404) are recorded and skipped; any other fault
/// aborts the batch and collapses the whole response to a single 500
/// outcome. Earlier items' attachments are already persisted at that point;
/// there is no rollback, and a re-run attaches them again.
pub struct BatchAttachmentProcessor {
    records: Arc<dyn RecordStore>,
    search: Arc<dyn RecordSearch>,
    files: Arc<dyn FileCabinet>,
}

impl BatchAttachmentProcessor {
    pub fn new(
        records: Arc<dyn RecordStore>,
        search: Arc<dyn RecordSearch>,
        files: Arc<dyn FileCabinet>,
    ) -> Self {
        Self {
            records,
            search,
            files,
        }
    }

    /// Build a processor from one backend implementing all three
    /// capabilities (`LocalService`, `HttpService`).
    pub fn from_platform<S>(platform: Arc<S>) -> Self
    where
        S: RecordStore + RecordSearch + FileCabinet + 'static,
    {
        Self::new(platform.clone(), platform.clone(), platform)
    }

    /// Entry point. Takes the raw integration payload so that shape faults
    /// (missing / non-array / empty `preMapData`) flow through the same
    /// outer handler as any other uncaught fault.
    pub async fn process(&self, payload: &Value) -> Vec<AttachmentOutcome> {
        debug!(payload = %payload, "received attachment batch");
        match self.run(payload).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                error!(error = %e, "attachment batch aborted");
                vec![AttachmentOutcome::internal_error(e.detail())]
            }
        }
    }

    async fn run(&self, payload: &Value) -> Result<Vec<AttachmentOutcome>, ServiceError> {
        let items = payload
            .get("preMapData")
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
            .ok_or_else(|| ServiceError::InvalidInput(MISSING_BATCH.into()))?;

        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            outcomes.push(self.process_item(item).await?);
        }
        Ok(outcomes)
    }

    async fn process_item(&self, item: &Value) -> Result<AttachmentOutcome, ServiceError> {
        let link: WorkOrderFileLink =
            serde_json::from_value(item.clone()).unwrap_or_default();
        let (Some(work_order_number), Some(file_id)) = (
            link.work_order_number.filter(|v| !v.is_empty()),
            link.file_id.filter(|v| !v.is_empty()),
        ) else {
            error!(item = %item, "skipping entry: missing WorkOrderNumber or NetSuiteFileId");
            return Ok(AttachmentOutcome::missing_fields());
        };

        let Some(bill_id) = self
            .search
            .find_vendor_bill_by_work_order(&work_order_number)
            .await?
        else {
            error!(
                work_order_number = %work_order_number,
                "no vendor bill matches the work order"
            );
            return Ok(AttachmentOutcome::bill_not_found(&work_order_number));
        };

        debug!(
            work_order_number = %work_order_number,
            vendor_bill_id = %bill_id,
            file_id = %file_id,
            "processing work order"
        );

        let bill = self.records.load_vendor_bill(&bill_id).await?;
        // No existence pre-check on the file: a missing file is a
        // lower-level fault and aborts the batch.
        let file = self.files.load_file(&file_id).await?;
        self.records.attach_file(&bill.id, &file.id).await?;
        self.records.save_vendor_bill(&bill).await?;

        debug!(
            file_id = %file.id,
            vendor_bill_id = %bill.id,
            "file attached"
        );

        Ok(AttachmentOutcome::attached(
            &work_order_number,
            &bill.id,
            &file.id,
        ))
    }
}
