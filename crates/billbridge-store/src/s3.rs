use async_trait::async_trait;
use bytes::Bytes;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use s3::Bucket;

use crate::{ObjectStore, StoreConfig, StoreError};

pub struct S3Store {
    bucket: Box<Bucket>,
}

impl std::fmt::Debug for S3Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Store").finish_non_exhaustive()
    }
}

impl S3Store {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let region = Region::Custom {
            region: config.region.clone().unwrap_or_else(|| "us-east-1".into()),
            endpoint: config.endpoint_url.clone().unwrap_or_default(),
        };

        let credentials = Credentials::new(
            config.access_key_id.as_deref(),
            config.secret_access_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StoreError::Internal(format!("credentials: {e}")))?;

        let bucket_name = config
            .bucket
            .as_deref()
            .ok_or_else(|| StoreError::Internal("bucket name required".into()))?;

        let mut bucket = Bucket::new(bucket_name, region, credentials)
            .map_err(|e| StoreError::Internal(format!("bucket: {e}")))?;
        bucket.set_path_style();

        Ok(Self { bucket })
    }
}

fn content_type_for_key(key: &str) -> &'static str {
    if key.ends_with(".pdf") {
        "application/pdf"
    } else if key.ends_with(".txt") || key.ends_with(".csv") {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}

fn map_s3_error(e: S3Error) -> StoreError {
    StoreError::Internal(format!("s3: {e}"))
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError> {
        let content_type = content_type_for_key(key);
        self.bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(map_s3_error)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        let response = self.bucket.get_object(key).await.map_err(map_s3_error)?;
        if response.status_code() == 404 {
            return Err(StoreError::NotFound(key.to_string()));
        }
        if response.status_code() >= 400 {
            return Err(StoreError::Internal(format!(
                "s3 get {}: status {}",
                key,
                response.status_code()
            )));
        }
        Ok(Bytes::from(response.to_vec()))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.bucket.delete_object(key).await.map_err(map_s3_error)?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let results = self
            .bucket
            .list(prefix.to_string(), None)
            .await
            .map_err(map_s3_error)?;

        let mut keys = Vec::new();
        for result in results {
            for object in result.contents {
                keys.push(object.key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let response = self.bucket.get_object(key).await.map_err(map_s3_error)?;
        Ok(response.status_code() != 404)
    }
}
