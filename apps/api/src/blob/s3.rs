use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;

use crate::blob::BlobStore;
use crate::config::S3Config;
use crate::errors::AppError;

const KEY_PREFIX: &str = "cvs/";

/// Blobs in an S3-compatible bucket (MinIO locally, AWS in production).
/// References are full object keys under `cvs/`.
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
}

impl S3BlobStore {
    pub async fn connect(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "candidates-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(&config.endpoint)
            .load()
            .await;

        info!("S3 client initialized for bucket {}", config.bucket);
        Self {
            client: S3Client::new(&s3_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        name: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<String, AppError> {
        let key = format!("{KEY_PREFIX}{name}");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(data))
            .content_type(content_type.unwrap_or("application/octet-stream"))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded CV to s3://{}/{}", self.bucket, key);
        Ok(key)
    }

    async fn get(&self, reference: &str) -> Result<Option<Bytes>, AppError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(reference)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().map(|se| se.is_no_such_key()) == Some(true) => {
                return Ok(None)
            }
            Err(e) => return Err(AppError::Storage(format!("S3 download failed: {e}"))),
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("S3 download failed: {e}")))?;
        Ok(Some(data.into_bytes()))
    }

    /// S3 deletes are idempotent and do not report whether the key existed.
    async fn delete(&self, reference: &str) -> Result<bool, AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(reference)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete failed: {e}")))?;

        Ok(true)
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}
