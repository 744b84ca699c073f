use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::storage::{error::StorageError, object_ref::ObjectRef};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest {
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL", alias = "signedUrl", alias = "signed_url")]
    signed_url: String,
}

/// Thin client over the object storage REST surface.
#[derive(Debug, Clone)]
pub struct StorageClient {
    domain: String,
    service_key: String,
    bucket: String,
}

impl StorageClient {
    pub fn new(
        domain: impl Into<String>,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        let domain = domain.into().trim_end_matches('/').to_string();

        Self {
            domain,
            service_key: service_key.into(),
            bucket: bucket.into(),
        }
    }

    /// Reference to an object in the configured bucket.
    pub fn object_ref(&self, path: &str) -> ObjectRef {
        ObjectRef::new(&self.bucket, path)
    }

    pub async fn download(
        &self,
        client: &Client,
        object: &ObjectRef,
    ) -> Result<Vec<u8>, StorageError> {
        let url = self.object_url(object);
        info!("StorageClient downloading: {}", object);
        let response = self.authorize(client.get(&url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or("No body".into());
            if is_missing(status, &body) {
                return Err(StorageError::NotFound(object.to_string()));
            }

            error!("StorageClient download failed: {} - {}", status, body);
            return Err(StorageError::ApiError(status, body));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Uploads with overwrite allowed.
    pub async fn upload(
        &self,
        client: &Client,
        object: &ObjectRef,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = self.object_url(object);
        info!("StorageClient uploading {} bytes to: {}", bytes.len(), object);
        let response = self
            .authorize(client.post(&url))
            .header("content-type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or("No body".into());
            error!("StorageClient upload failed: {} - {}", status, body);
            return Err(StorageError::ApiError(status, body));
        }

        Ok(())
    }

    pub async fn sign(
        &self,
        client: &Client,
        object: &ObjectRef,
        expires_in: u64,
    ) -> Result<String, StorageError> {
        let url = format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.domain, object.bucket, object.path
        );
        let response = self
            .authorize(client.post(&url))
            .json(&SignRequest { expires_in })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or("No body".into());
            if is_missing(status, &body) {
                return Err(StorageError::NotFound(object.to_string()));
            }

            error!("StorageClient sign failed: {} - {}", status, body);
            return Err(StorageError::ApiError(status, body));
        }

        let signed = response.json::<SignResponse>().await?;
        Ok(self.absolute_signed_url(&signed.signed_url))
    }

    fn absolute_signed_url(&self, signed: &str) -> String {
        if signed.starts_with("http://") || signed.starts_with("https://") {
            return signed.to_string();
        }

        format!("{}/storage/v1/{}", self.domain, signed.trim_start_matches('/'))
    }

    fn object_url(&self, object: &ObjectRef) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.domain, object.bucket, object.path
        )
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("authorization", format!("Bearer {}", self.service_key))
            .header("apikey", &self.service_key)
    }
}

// The backend reports a missing object either as a 404 or as a 400 with a not found body.
fn is_missing(status: StatusCode, body: &str) -> bool {
    status == StatusCode::NOT_FOUND
        || (status == StatusCode::BAD_REQUEST && body.to_lowercase().contains("not found"))
}
