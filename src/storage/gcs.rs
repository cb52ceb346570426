use super::{ObjectLocation, ObjectStoreGateway};
use crate::{Error, Result};
use async_trait::async_trait;
use google_cloud_storage::client::{Client, ClientConfig};
use google_cloud_storage::http;
use google_cloud_storage::http::objects::download::Range;
use google_cloud_storage::http::objects::get::GetObjectRequest;
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use std::path::Path;
use tracing::debug;

/// Production gateway backed by the GCS SDK. Credentials and project come
/// from the environment (Application Default Credentials).
pub struct GcsGateway {
    client: Client,
}

impl GcsGateway {
    pub async fn new() -> Result<Self> {
        let config = ClientConfig::default()
            .with_auth()
            .await
            .map_err(|e| Error::config(format!("Failed to set up GCS credentials: {e}")))?;

        Ok(Self {
            client: Client::new(config),
        })
    }
}

#[async_trait]
impl ObjectStoreGateway for GcsGateway {
    async fn fetch(&self, location: &ObjectLocation, dest: &Path) -> Result<()> {
        debug!("Downloading {} to {}", location.uri(), dest.display());

        let data = self
            .client
            .download_object(
                &GetObjectRequest {
                    bucket: location.bucket.clone(),
                    object: location.key.clone(),
                    ..Default::default()
                },
                &Range::default(),
            )
            .await
            .map_err(|e| download_error(location, e))?;

        tokio::fs::write(dest, data).await?;

        Ok(())
    }

    async fn store(&self, src: &Path, location: &ObjectLocation) -> Result<String> {
        debug!("Uploading {} to {}", src.display(), location.uri());

        let data = tokio::fs::read(src).await?;

        self.client
            .upload_object(
                &UploadObjectRequest {
                    bucket: location.bucket.clone(),
                    ..Default::default()
                },
                data,
                &UploadType::Simple(Media::new(location.key.clone())),
            )
            .await
            .map_err(|e| Error::transfer(format!("Upload of {} failed: {e}", location.uri())))?;

        Ok(location.uri())
    }
}

fn download_error(location: &ObjectLocation, err: http::Error) -> Error {
    match &err {
        http::Error::Response(response) if response.code == 404 => {
            Error::ObjectNotFound(location.uri())
        }
        _ => Error::transfer(format!("Download of {} failed: {err}", location.uri())),
    }
}
