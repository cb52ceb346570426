mod gcs;

pub use gcs::GcsGateway;

use crate::{Error, Result};
use async_trait::async_trait;
use std::path::Path;

const GCS_SCHEME: &str = "gs://";

/// Bucket and key of one object, derived from a `gs://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    /// Separates a GCS URI into bucket name and object key. The remainder
    /// after the scheme is split on the first `/`; the key may be empty.
    pub fn parse(uri: &str) -> Result<Self> {
        let remainder = uri
            .strip_prefix(GCS_SCHEME)
            .ok_or_else(|| Error::MalformedUri(uri.to_string()))?;

        let (bucket, key) = match remainder.split_once('/') {
            Some((bucket, key)) => (bucket, key),
            None => (remainder, ""),
        };

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    pub fn uri(&self) -> String {
        format!("{GCS_SCHEME}{}/{}", self.bucket, self.key)
    }
}

#[async_trait]
pub trait ObjectStoreGateway: Send + Sync {
    /// Downloads exactly one object to `dest`. A single attempt; any
    /// transport, auth, or permission failure propagates.
    async fn fetch(&self, location: &ObjectLocation, dest: &Path) -> Result<()>;

    /// Uploads one local file and returns the URI of the written object.
    async fn store(&self, src: &Path, location: &ObjectLocation) -> Result<String>;
}
