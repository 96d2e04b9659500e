use super::{Snapshot, Storage, StorageError};
use async_trait::async_trait;
use serde::Deserialize;

/// Header carrying the bin's access key.
pub const DEFAULT_KEY_HEADER: &str = "X-Master-Key";

/// `GET` wraps the stored document in `record`.
#[derive(Deserialize)]
struct BinEnvelope {
    #[serde(default)]
    record: Snapshot,
}

/// Snapshot stored in a hosted JSON bin over HTTP.
///
/// `GET {url}` reads, `PUT {url}` replaces the whole document.
#[derive(Clone, Debug)]
pub struct JsonBinStorage {
    client: reqwest::Client,
    url: String,
    key: String,
    key_header: String,
}

impl JsonBinStorage {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            key: key.into(),
            key_header: DEFAULT_KEY_HEADER.to_string(),
        }
    }

    pub fn with_key_header(mut self, header: impl Into<String>) -> Self {
        self.key_header = header.into();
        self
    }
}

#[async_trait]
impl Storage for JsonBinStorage {
    async fn load(&self) -> Result<Snapshot, StorageError> {
        let envelope: BinEnvelope = self
            .client
            .get(&self.url)
            .header(self.key_header.as_str(), &self.key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.record)
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        self.client
            .put(&self.url)
            .header(self.key_header.as_str(), &self.key)
            .json(snapshot)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
