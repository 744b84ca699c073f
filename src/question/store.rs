use std::{io::ErrorKind, path::PathBuf};

use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    question::models::{Question, is_well_formed},
    storage::{client::StorageClient, error::StorageError, object_ref::ObjectRef},
};

const EMPTY_DOCUMENT: &[u8] = b"[]";
const DOCUMENT_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access question document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Question document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Question storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// The question collection, read and written as one document.
pub enum QuestionStore {
    Local(LocalStore),
    Remote(RemoteStore),
}

pub struct LocalStore {
    path: PathBuf,
}

pub struct RemoteStore {
    client: Client,
    storage: StorageClient,
    object: ObjectRef,
}

impl QuestionStore {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local(LocalStore { path: path.into() })
    }

    pub fn remote(client: Client, storage: StorageClient, object_path: &str) -> Self {
        let object = storage.object_ref(object_path);
        Self::Remote(RemoteStore {
            client,
            storage,
            object,
        })
    }

    pub fn describe(&self) -> String {
        match self {
            QuestionStore::Local(store) => store.path.display().to_string(),
            QuestionStore::Remote(store) => store.object.to_string(),
        }
    }

    /// Reads every well formed record. A missing document is created empty,
    /// any other failure is returned and the document is left untouched.
    pub async fn get_all(&self) -> Result<Vec<Question>, StoreError> {
        let bytes = match self {
            QuestionStore::Local(store) => store.read().await?,
            QuestionStore::Remote(store) => store.read().await?,
        };

        match bytes {
            Some(bytes) => parse_document(&bytes),
            None => {
                info!("Question document missing, initializing {}", self.describe());
                self.write_bytes(EMPTY_DOCUMENT.to_vec()).await?;
                Ok(Vec::new())
            }
        }
    }

    /// Read-only count of well formed records. A missing document counts as
    /// empty and is not created.
    pub async fn count(&self) -> Result<usize, StoreError> {
        let bytes = match self {
            QuestionStore::Local(store) => store.read().await?,
            QuestionStore::Remote(store) => store.read().await?,
        };

        match bytes {
            Some(bytes) => Ok(parse_document(&bytes)?.len()),
            None => Ok(0),
        }
    }

    /// Overwrites the whole document. Last writer wins.
    pub async fn replace_all(&self, questions: &[Question]) -> Result<(), StoreError> {
        let bytes = encode_document(questions)?;
        self.write_bytes(bytes).await
    }

    async fn write_bytes(&self, bytes: Vec<u8>) -> Result<(), StoreError> {
        match self {
            QuestionStore::Local(store) => store.write(bytes).await,
            QuestionStore::Remote(store) => store.write(bytes).await,
        }
    }
}

impl LocalStore {
    async fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, bytes: Vec<u8>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

impl RemoteStore {
    async fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match self.storage.download(&self.client, &self.object).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.storage
            .upload(&self.client, &self.object, bytes, DOCUMENT_CONTENT_TYPE)
            .await?;
        Ok(())
    }
}

pub fn parse_document(bytes: &[u8]) -> Result<Vec<Question>, StoreError> {
    let records: Vec<Value> = serde_json::from_slice(bytes)?;
    let total = records.len();

    let questions: Vec<Question> = records
        .into_iter()
        .filter(is_well_formed)
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect();

    if questions.len() < total {
        warn!(
            "Dropped {} malformed question records",
            total - questions.len()
        );
    }

    Ok(questions)
}

pub fn encode_document(questions: &[Question]) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec_pretty(questions)?)
}
