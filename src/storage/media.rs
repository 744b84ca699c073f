use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use chrono::Utc;
use dashmap::DashMap;
use reqwest::Client;
use tracing::{debug, info};
use uuid::Uuid;

use crate::storage::{client::StorageClient, error::StorageError, object_ref::ObjectRef};

/// Upload types accepted by the admin console, with their content types.
const MEDIA_TYPES: [(&str, &str); 10] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("m4a", "audio/mp4"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
];

pub fn media_content_type(extension: &str) -> Option<&'static str> {
    let extension = extension.to_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, content_type)| *content_type)
}

fn media_extension(filename: &str) -> Result<String, StorageError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| StorageError::UnsupportedMedia(filename.to_string()))?;

    match media_content_type(&extension) {
        Some(_) => Ok(extension),
        None => Err(StorageError::UnsupportedMedia(filename.to_string())),
    }
}

#[derive(Debug, Clone)]
struct CachedUrl {
    url: String,
    expires_at: Instant,
}

/// Signed URLs keyed by reference and requested lifetime.
#[derive(Debug, Default)]
pub struct SignedUrlCache {
    entries: DashMap<(String, u64), CachedUrl>,
}

impl SignedUrlCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// How long a URL signed for `sign_ttl` may be served from cache.
    /// Always strictly shorter than the signature itself.
    pub fn window(cache_ttl: Duration, sign_ttl: Duration) -> Duration {
        let ceiling = sign_ttl.saturating_sub(Duration::from_secs(1));
        cache_ttl.min(ceiling)
    }

    pub fn get(&self, reference: &str, sign_ttl_secs: u64, now: Instant) -> Option<String> {
        let key = (reference.to_string(), sign_ttl_secs);
        let cached = self.entries.get(&key)?;
        if cached.expires_at > now {
            return Some(cached.url.clone());
        }

        drop(cached);
        self.entries.remove(&key);
        None
    }

    pub fn insert(&self, reference: &str, sign_ttl_secs: u64, url: String, expires_at: Instant) {
        self.entries
            .insert((reference.to_string(), sign_ttl_secs), CachedUrl { url, expires_at });
    }

    /// Drops every entry that has expired by `now`.
    pub fn evict_expired(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, cached| cached.expires_at > now);
        before.saturating_sub(self.entries.len())
    }
}

/// Resolves stored media references into fetchable URLs and stores uploads.
pub struct MediaService {
    remote: Option<StorageClient>,
    media_dir: PathBuf,
    sign_ttl: Duration,
    cache_ttl: Duration,
    cache: SignedUrlCache,
}

impl MediaService {
    pub fn new(
        remote: Option<StorageClient>,
        media_dir: impl Into<PathBuf>,
        sign_ttl: Duration,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            remote,
            media_dir: media_dir.into(),
            sign_ttl,
            cache_ttl,
            cache: SignedUrlCache::new(),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn evict_expired_urls(&self, now: Instant) -> usize {
        self.cache.evict_expired(now)
    }

    pub async fn resolve(&self, client: &Client, reference: &str) -> Result<String, StorageError> {
        self.resolve_with_ttl(client, reference, self.sign_ttl).await
    }

    /// Object references are exchanged for a signed URL, anything else is returned as is.
    pub async fn resolve_with_ttl(
        &self,
        client: &Client,
        reference: &str,
        sign_ttl: Duration,
    ) -> Result<String, StorageError> {
        let Some(remote) = &self.remote else {
            return Ok(reference.to_string());
        };

        if !ObjectRef::is_object_ref(reference) {
            return Ok(reference.to_string());
        }

        let ttl_secs = sign_ttl.as_secs();
        if let Some(url) = self.cache.get(reference, ttl_secs, Instant::now()) {
            debug!("Signed url cache hit for {}", reference);
            return Ok(url);
        }

        let object: ObjectRef = reference.parse()?;
        let signed_at = Instant::now();
        let url = remote.sign(client, &object, ttl_secs).await?;

        let window = SignedUrlCache::window(self.cache_ttl, sign_ttl);
        if !window.is_zero() {
            self.cache
                .insert(reference, ttl_secs, url.clone(), signed_at + window);
        }

        Ok(url)
    }

    /// Stores an uploaded media file and returns the reference to save on the question.
    pub async fn store_media(
        &self,
        client: &Client,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<String, StorageError> {
        let extension = media_extension(filename)?;
        let id = Uuid::new_v4().simple();

        match &self.remote {
            Some(remote) => {
                let folder = Utc::now().format("media/%Y/%m");
                let object = remote.object_ref(&format!("{}/{}.{}", folder, id, extension));
                let content_type =
                    media_content_type(&extension).unwrap_or("application/octet-stream");

                remote.upload(client, &object, bytes, content_type).await?;
                info!("Stored media {} as {}", filename, object);
                Ok(object.to_string())
            }
            None => {
                tokio::fs::create_dir_all(&self.media_dir).await?;
                let name = format!("{}_{}.{}", Utc::now().format("%Y%m%d_%H%M%S"), id, extension);
                let path = self.media_dir.join(name);
                tokio::fs::write(&path, bytes).await?;

                let stored = path.to_string_lossy().replace('\\', "/");
                info!("Stored media {} locally at {}", filename, stored);
                Ok(stored)
            }
        }
    }
}
