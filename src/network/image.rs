//! Poster image loader - two-tier cache (memory LRU + disk) with
//! request coalescing and cancellation.

use anyhow::{anyhow, Result};
use bytes::Bytes;
use futures_util::future::{AbortHandle, Abortable, BoxFuture, FutureExt, Shared};
use lru::LruCache;
use reqwest::Url;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::constants::{DATA_DIR_NAME, REQUEST_TIMEOUT};

const MEMORY_COUNT_LIMIT: usize = 300;
const MEMORY_BYTE_LIMIT: usize = 64 * 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("Invalid image URL")]
    BadUrl,
    #[error("Image request cancelled")]
    Cancelled,
    #[error("Image download failed: {0}")]
    Network(String),
    #[error("Image payload was empty")]
    Decode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    #[default]
    Default,
    ReloadIgnoringCache,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageOptions {
    pub cache_policy: CachePolicy,
    pub headers: Vec<(String, String)>,
}

impl ImageOptions {
    pub fn reload() -> Self {
        ImageOptions {
            cache_policy: CachePolicy::ReloadIgnoringCache,
            headers: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageResponse {
    pub data: Bytes,
    pub mime_type: Option<String>,
    pub etag: Option<String>,
    pub from_cache: bool,
}

impl ImageResponse {
    fn cached(data: Bytes) -> Self {
        ImageResponse {
            data,
            mime_type: None,
            etag: None,
            from_cache: true,
        }
    }
}

/// LRU bounded by entry count and total byte cost
struct MemoryTier {
    entries: LruCache<String, Bytes>,
    total_bytes: usize,
    max_bytes: usize,
}

impl MemoryTier {
    fn new(max_entries: usize, max_bytes: usize) -> Self {
        let cap = NonZeroUsize::new(max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        MemoryTier {
            entries: LruCache::new(cap),
            total_bytes: 0,
            max_bytes,
        }
    }

    fn get(&mut self, key: &str) -> Option<Bytes> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: String, data: Bytes) {
        if data.len() > self.max_bytes {
            return;
        }
        self.total_bytes += data.len();
        // push hands back either the replaced value or the evicted LRU entry
        if let Some((_, old)) = self.entries.push(key, data) {
            self.total_bytes -= old.len();
        }
        while self.total_bytes > self.max_bytes {
            match self.entries.pop_lru() {
                Some((_, old)) => self.total_bytes -= old.len(),
                None => break,
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.total_bytes = 0;
    }
}

/// File-per-URL disk tier, named by SHA-256 of the URL
struct DiskTier {
    dir: PathBuf,
}

impl DiskTier {
    fn path_for(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.dir.join(hex::encode(digest))
    }

    async fn read(&self, url: &str) -> Option<Bytes> {
        fs::read(self.path_for(url)).await.ok().map(Bytes::from)
    }

    async fn write(&self, url: &str, data: &[u8]) {
        let path = self.path_for(url);
        let tmp = path.with_extension("tmp");
        let result = async {
            fs::create_dir_all(&self.dir).await?;
            fs::write(&tmp, data).await?;
            fs::rename(&tmp, &path).await
        }
        .await;
        if let Err(e) = result {
            warn!(url, error = %e, "failed to write image to disk cache");
        }
    }
}

type SharedLoad = Shared<BoxFuture<'static, Result<ImageResponse, ImageError>>>;

struct InFlight {
    load: SharedLoad,
    abort: AbortHandle,
}

/// Loads poster images over HTTP with memory and disk caching.
/// Cheap to clone; clones share caches and in-flight downloads.
#[derive(Clone)]
pub struct ImageLoader {
    client: reqwest::Client,
    memory: Arc<Mutex<MemoryTier>>,
    disk: Arc<DiskTier>,
    in_flight: Arc<Mutex<HashMap<String, InFlight>>>,
}

impl ImageLoader {
    /// Loader caching under the platform cache dir
    pub fn new() -> Result<Self> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| anyhow!("Could not determine cache directory"))?
            .join(DATA_DIR_NAME)
            .join("images");
        Self::with_cache_dir(dir)
    }

    pub fn with_cache_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(ImageLoader {
            client,
            memory: Arc::new(Mutex::new(MemoryTier::new(MEMORY_COUNT_LIMIT, MEMORY_BYTE_LIMIT))),
            disk: Arc::new(DiskTier { dir }),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub async fn load(&self, url: &str, options: &ImageOptions) -> Result<ImageResponse, ImageError> {
        let parsed = Url::parse(url).map_err(|_| ImageError::BadUrl)?;
        let key = parsed.to_string();

        if options.cache_policy == CachePolicy::Default {
            if let Some(data) = self.memory.lock().await.get(&key) {
                trace!(url = %key, "image memory hit");
                return Ok(ImageResponse::cached(data));
            }
            if let Some(data) = self.disk.read(&key).await {
                trace!(url = %key, "image disk hit");
                self.memory.lock().await.insert(key.clone(), data.clone());
                return Ok(ImageResponse::cached(data));
            }
        }

        let load = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(&key) {
                Some(existing) => existing.load.clone(),
                None => {
                    let (abort, registration) = AbortHandle::new_pair();
                    let download = download(
                        self.client.clone(),
                        parsed,
                        options.headers.clone(),
                        self.memory.clone(),
                        self.disk.clone(),
                    );
                    let load: SharedLoad = async move {
                        match Abortable::new(download, registration).await {
                            Ok(result) => result,
                            Err(_) => Err(ImageError::Cancelled),
                        }
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(
                        key.clone(),
                        InFlight {
                            load: load.clone(),
                            abort,
                        },
                    );
                    load
                }
            }
        };

        let result = load.clone().await;

        let mut in_flight = self.in_flight.lock().await;
        if in_flight.get(&key).is_some_and(|f| f.load.ptr_eq(&load)) {
            in_flight.remove(&key);
        }
        result
    }

    /// Warm the cache in the background
    pub fn prefetch(&self, urls: Vec<String>, options: ImageOptions) -> tokio::task::JoinHandle<()> {
        let loader = self.clone();
        tokio::spawn(async move {
            for url in urls {
                if let Err(e) = loader.load(&url, &options).await {
                    debug!(url, error = %e, "prefetch failed");
                }
            }
        })
    }

    /// Abort an in-flight download; waiters receive `ImageError::Cancelled`
    pub async fn cancel(&self, url: &str) {
        let key = Url::parse(url).map(|u| u.to_string()).unwrap_or_else(|_| url.to_string());
        if let Some(active) = self.in_flight.lock().await.remove(&key) {
            debug!(url = %key, "cancelling image download");
            active.abort.abort();
        }
    }

    pub async fn clear_memory(&self) {
        self.memory.lock().await.clear();
    }

    pub async fn clear_disk(&self) -> std::io::Result<()> {
        if fs::try_exists(&self.disk.dir).await? {
            fs::remove_dir_all(&self.disk.dir).await?;
        }
        fs::create_dir_all(&self.disk.dir).await
    }
}

async fn download(
    client: reqwest::Client,
    url: Url,
    headers: Vec<(String, String)>,
    memory: Arc<Mutex<MemoryTier>>,
    disk: Arc<DiskTier>,
) -> Result<ImageResponse, ImageError> {
    let key = url.to_string();
    debug!(url = %key, "downloading image");

    let mut req = client.get(url);
    for (k, v) in &headers {
        req = req.header(k, v);
    }

    let resp = req.send().await.map_err(|e| ImageError::Network(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(ImageError::Network(format!("HTTP {}", resp.status().as_u16())));
    }

    let header = |name: &str| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let mime_type = header("content-type");
    let etag = header("etag");

    let data = resp.bytes().await.map_err(|e| ImageError::Network(e.to_string()))?;
    if data.is_empty() {
        return Err(ImageError::Decode);
    }

    memory.lock().await.insert(key.clone(), data.clone());
    disk.write(&key, &data).await;

    Ok(ImageResponse {
        data,
        mime_type,
        etag,
        from_cache: false,
    })
}
