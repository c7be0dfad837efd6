//! Offline asset cache policy.
//!
//! The policy is written against three small async seams so it can run both
//! inside a service worker (see [`crate::sw`]) and against in-memory mocks:
//!
//! - [`CacheStorage`] / [`Cache`]: the host's named, versioned cache store
//! - [`Network`]: the host's fetch primitive
//!
//! Routing per request:
//! - non-GET or foreign origin: not intercepted
//! - known web-font host: network-first
//! - same origin: cache-first, with the cached root document as an offline
//!   shell for HTML navigations

use crate::config::{CACHE_VERSION, FONT_HOSTS, OFFLINE_SHELL};
use crate::error::Result;
use crate::manifest::{AssetManifest, MANIFEST};
use async_trait::async_trait;
use futures::future::{join_all, try_join_all};
use log::{debug, info, warn};
use url::{Origin, Url};

/// What the policy needs to know about an outgoing request.
pub trait AssetRequest {
    fn method(&self) -> String;
    fn url(&self) -> String;
    fn accept(&self) -> Option<String>;

    fn accepts_html(&self) -> bool {
        self.accept().is_some_and(|accept| accept.contains("text/html"))
    }
}

/// What the policy needs to know about a response.
pub trait AssetResponse: Sized {
    /// HTTP success flag (status 200-299).
    fn is_ok(&self) -> bool;

    /// Independent copy, so one can be stored while the other is returned.
    fn duplicate(&self) -> Result<Self>;
}

/// One named cache.
#[async_trait(?Send)]
pub trait Cache {
    type Request: AssetRequest;
    type Response: AssetResponse;

    async fn lookup(&self, request: &Self::Request) -> Result<Option<Self::Response>>;
    async fn lookup_path(&self, path: &str) -> Result<Option<Self::Response>>;
    async fn put(&self, request: &Self::Request, response: Self::Response) -> Result<()>;

    /// Fetch and store a single asset.
    async fn add(&self, path: &str) -> Result<()>;

    /// Fetch and store every asset, storing nothing if any of them fails.
    async fn add_all(&self, paths: &[String]) -> Result<()>;
}

/// The collection of named caches.
#[async_trait(?Send)]
pub trait CacheStorage {
    type Cache: Cache;

    async fn open(&self, name: &str) -> Result<Self::Cache>;
    async fn keys(&self) -> Result<Vec<String>>;
    async fn delete(&self, name: &str) -> Result<bool>;
}

#[async_trait(?Send)]
pub trait Network {
    type Request: AssetRequest;
    type Response: AssetResponse;

    /// Rejects only when the transport fails; HTTP errors are responses.
    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response>;
}

type RequestOf<S> = <<S as CacheStorage>::Cache as Cache>::Request;
type ResponseOf<S> = <<S as CacheStorage>::Cache as Cache>::Response;

/// Serving strategy chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Passthrough,
    NetworkFirst,
    CacheFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallReport {
    pub mandatory: usize,
    pub optional_cached: usize,
    pub optional_failed: usize,
}

pub struct OfflineCache<S, N> {
    storage: S,
    network: N,
    origin: Origin,
    version: String,
    font_hosts: Vec<String>,
    offline_shell: String,
    manifest: AssetManifest,
}

impl<S, N> OfflineCache<S, N>
where
    S: CacheStorage,
    N: Network<Request = RequestOf<S>, Response = ResponseOf<S>>,
{
    /// Policy for the worker served from `origin`, using the compiled-in
    /// version, font hosts and manifest.
    pub fn new(storage: S, network: N, origin: Origin) -> Self {
        OfflineCache {
            storage,
            network,
            origin,
            version: CACHE_VERSION.to_string(),
            font_hosts: FONT_HOSTS.iter().map(|h| h.to_string()).collect(),
            offline_shell: OFFLINE_SHELL.to_string(),
            manifest: MANIFEST.clone(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_manifest(mut self, manifest: AssetManifest) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn with_font_hosts<I, H>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<String>,
    {
        self.font_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    pub fn route(&self, request: &RequestOf<S>) -> Route {
        if !request.method().eq_ignore_ascii_case("GET") {
            return Route::Passthrough;
        }
        let Ok(url) = Url::parse(&request.url()) else {
            return Route::Passthrough;
        };

        let is_font_host = url
            .host_str()
            .is_some_and(|host| self.font_hosts.iter().any(|f| f == host));

        if is_font_host {
            Route::NetworkFirst
        } else if url.origin() == self.origin {
            Route::CacheFirst
        } else {
            Route::Passthrough
        }
    }

    /// Pre-populate the current version's cache.
    ///
    /// Any mandatory asset failing aborts the install with that error.
    /// Optional assets are attempted independently and failures only logged.
    pub async fn install(&self) -> Result<InstallReport> {
        info!("Installing cache {}", self.version);
        let cache = self.storage.open(&self.version).await?;

        cache.add_all(&self.manifest.mandatory).await?;
        info!("Cached {} mandatory assets", self.manifest.mandatory.len());

        let cache = &cache;
        let results = join_all(
            self.manifest
                .optional
                .iter()
                .map(|path| async move { (path, cache.add(path).await) }),
        )
        .await;

        let mut optional_failed = 0;
        for (path, result) in results {
            if let Err(err) = result {
                warn!("Optional asset {} not cached: {}", path, err);
                optional_failed += 1;
            }
        }

        Ok(InstallReport {
            mandatory: self.manifest.mandatory.len(),
            optional_cached: self.manifest.optional.len() - optional_failed,
            optional_failed,
        })
    }

    /// Delete every cache not named after the current version. Returns the
    /// names that were removed.
    pub async fn activate(&self) -> Result<Vec<String>> {
        let stale: Vec<String> = self
            .storage
            .keys()
            .await?
            .into_iter()
            .filter(|name| *name != self.version)
            .collect();

        try_join_all(stale.iter().map(|name| self.storage.delete(name))).await?;

        info!(
            "Activated cache {} ({} stale caches removed)",
            self.version,
            stale.len()
        );
        Ok(stale)
    }

    pub async fn respond(&self, request: &RequestOf<S>, route: Route) -> Result<ResponseOf<S>> {
        debug!("{:?} {}", route, request.url());
        match route {
            Route::NetworkFirst => self.network_first(request).await,
            Route::CacheFirst => self.cache_first(request).await,
            Route::Passthrough => self.network.fetch(request).await,
        }
    }

    async fn network_first(&self, request: &RequestOf<S>) -> Result<ResponseOf<S>> {
        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_ok() {
                    self.store(request, &response).await;
                }
                Ok(response)
            }
            Err(err) => {
                debug!("Network failed for {}, trying cache", request.url());
                match self.cached(request).await {
                    Some(response) => Ok(response),
                    None => Err(err),
                }
            }
        }
    }

    async fn cache_first(&self, request: &RequestOf<S>) -> Result<ResponseOf<S>> {
        if let Some(response) = self.cached(request).await {
            return Ok(response);
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_ok() {
                    self.store(request, &response).await;
                }
                Ok(response)
            }
            Err(err) => {
                if request.accepts_html() {
                    if let Some(shell) = self.cached_path(&self.offline_shell).await {
                        debug!("Serving offline shell for {}", request.url());
                        return Ok(shell);
                    }
                }
                Err(err)
            }
        }
    }

    async fn cached(&self, request: &RequestOf<S>) -> Option<ResponseOf<S>> {
        let lookup = async {
            let cache = self.storage.open(&self.version).await?;
            cache.lookup(request).await
        };
        lookup.await.unwrap_or_else(|err| {
            warn!("Cache lookup for {} failed: {}", request.url(), err);
            None
        })
    }

    async fn cached_path(&self, path: &str) -> Option<ResponseOf<S>> {
        let lookup = async {
            let cache = self.storage.open(&self.version).await?;
            cache.lookup_path(path).await
        };
        lookup.await.unwrap_or_else(|err| {
            warn!("Cache lookup for {} failed: {}", path, err);
            None
        })
    }

    async fn store(&self, request: &RequestOf<S>, response: &ResponseOf<S>) {
        let put = async {
            let copy = response.duplicate()?;
            let cache = self.storage.open(&self.version).await?;
            cache.put(request, copy).await
        };
        if let Err(err) = put.await {
            warn!("Could not cache {}: {}", request.url(), err);
        }
    }
}
