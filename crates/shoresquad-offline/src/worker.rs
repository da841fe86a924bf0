//! Install, activate, and fetch handling for offline assets.

use parking_lot::Mutex;
use url::Url;

use crate::network::Network;
use crate::storage::CacheStorage;
use crate::types::{CacheTag, OfflineError, Response, WorkerPhase};

/// Assets cached on install.
pub const DEFAULT_ASSETS: [&str; 4] = ["/", "/index.html", "/css/styles.css", "/js/app.js"];

/// Page served when the network is unreachable.
pub const DEFAULT_FALLBACK_PAGE: &str = "/index.html";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub cached: Vec<String>,
    /// Asset path and failure reason
    pub failed: Vec<(String, String)>,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct OfflineWorker<C, N> {
    tag: CacheTag,
    origin: Url,
    assets: Vec<String>,
    fallback_page: String,
    storage: C,
    network: N,
    phase: Mutex<WorkerPhase>,
}

impl<C: CacheStorage, N: Network> OfflineWorker<C, N> {
    pub fn new(tag: CacheTag, origin: &str, storage: C, network: N) -> Result<Self, OfflineError> {
        Ok(Self {
            tag,
            origin: Url::parse(origin)?,
            assets: DEFAULT_ASSETS.iter().map(|a| a.to_string()).collect(),
            fallback_page: DEFAULT_FALLBACK_PAGE.to_string(),
            storage,
            network,
            phase: Mutex::new(WorkerPhase::Parsed),
        })
    }

    pub fn with_assets(mut self, assets: Vec<String>) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_fallback_page(mut self, page: impl Into<String>) -> Self {
        self.fallback_page = page.into();
        self
    }

    pub fn tag(&self) -> &CacheTag {
        &self.tag
    }

    pub fn phase(&self) -> WorkerPhase {
        *self.phase.lock()
    }

    pub fn storage(&self) -> &C {
        &self.storage
    }

    /// Pre-populate the current cache. A failing asset is recorded and skipped.
    pub async fn install(&self) -> Result<InstallReport, OfflineError> {
        self.storage.open(self.tag.as_str())?;

        let mut report = InstallReport::default();
        for asset in &self.assets {
            match self.cache_asset(asset).await {
                Ok(()) => report.cached.push(asset.clone()),
                Err(e) => {
                    tracing::warn!(asset = %asset, "Failed to cache asset: {}", e);
                    report.failed.push((asset.clone(), e.to_string()));
                }
            }
        }

        *self.phase.lock() = WorkerPhase::Installed;
        tracing::info!(
            tag = %self.tag,
            cached = report.cached.len(),
            failed = report.failed.len(),
            "Offline cache installed"
        );
        Ok(report)
    }

    async fn cache_asset(&self, asset: &str) -> Result<(), OfflineError> {
        let url = self.resolve(asset)?;
        let response = self.network.fetch(&url).await?;
        if !response.is_cacheable() {
            return Err(OfflineError::Network(format!("HTTP {}", response.status)));
        }
        self.storage.put(self.tag.as_str(), url.as_str(), &response)
    }

    /// Delete every cache whose name is not the current tag.
    pub async fn activate(&self) -> Result<Vec<String>, OfflineError> {
        let mut deleted = Vec::new();
        for name in self.storage.keys()? {
            if name != self.tag.as_str() && self.storage.delete(&name)? {
                tracing::info!("Deleting old cache: {}", name);
                deleted.push(name);
            }
        }

        *self.phase.lock() = WorkerPhase::Activated;
        Ok(deleted)
    }

    /// Cache first, then network, then the cached fallback page.
    pub async fn fetch(&self, request: &str) -> Result<Response, OfflineError> {
        let url = self.resolve(request)?;

        if let Some(hit) = self.storage.lookup(url.as_str())? {
            tracing::debug!(url = %url, "Serving from cache");
            return Ok(hit);
        }

        match self.network.fetch(&url).await {
            Ok(response) => {
                if response.is_cacheable() {
                    if let Err(e) = self.storage.put(self.tag.as_str(), url.as_str(), &response) {
                        tracing::warn!(url = %url, "Failed to cache response: {}", e);
                    }
                }
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(url = %url, "Network unavailable, trying fallback page: {}", e);
                let fallback = self.resolve(&self.fallback_page)?;
                self.storage
                    .lookup(fallback.as_str())?
                    .ok_or_else(|| OfflineError::Unavailable(url.to_string()))
            }
        }
    }

    fn resolve(&self, request: &str) -> Result<Url, OfflineError> {
        Ok(self.origin.join(request)?)
    }
}
