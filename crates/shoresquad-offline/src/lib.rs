//! Offline asset cache for ShoreSquad
//!
//! A small worker with three externally triggered steps: install fills the
//! current cache, activate drops older generations, and fetch answers requests
//! cache first with a network and fallback-page chain behind it.

pub mod network;
pub mod storage;
pub mod types;
pub mod worker;

pub use network::{HttpNetwork, Network};
pub use storage::{CacheStorage, DiskCacheStorage, MemoryCacheStorage};
pub use types::{CacheTag, OfflineError, Response, ResponseType, WorkerPhase, DEFAULT_CACHE_TAG};
pub use worker::{InstallReport, OfflineWorker, DEFAULT_ASSETS, DEFAULT_FALLBACK_PAGE};
