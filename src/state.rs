//! Application state: the current reference-data snapshot and the generation store.
//!
//! The snapshot is an `Arc<ReferenceData>` behind a lock. Readers clone the
//! `Arc` once per operation and compute against that copy, so catalogs never
//! change under a running computation; a reload swaps in a new `Arc` for
//! subsequent requests only.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::catalog::ReferenceData;
use crate::config::{load_catalog_from_env, CatalogConfig};
use crate::seeds::demo_catalog;
use crate::store::{GenerationStore, MemoryGenerationStore};

#[derive(Clone)]
pub struct AppState {
    reference: Arc<RwLock<Arc<ReferenceData>>>,
    pub store: Arc<dyn GenerationStore>,
}

impl AppState {
    /// Build state from env: load the catalog file if configured, else the demo catalog.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_catalog_from_env().unwrap_or_else(|| {
            warn!(target: "consultant_backend", "No usable CATALOG_PATH; serving built-in demo catalog");
            demo_catalog()
        });
        Self::with_parts(cfg, Arc::new(MemoryGenerationStore::new()))
    }

    pub fn with_parts(cfg: CatalogConfig, store: Arc<dyn GenerationStore>) -> Self {
        let data = ReferenceData::from_config(cfg);
        log_inventory(&data);
        Self {
            reference: Arc::new(RwLock::new(Arc::new(data))),
            store,
        }
    }

    /// Consistent view of every catalog for one operation.
    pub async fn snapshot(&self) -> Arc<ReferenceData> {
        self.reference.read().await.clone()
    }

    /// Swap the reference data for later requests. Existing generations are unaffected.
    #[instrument(level = "info", skip_all)]
    pub async fn replace_reference(&self, cfg: CatalogConfig) {
        let data = ReferenceData::from_config(cfg);
        log_inventory(&data);
        *self.reference.write().await = Arc::new(data);
    }

    /// Re-read CATALOG_PATH. Returns false (keeping the current snapshot) if it is unusable.
    pub async fn reload_from_env(&self) -> bool {
        match load_catalog_from_env() {
            Some(cfg) => {
                self.replace_reference(cfg).await;
                true
            }
            None => false,
        }
    }
}

fn log_inventory(data: &ReferenceData) {
    info!(
        target: "consultant_backend",
        products = data.products.len(),
        situations = data.situations.len(),
        age_groups = data.age_groups.len(),
        cities = data.cities.len(),
        job_spheres = data.job_spheres.len(),
        sprites = data.sprites.len(),
        hints = data.hints.len(),
        reviews = data.reviews.len(),
        "Reference catalog inventory"
    );
}
