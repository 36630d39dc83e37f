use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::catalog::loader::{load_service_catalog, load_solution_catalog};
use crate::catalog::models::{ServiceCatalog, SolutionCatalog};
use crate::catalog::source::{TabularSource, XlsxSource};
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::metrics;

/// Which of the two catalogs an operation concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    /// Flat services + recording tiers (system of record)
    Services,
    /// Grouped in-house solutions (legacy read path)
    Solutions,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Solutions => "solutions",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load-once, serve-many holder for both catalogs.
///
/// Cached catalogs are immutable `Arc`s swapped atomically, so readers never
/// observe a partially built catalog. A failed load leaves the slot empty
/// (or, on reload, untouched) and the error goes back to the caller.
pub struct CatalogService {
    services_source: Arc<dyn TabularSource>,
    solutions_source: Arc<dyn TabularSource>,
    services: ArcSwapOption<ServiceCatalog>,
    solutions: ArcSwapOption<SolutionCatalog>,
    /// Serialises loads so concurrent first requests read the file once
    load_lock: Mutex<()>,
}

impl CatalogService {
    pub fn new(
        services_source: Arc<dyn TabularSource>,
        solutions_source: Arc<dyn TabularSource>,
    ) -> Self {
        Self {
            services_source,
            solutions_source,
            services: ArcSwapOption::empty(),
            solutions: ArcSwapOption::empty(),
            load_lock: Mutex::new(()),
        }
    }

    /// Service backed by the workbooks named in the catalog configuration
    pub fn from_config(cfg: &CatalogConfig) -> Self {
        Self::new(
            Arc::new(XlsxSource::new(cfg.services_path())),
            Arc::new(XlsxSource::new(cfg.solutions_path())),
        )
    }

    /// Flat catalog, loading it first if nothing is cached yet
    pub async fn services(&self) -> Result<Arc<ServiceCatalog>, CatalogError> {
        if let Some(cached) = self.services.load_full() {
            return Ok(cached);
        }

        let _guard = self.load_lock.lock().await;
        // Another request may have finished loading while we waited
        if let Some(cached) = self.services.load_full() {
            return Ok(cached);
        }

        let catalog = Arc::new(self.load_services().await?);
        self.services.store(Some(catalog.clone()));
        Ok(catalog)
    }

    /// Grouped catalog, loading it first if nothing is cached yet
    pub async fn solutions(&self) -> Result<Arc<SolutionCatalog>, CatalogError> {
        if let Some(cached) = self.solutions.load_full() {
            return Ok(cached);
        }

        let _guard = self.load_lock.lock().await;
        if let Some(cached) = self.solutions.load_full() {
            return Ok(cached);
        }

        let catalog = Arc::new(self.load_solutions().await?);
        self.solutions.store(Some(catalog.clone()));
        Ok(catalog)
    }

    /// Whether the flat catalog is cached
    pub fn is_loaded(&self) -> bool {
        self.services.load().is_some()
    }

    /// Drop both cached catalogs; the next query reloads from source
    pub fn invalidate(&self) {
        self.services.store(None);
        self.solutions.store(None);
        info!("Catalog cache invalidated");
    }

    /// Re-read both sources and swap in whatever loaded successfully.
    ///
    /// A catalog that fails to load keeps its previous cached value. The first
    /// failure is returned.
    pub async fn reload(&self) -> Result<(), CatalogError> {
        let _guard = self.load_lock.lock().await;

        let services = self.load_services().await;
        let solutions = self.load_solutions().await;

        let services_result = services.map(|c| self.services.store(Some(Arc::new(c))));
        let solutions_result = solutions.map(|c| self.solutions.store(Some(Arc::new(c))));

        services_result.and(solutions_result)?;
        info!("Catalogs reloaded");
        Ok(())
    }

    async fn load_services(&self) -> Result<ServiceCatalog, CatalogError> {
        let source = self.services_source.clone();
        let result = run_blocking(move || load_service_catalog(source.as_ref())).await;
        observe_load(
            CatalogKind::Services,
            self.services_source.as_ref(),
            result.as_ref().map(|c| c.len()),
        );
        result
    }

    async fn load_solutions(&self) -> Result<SolutionCatalog, CatalogError> {
        let source = self.solutions_source.clone();
        let result = run_blocking(move || load_solution_catalog(source.as_ref())).await;
        observe_load(
            CatalogKind::Solutions,
            self.solutions_source.as_ref(),
            result.as_ref().map(|c| c.len()),
        );
        result
    }
}

async fn run_blocking<T, F>(load: F) -> Result<T, CatalogError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CatalogError> + Send + 'static,
{
    tokio::task::spawn_blocking(load)
        .await
        .map_err(|e| CatalogError::Join(e.to_string()))?
}

fn observe_load(
    kind: CatalogKind,
    source: &dyn TabularSource,
    result: Result<usize, &CatalogError>,
) {
    match result {
        Ok(rows) => {
            metrics::record_catalog_load(kind.as_str(), "ok");
            metrics::set_catalog_rows(kind.as_str(), rows);
        }
        Err(e) => {
            metrics::record_catalog_load(kind.as_str(), "error");
            error!(
                catalog = %kind,
                source = %source.describe(),
                error = %e,
                "Failed to load catalog"
            );
        }
    }
}
