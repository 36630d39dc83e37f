pub mod catalog;
pub mod health;
pub mod metrics_handler;
pub mod quote;

use std::sync::Arc;

use crate::catalog::CatalogService;
use crate::config::QuoteConfig;

/// Shared state for the API routes
#[derive(Clone)]
pub struct AppState {
    pub catalogs: Arc<CatalogService>,
    pub quote: Arc<QuoteConfig>,
}
