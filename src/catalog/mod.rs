pub mod loader;
pub mod models;
pub mod service;
pub mod source;

pub use loader::{load_service_catalog, load_solution_catalog, slugify};
pub use models::{
    ComponentCost, PriceRow, ServiceCatalog, SolutionCatalog, SolutionDef, RECORDING_CATEGORY,
};
pub use service::{CatalogKind, CatalogService};
pub use source::{Cell, MemorySource, SourceRow, TabularSource, XlsxSource};
