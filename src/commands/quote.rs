use anyhow::{Context, Result};
use colored::Colorize;
use pricing_simulator::{
    catalog::{CatalogService, SolutionCatalog},
    config::Config,
    quote::{self, QuoteRequest},
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Execute the quote command
///
/// Reads a quote request, refuses it the way the print endpoint does, and
/// prints the summary otherwise.
pub async fn execute(cfg: Config, file: &Path) -> Result<()> {
    let request = read_request(file)?;

    if let Err(e) = quote::finalize(&request.items) {
        println!("{} {}", "✗".red(), e.to_string().red());
        anyhow::bail!("Quote refused: {}", e);
    }

    let catalogs = CatalogService::from_config(&cfg.catalog);
    let services = catalogs.services().await.with_context(|| {
        format!("Failed to load {}", cfg.catalog.services_path().display())
    })?;
    let solutions = if request.items.iter().any(|i| !i.selected_solution_ids.is_empty()) {
        catalogs.solutions().await.with_context(|| {
            format!("Failed to load {}", cfg.catalog.solutions_path().display())
        })?
    } else {
        Arc::new(SolutionCatalog::default())
    };

    let options = request.options(&cfg.quote);
    let priced = quote::build_quote(&request.items, &services, &solutions, &options);
    info!(lines = priced.lines.len(), "Quote computed from {}", file.display());

    println!("{}", quote::render_summary(&priced));
    Ok(())
}

fn read_request(file: &Path) -> Result<QuoteRequest> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read quote request {}", file.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid quote request in {}", file.display()))
}
