use anyhow::{Context, Result};
use colored::Colorize;
use pricing_simulator::{catalog::CatalogService, config::Config};
use tracing::info;

/// Execute the test command
///
/// The configuration was already loaded and validated; this prints it and
/// then loads both workbooks.
pub async fn execute(cfg: Config) -> Result<()> {
    println!("{}", "✓ Configuration test successful".green());
    println!();

    println!("{}", "Configuration Summary:".bold());
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!("  {}: {}", "Log Level".cyan(), cfg.server.log_level);
    println!("  {}: {}", "Log Format".cyan(), cfg.server.log_format);
    println!(
        "  {}: {}% margin, {} at {}",
        "Quotes".cyan(),
        cfg.quote.default_margin_percent,
        cfg.quote.currency,
        cfg.quote.exchange_rate
    );
    println!(
        "  {}: {}",
        "Metrics".cyan(),
        if cfg.metrics.enabled {
            format!("enabled ({})", cfg.metrics.endpoint).green()
        } else {
            "disabled".red()
        }
    );
    println!();

    println!("{}", "Testing catalogs...".yellow());
    let catalogs = CatalogService::from_config(&cfg.catalog);

    let services = catalogs.services().await.with_context(|| {
        format!("Failed to load {}", cfg.catalog.services_path().display())
    })?;
    println!(
        "  {} {}: {} analytics services, {} recording tiers",
        "✓".green(),
        cfg.catalog.services_path().display(),
        services.analytics().count(),
        services.recording_tiers().count()
    );

    let solutions = catalogs.solutions().await.with_context(|| {
        format!("Failed to load {}", cfg.catalog.solutions_path().display())
    })?;
    println!(
        "  {} {}: {} solutions",
        "✓".green(),
        cfg.catalog.solutions_path().display(),
        solutions.len()
    );

    info!("Configuration and catalog validation completed successfully");
    Ok(())
}
