use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and describe the simulator metrics
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "pricing_catalog_loads_total",
        "Catalog load attempts by catalog and outcome"
    );
    describe_gauge!(
        "pricing_catalog_rows",
        "Records in the most recently loaded catalog"
    );
    describe_counter!(
        "pricing_quotes_total",
        "Quotes computed or printed, by outcome"
    );
    describe_gauge!(
        "pricing_simulator_info",
        "Simulator version information"
    );

    gauge!("pricing_simulator_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a catalog load attempt
pub fn record_catalog_load(catalog: &str, outcome: &str) {
    counter!(
        "pricing_catalog_loads_total",
        "catalog" => catalog.to_string(),
        "outcome" => outcome.to_string(),
    )
    .increment(1);
}

/// Record the size of a freshly loaded catalog
pub fn set_catalog_rows(catalog: &str, rows: usize) {
    gauge!("pricing_catalog_rows", "catalog" => catalog.to_string()).set(rows as f64);
}

/// Record a quote computation (`computed`, `printed`, `rejected`)
pub fn record_quote(outcome: &str) {
    counter!("pricing_quotes_total", "outcome" => outcome.to_string()).increment(1);
}
