use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::catalog::models::{
    ComponentCost, PriceRow, ServiceCatalog, SolutionCatalog, SolutionDef,
    DEFAULT_COMPONENT_CONCEPT, DEFAULT_SOLUTION_TAG,
};
use crate::catalog::source::{SourceRow, TabularSource};
use crate::error::CatalogError;

// Grouped catalog headers
const COL_SOLUTION_NAME: &str = "Solución / Categoría";
const COL_TAG: &str = "Etiqueta";
const COL_CONCEPT: &str = "Concepto";
const COL_COST: &str = "Costo Real (USD)";
const COL_DESCRIPTION: &str = "Descripción Técnica";

/// Read the flat service catalog.
///
/// Never fails on row content: absent or non-numeric numbers become `0`,
/// a missing `id` becomes the 1-based row position and empty optional text
/// becomes `None`. Only an unreadable source fails the load.
pub fn load_service_catalog(source: &dyn TabularSource) -> Result<ServiceCatalog, CatalogError> {
    let rows = source.rows()?;
    let prices: Vec<PriceRow> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| price_row_from(row, index))
        .collect();

    info!(
        source = %source.describe(),
        rows = prices.len(),
        "Parsed service catalog"
    );
    Ok(ServiceCatalog::new(prices))
}

/// Read the grouped solution catalog.
///
/// Rows sharing a trimmed `Solución / Categoría` merge into one solution in
/// first-seen order; the first row's `Etiqueta` wins. Rows without a name
/// are skipped.
pub fn load_solution_catalog(source: &dyn TabularSource) -> Result<SolutionCatalog, CatalogError> {
    let rows = source.rows()?;
    let solutions = group_solutions(&rows);

    info!(
        source = %source.describe(),
        rows = rows.len(),
        solutions = solutions.len(),
        "Parsed solution catalog"
    );
    Ok(SolutionCatalog::new(solutions))
}

fn price_row_from(row: &SourceRow, index: usize) -> PriceRow {
    let id = match row.get("id") {
        Some(cell) => cell
            .as_number()
            .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
            .map(|n| n as u32)
            .unwrap_or(0),
        None => (index + 1) as u32,
    };

    PriceRow {
        id,
        categoria: text_or_empty(row, "categoria"),
        servicio: text_or_empty(row, "servicio"),
        modalidad: text_or_empty(row, "modalidad"),
        retencion_imagenes: optional_text(row, "retencion_imagenes"),
        resolucion_predeterminada: optional_text(row, "resolucion_predeterminada"),
        fps: optional_text(row, "fps"),
        precio_usd: non_negative_number(row, "precio_usd"),
        notas: optional_text(row, "notas"),
    }
}

fn group_solutions(rows: &[SourceRow]) -> Vec<SolutionDef> {
    let mut solutions: Vec<SolutionDef> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let name = match trimmed_text(row, COL_SOLUTION_NAME) {
            Some(name) => name,
            None => {
                debug!("Skipping solution row without a name");
                continue;
            }
        };

        let component = ComponentCost {
            concept: optional_text(row, COL_CONCEPT)
                .unwrap_or_else(|| DEFAULT_COMPONENT_CONCEPT.to_string()),
            cost_usd: finite_number(row, COL_COST),
            description: optional_text(row, COL_DESCRIPTION),
        };

        let slot = *by_name.entry(name.clone()).or_insert_with(|| {
            solutions.push(SolutionDef {
                id: slugify(&name),
                etiqueta: optional_text(row, COL_TAG)
                    .unwrap_or_else(|| DEFAULT_SOLUTION_TAG.to_string()),
                name,
                components: Vec::new(),
            });
            solutions.len() - 1
        });

        solutions[slot].components.push(component);
    }

    solutions
}

/// Stable identifier derived from a display name:
/// lowercase, runs outside `[a-z0-9]` collapsed to `_`, edges trimmed.
pub fn slugify(name: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));

    re.replace_all(&name.to_lowercase(), "_")
        .trim_matches('_')
        .to_string()
}

fn text_or_empty(row: &SourceRow, key: &str) -> String {
    row.get(key).map(|c| c.as_text()).unwrap_or_default()
}

/// Cell text as written; `None` when blank
fn optional_text(row: &SourceRow, key: &str) -> Option<String> {
    row.get(key)
        .map(|c| c.as_text())
        .filter(|s| !s.trim().is_empty())
}

fn trimmed_text(row: &SourceRow, key: &str) -> Option<String> {
    optional_text(row, key).map(|s| s.trim().to_string())
}

/// Prices: anything negative or non-numeric is 0
fn non_negative_number(row: &SourceRow, key: &str) -> f64 {
    Some(finite_number(row, key))
        .filter(|n| *n >= 0.0)
        .unwrap_or(0.0)
}

/// Any finite number, sign kept; non-numeric or absent is 0
fn finite_number(row: &SourceRow, key: &str) -> f64 {
    row.get(key).and_then(|c| c.as_number()).unwrap_or(0.0)
}
