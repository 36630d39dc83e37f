use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use pricing_simulator::{
    catalog::{CatalogService, ServiceCatalog, SolutionCatalog},
    config::Config,
};

/// Execute the catalog command: print one workbook as a table
pub async fn execute(cfg: Config, legacy: bool) -> Result<()> {
    let catalogs = CatalogService::from_config(&cfg.catalog);

    let table = if legacy {
        let solutions = catalogs.solutions().await.with_context(|| {
            format!("Failed to load {}", cfg.catalog.solutions_path().display())
        })?;
        solutions_table(&solutions)
    } else {
        let services = catalogs.services().await.with_context(|| {
            format!("Failed to load {}", cfg.catalog.services_path().display())
        })?;
        services_table(&services)
    };

    println!("{table}");
    Ok(())
}

fn money(value: f64) -> Cell {
    Cell::new(format!("{:.2}", value)).set_alignment(CellAlignment::Right)
}

fn services_table(catalog: &ServiceCatalog) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "ID",
        "Categoría",
        "Servicio",
        "Modalidad",
        "Precio USD/mes",
    ]);

    for row in catalog.services() {
        table.add_row(vec![
            Cell::new(row.id),
            Cell::new(&row.categoria),
            Cell::new(&row.servicio),
            Cell::new(&row.modalidad),
            money(row.precio_usd),
        ]);
    }
    table
}

fn solutions_table(catalog: &SolutionCatalog) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "ID",
        "Solución",
        "Etiqueta",
        "Componentes",
        "Costo USD/mes",
    ]);

    for solution in catalog.solutions() {
        let components = solution
            .components
            .iter()
            .map(|c| c.concept.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&solution.id),
            Cell::new(&solution.name),
            Cell::new(&solution.etiqueta),
            Cell::new(components),
            money(solution.total_cost()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricing_simulator::catalog::{ComponentCost, PriceRow, SolutionDef};

    #[test]
    fn test_services_table_lists_every_row() {
        let catalog = ServiceCatalog::new(vec![PriceRow {
            id: 7,
            categoria: "LECTURA DE PLACAS".to_string(),
            servicio: "LPR".to_string(),
            modalidad: "Nube".to_string(),
            retencion_imagenes: None,
            resolucion_predeterminada: None,
            fps: None,
            precio_usd: 30.0,
            notas: None,
        }]);

        let rendered = services_table(&catalog).to_string();
        assert!(rendered.contains("LECTURA DE PLACAS"));
        assert!(rendered.contains("30.00"));
    }

    #[test]
    fn test_solutions_table_joins_components() {
        let catalog = SolutionCatalog::new(vec![SolutionDef {
            id: "patio".to_string(),
            name: "Patio".to_string(),
            etiqueta: "General".to_string(),
            components: vec![
                ComponentCost {
                    concept: "Servidor".to_string(),
                    cost_usd: 3.0,
                    description: None,
                },
                ComponentCost {
                    concept: "Licencia".to_string(),
                    cost_usd: 1.5,
                    description: None,
                },
            ],
        }]);

        let rendered = solutions_table(&catalog).to_string();
        assert!(rendered.contains("Servidor, Licencia"));
        assert!(rendered.contains("4.50"));
    }
}
