//! Quote arithmetic
//!
//! Everything in here is a pure function of catalog data and the caller's
//! line items. Dangling catalog references contribute nothing; they never
//! fail a computation.

use std::collections::HashMap;

use crate::catalog::{ServiceCatalog, SolutionCatalog};
use crate::error::QuoteError;
use crate::quote::input;
use crate::quote::models::{
    CameraCartItem, ConvertedTotals, CostPeriods, LineItemCost, Quote, QuoteOptions, QuoteTotals,
    RecordingChoice, RecordingInfo, Simulation, SimulationInput, LOCAL_RECORDING_LABEL,
    LOCAL_RECORDING_PRICE,
};

/// Resolve a recording selection against the recording tiers of `catalog`.
///
/// `Local` always resolves to the fixed local price. An id that is not a
/// recording tier resolves to `None`.
pub fn recording_info(
    choice: Option<RecordingChoice>,
    catalog: &ServiceCatalog,
) -> Option<RecordingInfo> {
    match choice? {
        RecordingChoice::Local => Some(RecordingInfo {
            modalidad: LOCAL_RECORDING_LABEL.to_string(),
            precio_usd: LOCAL_RECORDING_PRICE,
        }),
        RecordingChoice::Catalog(id) => catalog
            .recording_tiers()
            .find(|r| r.id == id)
            .map(|r| RecordingInfo {
                modalidad: r.modalidad.clone(),
                precio_usd: r.precio_usd,
            }),
    }
}

/// Base cost of one line item, without margin.
///
/// Daily and weekly totals are derived from the per-camera monthly price and
/// then multiplied by the quantity, so each granularity follows its own
/// formula.
pub fn line_item_base_cost(
    item: &CameraCartItem,
    services: &ServiceCatalog,
    solutions: &SolutionCatalog,
) -> LineItemCost {
    let analytics: Vec<_> = services
        .analytics()
        .filter(|s| item.selected_service_ids.contains(&s.id))
        .collect();
    let selected_solutions: Vec<_> = solutions
        .solutions()
        .iter()
        .filter(|s| item.selected_solution_ids.contains(&s.id))
        .collect();
    let recording = recording_info(item.selected_recording, services);

    let monthly_per_camera = analytics.iter().map(|s| s.precio_usd).sum::<f64>()
        + selected_solutions.iter().map(|s| s.total_cost()).sum::<f64>()
        + recording.as_ref().map(|r| r.precio_usd).unwrap_or(0.0);

    let quantity = item.cantidad as f64;
    let base = CostPeriods::from_monthly(monthly_per_camera).map(|v| v * quantity);

    LineItemCost {
        id: item.id.clone(),
        nombre: item.nombre.clone(),
        cantidad: item.cantidad,
        services: analytics.iter().map(|s| s.servicio.clone()).collect(),
        solutions: selected_solutions.iter().map(|s| s.name.clone()).collect(),
        recording,
        monthly_per_camera,
        base,
        duplicate_id: false,
    }
}

/// `base * (1 + margin / 100)`; a negative or non-finite margin counts as 0
pub fn apply_margin(base: f64, margin_percent: f64) -> f64 {
    base * (1.0 + input::margin_percent(Some(margin_percent)) / 100.0)
}

/// Convert a USD amount. No rounding; that is left to display.
pub fn currency_convert(amount_usd: f64, rate: f64) -> f64 {
    amount_usd * rate
}

/// Sum line items and apply one global margin over the summed totals
pub fn aggregate_totals(lines: &[LineItemCost], margin_percent: f64) -> QuoteTotals {
    let mut margin_percent = input::margin_percent(Some(margin_percent));
    let cost = lines
        .iter()
        .fold(CostPeriods::default(), |acc, line| acc.add(line.base));

    let mut sale = cost.map(|v| apply_margin(v, margin_percent));
    if !sale.is_finite() {
        margin_percent = 0.0;
        sale = cost;
    }

    QuoteTotals {
        margin_percent,
        cost,
        sale,
    }
}

fn normalized_id(id: &str) -> Option<String> {
    let trimmed = id.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn id_counts(items: &[CameraCartItem]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for key in items.iter().filter_map(|i| normalized_id(&i.id)) {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Per-item flag: does the trimmed, lowercased id occur more than once?
/// Blank ids are never flagged.
pub fn duplicate_flags(items: &[CameraCartItem]) -> Vec<bool> {
    let counts = id_counts(items);
    items
        .iter()
        .map(|i| {
            normalized_id(&i.id)
                .and_then(|k| counts.get(&k).copied())
                .is_some_and(|c| c > 1)
        })
        .collect()
}

/// Sorted list of normalised ids that occur more than once
pub fn duplicate_ids(items: &[CameraCartItem]) -> Vec<String> {
    let mut ids: Vec<String> = id_counts(items)
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id)
        .collect();
    ids.sort();
    ids
}

/// Gate for the print/export action. Editing tolerates duplicates; printing
/// does not.
pub fn finalize(items: &[CameraCartItem]) -> Result<(), QuoteError> {
    let duplicates = duplicate_ids(items);
    if !duplicates.is_empty() {
        return Err(QuoteError::DuplicateIds(duplicates));
    }
    if items.is_empty() {
        return Err(QuoteError::EmptyQuote);
    }
    Ok(())
}

/// Full quote: per-line costs, totals with the global margin, converted
/// totals and duplicate flags
pub fn build_quote(
    items: &[CameraCartItem],
    services: &ServiceCatalog,
    solutions: &SolutionCatalog,
    options: &QuoteOptions,
) -> Quote {
    let flags = duplicate_flags(items);
    let lines: Vec<LineItemCost> = items
        .iter()
        .zip(flags)
        .map(|(item, duplicate_id)| LineItemCost {
            duplicate_id,
            ..line_item_base_cost(item, services, solutions)
        })
        .collect();

    let totals = aggregate_totals(&lines, options.margin_percent);
    let converted = convert_totals(&totals, &options.currency, options.exchange_rate);

    Quote {
        lines,
        totals,
        converted,
        duplicate_ids: duplicate_ids(items),
    }
}

/// Totals in the quote currency. A rate that would overflow the totals is
/// replaced by 1.
fn convert_totals(totals: &QuoteTotals, currency: &str, rate: f64) -> ConvertedTotals {
    let mut rate = input::exchange_rate(Some(rate));
    let mut cost = totals.cost.map(|v| currency_convert(v, rate));
    let mut sale = totals.sale.map(|v| currency_convert(v, rate));
    if !(cost.is_finite() && sale.is_finite()) {
        rate = 1.0;
        cost = totals.cost;
        sale = totals.sale;
    }

    ConvertedTotals {
        currency: currency.to_string(),
        exchange_rate: rate,
        cost,
        sale,
    }
}

/// Quick estimate for N identical cameras. The camera count is floored at 1.
pub fn simulate(input: &SimulationInput, services: &ServiceCatalog) -> Simulation {
    let num_camaras = input.num_camaras.max(1);
    let recording = recording_info(input.selected_recording, services);

    let monthly_per_camera = services
        .analytics()
        .filter(|s| input.selected_service_ids.contains(&s.id))
        .map(|s| s.precio_usd)
        .sum::<f64>()
        + recording.as_ref().map(|r| r.precio_usd).unwrap_or(0.0);

    let per_camera = CostPeriods::from_monthly(monthly_per_camera);
    Simulation {
        num_camaras,
        recording,
        per_camera,
        total: per_camera.map(|v| v * num_camaras as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ComponentCost, PriceRow, SolutionDef, RECORDING_CATEGORY};

    const EPS: f64 = 1e-9;

    fn row(id: u32, categoria: &str, modalidad: &str, precio: f64) -> PriceRow {
        PriceRow {
            id,
            categoria: categoria.to_string(),
            servicio: format!("servicio-{}", id),
            modalidad: modalidad.to_string(),
            retencion_imagenes: None,
            resolucion_predeterminada: None,
            fps: None,
            precio_usd: precio,
            notas: None,
        }
    }

    fn services() -> ServiceCatalog {
        ServiceCatalog::new(vec![
            row(1, "LECTURA DE PLACAS", "Nube", 30.0),
            row(2, RECORDING_CATEGORY, "7 días", 15.0),
            row(3, "RECONOCIMIENTO FACIAL", "Nube", 10.0),
            row(4, RECORDING_CATEGORY, "30 días", 20.0),
        ])
    }

    fn solutions() -> SolutionCatalog {
        SolutionCatalog::new(vec![SolutionDef {
            id: "entrada_principal".to_string(),
            name: "Entrada Principal".to_string(),
            etiqueta: "General".to_string(),
            components: [5.0, 7.0, 3.0]
                .iter()
                .map(|c| ComponentCost {
                    concept: "Componente".to_string(),
                    cost_usd: *c,
                    description: None,
                })
                .collect(),
        }])
    }

    fn item(
        id: &str,
        cantidad: u32,
        services: &[u32],
        recording: Option<RecordingChoice>,
    ) -> CameraCartItem {
        CameraCartItem {
            id: id.to_string(),
            nombre: String::new(),
            cantidad,
            selected_service_ids: services.to_vec(),
            selected_solution_ids: Vec::new(),
            selected_recording: recording,
        }
    }

    #[test]
    fn test_local_recording_ignores_catalog() {
        let info =
            recording_info(Some(RecordingChoice::Local), &ServiceCatalog::default()).unwrap();
        assert_eq!(info.precio_usd, 1.5);
        assert_eq!(info.modalidad, LOCAL_RECORDING_LABEL);
    }

    #[test]
    fn test_dangling_recording_resolves_to_none() {
        assert!(recording_info(Some(RecordingChoice::Catalog(99)), &services()).is_none());
        // An analytics id is not a recording tier
        assert!(recording_info(Some(RecordingChoice::Catalog(1)), &services()).is_none());
        assert!(recording_info(None, &services()).is_none());
    }

    #[test]
    fn test_single_camera_scenario() {
        let catalog = ServiceCatalog::new(vec![
            row(1, "LECTURA DE PLACAS", "Nube", 30.0),
            row(2, RECORDING_CATEGORY, "7 días", 15.0),
        ]);
        let cost = line_item_base_cost(
            &item("CAM-1", 1, &[1], Some(RecordingChoice::Catalog(2))),
            &catalog,
            &SolutionCatalog::default(),
        );

        assert!((cost.base.monthly - 45.0).abs() < EPS);
        assert!((cost.base.daily - 1.5).abs() < EPS);
        assert!((cost.base.weekly - 10.5).abs() < EPS);
        assert_eq!(cost.recording.unwrap().modalidad, "7 días");
    }

    #[test]
    fn test_zero_quantity_costs_nothing() {
        let cost = line_item_base_cost(
            &item("CAM-1", 0, &[1, 3], Some(RecordingChoice::Catalog(4))),
            &services(),
            &solutions(),
        );
        assert_eq!(cost.base, CostPeriods::default());

        let totals = aggregate_totals(&[cost], 50.0);
        assert_eq!(totals.sale, CostPeriods::default());
    }

    #[test]
    fn test_recording_ids_in_service_selection_are_ignored() {
        let cost = line_item_base_cost(&item("CAM-1", 1, &[2, 3], None), &services(), &solutions());
        assert_eq!(cost.monthly_per_camera, 10.0);
        assert_eq!(cost.services, vec!["servicio-3".to_string()]);
    }

    #[test]
    fn test_selected_solution_adds_component_total() {
        let mut line = item("CAM-1", 2, &[], None);
        line.selected_solution_ids = vec!["entrada_principal".to_string(), "gone".to_string()];

        let cost = line_item_base_cost(&line, &services(), &solutions());
        assert_eq!(cost.monthly_per_camera, 15.0);
        assert_eq!(cost.base.monthly, 30.0);
        assert_eq!(cost.solutions, vec!["Entrada Principal".to_string()]);
    }

    #[test]
    fn test_weekly_is_seven_daily() {
        for monthly in [0.0, 1.0, 17.3, 45.0, 1234.56] {
            let p = CostPeriods::from_monthly(monthly);
            assert!((p.weekly - p.daily * 7.0).abs() < 1e-9);
            assert!((p.weekly - monthly * 7.0 / 30.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_apply_margin() {
        assert_eq!(apply_margin(100.0, 0.0), 100.0);
        assert!((apply_margin(80.0, 30.0) - 104.0).abs() < EPS);
        assert_eq!(apply_margin(100.0, -20.0), 100.0);
        assert_eq!(apply_margin(100.0, f64::NAN), 100.0);
        for m in [0.0, 0.5, 10.0, 300.0] {
            assert!(apply_margin(42.0, m) >= 42.0);
        }
    }

    #[test]
    fn test_global_margin_over_summed_totals() {
        let catalog = ServiceCatalog::new(vec![
            row(1, "A", "Nube", 10.0),
            row(2, "B", "Nube", 20.0),
        ]);
        let items = vec![item("A", 2, &[1], None), item("B", 3, &[2], None)];

        let quote = build_quote(
            &items,
            &catalog,
            &SolutionCatalog::default(),
            &QuoteOptions {
                margin_percent: 30.0,
                ..QuoteOptions::default()
            },
        );

        assert!((quote.totals.cost.monthly - 80.0).abs() < EPS);
        assert!((quote.totals.sale.monthly - 104.0).abs() < EPS);
    }

    #[test]
    fn test_currency_conversion_applies_rate() {
        let catalog = ServiceCatalog::new(vec![row(1, "A", "Nube", 10.0)]);
        let quote = build_quote(
            &[item("A", 1, &[1], None)],
            &catalog,
            &SolutionCatalog::default(),
            &QuoteOptions {
                margin_percent: 0.0,
                currency: "CLP".to_string(),
                exchange_rate: 950.0,
            },
        );

        assert_eq!(quote.converted.currency, "CLP");
        assert!((quote.converted.cost.monthly - 9500.0).abs() < EPS);
        assert_eq!(currency_convert(1.234, 2.0), 2.468);
    }

    #[test]
    fn test_out_of_range_rate_and_margin_keep_totals_finite() {
        let catalog = ServiceCatalog::new(vec![
            row(1, "A", "Nube", 30.0),
            row(2, RECORDING_CATEGORY, "7 días", 15.0),
        ]);
        let quote = build_quote(
            &[item("A", 1, &[1], Some(RecordingChoice::Catalog(2)))],
            &catalog,
            &SolutionCatalog::default(),
            &QuoteOptions {
                margin_percent: 1e308,
                currency: "CLP".to_string(),
                exchange_rate: 1e308,
            },
        );

        assert_eq!(quote.totals.margin_percent, 0.0);
        assert_eq!(quote.converted.exchange_rate, 1.0);
        assert!((quote.converted.cost.monthly - 45.0).abs() < EPS);
        assert!((quote.converted.sale.monthly - 45.0).abs() < EPS);

        let json = serde_json::to_value(&quote).unwrap();
        assert!(json["converted"]["cost"]["monthly"].is_f64());
        assert!(json["converted"]["sale"]["daily"].is_f64());
    }

    #[test]
    fn test_conversion_that_overflows_falls_back_to_usd_amounts() {
        let totals = QuoteTotals {
            margin_percent: 0.0,
            cost: CostPeriods::from_monthly(1e303),
            sale: CostPeriods::from_monthly(1e303),
        };

        let converted = convert_totals(&totals, "CLP", input::MAX_EXCHANGE_RATE);
        assert_eq!(converted.exchange_rate, 1.0);
        assert_eq!(converted.cost, totals.cost);
    }

    #[test]
    fn test_duplicate_detection_is_case_and_whitespace_insensitive() {
        let items = vec![
            item("CAM-1", 1, &[], None),
            item("cam-1 ", 1, &[], None),
            item("Cam-1", 1, &[], None),
            item("CAM-2", 1, &[], None),
            item("", 1, &[], None),
            item("   ", 1, &[], None),
        ];

        let flags = duplicate_flags(&items);
        assert_eq!(flags, vec![true, true, true, false, false, false]);
        assert_eq!(duplicate_flags(&items), flags);
        assert_eq!(duplicate_ids(&items), vec!["cam-1".to_string()]);
    }

    #[test]
    fn test_finalize_refuses_duplicates_and_empty_quotes() {
        assert_eq!(finalize(&[]), Err(QuoteError::EmptyQuote));

        let dupes = vec![item("X", 1, &[], None), item(" x", 1, &[], None)];
        assert_eq!(
            finalize(&dupes),
            Err(QuoteError::DuplicateIds(vec!["x".to_string()]))
        );

        assert!(finalize(&[item("X", 1, &[], None), item("", 1, &[], None)]).is_ok());
    }

    #[test]
    fn test_build_quote_flags_duplicate_lines() {
        let quote = build_quote(
            &[item("a", 1, &[], None), item("A", 1, &[], None)],
            &services(),
            &solutions(),
            &QuoteOptions::default(),
        );
        assert!(quote.lines.iter().all(|l| l.duplicate_id));
        assert_eq!(quote.duplicate_ids, vec!["a".to_string()]);
    }

    #[test]
    fn test_simulate_floors_camera_count_at_one() {
        let sim = simulate(
            &SimulationInput {
                num_camaras: 0,
                selected_service_ids: vec![1],
                selected_recording: Some(RecordingChoice::Local),
            },
            &services(),
        );

        assert_eq!(sim.num_camaras, 1);
        assert!((sim.per_camera.monthly - 31.5).abs() < EPS);
        assert_eq!(sim.total, sim.per_camera);
    }

    #[test]
    fn test_simulate_scales_by_camera_count() {
        let sim = simulate(
            &SimulationInput {
                num_camaras: 10,
                selected_service_ids: vec![1, 3],
                selected_recording: Some(RecordingChoice::Catalog(4)),
            },
            &services(),
        );

        assert!((sim.total.monthly - 600.0).abs() < EPS);
        assert!((sim.total.daily - 20.0).abs() < EPS);
    }
}
