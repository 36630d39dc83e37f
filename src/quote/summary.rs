use chrono::Local;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use std::fmt::Write;

use crate::quote::models::{CostPeriods, Quote};

/// Printable plain-text rendering of a quote.
///
/// Amounts are rounded to two decimals here and nowhere else. Line items are
/// shown in USD base cost; totals are shown in the quote currency.
pub fn render_summary(quote: &Quote) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Propuesta de servicios: Cámaras + IA");
    let _ = writeln!(out, "Fecha: {}", Local::now().format("%Y-%m-%d"));
    let _ = writeln!(out);

    let mut lines = Table::new();
    lines.load_preset(UTF8_FULL);
    lines.set_header(vec![
        "ID",
        "NOMBRE",
        "CANT.",
        "SERVICIOS",
        "GRABACIÓN",
        "MENSUAL/CÁM (U$)",
        "MENSUAL (U$)",
    ]);

    for line in &quote.lines {
        let selections: Vec<&str> = line
            .services
            .iter()
            .chain(line.solutions.iter())
            .map(String::as_str)
            .collect();
        let recording = line
            .recording
            .as_ref()
            .map(|r| r.modalidad.as_str())
            .unwrap_or("-");

        lines.add_row(vec![
            Cell::new(&line.id),
            Cell::new(&line.nombre),
            Cell::new(line.cantidad).set_alignment(CellAlignment::Right),
            Cell::new(if selections.is_empty() {
                "-".to_string()
            } else {
                selections.join(", ")
            }),
            Cell::new(recording),
            money(line.monthly_per_camera),
            money(line.base.monthly),
        ]);
    }
    let _ = writeln!(out, "{}", lines);
    let _ = writeln!(out);

    let currency = &quote.converted.currency;
    let mut totals = Table::new();
    totals.load_preset(UTF8_FULL);
    totals.set_header(vec![
        String::new(),
        format!("DIARIO ({})", currency),
        format!("SEMANAL ({})", currency),
        format!("MENSUAL ({})", currency),
    ]);
    totals.add_row(period_row("Costo base", &quote.converted.cost));
    totals.add_row(period_row(
        &format!("Venta (+{}%)", format_amount(quote.totals.margin_percent)),
        &quote.converted.sale,
    ));
    let _ = writeln!(out, "{}", totals);

    if quote.converted.exchange_rate != 1.0 {
        let _ = writeln!(
            out,
            "Tipo de cambio: 1 USD = {} {}",
            format_amount(quote.converted.exchange_rate),
            currency
        );
    }

    out
}

fn period_row(label: &str, periods: &CostPeriods) -> Vec<Cell> {
    vec![
        Cell::new(label),
        money(periods.daily),
        money(periods.weekly),
        money(periods.monthly),
    ]
}

fn money(amount: f64) -> Cell {
    Cell::new(format_amount(amount)).set_alignment(CellAlignment::Right)
}

fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}
