use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::catalog::SolutionCatalog;
use crate::error::AppError;
use crate::handlers::catalog::{SERVICES_LOAD_ERROR, SOLUTIONS_LOAD_ERROR};
use crate::handlers::AppState;
use crate::metrics;
use crate::quote::{self, Quote, QuoteRequest, Simulation, SimulationInput};

/// Handle POST /api/cotizacion: compute a quote without storing anything
pub async fn compute_quote(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<Quote>, AppError> {
    let Json(request) = payload?;
    let computed = build(&state, &request).await?;
    metrics::record_quote("computed");
    debug!(
        lines = computed.lines.len(),
        duplicates = computed.duplicate_ids.len(),
        "Quote computed"
    );
    Ok(Json(computed))
}

/// Handle POST /api/cotizacion/imprimir: printable summary, refused while
/// the quote is empty or has duplicate ids
pub async fn print_quote(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    if let Err(e) = quote::finalize(&request.items) {
        metrics::record_quote("rejected");
        warn!(reason = %e, "Refusing to print quote");
        return Err(e.into());
    }

    let printable = build(&state, &request).await?;
    metrics::record_quote("printed");

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        quote::render_summary(&printable),
    )
        .into_response())
}

/// Handle POST /api/simulacion: quick per-camera estimate
pub async fn simulate(
    State(state): State<AppState>,
    payload: Result<Json<SimulationInput>, JsonRejection>,
) -> Result<Json<Simulation>, AppError> {
    let Json(input) = payload?;
    let services = state.catalogs.services().await.map_err(|e| {
        error!(error = %e, "Error reading price catalog");
        AppError::CatalogUnavailable {
            message: SERVICES_LOAD_ERROR,
        }
    })?;

    Ok(Json(quote::simulate(&input, &services)))
}

/// Resolve catalogs and options for `request`, then compute the quote.
///
/// The solution catalog is only loaded when some line selects a solution.
async fn build(state: &AppState, request: &QuoteRequest) -> Result<Quote, AppError> {
    let services = state.catalogs.services().await.map_err(|e| {
        error!(error = %e, "Error reading price catalog");
        AppError::CatalogUnavailable {
            message: SERVICES_LOAD_ERROR,
        }
    })?;

    let needs_solutions = request
        .items
        .iter()
        .any(|i| !i.selected_solution_ids.is_empty());
    let solutions = if needs_solutions {
        state.catalogs.solutions().await.map_err(|e| {
            error!(error = %e, "Error reading legacy price catalog");
            AppError::CatalogUnavailable {
                message: SOLUTIONS_LOAD_ERROR,
            }
        })?
    } else {
        Arc::new(SolutionCatalog::default())
    };

    let options = request.options(&state.quote);
    Ok(quote::build_quote(&request.items, &services, &solutions, &options))
}
