use axum::{extract::State, Json};
use tracing::error;

use crate::catalog::{PriceRow, SolutionDef};
use crate::error::AppError;
use crate::handlers::AppState;

pub const SERVICES_LOAD_ERROR: &str = "Error leyendo archivo de precios";
pub const SOLUTIONS_LOAD_ERROR: &str = "Error leyendo archivo de precios antiguo";

/// Handle /api/precios: current service + recording pricing
pub async fn list_prices(State(state): State<AppState>) -> Result<Json<Vec<PriceRow>>, AppError> {
    let catalog = state.catalogs.services().await.map_err(|e| {
        error!(error = %e, "Error reading price catalog");
        AppError::CatalogUnavailable {
            message: SERVICES_LOAD_ERROR,
        }
    })?;

    Ok(Json(catalog.services().to_vec()))
}

/// Handle /api/precios-old: legacy grouped solution pricing
pub async fn list_legacy_prices(
    State(state): State<AppState>,
) -> Result<Json<Vec<SolutionDef>>, AppError> {
    let catalog = state.catalogs.solutions().await.map_err(|e| {
        error!(error = %e, "Error reading legacy price catalog");
        AppError::CatalogUnavailable {
            message: SOLUTIONS_LOAD_ERROR,
        }
    })?;

    Ok(Json(catalog.solutions().to_vec()))
}
