//! Request handlers

use super::{AppState, error::ApiError};
use crate::core::ProfitRequest;
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct ProfitQuery {
    pub scheme_code: String,
    /// dd-mm-yyyy
    pub start_date: String,
    /// dd-mm-yyyy
    pub end_date: String,
    pub capital: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ProfitResponse {
    pub net_profit: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Net profit of investing `capital` in a scheme between two dates.
///
/// Always answers 200 once the query binds; a profit that cannot be computed
/// is reported as zero.
pub async fn profit(
    State(state): State<AppState>,
    query: Result<Query<ProfitQuery>, QueryRejection>,
) -> Result<Json<ProfitResponse>, ApiError> {
    let Query(query) = query?;
    debug!(?query, "Profit request");

    let request = ProfitRequest::new(
        query.scheme_code,
        query.start_date,
        query.end_date,
        query.capital.unwrap_or(state.default_capital),
    );
    let net_profit = state.calculator.calculate_profit(&request).await;

    Ok(Json(ProfitResponse { net_profit }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
