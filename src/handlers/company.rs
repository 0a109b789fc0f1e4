use axum::{extract::State, response::Json};
use common::{CompanyProfile, Ticker};
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::helpers::extract::ValidQuery;
use crate::schemas::{ApiResponse, AppState, CompanyQuery};

/// Get the company profile shown in the dashboard header
///
/// Without a ticker the placeholder profile is returned instead of an error.
#[utoipa::path(
    get,
    path = "/api/v1/company",
    tag = "company",
    params(CompanyQuery),
    responses(
        (status = 200, description = "Company profile retrieved successfully", body = ApiResponse<CompanyProfile>),
        (status = 400, description = "Invalid ticker", body = ErrorResponse),
        (status = 404, description = "Ticker not found", body = ErrorResponse),
        (status = 502, description = "Market data provider failed", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_company(
    ValidQuery(query): ValidQuery<CompanyQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CompanyProfile>>, ApiError> {
    let Some(ticker) = query.ticker.as_deref().and_then(Ticker::parse) else {
        debug!("No ticker given, returning placeholder profile");
        return Ok(Json(ApiResponse::ok(
            CompanyProfile::placeholder(),
            "Placeholder profile",
        )));
    };

    let profile = state.provider.fetch_profile(&ticker).await?;
    Ok(Json(ApiResponse::ok(
        profile,
        "Company profile retrieved successfully",
    )))
}
