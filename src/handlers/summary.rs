use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use common::PeriodSummary;
use compute::default_summary;
use tracing::{debug, error, instrument, trace};

use super::transactions::validation_error;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, PeriodQuery};

/// Get the profit summary for one owner over the selected period
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/summary",
    tag = "summary",
    params(
        ("user_id" = i32, Path, description = "Owner ID"),
        PeriodQuery,
    ),
    responses(
        (status = 200, description = "Period summary computed successfully", body = ApiResponse<PeriodSummary>),
        (status = 400, description = "Invalid period parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_period_summary(
    Path(user_id): Path<i32>,
    Query(query): Query<PeriodQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PeriodSummary>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_period_summary function");

    let selection = query.selection().map_err(validation_error)?;
    debug!("Computing summary for owner {} over {:?}", user_id, selection);

    // Summaries are recomputed on every query; there is no cached
    // summary table to invalidate.
    let calculator = default_summary(None);
    match calculator.summarize(&state.db, user_id, &selection).await {
        Ok(summary) => {
            let response = ApiResponse {
                data: summary,
                message: "Period summary computed successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(compute_error) => {
            // A failed fetch is "data unavailable", never an empty period.
            error!(
                "Failed to compute summary for owner {}: {}",
                user_id, compute_error
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to compute period summary".to_string(),
                    code: "SUMMARY_UNAVAILABLE".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
