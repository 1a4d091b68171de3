use chrono::NaiveDate;
use common::{DateRange, PeriodSelection, PeriodSummary};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
}

/// Query parameters selecting a summary/filter period.
///
/// `period` is one of `daily`, `weekly`, `monthly`, `yearly`; daily takes
/// an explicit `date`, the others an optional signed `offset` (0 = the
/// current period, negative = periods in the past).
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct PeriodQuery {
    /// Period kind: daily | weekly | monthly | yearly
    pub period: String,
    /// Anchor date for daily periods (YYYY-MM-DD)
    pub date: Option<NaiveDate>,
    /// Signed period offset for weekly/monthly/yearly (default: 0)
    pub offset: Option<i32>,
}

impl PeriodQuery {
    /// Resolves the raw query parameters into a period selection, making
    /// illegal combinations (daily without a date, unknown kinds)
    /// unrepresentable past this boundary.
    pub fn selection(&self) -> Result<PeriodSelection, String> {
        let offset = self.offset.unwrap_or(0);
        match self.period.as_str() {
            "daily" => match self.date {
                Some(date) => Ok(PeriodSelection::Daily { date }),
                None => Err("daily period requires a date parameter".to_string()),
            },
            "weekly" => Ok(PeriodSelection::Weekly { offset }),
            "monthly" => Ok(PeriodSelection::Monthly { offset }),
            "yearly" => Ok(PeriodSelection::Yearly { offset }),
            other => Err(format!("Invalid period kind: {}", other)),
        }
    }
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connectivity
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::summary::get_period_summary,
        crate::handlers::recurring::get_active_recurring_rules,
    ),
    components(
        schemas(
            ApiResponse<PeriodSummary>,
            ErrorResponse,
            HealthResponse,
            PeriodQuery,
            PeriodSummary,
            PeriodSelection,
            DateRange,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User CRUD endpoints"),
        (name = "transactions", description = "Transaction CRUD endpoints"),
        (name = "recurring-rules", description = "Recurring rule endpoints"),
        (name = "summary", description = "Period summary endpoints"),
    ),
    info(
        title = "Shopbook API",
        description = "Small-business bookkeeping: transactions, recurring rules and period profit summaries",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
