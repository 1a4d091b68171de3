use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use compute::recurring::active_in_period;
use model::entities::recurring_rule::{self, Cadence};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};

use super::transactions::{kind_to_str, parse_kind, validate_amount, validation_error};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, PeriodQuery};

/// Request body for creating a recurring rule
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateRecurringRuleRequest {
    /// Owner of the rule
    pub owner_id: i32,
    /// Rule kind: income | expense
    pub kind: String,
    /// Positive amount, below 100,000,000, two fractional digits
    pub amount: Decimal,
    /// Optional note, at most 100 characters
    pub memo: Option<String>,
    /// Cadence: weekly | monthly
    pub cadence: String,
    /// Date of the first occurrence
    pub start_date: NaiveDate,
    /// Optional date of the last occurrence; must be strictly after start_date
    pub end_date: Option<NaiveDate>,
    /// Whether the rule is active (default: true)
    pub is_active: Option<bool>,
}

/// Request body for updating a recurring rule (full-field update)
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateRecurringRuleRequest {
    /// Rule kind: income | expense
    pub kind: String,
    /// Positive amount, below 100,000,000, two fractional digits
    pub amount: Decimal,
    /// Optional note, at most 100 characters
    pub memo: Option<String>,
    /// Cadence: weekly | monthly
    pub cadence: String,
    /// Date of the first occurrence
    pub start_date: NaiveDate,
    /// Optional date of the last occurrence; must be strictly after start_date
    pub end_date: Option<NaiveDate>,
    /// Whether the rule is active
    pub is_active: bool,
}

/// Recurring rule response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecurringRuleResponse {
    pub id: i32,
    pub owner_id: i32,
    pub kind: String,
    pub amount: Decimal,
    pub memo: Option<String>,
    pub cadence: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub last_generated_at: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<recurring_rule::Model> for RecurringRuleResponse {
    fn from(model: recurring_rule::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            kind: kind_to_str(model.kind).to_string(),
            amount: model.amount,
            memo: model.memo,
            cadence: cadence_to_str(model.cadence).to_string(),
            start_date: model.start_date,
            end_date: model.end_date,
            last_generated_at: model.last_generated_at,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Query parameters for listing recurring rules
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct RecurringRuleQuery {
    /// Filter by owner
    pub owner_id: Option<i32>,
}

fn parse_cadence(cadence: &str) -> Result<Cadence, String> {
    match cadence {
        "weekly" => Ok(Cadence::Weekly),
        "monthly" => Ok(Cadence::Monthly),
        other => Err(format!("Invalid cadence: {}", other)),
    }
}

fn cadence_to_str(cadence: Cadence) -> &'static str {
    match cadence {
        Cadence::Weekly => "weekly",
        Cadence::Monthly => "monthly",
    }
}

/// The data-entry validation boundary for recurring rules. The occurrence
/// engine assumes structurally valid rules, so everything it relies on is
/// checked here.
fn validate_rule_fields(
    kind: &str,
    amount: Decimal,
    memo: Option<&str>,
    cadence: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(model::entities::transaction::TransactionKind, Cadence), String> {
    let kind = parse_kind(kind)?;
    let cadence = parse_cadence(cadence)?;
    validate_amount(amount)?;
    if let Some(memo) = memo {
        if memo.chars().count() > 100 {
            return Err("Memo must be at most 100 characters".to_string());
        }
    }
    if let Some(end) = end_date {
        if end <= start_date {
            return Err("End date must be strictly after start date".to_string());
        }
    }
    Ok((kind, cadence))
}

/// Create a new recurring rule
#[utoipa::path(
    post,
    path = "/api/v1/recurring-rules",
    tag = "recurring-rules",
    request_body = CreateRecurringRuleRequest,
    responses(
        (status = 201, description = "Recurring rule created successfully", body = ApiResponse<RecurringRuleResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_recurring_rule(
    State(state): State<AppState>,
    Json(request): Json<CreateRecurringRuleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RecurringRuleResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering create_recurring_rule function");
    debug!(
        "Creating {} {} rule of {} starting {} for owner {}",
        request.cadence, request.kind, request.amount, request.start_date, request.owner_id
    );

    let (kind, cadence) = validate_rule_fields(
        &request.kind,
        request.amount,
        request.memo.as_deref(),
        &request.cadence,
        request.start_date,
        request.end_date,
    )
    .map_err(validation_error)?;

    let now = Utc::now();
    let new_rule = recurring_rule::ActiveModel {
        owner_id: Set(request.owner_id),
        kind: Set(kind),
        amount: Set(request.amount),
        memo: Set(request.memo.clone()),
        cadence: Set(cadence),
        start_date: Set(request.start_date),
        end_date: Set(request.end_date),
        last_generated_at: Set(None),
        is_active: Set(request.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_rule.insert(&state.db).await {
        Ok(rule_model) => {
            info!(
                "Recurring rule created successfully with ID: {}",
                rule_model.id
            );
            let response = ApiResponse {
                data: RecurringRuleResponse::from(rule_model),
                message: "Recurring rule created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!(
                "Failed to create recurring rule for owner {}: {}",
                request.owner_id, db_error
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recurring rule".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get recurring rules, optionally filtered by owner
#[utoipa::path(
    get,
    path = "/api/v1/recurring-rules",
    tag = "recurring-rules",
    params(RecurringRuleQuery),
    responses(
        (status = 200, description = "Recurring rules retrieved successfully", body = ApiResponse<Vec<RecurringRuleResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_recurring_rules(
    Query(query): Query<RecurringRuleQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RecurringRuleResponse>>>, StatusCode> {
    let mut finder = recurring_rule::Entity::find();
    if let Some(owner_id) = query.owner_id {
        finder = finder.filter(recurring_rule::Column::OwnerId.eq(owner_id));
    }

    match finder
        .order_by_desc(recurring_rule::Column::CreatedAt)
        .all(&state.db)
        .await
    {
        Ok(rules) => {
            debug!("Retrieved {} recurring rules", rules.len());
            let response = ApiResponse {
                data: rules.into_iter().map(RecurringRuleResponse::from).collect(),
                message: "Recurring rules retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to fetch recurring rules: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a single recurring rule by ID
#[utoipa::path(
    get,
    path = "/api/v1/recurring-rules/{rule_id}",
    tag = "recurring-rules",
    params(("rule_id" = i32, Path, description = "Recurring rule ID")),
    responses(
        (status = 200, description = "Recurring rule retrieved successfully", body = ApiResponse<RecurringRuleResponse>),
        (status = 404, description = "Recurring rule not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_recurring_rule(
    Path(rule_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RecurringRuleResponse>>, StatusCode> {
    match recurring_rule::Entity::find_by_id(rule_id).one(&state.db).await {
        Ok(Some(rule_model)) => {
            let response = ApiResponse {
                data: RecurringRuleResponse::from(rule_model),
                message: "Recurring rule retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Recurring rule with ID {} not found", rule_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to fetch recurring rule {}: {}", rule_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a recurring rule (full-field update)
#[utoipa::path(
    put,
    path = "/api/v1/recurring-rules/{rule_id}",
    tag = "recurring-rules",
    params(("rule_id" = i32, Path, description = "Recurring rule ID")),
    request_body = UpdateRecurringRuleRequest,
    responses(
        (status = 200, description = "Recurring rule updated successfully", body = ApiResponse<RecurringRuleResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recurring rule not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_recurring_rule(
    Path(rule_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateRecurringRuleRequest>,
) -> Result<Json<ApiResponse<RecurringRuleResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_recurring_rule function");

    let (kind, cadence) = validate_rule_fields(
        &request.kind,
        request.amount,
        request.memo.as_deref(),
        &request.cadence,
        request.start_date,
        request.end_date,
    )
    .map_err(validation_error)?;

    let existing = recurring_rule::Entity::find_by_id(rule_id)
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to fetch recurring rule {}: {}", rule_id, db_error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recurring rule".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            )
        })?;

    let Some(existing) = existing else {
        warn!("Recurring rule with ID {} not found", rule_id);
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Recurring rule {} not found", rule_id),
                code: "NOT_FOUND".to_string(),
                success: false,
            }),
        ));
    };

    let mut active: recurring_rule::ActiveModel = existing.into();
    active.kind = Set(kind);
    active.amount = Set(request.amount);
    active.memo = Set(request.memo.clone());
    active.cadence = Set(cadence);
    active.start_date = Set(request.start_date);
    active.end_date = Set(request.end_date);
    active.is_active = Set(request.is_active);
    active.updated_at = Set(Utc::now());

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Recurring rule {} updated", rule_id);
            let response = ApiResponse {
                data: RecurringRuleResponse::from(updated),
                message: "Recurring rule updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update recurring rule {}: {}", rule_id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recurring rule".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Delete a recurring rule
#[utoipa::path(
    delete,
    path = "/api/v1/recurring-rules/{rule_id}",
    tag = "recurring-rules",
    params(("rule_id" = i32, Path, description = "Recurring rule ID")),
    responses(
        (status = 204, description = "Recurring rule deleted successfully"),
        (status = 404, description = "Recurring rule not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_recurring_rule(
    Path(rule_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<StatusCode, StatusCode> {
    match recurring_rule::Entity::delete_by_id(rule_id)
        .exec(&state.db)
        .await
    {
        Ok(result) if result.rows_affected == 0 => {
            warn!("Recurring rule with ID {} not found for deletion", rule_id);
            Err(StatusCode::NOT_FOUND)
        }
        Ok(_) => {
            info!("Recurring rule {} deleted", rule_id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(db_error) => {
            error!("Failed to delete recurring rule {}: {}", rule_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get the owner's recurring rules that actually fire in the selected period
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/recurring-rules/active",
    tag = "recurring-rules",
    params(
        ("user_id" = i32, Path, description = "Owner ID"),
        PeriodQuery,
    ),
    responses(
        (status = 200, description = "Active recurring rules retrieved successfully", body = ApiResponse<Vec<RecurringRuleResponse>>),
        (status = 400, description = "Invalid period parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_active_recurring_rules(
    Path(user_id): Path<i32>,
    Query(query): Query<PeriodQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RecurringRuleResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_active_recurring_rules function");

    let selection = query.selection().map_err(validation_error)?;

    let rules = recurring_rule::Entity::find()
        .filter(recurring_rule::Column::OwnerId.eq(user_id))
        .all(&state.db)
        .await
        .map_err(|db_error| {
            error!(
                "Failed to fetch recurring rules for owner {}: {}",
                user_id, db_error
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recurring rules".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            )
        })?;

    let firing = active_in_period(rules, &selection, common::today_utc());
    debug!(
        "{} rule(s) fire for owner {} in {:?}",
        firing.len(),
        user_id,
        selection
    );

    let response = ApiResponse {
        data: firing.into_iter().map(RecurringRuleResponse::from).collect(),
        message: "Active recurring rules retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
