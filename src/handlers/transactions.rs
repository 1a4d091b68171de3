use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use model::entities::transaction::{self, TransactionKind};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating a new transaction
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTransactionRequest {
    /// Owner of the transaction
    pub owner_id: i32,
    /// Transaction kind: income | expense
    pub kind: String,
    /// Positive amount, below 100,000,000, two fractional digits
    pub amount: Decimal,
    /// Calendar date of the event
    pub date: NaiveDate,
    /// Optional note, at most 50 characters
    pub memo: Option<String>,
}

/// Request body for updating a transaction (full-field update)
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTransactionRequest {
    /// Transaction kind: income | expense
    pub kind: String,
    /// Positive amount, below 100,000,000, two fractional digits
    pub amount: Decimal,
    /// Calendar date of the event
    pub date: NaiveDate,
    /// Optional note, at most 50 characters
    pub memo: Option<String>,
}

/// Transaction response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i32,
    pub owner_id: i32,
    pub kind: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<transaction::Model> for TransactionResponse {
    fn from(model: transaction::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            kind: kind_to_str(model.kind).to_string(),
            amount: model.amount,
            date: model.date,
            memo: model.memo,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Query parameters for listing transactions
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct TransactionQuery {
    /// Filter by owner
    pub owner_id: Option<i32>,
    /// Inclusive lower bound on the transaction date
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the transaction date
    pub end_date: Option<NaiveDate>,
}

pub(crate) fn parse_kind(kind: &str) -> Result<TransactionKind, String> {
    match kind {
        "income" => Ok(TransactionKind::Income),
        "expense" => Ok(TransactionKind::Expense),
        other => Err(format!("Invalid transaction kind: {}", other)),
    }
}

pub(crate) fn kind_to_str(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "income",
        TransactionKind::Expense => "expense",
    }
}

/// Checks the amount bounds shared by transactions and recurring rules.
pub(crate) fn validate_amount(amount: Decimal) -> Result<(), String> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be positive".to_string());
    }
    if amount >= Decimal::from(100_000_000u32) {
        return Err("Amount must be below 100,000,000".to_string());
    }
    Ok(())
}

pub(crate) fn validation_error(message: String) -> (StatusCode, Json<ErrorResponse>) {
    warn!("Validation failed: {}", message);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message,
            code: "VALIDATION_ERROR".to_string(),
            success: false,
        }),
    )
}

fn validate_transaction_fields(
    kind: &str,
    amount: Decimal,
    memo: Option<&str>,
) -> Result<TransactionKind, String> {
    let kind = parse_kind(kind)?;
    validate_amount(amount)?;
    if let Some(memo) = memo {
        if memo.chars().count() > 50 {
            return Err("Memo must be at most 50 characters".to_string());
        }
    }
    Ok(kind)
}

/// Create a new transaction
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    tag = "transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created successfully", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_transaction function");
    debug!(
        "Creating {} transaction of {} on {} for owner {}",
        request.kind, request.amount, request.date, request.owner_id
    );

    let kind = validate_transaction_fields(&request.kind, request.amount, request.memo.as_deref())
        .map_err(validation_error)?;

    let now = Utc::now();
    let new_transaction = transaction::ActiveModel {
        owner_id: Set(request.owner_id),
        kind: Set(kind),
        amount: Set(request.amount),
        date: Set(request.date),
        memo: Set(request.memo.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_transaction.insert(&state.db).await {
        Ok(transaction_model) => {
            info!(
                "Transaction created successfully with ID: {}",
                transaction_model.id
            );
            let response = ApiResponse {
                data: TransactionResponse::from(transaction_model),
                message: "Transaction created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!(
                "Failed to create transaction for owner {}: {}",
                request.owner_id, db_error
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create transaction".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get transactions, optionally filtered by owner and date range
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "transactions",
    params(TransactionQuery),
    responses(
        (status = 200, description = "Transactions retrieved successfully", body = ApiResponse<Vec<TransactionResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_transactions(
    Query(query): Query<TransactionQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, StatusCode> {
    trace!("Entering get_transactions function");

    let mut finder = transaction::Entity::find();
    if let Some(owner_id) = query.owner_id {
        finder = finder.filter(transaction::Column::OwnerId.eq(owner_id));
    }
    if let Some(start_date) = query.start_date {
        finder = finder.filter(transaction::Column::Date.gte(start_date));
    }
    if let Some(end_date) = query.end_date {
        finder = finder.filter(transaction::Column::Date.lte(end_date));
    }

    match finder
        .order_by_desc(transaction::Column::Date)
        .all(&state.db)
        .await
    {
        Ok(transactions) => {
            debug!("Retrieved {} transactions", transactions.len());
            let response = ApiResponse {
                data: transactions
                    .into_iter()
                    .map(TransactionResponse::from)
                    .collect(),
                message: "Transactions retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to fetch transactions: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a single transaction by ID
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(("transaction_id" = i32, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction retrieved successfully", body = ApiResponse<TransactionResponse>),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TransactionResponse>>, StatusCode> {
    match transaction::Entity::find_by_id(transaction_id)
        .one(&state.db)
        .await
    {
        Ok(Some(transaction_model)) => {
            let response = ApiResponse {
                data: TransactionResponse::from(transaction_model),
                message: "Transaction retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Transaction with ID {} not found", transaction_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!(
                "Failed to fetch transaction {}: {}",
                transaction_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a transaction (full-field update)
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(("transaction_id" = i32, Path, description = "Transaction ID")),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Transaction updated successfully", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<ApiResponse<TransactionResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_transaction function");

    let kind = validate_transaction_fields(&request.kind, request.amount, request.memo.as_deref())
        .map_err(validation_error)?;

    let existing = transaction::Entity::find_by_id(transaction_id)
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!(
                "Failed to fetch transaction {}: {}",
                transaction_id, db_error
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch transaction".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            )
        })?;

    let Some(existing) = existing else {
        warn!("Transaction with ID {} not found", transaction_id);
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Transaction {} not found", transaction_id),
                code: "NOT_FOUND".to_string(),
                success: false,
            }),
        ));
    };

    let mut active: transaction::ActiveModel = existing.into();
    active.kind = Set(kind);
    active.amount = Set(request.amount);
    active.date = Set(request.date);
    active.memo = Set(request.memo.clone());
    active.updated_at = Set(Utc::now());

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Transaction {} updated", transaction_id);
            let response = ApiResponse {
                data: TransactionResponse::from(updated),
                message: "Transaction updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!(
                "Failed to update transaction {}: {}",
                transaction_id, db_error
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update transaction".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Delete a transaction
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(("transaction_id" = i32, Path, description = "Transaction ID")),
    responses(
        (status = 204, description = "Transaction deleted successfully"),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<StatusCode, StatusCode> {
    match transaction::Entity::delete_by_id(transaction_id)
        .exec(&state.db)
        .await
    {
        Ok(result) if result.rows_affected == 0 => {
            warn!(
                "Transaction with ID {} not found for deletion",
                transaction_id
            );
            Err(StatusCode::NOT_FOUND)
        }
        Ok(_) => {
            info!("Transaction {} deleted", transaction_id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(db_error) => {
            error!(
                "Failed to delete transaction {}: {}",
                transaction_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
