use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    health::health_check,
    recurring::{
        create_recurring_rule, delete_recurring_rule, get_active_recurring_rules,
        get_recurring_rule, get_recurring_rules, update_recurring_rule,
    },
    summary::get_period_summary,
    transactions::{
        create_transaction, delete_transaction, get_transaction, get_transactions,
        update_transaction,
    },
    users::{create_user, delete_user, get_user, get_users},
};
use crate::schemas::{ApiDoc, AppState};

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Transaction CRUD routes
        .route("/api/v1/transactions", post(create_transaction))
        .route("/api/v1/transactions", get(get_transactions))
        .route("/api/v1/transactions/:transaction_id", get(get_transaction))
        .route("/api/v1/transactions/:transaction_id", put(update_transaction))
        .route("/api/v1/transactions/:transaction_id", delete(delete_transaction))
        // Recurring rule routes
        .route("/api/v1/recurring-rules", post(create_recurring_rule))
        .route("/api/v1/recurring-rules", get(get_recurring_rules))
        .route("/api/v1/recurring-rules/:rule_id", get(get_recurring_rule))
        .route("/api/v1/recurring-rules/:rule_id", put(update_recurring_rule))
        .route("/api/v1/recurring-rules/:rule_id", delete(delete_recurring_rule))
        // Period summary and display filter
        .route("/api/v1/users/:user_id/summary", get(get_period_summary))
        .route(
            "/api/v1/users/:user_id/recurring-rules/active",
            get(get_active_recurring_rules),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
