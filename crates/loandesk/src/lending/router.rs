use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::CustomerId;
use super::provider::CustomerDataProvider;
use super::service::{EvaluationServiceError, LoanDecisionService};
use super::store::DecisionStore;

const DEFAULT_DECISION_LIMIT: usize = 100;

/// Router builder exposing the evaluate, decision-listing, and customer
/// summary endpoints.
pub fn lending_router<P, S>(service: Arc<LoanDecisionService<P, S>>) -> Router
where
    P: CustomerDataProvider + 'static,
    S: DecisionStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/customers/:customer_id/evaluate",
            post(evaluate_handler::<P, S>),
        )
        .route(
            "/api/v1/customers/:customer_id",
            get(summary_handler::<P, S>),
        )
        .route("/api/v1/decisions", get(decisions_handler::<P, S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionsQuery {
    pub(crate) customer_id: Option<String>,
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn evaluate_handler<P, S>(
    State(service): State<Arc<LoanDecisionService<P, S>>>,
    Path(customer_id): Path<String>,
) -> Response
where
    P: CustomerDataProvider + 'static,
    S: DecisionStore + 'static,
{
    let id = CustomerId(customer_id);
    match service.evaluate(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn summary_handler<P, S>(
    State(service): State<Arc<LoanDecisionService<P, S>>>,
    Path(customer_id): Path<String>,
) -> Response
where
    P: CustomerDataProvider + 'static,
    S: DecisionStore + 'static,
{
    let id = CustomerId(customer_id);
    match service.customer_summary(&id) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn decisions_handler<P, S>(
    State(service): State<Arc<LoanDecisionService<P, S>>>,
    Query(query): Query<DecisionsQuery>,
) -> Response
where
    P: CustomerDataProvider + 'static,
    S: DecisionStore + 'static,
{
    let customer_id = query.customer_id.map(CustomerId);
    let limit = query.limit.unwrap_or(DEFAULT_DECISION_LIMIT);
    match service.list_decisions(customer_id.as_ref(), limit) {
        Ok(decisions) => {
            (StatusCode::OK, axum::Json(json!({ "decisions": decisions }))).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: EvaluationServiceError) -> Response {
    let status = match err {
        EvaluationServiceError::CustomerNotFound(_) => StatusCode::NOT_FOUND,
        EvaluationServiceError::Provider(_) | EvaluationServiceError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
