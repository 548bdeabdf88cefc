//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query, State},
    middleware,
    routing::{get, post},
    Json, Router,
};

use crate::domain::{OperationContext, TrancheRequest, TrancheResult};
use crate::error::AppError;
use crate::gateway::{ClientLookup, Condition, Otp, PingStatus, Service};
use crate::handlers::{
    CardCheckResult, CatalogHandler, ConfirmOtpHandler, CreateTrancheHandler,
    ListConditionsQuery, LookupUserHandler, PrecheckCardQuery, SendOtpHandler, SessionIssued,
};

use super::middleware::{service_auth_middleware, session_auth_middleware};
use super::AppState;

// =========================================================================
// API Router
// =========================================================================

/// Create the API router with both authentication layers applied
pub fn create_router(state: AppState) -> Router {
    let business = Router::new()
        .route("/services", get(list_services))
        .route("/conditions", get(list_conditions))
        .route("/transh", post(create_tranche))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    Router::new()
        .route("/ping", get(ping))
        .route("/user/check-pan", get(check_pan))
        .route("/user/:inn", get(get_user))
        .route("/otp/send", post(send_otp))
        .route("/otp/confirm-otp", post(confirm_otp))
        .nest("/business", business)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            service_auth_middleware,
        ))
        .with_state(state)
}

// =========================================================================
// GET /ping
// =========================================================================

async fn ping(State(state): State<AppState>) -> Result<Json<PingStatus>, AppError> {
    let status = CatalogHandler::new(state.gateway).ping().await?;
    Ok(Json(status))
}

// =========================================================================
// GET /user/check-pan
// =========================================================================

async fn check_pan(
    State(state): State<AppState>,
    Query(query): Query<PrecheckCardQuery>,
) -> Result<Json<CardCheckResult>, AppError> {
    let result = CatalogHandler::new(state.gateway)
        .precheck_card(&query)
        .await?;
    Ok(Json(result))
}

// =========================================================================
// GET /user/:inn
// =========================================================================

/// Look a client up by INN and cache the profile
async fn get_user(
    State(state): State<AppState>,
    Path(inn): Path<String>,
) -> Result<Json<ClientLookup>, AppError> {
    let handler = LookupUserHandler::new(state.gateway, state.cache, state.profile_cache_ttl);
    Ok(Json(handler.execute(&inn).await?))
}

// =========================================================================
// POST /otp/send, POST /otp/confirm-otp
// =========================================================================

async fn send_otp(
    State(state): State<AppState>,
    payload: Result<Json<Otp>, JsonRejection>,
) -> Result<Json<Otp>, AppError> {
    let Json(otp) = payload?;
    let handler = SendOtpHandler::new(state.gateway, state.otp);
    Ok(Json(handler.execute(otp).await?))
}

async fn confirm_otp(
    State(state): State<AppState>,
    payload: Result<Json<Otp>, JsonRejection>,
) -> Result<Json<SessionIssued>, AppError> {
    let Json(otp) = payload?;
    let handler = ConfirmOtpHandler::new(state.gateway, state.sessions);
    Ok(Json(handler.execute(otp).await?))
}

// =========================================================================
// GET /business/services, GET /business/conditions
// =========================================================================

async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<Service>>, AppError> {
    Ok(Json(CatalogHandler::new(state.gateway).services().await?))
}

async fn list_conditions(
    State(state): State<AppState>,
    Query(query): Query<ListConditionsQuery>,
) -> Result<Json<Vec<Condition>>, AppError> {
    let conditions = CatalogHandler::new(state.gateway)
        .conditions(&query)
        .await?;
    Ok(Json(conditions))
}

// =========================================================================
// POST /business/transh
// =========================================================================

/// Create a credit tranche
async fn create_tranche(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<TrancheRequest>, JsonRejection>,
) -> Result<Json<TrancheResult>, AppError> {
    let Json(request) = payload?;
    let handler = CreateTrancheHandler::new(
        state.gateway,
        state.store,
        state.cache,
        state.credentials,
    );

    let result = handler.execute(request, &context).await?;
    Ok(Json(result))
}
