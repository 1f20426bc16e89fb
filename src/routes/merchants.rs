use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::merchants::{CreateMerchantRequest, MerchantCreated, MerchantList, SetActivationRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Merchant,
    response::ApiResponse,
    routes::params::Pagination,
    services::merchant_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_merchants).post(create_merchant))
        .route("/{id}/activation", patch(set_activation))
}

/// Merchant Provisioning entry point; superadmin only.
#[utoipa::path(
    post,
    path = "/api/merchants",
    request_body = CreateMerchantRequest,
    responses(
        (status = 201, description = "Merchant provisioned", body = ApiResponse<MerchantCreated>),
        (status = 400, description = "Missing identity fields"),
        (status = 403, description = "Caller is not the superadmin"),
        (status = 409, description = "Email or subdomain already in use"),
        (status = 502, description = "Payout subaccount creation failed")
    ),
    tag = "Merchants"
)]
pub async fn create_merchant(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMerchantRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<MerchantCreated>>)> {
    let resp = merchant_service::provision_merchant(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/merchants",
    responses(
        (status = 200, description = "All merchants", body = ApiResponse<MerchantList>),
        (status = 403, description = "Caller is not the superadmin")
    ),
    tag = "Merchants"
)]
pub async fn list_merchants(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<MerchantList>>> {
    let resp = merchant_service::list_merchants(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/merchants/{id}/activation",
    request_body = SetActivationRequest,
    responses(
        (status = 200, description = "Activation flag updated", body = ApiResponse<Merchant>),
        (status = 403, description = "Caller is not the superadmin"),
        (status = 404, description = "Merchant not found")
    ),
    tag = "Merchants"
)]
pub async fn set_activation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActivationRequest>,
) -> AppResult<Json<ApiResponse<Merchant>>> {
    let resp = merchant_service::set_activation(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
