use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::payments::{InitiatePaymentRequest, PaymentInitiated},
    error::AppResult,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/initiate", post(initiate_payment))
}

/// Payment Split Initiator entry point.
#[utoipa::path(
    post,
    path = "/api/payments/initiate",
    request_body = InitiatePaymentRequest,
    responses(
        (status = 200, description = "Hosted checkout ready", body = ApiResponse<PaymentInitiated>),
        (status = 400, description = "Missing required parameters"),
        (status = 404, description = "Merchant or order not found"),
        (status = 502, description = "Payment gateway failure")
    ),
    tag = "Payments"
)]
pub async fn initiate_payment(
    State(state): State<AppState>,
    Json(payload): Json<InitiatePaymentRequest>,
) -> AppResult<Json<ApiResponse<PaymentInitiated>>> {
    let resp = payment_service::initiate_payment(&state, payload).await?;
    Ok(Json(resp))
}
