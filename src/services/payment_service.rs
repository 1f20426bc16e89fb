use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::payments::{InitiatePaymentRequest, PaymentInitiated},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Entity as Orders},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    gateway::{InitializeTransaction, SplitConfig},
    reference::new_order_reference,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Convert a major-unit amount to the gateway's minor units (kobo).
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Ordered base-price candidates for one order line: current catalog price,
/// then the merchant's original price, then the recorded line snapshot.
/// First non-zero candidate wins; all unusable resolves to 0.00.
pub fn base_price_candidates(product: &ProductModel, recorded_price: f64) -> [Option<f64>; 3] {
    [
        Some(product.price),
        product.original_price,
        Some(recorded_price),
    ]
}

pub fn resolve_base_price(candidates: [Option<f64>; 3]) -> f64 {
    candidates
        .into_iter()
        .flatten()
        .find(|price| *price != 0.0)
        .unwrap_or(0.0)
}

/// Payment Split Initiator: resolve the merchant's payout configuration,
/// compute the merchant-earned share, obtain a hosted checkout redirect
/// from the gateway and record the fresh reference on the order.
///
/// Safe to re-invoke for the same order: every call mints a new reference
/// and the order stays `pending` until the settlement webhook runs.
pub async fn initiate_payment(
    state: &AppState,
    payload: InitiatePaymentRequest,
) -> AppResult<ApiResponse<PaymentInitiated>> {
    if payload.email.trim().is_empty()
        || payload.customer_name.trim().is_empty()
        || payload.customer_phone.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Missing required parameters for payment initiation".into(),
        ));
    }

    let merchant = Users::find_by_id(payload.admin_id)
        .filter(UserCol::Role.eq("admin"))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Merchant not found".into()))?;

    let order = Orders::find_by_id(payload.order_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?;
    if items.is_empty() {
        return Err(AppError::NotFound("Order details not found".into()));
    }

    let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
    let products = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .all(&state.orm)
        .await?;
    let by_id: HashMap<Uuid, ProductModel> = products.into_iter().map(|p| (p.id, p)).collect();

    // The merchant's own earned amount, distinct from any customer-facing
    // markup baked into the charge.
    let mut merchant_earned = 0.0;
    for item in &items {
        let product = by_id.get(&item.product_id).ok_or_else(|| {
            AppError::NotFound(format!("Product with id {} not found", item.product_id))
        })?;
        let base = resolve_base_price(base_price_candidates(product, item.price));
        merchant_earned += base * f64::from(item.quantity);
    }

    let reference = new_order_reference(&state.config.order_ref_prefix);

    let split = merchant
        .payout_subaccount_code
        .clone()
        .map(|code| SplitConfig::flat_ngn(code, to_minor_units(merchant_earned)));
    if split.is_none() {
        tracing::warn!(admin_id = %payload.admin_id, "no payout subaccount, charging to platform account");
    }

    let store_name = merchant.store_name.clone().unwrap_or_default();
    let request = InitializeTransaction {
        email: payload.email.clone(),
        amount: to_minor_units(payload.amount),
        reference: reference.clone(),
        callback_url: format!(
            "{}/payment-success?reference={}",
            state.config.callback_base_url, reference
        ),
        webhook_url: format!("{}/webhooks/payments", state.config.webhook_base_url),
        metadata: serde_json::json!({
            "order_id": payload.order_id,
            "admin_id": payload.admin_id,
            "customer_name": payload.customer_name,
            "customer_phone": payload.customer_phone,
            "admin_phone": merchant.phone,
            "store_name": store_name,
            "custom_fields": [
                {
                    "display_name": "Order Reference",
                    "variable_name": "order_reference",
                    "value": reference,
                },
                {
                    "display_name": "Store Name",
                    "variable_name": "store_name",
                    "value": store_name,
                },
            ],
        }),
        split,
    };

    let authorization = state.gateway.initialize_transaction(&request).await?;

    // Record the fresh reference and reconcile any contact/total drift
    // between intake time and initiation time. Payment status stays
    // pending; only the settlement webhook advances it.
    let mut active: OrderActive = order.into();
    active.order_reference = Set(reference.clone());
    active.payment_status = Set("pending".into());
    active.customer_name = Set(payload.customer_name.clone());
    active.customer_email = Set(payload.email.clone());
    active.customer_phone = Set(payload.customer_phone.clone());
    active.total_amount = Set(payload.amount);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    let redirect_url = support_redirect_url(
        merchant.phone.as_deref().unwrap_or_default(),
        &reference,
        payload.amount,
        &payload.customer_name,
        &payload.customer_phone,
    )?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "payment_initiated",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": payload.order_id,
            "admin_id": payload.admin_id,
            "reference": reference,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment initialized",
        PaymentInitiated {
            authorization_url: authorization.authorization_url,
            access_code: authorization.access_code,
            reference,
            redirect_url,
        },
        Some(Meta::empty()),
    ))
}

/// WhatsApp deep link to the merchant with a pre-filled confirmation
/// message. Convenience only, never used for control decisions.
fn support_redirect_url(
    merchant_phone: &str,
    reference: &str,
    amount: f64,
    customer_name: &str,
    customer_phone: &str,
) -> AppResult<String> {
    let message = format!(
        "Hello! I just completed payment for order {reference} worth \u{20a6}{amount:.2}. \
         Please confirm and prepare my items for delivery. \
         Customer: {customer_name}, Phone: {customer_phone}"
    );
    let url = reqwest::Url::parse_with_params(
        &format!("https://wa.me/{merchant_phone}"),
        [("text", message.as_str())],
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("redirect url: {e}")))?;
    Ok(url.to_string())
}
