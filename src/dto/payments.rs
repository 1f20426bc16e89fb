use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct InitiatePaymentRequest {
    pub order_id: Uuid,
    pub email: String,
    /// Customer-facing charge, major currency units.
    pub amount: f64,
    pub admin_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentInitiated {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
    /// WhatsApp deep link to the merchant, pre-filled with the order
    /// reference and amount. Convenience only.
    pub redirect_url: String,
}
