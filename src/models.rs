use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A tenant operating one storefront under a unique subdomain/slug.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Merchant {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub subdomain: Option<String>,
    pub slug: Option<String>,
    pub store_name: Option<String>,
    pub payout_subaccount_code: Option<String>,
    pub is_active: bool,
    pub payment_status: String,
    pub primary_color: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: f64,
    /// Baseline merchant price before any platform markup; feeds the
    /// payout-split computation.
    pub original_price: Option<f64>,
    pub adjusted_price: Option<f64>,
    pub gateway_fee: Option<f64>,
    pub units_available: i32,
    pub location_state: Option<String>,
    pub location_address: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub total_amount: f64,
    pub payment_status: String,
    pub tracking_status: String,
    pub order_reference: String,
    pub verification_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}
