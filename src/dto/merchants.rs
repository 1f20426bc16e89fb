use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Merchant;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMerchantRequest {
    pub email: String,
    pub name: String,
    pub subdomain: String,
    /// National-id-equivalent identifier required for onboarding.
    pub national_id: String,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub store_name: Option<String>,
    pub slug: Option<String>,
    pub bank_name: Option<String>,
    pub bank_code: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    /// Pre-existing gateway subaccount; when absent and bank details are
    /// present, one is created during provisioning.
    pub payout_subaccount_code: Option<String>,
    pub primary_color: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MerchantCreated {
    pub merchant: Merchant,
    pub temp_password: String,
    pub payout_subaccount_code: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetActivationRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MerchantList {
    pub items: Vec<Merchant>,
}
