use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{AppError, AppResult};

/// One payout destination inside a split. `share` is a flat amount in
/// minor currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubaccountShare {
    pub subaccount: String,
    pub share: i64,
}

/// Gateway-native revenue split: the named subaccounts receive their flat
/// shares, the remainder accrues to the platform's primary account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub currency: String,
    pub subaccounts: Vec<SubaccountShare>,
    pub bearer_type: String,
}

impl SplitConfig {
    pub fn flat_ngn(subaccount: String, share: i64) -> Self {
        Self {
            kind: "flat".to_string(),
            currency: "NGN".to_string(),
            subaccounts: vec![SubaccountShare { subaccount, share }],
            bearer_type: "account".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeTransaction {
    pub email: String,
    /// Minor currency units (kobo).
    pub amount: i64,
    pub reference: String,
    pub callback_url: String,
    pub webhook_url: String,
    pub metadata: serde_json::Value,
    /// Omitted entirely when the merchant has no payout subaccount; the
    /// full amount then settles on the platform account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayAuthorization {
    pub authorization_url: String,
    pub access_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSubaccount {
    pub business_name: String,
    pub bank_code: String,
    pub account_number: String,
    pub account_name: String,
    pub percentage_charge: f64,
}

#[derive(Debug, Deserialize)]
struct SubaccountData {
    subaccount_code: String,
}

/// Paystack-style response envelope; `status == false` is a hard failure
/// regardless of the HTTP status code.
#[derive(Debug, Deserialize)]
struct GatewayEnvelope<T> {
    status: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

/// Narrow seam over the hosted payment processor. Production uses
/// [`PaystackClient`]; tests inject a recording double.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initialize_transaction(
        &self,
        req: &InitializeTransaction,
    ) -> AppResult<GatewayAuthorization>;

    /// Register a merchant payout destination; returns the subaccount code.
    async fn create_subaccount(&self, req: &CreateSubaccount) -> AppResult<String>;
}

pub struct PaystackClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl PaystackClient {
    pub fn new(base_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            secret_key: secret_key.into(),
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Gateway(format!("gateway unreachable: {e}")))?;

        let envelope: GatewayEnvelope<T> = response
            .json()
            .await
            .map_err(|e| AppError::Gateway(format!("malformed gateway response: {e}")))?;

        if !envelope.status {
            return Err(AppError::Gateway(envelope.message));
        }
        envelope
            .data
            .ok_or_else(|| AppError::Gateway("gateway response missing data".to_string()))
    }
}

#[async_trait]
impl PaymentGateway for PaystackClient {
    async fn initialize_transaction(
        &self,
        req: &InitializeTransaction,
    ) -> AppResult<GatewayAuthorization> {
        self.post("transaction/initialize", req).await
    }

    async fn create_subaccount(&self, req: &CreateSubaccount) -> AppResult<String> {
        let data: SubaccountData = self.post("subaccount", req).await?;
        Ok(data.subaccount_code)
    }
}
