use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub adjusted_price: Option<f64>,
    pub gateway_fee: Option<f64>,
    pub units_available: i32,
    pub location_state: Option<String>,
    pub location_address: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub adjusted_price: Option<f64>,
    pub gateway_fee: Option<f64>,
    pub units_available: Option<i32>,
    pub location_state: Option<String>,
    pub location_address: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}
