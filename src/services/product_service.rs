use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::products::{
        ActiveModel as ProductActive, Column as ProdCol, Entity as Products, Model as ProductModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
};

/// Categories the storefront supports; anything else is rejected at
/// creation time.
pub const SUPPORTED_CATEGORIES: [&str; 4] = [
    "Babies & Kids",
    "Fashion",
    "Beauty & Personal Care",
    "Shoes",
];

fn ensure_supported_category(category: &str) -> Result<(), AppError> {
    if !SUPPORTED_CATEGORIES.contains(&category) {
        return Err(AppError::Validation(
            "Invalid or unsupported category".into(),
        ));
    }
    Ok(())
}

/// Public storefront listing, scoped to one merchant.
pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all().add(ProdCol::AdminId.eq(query.admin_id));
    if let Some(q) = query.q.as_ref().filter(|q| !q.is_empty()) {
        condition = condition.add(ProdCol::Name.contains(q));
    }
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(ProdCol::Category.eq(category.clone()));
    }

    let finder = Products::find()
        .filter(condition)
        .order_by_desc(ProdCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let products = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        ProductList { items: products },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    ensure_supported_category(&payload.category)?;
    if payload
        .location_state
        .as_deref()
        .is_none_or(|s| s.trim().is_empty())
    {
        return Err(AppError::Validation("Location state is required".into()));
    }
    if payload.price < 0.0 {
        return Err(AppError::Validation("Valid price is required".into()));
    }
    if payload.units_available < 0 {
        return Err(AppError::Validation(
            "units_available must not be negative".into(),
        ));
    }

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        admin_id: Set(user.user_id),
        name: Set(payload.name),
        category: Set(payload.category),
        description: Set(payload.description),
        price: Set(payload.price),
        original_price: Set(payload.original_price),
        adjusted_price: Set(payload.adjusted_price),
        gateway_fee: Set(payload.gateway_fee),
        units_available: Set(payload.units_available),
        location_state: Set(payload.location_state),
        location_address: Set(payload.location_address),
        image_url: Set(payload.image_url),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    let product = owned_product(state, user, id).await?;

    if let Some(category) = payload.category.as_deref() {
        ensure_supported_category(category)?;
    }
    if let Some(price) = payload.price {
        if price < 0.0 {
            return Err(AppError::Validation("Valid price is required".into()));
        }
    }
    if let Some(units) = payload.units_available {
        if units < 0 {
            return Err(AppError::Validation(
                "units_available must not be negative".into(),
            ));
        }
    }

    let mut active: ProductActive = product.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if payload.description.is_some() {
        active.description = Set(payload.description);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if payload.original_price.is_some() {
        active.original_price = Set(payload.original_price);
    }
    if payload.adjusted_price.is_some() {
        active.adjusted_price = Set(payload.adjusted_price);
    }
    if payload.gateway_fee.is_some() {
        active.gateway_fee = Set(payload.gateway_fee);
    }
    if let Some(units) = payload.units_available {
        active.units_available = Set(units);
    }
    if payload.location_state.is_some() {
        active.location_state = Set(payload.location_state);
    }
    if payload.location_address.is_some() {
        active.location_address = Set(payload.location_address);
    }
    if payload.image_url.is_some() {
        active.image_url = Set(payload.image_url);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Product updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let product = owned_product(state, user, id).await?;
    product.delete(&state.orm).await?;

    Ok(ApiResponse::success(
        "Product deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

async fn owned_product(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ProductModel> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
    if product.admin_id != user.user_id {
        return Err(AppError::Forbidden);
    }
    Ok(product)
}

pub fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        admin_id: model.admin_id,
        name: model.name,
        category: model.category,
        description: model.description,
        price: model.price,
        original_price: model.original_price,
        adjusted_price: model.adjusted_price,
        gateway_fee: model.gateway_fee,
        units_available: model.units_available,
        location_state: model.location_state,
        location_address: model.location_address,
        image_url: model.image_url,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
