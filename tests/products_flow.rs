mod common;

use std::sync::Arc;

use axum_marketplace_api::{
    dto::products::CreateProductRequest,
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::ProductQuery,
    services::product_service,
};

use common::{MockGateway, seed_merchant, try_setup_state};

fn product_request(category: &str) -> CreateProductRequest {
    CreateProductRequest {
        name: "Ankara Gown".into(),
        category: category.into(),
        description: Some("Hand-sewn".into()),
        price: 500.0,
        original_price: None,
        adjusted_price: None,
        gateway_fee: None,
        units_available: 5,
        location_state: Some("Lagos".into()),
        location_address: Some("12 Allen Avenue".into()),
        image_url: None,
    }
}

#[tokio::test]
async fn created_product_appears_in_storefront_listing() -> anyhow::Result<()> {
    let state = match try_setup_state(Arc::new(MockGateway::default())).await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let admin_id = seed_merchant(&state, None).await?;
    let user = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };

    let created = product_service::create_product(&state, &user, product_request("Fashion"))
        .await?
        .data
        .expect("product payload");
    assert_eq!(created.admin_id, admin_id);
    assert_eq!(created.location_state.as_deref(), Some("Lagos"));

    let listed = product_service::list_products(
        &state,
        ProductQuery {
            admin_id,
            page: Some(1),
            per_page: Some(20),
            q: None,
            category: Some("Fashion".into()),
        },
    )
    .await?
    .data
    .expect("listing payload");
    assert!(listed.items.iter().any(|p| p.id == created.id));

    Ok(())
}

#[tokio::test]
async fn unsupported_category_is_rejected() -> anyhow::Result<()> {
    let state = match try_setup_state(Arc::new(MockGateway::default())).await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let admin_id = seed_merchant(&state, None).await?;
    let user = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };

    let err = product_service::create_product(&state, &user, product_request("Automotive"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    Ok(())
}

#[tokio::test]
async fn missing_location_state_is_rejected() -> anyhow::Result<()> {
    let state = match try_setup_state(Arc::new(MockGateway::default())).await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let admin_id = seed_merchant(&state, None).await?;
    let user = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };

    let mut request = product_request("Shoes");
    request.location_state = None;
    let err = product_service::create_product(&state, &user, request)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    Ok(())
}
