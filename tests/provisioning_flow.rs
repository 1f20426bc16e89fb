mod common;

use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use axum_marketplace_api::{
    dto::{auth::LoginRequest, merchants::CreateMerchantRequest},
    entity::users::{Column as UserCol, Entity as Users},
    error::AppError,
    identity,
    middleware::auth::AuthUser,
    services::{auth_service, merchant_service},
};

use common::{MockGateway, try_setup_state};

fn superadmin() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role: "superadmin".into(),
    }
}

fn merchant_request(tag: &str) -> CreateMerchantRequest {
    CreateMerchantRequest {
        email: format!("owner-{tag}@example.com"),
        name: "Shop Owner".into(),
        subdomain: format!("shop-{tag}"),
        national_id: "12345678901".into(),
        password: None,
        phone: Some("2348098765432".into()),
        store_name: Some("Shop".into()),
        slug: None,
        bank_name: None,
        bank_code: None,
        account_name: None,
        account_number: None,
        payout_subaccount_code: None,
        primary_color: None,
        logo_url: None,
    }
}

#[tokio::test]
async fn provisioning_creates_identity_and_profile() -> anyhow::Result<()> {
    let state = match try_setup_state(Arc::new(MockGateway::default())).await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let tag = Uuid::new_v4().simple().to_string();
    let request = merchant_request(&tag[..8]);
    let email = request.email.clone();

    let created = merchant_service::provision_merchant(&state, &superadmin(), request)
        .await?
        .data
        .expect("merchant payload");

    assert_eq!(created.temp_password.len(), 8);
    assert!(!created.merchant.is_active);
    assert_eq!(created.merchant.payment_status, "pending");
    assert_eq!(created.merchant.primary_color.as_deref(), Some("#00A862"));
    // Slug defaults to the subdomain.
    assert_eq!(created.merchant.slug, created.merchant.subdomain);

    // Identity account exists and the temp password logs in.
    assert!(identity::fetch_password_hash(&state.pool, &email)
        .await?
        .is_some());
    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email,
            password: created.temp_password.clone(),
        },
    )
    .await?
    .data
    .expect("login payload");
    assert!(login.token.starts_with("Bearer "));

    Ok(())
}

#[tokio::test]
async fn duplicate_email_or_subdomain_conflicts() -> anyhow::Result<()> {
    let state = match try_setup_state(Arc::new(MockGateway::default())).await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let tag = Uuid::new_v4().simple().to_string();
    merchant_service::provision_merchant(&state, &superadmin(), merchant_request(&tag[..8]))
        .await?;

    // Same email again.
    let err = merchant_service::provision_merchant(&state, &superadmin(), {
        let mut dup = merchant_request(&tag[..8]);
        dup.subdomain = format!("other-{}", &tag[..8]);
        dup
    })
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    // Same subdomain, different email.
    let err = merchant_service::provision_merchant(&state, &superadmin(), {
        let mut dup = merchant_request(&tag[..8]);
        dup.email = format!("second-{}@example.com", &tag[..8]);
        dup
    })
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    Ok(())
}

// Subaccount creation failure rolls back the identity account: no
// credential and no profile row survive.
#[tokio::test]
async fn failed_subaccount_creation_is_compensated() -> anyhow::Result<()> {
    let gateway = Arc::new(MockGateway {
        fail_subaccount: true,
        ..MockGateway::default()
    });
    let state = match try_setup_state(gateway).await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let tag = Uuid::new_v4().simple().to_string();
    let mut request = merchant_request(&tag[..8]);
    request.bank_name = Some("Test Bank".into());
    request.bank_code = Some("058".into());
    request.account_name = Some("Shop Owner".into());
    request.account_number = Some("0123456789".into());
    let email = request.email.clone();

    let err = merchant_service::provision_merchant(&state, &superadmin(), request)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)), "got {err:?}");

    assert!(identity::fetch_password_hash(&state.pool, &email)
        .await?
        .is_none());
    assert!(Users::find()
        .filter(UserCol::Email.eq(email))
        .one(&state.orm)
        .await?
        .is_none());

    Ok(())
}

#[tokio::test]
async fn provisioning_requires_superadmin() -> anyhow::Result<()> {
    let state = match try_setup_state(Arc::new(MockGateway::default())).await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let tag = Uuid::new_v4().simple().to_string();
    let admin = AuthUser {
        user_id: Uuid::new_v4(),
        role: "admin".into(),
    };
    let err = merchant_service::provision_merchant(&state, &admin, merchant_request(&tag[..8]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden), "got {err:?}");

    Ok(())
}

#[tokio::test]
async fn missing_identity_fields_are_rejected() -> anyhow::Result<()> {
    let state = match try_setup_state(Arc::new(MockGateway::default())).await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let tag = Uuid::new_v4().simple().to_string();
    let mut request = merchant_request(&tag[..8]);
    request.national_id = "".into();
    let err = merchant_service::provision_merchant(&state, &superadmin(), request)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    Ok(())
}
