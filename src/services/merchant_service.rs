use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::merchants::{CreateMerchantRequest, MerchantCreated, MerchantList, SetActivationRequest},
    entity::users::{
        ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel,
    },
    error::{AppError, AppResult},
    gateway::CreateSubaccount,
    identity,
    middleware::auth::{AuthUser, ensure_superadmin},
    models::Merchant,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

const DEFAULT_PRIMARY_COLOR: &str = "#00A862";

/// Platform commission on split settlements, registered with the gateway
/// when auto-creating a subaccount.
const SUBACCOUNT_PERCENTAGE_CHARGE: f64 = 1.5;

/// Two-phase merchant provisioning with one compensating action:
/// phase 1 creates the identity account, phase 2 writes the profile row
/// (with an optional gateway subaccount in between). Any failure after
/// phase 1 deletes the identity account so no orphaned credential remains.
pub async fn provision_merchant(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMerchantRequest,
) -> AppResult<ApiResponse<MerchantCreated>> {
    ensure_superadmin(user)?;

    if payload.email.trim().is_empty()
        || payload.name.trim().is_empty()
        || payload.subdomain.trim().is_empty()
        || payload.national_id.trim().is_empty()
    {
        return Err(AppError::Validation(
            "email, name, subdomain and national_id are required".into(),
        ));
    }

    let slug = payload
        .slug
        .clone()
        .unwrap_or_else(|| payload.subdomain.clone());

    if Users::find()
        .filter(UserCol::Email.eq(payload.email.clone()))
        .one(&state.orm)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Admin with email {} already exists",
            payload.email
        )));
    }
    if Users::find()
        .filter(
            Condition::any()
                .add(UserCol::Subdomain.eq(payload.subdomain.clone()))
                .add(UserCol::Slug.eq(slug.clone())),
        )
        .one(&state.orm)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Subdomain {} is already taken",
            payload.subdomain
        )));
    }

    let merchant_id = Uuid::new_v4();
    let temp_password = payload
        .password
        .clone()
        .unwrap_or_else(identity::generate_temp_password);

    // Phase 1: identity account.
    identity::create_account(&state.pool, merchant_id, &payload.email, &temp_password).await?;

    // Optional gateway subaccount, compensated on failure.
    let subaccount_code = match payload.payout_subaccount_code.clone() {
        Some(code) => Some(code),
        None => match (&payload.bank_code, &payload.account_number, &payload.account_name) {
            (Some(bank_code), Some(account_number), Some(account_name)) => {
                let request = CreateSubaccount {
                    business_name: payload
                        .store_name
                        .clone()
                        .unwrap_or_else(|| payload.name.clone()),
                    bank_code: bank_code.clone(),
                    account_number: account_number.clone(),
                    account_name: account_name.clone(),
                    percentage_charge: SUBACCOUNT_PERCENTAGE_CHARGE,
                };
                match state.gateway.create_subaccount(&request).await {
                    Ok(code) => Some(code),
                    Err(err) => {
                        compensate_identity(state, merchant_id).await;
                        return Err(err);
                    }
                }
            }
            _ => None,
        },
    };

    // Phase 2: profile row.
    let inserted = UserActive {
        id: Set(merchant_id),
        email: Set(payload.email.clone()),
        name: Set(payload.name.clone()),
        phone: Set(payload.phone.clone()),
        role: Set("admin".into()),
        subdomain: Set(Some(payload.subdomain.clone())),
        slug: Set(Some(slug)),
        store_name: Set(payload.store_name.clone()),
        payout_subaccount_code: Set(subaccount_code.clone()),
        national_id: Set(Some(payload.national_id.clone())),
        bank_name: Set(payload.bank_name.clone()),
        bank_code: Set(payload.bank_code.clone()),
        account_name: Set(payload.account_name.clone()),
        account_number: Set(payload.account_number.clone()),
        is_active: Set(false),
        payment_status: Set("pending".into()),
        primary_color: Set(Some(
            payload
                .primary_color
                .clone()
                .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string()),
        )),
        logo_url: Set(payload.logo_url.clone()),
        must_reset_password: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await;

    let merchant = match inserted {
        Ok(model) => model,
        Err(err) => {
            compensate_identity(state, merchant_id).await;
            return Err(err.into());
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "merchant_created",
        Some("users"),
        Some(serde_json::json!({ "merchant_id": merchant.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Merchant created",
        MerchantCreated {
            merchant: merchant_from_entity(merchant),
            temp_password,
            payout_subaccount_code: subaccount_code,
        },
        Some(Meta::empty()),
    ))
}

/// Compensating action for the provisioning saga. Failure here is logged
/// and swallowed: the caller already has a more useful error to surface.
async fn compensate_identity(state: &AppState, merchant_id: Uuid) {
    if let Err(err) = identity::delete_account(&state.pool, merchant_id).await {
        tracing::error!(
            merchant_id = %merchant_id,
            error = %err,
            "compensating identity delete failed, orphaned credential left behind"
        );
    }
}

pub async fn list_merchants(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<MerchantList>> {
    ensure_superadmin(user)?;
    let (page, limit, offset) = pagination.normalize();

    let finder = Users::find()
        .filter(UserCol::Role.eq("admin"))
        .order_by_desc(UserCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let merchants = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(merchant_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        MerchantList { items: merchants },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn set_activation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: SetActivationRequest,
) -> AppResult<ApiResponse<Merchant>> {
    ensure_superadmin(user)?;

    let merchant = Users::find_by_id(id)
        .filter(UserCol::Role.eq("admin"))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Merchant not found".into()))?;

    let mut active: UserActive = merchant.into();
    active.is_active = Set(payload.is_active);
    active.updated_at = Set(Utc::now().into());
    let merchant = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "merchant_activation",
        Some("users"),
        Some(serde_json::json!({ "merchant_id": merchant.id, "is_active": payload.is_active })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Merchant updated",
        merchant_from_entity(merchant),
        Some(Meta::empty()),
    ))
}

pub fn merchant_from_entity(model: UserModel) -> Merchant {
    Merchant {
        id: model.id,
        email: model.email,
        name: model.name,
        phone: model.phone,
        subdomain: model.subdomain,
        slug: model.slug,
        store_name: model.store_name,
        payout_subaccount_code: model.payout_subaccount_code,
        is_active: model.is_active,
        payment_status: model.payment_status,
        primary_color: model.primary_color,
        logo_url: model.logo_url,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
