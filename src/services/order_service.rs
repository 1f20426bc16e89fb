use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CreateOrderRequest, OrderList, OrderWithItems},
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
        products::{Column as ProdCol, Entity as Products},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem},
    reference::new_order_reference,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// Absolute tolerance for reconciling client-claimed prices and totals
/// against the catalog. Absorbs float noise only; anything larger is
/// rejected as tampering or staleness.
pub const PRICE_TOLERANCE: f64 = 0.01;

pub fn within_tolerance(claimed: f64, actual: f64) -> bool {
    (claimed - actual).abs() <= PRICE_TOLERANCE
}

/// Order Intake: re-derive the cart's pricing from the catalog and persist
/// a pending order only when the client's numbers reconcile with server
/// truth. No external call is made here.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if payload.customer_name.trim().is_empty()
        || payload.customer_email.trim().is_empty()
        || payload.customer_phone.trim().is_empty()
    {
        return Err(AppError::Validation(
            "customer_name, customer_email and customer_phone are required".into(),
        ));
    }
    if payload.order_details.is_empty() {
        return Err(AppError::Validation(
            "order_details must be a non-empty array".into(),
        ));
    }
    for item in &payload.order_details {
        if item.quantity < 1 {
            return Err(AppError::Validation(
                "Quantity must be greater than 0".into(),
            ));
        }
        if item.price < 0.0 {
            return Err(AppError::Validation("Price must be non-negative".into()));
        }
    }

    let merchant = Users::find_by_id(payload.admin_id)
        .filter(UserCol::Role.eq("admin"))
        .one(&state.orm)
        .await?;
    if merchant.is_none() {
        return Err(AppError::NotFound("Merchant not found".into()));
    }

    // One batched lookup over the distinct id set; any miss is fatal.
    let distinct_ids: BTreeSet<Uuid> = payload.order_details.iter().map(|i| i.product_id).collect();
    let products = Products::find()
        .filter(ProdCol::Id.is_in(distinct_ids.iter().copied()))
        .filter(ProdCol::AdminId.eq(payload.admin_id))
        .all(&state.orm)
        .await?;
    if products.len() != distinct_ids.len() {
        return Err(AppError::NotFound("One or more products not found".into()));
    }
    let by_id: HashMap<Uuid, _> = products.into_iter().map(|p| (p.id, p)).collect();

    let mut calculated_total = 0.0;
    for item in &payload.order_details {
        let product = by_id
            .get(&item.product_id)
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", item.product_id)))?;
        if !within_tolerance(item.price, product.price) {
            return Err(AppError::PriceMismatch(format!(
                "Price mismatch for product {}. Expected: {}, Received: {}",
                item.product_id, product.price, item.price
            )));
        }
        calculated_total += product.price * f64::from(item.quantity);
    }

    if !within_tolerance(calculated_total, payload.total_amount) {
        return Err(AppError::TotalMismatch(format!(
            "Total amount mismatch. Calculated: {}, Received: {}",
            calculated_total, payload.total_amount
        )));
    }

    let order_reference = new_order_reference(&state.config.order_ref_prefix);
    let order_id = Uuid::new_v4();

    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: Set(order_id),
        admin_id: Set(payload.admin_id),
        customer_id: Set(payload.customer_id),
        customer_name: Set(payload.customer_name.clone()),
        customer_email: Set(payload.customer_email.clone()),
        customer_phone: Set(payload.customer_phone.clone()),
        total_amount: Set(payload.total_amount),
        payment_status: Set("pending".into()),
        tracking_status: Set("processing".into()),
        order_reference: Set(order_reference.clone()),
        verification_code: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(payload.order_details.len());
    for line in &payload.order_details {
        let product = &by_id[&line.product_id];
        // Snapshot the server-verified price, never the claimed one.
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            price: Set(product.price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(order_item_from_entity(item));
    }

    // Guest checkout leaves a lightweight customer profile behind,
    // last-write-wins on name/phone.
    if payload.customer_id.is_none() {
        let customer = UserActive {
            id: Set(Uuid::new_v4()),
            email: Set(payload.customer_email.clone()),
            name: Set(payload.customer_name.clone()),
            phone: Set(Some(payload.customer_phone.clone())),
            role: Set("customer".into()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        Users::insert(customer)
            .on_conflict(
                OnConflict::column(UserCol::Email)
                    .update_columns([UserCol::Name, UserCol::Phone, UserCol::UpdatedAt])
                    .to_owned(),
            )
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        payload.customer_id,
        "order_created",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "admin_id": payload.admin_id,
            "order_reference": order_reference,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        OrderWithItems {
            order: order_from_entity(order),
            items,
            order_reference,
        },
        Some(Meta::empty()),
    ))
}

/// Merchant-scoped order listing with status filter and pagination.
pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(OrderCol::AdminId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::PaymentStatus.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::AdminId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound("Order not found".into())),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    let order_reference = order.order_reference.clone();
    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
            order_reference,
        },
        Some(Meta::empty()),
    ))
}

pub fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        admin_id: model.admin_id,
        customer_id: model.customer_id,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        customer_phone: model.customer_phone,
        total_amount: model.total_amount,
        payment_status: model.payment_status,
        tracking_status: model.tracking_status,
        order_reference: model.order_reference,
        verification_code: model.verification_code,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
