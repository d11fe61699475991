use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait};
use sea_orm::ActiveModelTrait;
use uuid::Uuid;

use crate::{
    audit::{action, log_audit},
    dto::orders::{CheckoutRequest, CheckoutResponse, OrderList, OrderWithItems},
    entity::{
        cart_items::{self, Column as CartItemCol, Entity as CartItems},
        carts::{Column as CartCol, Entity as Carts},
        order_items::ActiveModel as OrderItemActive,
        orders::ActiveModel as OrderActive,
        payments::ActiveModel as PaymentActive,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, Payment},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// Convert the caller's cart into an order, its order items, and a pending
/// payment, then clear the cart. The whole sequence runs in one transaction,
/// so a failure at any step leaves no partial order behind.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let txn = state.orm.begin().await?;

    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .one(&txn)
        .await?;
    let cart = match cart {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let items = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart.id))
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    if items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let total_amount = order_total(&items);

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        user_id: Set(user.user_id),
        merchant_id: Set(payload.merchant_id),
        total_amount: Set(total_amount),
        status: Set("pending".into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    // Copy product/service reference, quantity and price snapshot verbatim.
    for item in &items {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(item.product_id),
            service_id: Set(item.service_id),
            quantity: Set(item.quantity),
            price: Set(item.price),
        }
        .insert(&txn)
        .await?;
    }

    let payment_url = build_payment_url(&state.config.public_base_url, order.id);
    PaymentActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        amount: Set(total_amount),
        provider: Set("mock".into()),
        status: Set("pending".into()),
        payment_url: Set(Some(payment_url.clone())),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    // The cart row itself survives for future purchases.
    CartItems::delete_many()
        .filter(CartItemCol::CartId.eq(cart.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        action::CHECKOUT,
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total_amount": total_amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Checkout success",
        CheckoutResponse {
            order_id: order.id,
            payment_url,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let status = query.status.filter(|s| !s.is_empty());
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let orders: Vec<Order> = sqlx::query_as(&format!(
        "SELECT * FROM orders \
         WHERE user_id = $1 AND ($2::text IS NULL OR status = $2) \
         ORDER BY created_at {} \
         LIMIT $3 OFFSET $4",
        sort_order.as_sql()
    ))
    .bind(user.user_id)
    .bind(status.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)",
    )
    .bind(user.user_id)
    .bind(status.as_deref())
    .fetch_one(&state.pool)
    .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order: Option<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user.user_id)
            .fetch_optional(&state.pool)
            .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items: Vec<OrderItem> =
        sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
            .bind(order.id)
            .fetch_all(&state.pool)
            .await?;

    let payment: Option<Payment> = sqlx::query_as("SELECT * FROM payments WHERE order_id = $1")
        .bind(order.id)
        .fetch_optional(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order,
            items,
            payment,
        },
        Some(Meta::empty()),
    ))
}

fn order_total(items: &[cart_items::Model]) -> i64 {
    items
        .iter()
        .map(|item| item.price * i64::from(item.quantity))
        .sum()
}

fn build_payment_url(base_url: &str, order_id: Uuid) -> String {
    format!("{}/payment/{}", base_url.trim_end_matches('/'), order_id)
}
