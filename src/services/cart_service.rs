use uuid::Uuid;

use crate::{
    audit::{action, log_audit},
    db::DbPool,
    dto::cart::{AddItemRequest, CartItemKind, CartView, UpdateItemRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Cart, CartItem},
    response::{ApiResponse, Meta},
};

/// Idempotent lookup-or-create of the caller's single cart. The unique
/// constraint on carts.user_id makes the upsert safe under concurrent
/// first requests from the same identity.
pub async fn get_or_create_cart(pool: &DbPool, user_id: Uuid) -> AppResult<Cart> {
    sqlx::query(
        r#"
        INSERT INTO carts (id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .execute(pool)
    .await?;

    let cart: Cart = sqlx::query_as("SELECT * FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(cart)
}

pub async fn list_cart(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let cart = get_or_create_cart(pool, user.user_id).await?;

    let items: Vec<CartItem> =
        sqlx::query_as("SELECT * FROM cart_items WHERE cart_id = $1 ORDER BY id")
            .bind(cart.id)
            .fetch_all(pool)
            .await?;

    Ok(ApiResponse::success(
        "OK",
        CartView {
            cart_id: cart.id,
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Resolve the current price of the referenced product/service, then either
/// bump the quantity of an existing line item for the same (type, id) or
/// insert a new row with the price snapshot.
pub async fn add_item(
    pool: &DbPool,
    user: &AuthUser,
    payload: AddItemRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let cart = get_or_create_cart(pool, user.user_id).await?;

    let table = match payload.kind {
        CartItemKind::Product => "products",
        CartItemKind::Service => "services",
    };
    let price: Option<(i64,)> =
        sqlx::query_as(&format!("SELECT price FROM {table} WHERE id = $1"))
            .bind(payload.id)
            .fetch_optional(pool)
            .await?;
    let price = match price {
        Some((p,)) => p,
        None => return Err(AppError::NotFound),
    };

    let ref_column = match payload.kind {
        CartItemKind::Product => "product_id",
        CartItemKind::Service => "service_id",
    };
    let existing: Option<CartItem> = sqlx::query_as(&format!(
        "SELECT * FROM cart_items WHERE cart_id = $1 AND {ref_column} = $2"
    ))
    .bind(cart.id)
    .bind(payload.id)
    .fetch_optional(pool)
    .await?;

    let cart_item = if let Some(item) = existing {
        sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart_items
            SET quantity = quantity + $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(payload.quantity)
        .fetch_one(pool)
        .await?
    } else {
        let (product_id, service_id) = match payload.kind {
            CartItemKind::Product => (Some(payload.id), None),
            CartItemKind::Service => (None, Some(payload.id)),
        };
        sqlx::query_as(
            r#"
            INSERT INTO cart_items (id, cart_id, product_id, service_id, quantity, price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(cart.id)
        .bind(product_id)
        .bind(service_id)
        .bind(payload.quantity)
        .bind(price)
        .fetch_one(pool)
        .await?
    };

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        action::CART_ADD,
        Some("cart_items"),
        Some(serde_json::json!({ "item_id": payload.id, "quantity": payload.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", cart_item, None))
}

/// Overwrite a line item's quantity. A quantity of zero or less removes
/// the item instead of persisting a degenerate row.
pub async fn update_item(
    pool: &DbPool,
    user: &AuthUser,
    payload: UpdateItemRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.quantity <= 0 {
        return remove_item(pool, user, payload.item_id).await;
    }

    let result = sqlx::query(
        r#"
        UPDATE cart_items ci
        SET quantity = $3
        FROM carts c
        WHERE ci.id = $1 AND ci.cart_id = c.id AND c.user_id = $2
        "#,
    )
    .bind(payload.item_id)
    .bind(user.user_id)
    .bind(payload.quantity)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Updated",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn remove_item(
    pool: &DbPool,
    user: &AuthUser,
    item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query(
        r#"
        DELETE FROM cart_items ci
        USING carts c
        WHERE ci.id = $1 AND ci.cart_id = c.id AND c.user_id = $2
        "#,
    )
    .bind(item_id)
    .bind(user.user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        action::CART_REMOVE,
        Some("cart_items"),
        Some(serde_json::json!({ "item_id": item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
