use pet_marketplace_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::cart::{AddItemRequest, CartItemKind, UpdateItemRequest},
    dto::orders::CheckoutRequest,
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::{OrderListQuery, Pagination, SortOrder},
    services::{cart_service, order_service, role_service},
    state::AppState,
};
use uuid::Uuid;

// Integration flow: customer fills a cart (same item added twice merges),
// checks out, and the order/items/payment mirror the cart exactly.
#[tokio::test]
async fn cart_checkout_flow() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "buyer@example.com").await?;
    let owner_id = create_user(&state, "owner@example.com").await?;
    let merchant_id = create_merchant(&state, owner_id).await?;
    let product_id = create_product(&state, merchant_id, "Dog Food", 10_000).await?;
    let service_id = create_service(&state, merchant_id, "Grooming", 50_000).await?;

    let buyer = AuthUser { user_id };

    // No role rows yet: the identity defaults to customer.
    let roles = role_service::fetch_roles(&state.pool, user_id).await?;
    assert_eq!(roles, vec!["customer".to_string()]);

    // Referencing a product that does not exist is rejected up front.
    let err = cart_service::add_item(
        &state.pool,
        &buyer,
        AddItemRequest {
            kind: CartItemKind::Product,
            id: Uuid::new_v4(),
            quantity: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Adding the same product twice merges into one line item.
    cart_service::add_item(
        &state.pool,
        &buyer,
        AddItemRequest {
            kind: CartItemKind::Product,
            id: product_id,
            quantity: 1,
        },
    )
    .await?;
    let merged = cart_service::add_item(
        &state.pool,
        &buyer,
        AddItemRequest {
            kind: CartItemKind::Product,
            id: product_id,
            quantity: 1,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(merged.quantity, 2);
    assert_eq!(merged.price, 10_000);

    let service_line = cart_service::add_item(
        &state.pool,
        &buyer,
        AddItemRequest {
            kind: CartItemKind::Service,
            id: service_id,
            quantity: 1,
        },
    )
    .await?
    .data
    .unwrap();

    let cart = cart_service::list_cart(&state.pool, &buyer).await?.data.unwrap();
    assert_eq!(cart.items.len(), 2);

    // Quantity zero deletes the line instead of storing a degenerate row.
    cart_service::update_item(
        &state.pool,
        &buyer,
        UpdateItemRequest {
            item_id: service_line.id,
            quantity: 0,
        },
    )
    .await?;
    let cart = cart_service::list_cart(&state.pool, &buyer).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);

    // Updating a stranger's item is indistinguishable from a missing one.
    let stranger = AuthUser {
        user_id: create_user(&state, "stranger@example.com").await?,
    };
    let err = cart_service::update_item(
        &state.pool,
        &stranger,
        UpdateItemRequest {
            item_id: merged.id,
            quantity: 5,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Put the service back so checkout covers both item kinds.
    cart_service::add_item(
        &state.pool,
        &buyer,
        AddItemRequest {
            kind: CartItemKind::Service,
            id: service_id,
            quantity: 1,
        },
    )
    .await?;

    // A price change after the items were added must not affect the
    // snapshots already in the cart.
    sqlx::query("UPDATE products SET price = $2 WHERE id = $1")
        .bind(product_id)
        .bind(99_999_i64)
        .execute(&state.pool)
        .await?;

    // Checkout: 2 x 10000 + 1 x 50000, priced from the snapshots.
    let checkout = order_service::checkout(&state, &buyer, CheckoutRequest { merchant_id: None })
        .await?
        .data
        .unwrap();
    assert!(
        checkout.payment_url.ends_with(&format!("/payment/{}", checkout.order_id)),
        "unexpected payment url: {}",
        checkout.payment_url
    );

    let detail = order_service::get_order(&state, &buyer, checkout.order_id)
        .await?
        .data
        .unwrap();
    assert_eq!(detail.order.total_amount, 70_000);
    assert_eq!(detail.order.status, "pending");
    assert_eq!(detail.items.len(), 2);

    let product_line = detail
        .items
        .iter()
        .find(|i| i.product_id == Some(product_id))
        .expect("product line");
    assert_eq!(product_line.quantity, 2);
    assert_eq!(product_line.price, 10_000);
    let service_line = detail
        .items
        .iter()
        .find(|i| i.service_id == Some(service_id))
        .expect("service line");
    assert_eq!(service_line.quantity, 1);
    assert_eq!(service_line.price, 50_000);

    let payment = detail.payment.expect("payment row");
    assert_eq!(payment.amount, 70_000);
    assert_eq!(payment.status, "pending");
    assert_eq!(payment.provider, "mock");

    // The cart survives checkout but is emptied.
    let cart = cart_service::list_cart(&state.pool, &buyer).await?.data.unwrap();
    assert!(cart.items.is_empty());

    // An immediate second checkout hits the now-empty cart.
    let err = order_service::checkout(&state, &buyer, CheckoutRequest { merchant_id: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "Cart is empty"));

    // A second order so the listing has something to sort.
    cart_service::add_item(
        &state.pool,
        &buyer,
        AddItemRequest {
            kind: CartItemKind::Product,
            id: product_id,
            quantity: 1,
        },
    )
    .await?;
    let second = order_service::checkout(&state, &buyer, CheckoutRequest { merchant_id: None })
        .await?
        .data
        .unwrap();

    let asc = order_service::list_orders(&state, &buyer, order_query(SortOrder::Asc))
        .await?
        .data
        .unwrap();
    assert_eq!(asc.items.len(), 2);
    assert_eq!(asc.items.first().map(|o| o.id), Some(checkout.order_id));

    let desc = order_service::list_orders(&state, &buyer, order_query(SortOrder::Desc))
        .await?
        .data
        .unwrap();
    assert_eq!(desc.items.first().map(|o| o.id), Some(second.order_id));

    Ok(())
}

fn order_query(sort_order: SortOrder) -> OrderListQuery {
    OrderListQuery {
        pagination: Pagination {
            page: Some(1),
            per_page: Some(10),
        },
        status: None,
        sort_order: Some(sort_order),
    }
}

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs.
    sqlx::query(
        "TRUNCATE TABLE payments, order_items, orders, cart_items, carts, bookings, \
         chat_messages, reviews, merchant_photos, products, services, merchants, \
         categories, user_roles, audit_logs, users RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await?;

    let config = AppConfig {
        database_url: database_url.clone(),
        host: "127.0.0.1".to_string(),
        port: 3000,
        public_base_url: "http://127.0.0.1:3000".to_string(),
    };

    Ok(Some(AppState { pool, orm, config }))
}

async fn create_user(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, full_name)
        VALUES ($1, $2, 'dummy', 'Test User')
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .fetch_one(&state.pool)
    .await?;
    Ok(id)
}

async fn create_merchant(state: &AppState, owner_id: Uuid) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO merchants (id, owner_id, name, category, city)
        VALUES ($1, $2, 'Test Shop', 'pet_shop', 'Jakarta')
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .fetch_one(&state.pool)
    .await?;
    Ok(id)
}

async fn create_product(
    state: &AppState,
    merchant_id: Uuid,
    name: &str,
    price: i64,
) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO products (id, merchant_id, name, price, stock)
        VALUES ($1, $2, $3, $4, 100)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(merchant_id)
    .bind(name)
    .bind(price)
    .fetch_one(&state.pool)
    .await?;
    Ok(id)
}

async fn create_service(
    state: &AppState,
    merchant_id: Uuid,
    name: &str,
    price: i64,
) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO services (id, merchant_id, name, price, duration_minutes)
        VALUES ($1, $2, $3, $4, 60)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(merchant_id)
    .bind(name)
    .bind(price)
    .fetch_one(&state.pool)
    .await?;
    Ok(id)
}
