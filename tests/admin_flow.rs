use pet_marketplace_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::admin::{BootstrapRequest, CreateCategoryRequest},
    error::AppError,
    middleware::auth::AuthUser,
    services::{admin_service, bootstrap_service, role_service},
};
use uuid::Uuid;

// Bootstrap identities, then exercise the admin-only surface with and
// without the admin role.
#[tokio::test]
async fn bootstrap_and_admin_flow() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    sqlx::query(
        "TRUNCATE TABLE payments, order_items, orders, cart_items, carts, bookings, \
         chat_messages, reviews, merchant_photos, products, services, merchants, \
         categories, user_roles, audit_logs, users RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await?;

    // Bootstrap defaults to the merchant role and is idempotent per email.
    let first = bootstrap_service::bootstrap(
        &pool,
        BootstrapRequest {
            email: "Shop@Example.com".to_string(),
            password: "secret123".to_string(),
            role: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(first.role, "merchant");

    let again = bootstrap_service::bootstrap(
        &pool,
        BootstrapRequest {
            email: "shop@example.com".to_string(),
            password: "different-password".to_string(),
            role: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(again.user_id, first.user_id);

    let roles = role_service::fetch_roles(&pool, first.user_id).await?;
    assert_eq!(roles, vec!["merchant".to_string()]);

    // Unknown roles are rejected before touching the users table.
    let err = bootstrap_service::bootstrap(
        &pool,
        BootstrapRequest {
            email: "other@example.com".to_string(),
            password: "secret123".to_string(),
            role: Some("superuser".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let admin = bootstrap_service::bootstrap(
        &pool,
        BootstrapRequest {
            email: "admin@example.com".to_string(),
            password: "secret123".to_string(),
            role: Some("admin".to_string()),
        },
    )
    .await?
    .data
    .unwrap();

    let auth_admin = AuthUser {
        user_id: admin.user_id,
    };
    let auth_merchant = AuthUser {
        user_id: first.user_id,
    };

    // The merchant is not allowed anywhere near the admin surface.
    let err = admin_service::summary_report(&pool, &auth_merchant)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // Seed an order with a succeeded and a pending payment; only the
    // succeeded one counts as revenue.
    seed_order_with_payment(&pool, admin.user_id, 30_000, "succeeded").await?;
    seed_order_with_payment(&pool, admin.user_id, 99_000, "pending").await?;

    let report = admin_service::summary_report(&pool, &auth_admin)
        .await?
        .data
        .unwrap();
    assert_eq!(report.users, 2);
    assert_eq!(report.merchants, 0);
    assert_eq!(report.orders, 2);
    assert_eq!(report.revenue, 30_000);

    // Category CRUD.
    let category = admin_service::create_category(
        &pool,
        &auth_admin,
        CreateCategoryRequest {
            name: "Grooming".to_string(),
            kind: "service".to_string(),
        },
    )
    .await?
    .data
    .unwrap();

    let err = admin_service::create_category(
        &pool,
        &auth_admin,
        CreateCategoryRequest {
            name: "Weird".to_string(),
            kind: "gadget".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let listed = admin_service::list_categories(&pool, &auth_admin)
        .await?
        .data
        .unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].name, "Grooming");

    admin_service::delete_category(&pool, &auth_admin, category.id).await?;
    let err = admin_service::delete_category(&pool, &auth_admin, category.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

async fn seed_order_with_payment(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    amount: i64,
    status: &str,
) -> anyhow::Result<()> {
    let (order_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO orders (id, user_id, total_amount, status)
        VALUES ($1, $2, $3, 'pending')
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(amount)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO payments (id, order_id, amount, provider, status)
        VALUES ($1, $2, $3, 'mock', $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(amount)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(())
}
