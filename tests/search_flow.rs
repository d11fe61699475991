use pet_marketplace_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::search::SearchQueryEcho,
    routes::params::SearchQuery,
    services::search_service,
};
use uuid::Uuid;

#[test]
fn search_page_size_is_clamped() {
    let query = SearchQuery {
        page_size: Some(100),
        ..Default::default()
    };
    let (page, page_size, offset) = query.normalize();
    assert_eq!(page, 1);
    assert_eq!(page_size, 50);
    assert_eq!(offset, 0);

    let defaults = SearchQuery::default().normalize();
    assert_eq!(defaults, (1, 10, 0));

    let paged = SearchQuery {
        page: Some(3),
        page_size: Some(10),
        ..Default::default()
    }
    .normalize();
    assert_eq!(paged, (3, 10, 20));
}

#[test]
fn search_echo_keeps_camel_case_page_size() {
    let echo = SearchQueryEcho {
        q: "paws".to_string(),
        city: None,
        category: None,
        page: 1,
        page_size: 10,
    };
    let value = serde_json::to_value(&echo).expect("echo serializes");
    assert_eq!(value.get("pageSize"), Some(&serde_json::json!(10)));
    assert!(value.get("page_size").is_none());
}

#[tokio::test]
async fn search_filters_merchants_by_city() -> anyhow::Result<()> {
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

    let jakarta = create_merchant(&pool, "Paws Jakarta", "pet_shop", "Jakarta").await?;
    create_merchant(&pool, "Paws Bandung", "pet_shop", "Bandung").await?;
    create_merchant(&pool, "Vet Center Jakarta", "clinic", "Jakarta").await?;

    create_product(&pool, jakarta, "Paws Dog Food").await?;
    create_service(&pool, jakarta, "Paws Grooming").await?;

    // City filter narrows merchants but leaves products/services matching q alone.
    let results = search_service::search(
        &pool,
        SearchQuery {
            q: Some("paws".to_string()),
            city: Some("Jakarta".to_string()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();

    assert_eq!(results.merchants.count, 1);
    assert_eq!(results.merchants.data[0].id, jakarta);
    assert_eq!(results.products.count, 1);
    assert_eq!(results.services.count, 1);

    // Blank q returns everything, unfiltered kinds included.
    let all = search_service::search(&pool, SearchQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(all.merchants.count, 3);
    assert_eq!(all.products.count, 1);
    assert_eq!(all.services.count, 1);
    assert_eq!(all.query.page_size, 10);

    Ok(())
}

async fn create_merchant(
    pool: &sqlx::PgPool,
    name: &str,
    category: &str,
    city: &str,
) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO merchants (id, name, category, city)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(category)
    .bind(city)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn create_product(pool: &sqlx::PgPool, merchant_id: Uuid, name: &str) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO products (id, merchant_id, name, price, stock)
        VALUES ($1, $2, $3, 10000, 10)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(merchant_id)
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn create_service(pool: &sqlx::PgPool, merchant_id: Uuid, name: &str) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO services (id, merchant_id, name, price, duration_minutes)
        VALUES ($1, $2, $3, 50000, 45)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(merchant_id)
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(id)
}
