use crate::{
    db::DbPool,
    dto::search::{MerchantHits, ProductHits, SearchQueryEcho, SearchResults, ServiceHits},
    error::AppResult,
    models::{Merchant, Product, Service},
    response::{ApiResponse, Meta},
    routes::params::SearchQuery,
};

/// Fan out one filtered, paginated query per entity kind and assemble the
/// combined envelope. The three queries are independent, so they run
/// concurrently; no ranking or cross-entity merging happens here.
pub async fn search(pool: &DbPool, query: SearchQuery) -> AppResult<ApiResponse<SearchResults>> {
    let (page, page_size, offset) = query.normalize();
    let q = query.q.as_deref().map(str::trim).unwrap_or("").to_string();
    let pattern = if q.is_empty() {
        None
    } else {
        Some(format!("%{q}%"))
    };
    let city = query.city.clone().filter(|c| !c.is_empty());
    let category = query.category.clone().filter(|c| !c.is_empty());

    let (merchants, products, services) = tokio::try_join!(
        search_merchants(
            pool,
            pattern.as_deref(),
            city.as_deref(),
            category.as_deref(),
            page_size,
            offset
        ),
        search_products(pool, pattern.as_deref(), page_size, offset),
        search_services(pool, pattern.as_deref(), page_size, offset),
    )?;

    let results = SearchResults {
        query: SearchQueryEcho {
            q,
            city,
            category,
            page,
            page_size,
        },
        merchants,
        products,
        services,
    };

    Ok(ApiResponse::success("OK", results, Some(Meta::empty())))
}

async fn search_merchants(
    pool: &DbPool,
    pattern: Option<&str>,
    city: Option<&str>,
    category: Option<&str>,
    limit: i64,
    offset: i64,
) -> AppResult<MerchantHits> {
    let data: Vec<Merchant> = sqlx::query_as(
        r#"
        SELECT * FROM merchants
        WHERE ($1::text IS NULL OR name ILIKE $1)
          AND ($2::text IS NULL OR city = $2)
          AND ($3::text IS NULL OR category = $3)
        ORDER BY created_at DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(pattern)
    .bind(city)
    .bind(category)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM merchants
        WHERE ($1::text IS NULL OR name ILIKE $1)
          AND ($2::text IS NULL OR city = $2)
          AND ($3::text IS NULL OR category = $3)
        "#,
    )
    .bind(pattern)
    .bind(city)
    .bind(category)
    .fetch_one(pool)
    .await?;

    Ok(MerchantHits {
        data,
        count: count.0,
    })
}

async fn search_products(
    pool: &DbPool,
    pattern: Option<&str>,
    limit: i64,
    offset: i64,
) -> AppResult<ProductHits> {
    let data: Vec<Product> = sqlx::query_as(
        r#"
        SELECT * FROM products
        WHERE ($1::text IS NULL OR name ILIKE $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM products WHERE ($1::text IS NULL OR name ILIKE $1)")
            .bind(pattern)
            .fetch_one(pool)
            .await?;

    Ok(ProductHits {
        data,
        count: count.0,
    })
}

async fn search_services(
    pool: &DbPool,
    pattern: Option<&str>,
    limit: i64,
    offset: i64,
) -> AppResult<ServiceHits> {
    let data: Vec<Service> = sqlx::query_as(
        r#"
        SELECT * FROM services
        WHERE ($1::text IS NULL OR name ILIKE $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM services WHERE ($1::text IS NULL OR name ILIKE $1)")
            .bind(pattern)
            .fetch_one(pool)
            .await?;

    Ok(ServiceHits {
        data,
        count: count.0,
    })
}
