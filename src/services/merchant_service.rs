use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::merchants::{
        AddPhotoRequest, CreateMerchantRequest, CreateProductRequest, CreateReviewRequest,
        CreateServiceRequest, MerchantDetail, MerchantList, PhotoList, ProductList, ReviewList,
        ServiceList, UpdateMerchantRequest, UpdateProductRequest, UpdateServiceRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Merchant, MerchantPhoto, Product, Review, Service},
    response::{ApiResponse, Meta},
    routes::params::MerchantListQuery,
    services::role_service,
};

pub async fn list_merchants(
    pool: &DbPool,
    query: MerchantListQuery,
) -> AppResult<ApiResponse<MerchantList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let city = query.city.filter(|c| !c.is_empty());
    let category = query.category.filter(|c| !c.is_empty());

    let items: Vec<Merchant> = sqlx::query_as(
        r#"
        SELECT * FROM merchants
        WHERE ($1::text IS NULL OR city = $1)
          AND ($2::text IS NULL OR category = $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(city.as_deref())
    .bind(category.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM merchants
        WHERE ($1::text IS NULL OR city = $1)
          AND ($2::text IS NULL OR category = $2)
        "#,
    )
    .bind(city.as_deref())
    .bind(category.as_deref())
    .fetch_one(pool)
    .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "Merchants",
        MerchantList { items },
        Some(meta),
    ))
}

pub async fn get_merchant(pool: &DbPool, id: Uuid) -> AppResult<ApiResponse<MerchantDetail>> {
    let merchant = find_merchant(pool, id).await?;

    let photos: Vec<MerchantPhoto> = sqlx::query_as(
        "SELECT * FROM merchant_photos WHERE merchant_id = $1 ORDER BY created_at",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success(
        "Merchant",
        MerchantDetail { merchant, photos },
        Some(Meta::empty()),
    ))
}

pub async fn create_merchant(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateMerchantRequest,
) -> AppResult<ApiResponse<Merchant>> {
    role_service::ensure_role(pool, user, "merchant").await?;

    let merchant: Merchant = sqlx::query_as(
        r#"
        INSERT INTO merchants (id, owner_id, name, category, city, address, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.name)
    .bind(payload.category)
    .bind(payload.city)
    .bind(payload.address)
    .bind(payload.description)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Merchant created",
        merchant,
        Some(Meta::empty()),
    ))
}

pub async fn update_merchant(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMerchantRequest,
) -> AppResult<ApiResponse<Merchant>> {
    let existing = find_owned_merchant(pool, user, id).await?;

    let name = payload.name.unwrap_or(existing.name);
    let category = payload.category.unwrap_or(existing.category);
    let city = payload.city.or(existing.city);
    let address = payload.address.or(existing.address);
    let description = payload.description.or(existing.description);

    let merchant: Merchant = sqlx::query_as(
        r#"
        UPDATE merchants
        SET name = $2, category = $3, city = $4, address = $5, description = $6
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(category)
    .bind(city)
    .bind(address)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Merchant updated",
        merchant,
        Some(Meta::empty()),
    ))
}

pub async fn list_products(pool: &DbPool, merchant_id: Uuid) -> AppResult<ApiResponse<ProductList>> {
    find_merchant(pool, merchant_id).await?;
    let items: Vec<Product> =
        sqlx::query_as("SELECT * FROM products WHERE merchant_id = $1 ORDER BY created_at DESC")
            .bind(merchant_id)
            .fetch_all(pool)
            .await?;
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_product(
    pool: &DbPool,
    user: &AuthUser,
    merchant_id: Uuid,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    find_owned_merchant(pool, user, merchant_id).await?;
    if payload.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }

    let product: Product = sqlx::query_as(
        r#"
        INSERT INTO products (id, merchant_id, name, description, price, stock, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(merchant_id)
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.price)
    .bind(payload.stock)
    .bind(payload.image_url)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    pool: &DbPool,
    user: &AuthUser,
    merchant_id: Uuid,
    product_id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    find_owned_merchant(pool, user, merchant_id).await?;

    let existing: Option<Product> =
        sqlx::query_as("SELECT * FROM products WHERE id = $1 AND merchant_id = $2")
            .bind(product_id)
            .bind(merchant_id)
            .fetch_optional(pool)
            .await?;
    let existing = existing.ok_or(AppError::NotFound)?;

    let price = payload.price.unwrap_or(existing.price);
    if price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }

    let product: Product = sqlx::query_as(
        r#"
        UPDATE products
        SET name = $2, description = $3, price = $4, stock = $5, image_url = $6
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(product_id)
    .bind(payload.name.unwrap_or(existing.name))
    .bind(payload.description.or(existing.description))
    .bind(price)
    .bind(payload.stock.unwrap_or(existing.stock))
    .bind(payload.image_url.or(existing.image_url))
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Product updated",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    pool: &DbPool,
    user: &AuthUser,
    merchant_id: Uuid,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    find_owned_merchant(pool, user, merchant_id).await?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1 AND merchant_id = $2")
        .bind(product_id)
        .bind(merchant_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Product deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_services(pool: &DbPool, merchant_id: Uuid) -> AppResult<ApiResponse<ServiceList>> {
    find_merchant(pool, merchant_id).await?;
    let items: Vec<Service> =
        sqlx::query_as("SELECT * FROM services WHERE merchant_id = $1 ORDER BY created_at DESC")
            .bind(merchant_id)
            .fetch_all(pool)
            .await?;
    Ok(ApiResponse::success(
        "Services",
        ServiceList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_service(
    pool: &DbPool,
    user: &AuthUser,
    merchant_id: Uuid,
    payload: CreateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    find_owned_merchant(pool, user, merchant_id).await?;
    if payload.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if payload.duration_minutes <= 0 {
        return Err(AppError::BadRequest(
            "duration_minutes must be greater than 0".into(),
        ));
    }

    let service: Service = sqlx::query_as(
        r#"
        INSERT INTO services (id, merchant_id, name, description, price, duration_minutes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(merchant_id)
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.price)
    .bind(payload.duration_minutes)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Service created",
        service,
        Some(Meta::empty()),
    ))
}

pub async fn update_service(
    pool: &DbPool,
    user: &AuthUser,
    merchant_id: Uuid,
    service_id: Uuid,
    payload: UpdateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    find_owned_merchant(pool, user, merchant_id).await?;

    let existing: Option<Service> =
        sqlx::query_as("SELECT * FROM services WHERE id = $1 AND merchant_id = $2")
            .bind(service_id)
            .bind(merchant_id)
            .fetch_optional(pool)
            .await?;
    let existing = existing.ok_or(AppError::NotFound)?;

    let price = payload.price.unwrap_or(existing.price);
    if price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    let duration_minutes = payload.duration_minutes.unwrap_or(existing.duration_minutes);
    if duration_minutes <= 0 {
        return Err(AppError::BadRequest(
            "duration_minutes must be greater than 0".into(),
        ));
    }

    let service: Service = sqlx::query_as(
        r#"
        UPDATE services
        SET name = $2, description = $3, price = $4, duration_minutes = $5
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(service_id)
    .bind(payload.name.unwrap_or(existing.name))
    .bind(payload.description.or(existing.description))
    .bind(price)
    .bind(duration_minutes)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Service updated",
        service,
        Some(Meta::empty()),
    ))
}

pub async fn delete_service(
    pool: &DbPool,
    user: &AuthUser,
    merchant_id: Uuid,
    service_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    find_owned_merchant(pool, user, merchant_id).await?;

    let result = sqlx::query("DELETE FROM services WHERE id = $1 AND merchant_id = $2")
        .bind(service_id)
        .bind(merchant_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Service deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_photos(pool: &DbPool, merchant_id: Uuid) -> AppResult<ApiResponse<PhotoList>> {
    find_merchant(pool, merchant_id).await?;
    let items: Vec<MerchantPhoto> = sqlx::query_as(
        "SELECT * FROM merchant_photos WHERE merchant_id = $1 ORDER BY created_at",
    )
    .bind(merchant_id)
    .fetch_all(pool)
    .await?;
    Ok(ApiResponse::success(
        "Photos",
        PhotoList { items },
        Some(Meta::empty()),
    ))
}

pub async fn add_photo(
    pool: &DbPool,
    user: &AuthUser,
    merchant_id: Uuid,
    payload: AddPhotoRequest,
) -> AppResult<ApiResponse<MerchantPhoto>> {
    find_owned_merchant(pool, user, merchant_id).await?;

    let photo: MerchantPhoto = sqlx::query_as(
        r#"
        INSERT INTO merchant_photos (id, merchant_id, photo_url)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(merchant_id)
    .bind(payload.photo_url)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Photo added",
        photo,
        Some(Meta::empty()),
    ))
}

pub async fn list_reviews(pool: &DbPool, merchant_id: Uuid) -> AppResult<ApiResponse<ReviewList>> {
    find_merchant(pool, merchant_id).await?;
    let items: Vec<Review> =
        sqlx::query_as("SELECT * FROM reviews WHERE merchant_id = $1 ORDER BY created_at DESC")
            .bind(merchant_id)
            .fetch_all(pool)
            .await?;
    Ok(ApiResponse::success(
        "Reviews",
        ReviewList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_review(
    pool: &DbPool,
    user: &AuthUser,
    merchant_id: Uuid,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    find_merchant(pool, merchant_id).await?;
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest("rating must be between 1 and 5".into()));
    }

    let review: Review = sqlx::query_as(
        r#"
        INSERT INTO reviews (id, merchant_id, customer_id, rating, comment)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(merchant_id)
    .bind(user.user_id)
    .bind(payload.rating)
    .bind(payload.comment)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Review created",
        review,
        Some(Meta::empty()),
    ))
}

async fn find_merchant(pool: &DbPool, id: Uuid) -> AppResult<Merchant> {
    let merchant: Option<Merchant> = sqlx::query_as("SELECT * FROM merchants WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    merchant.ok_or(AppError::NotFound)
}

/// Writes against a merchant require the caller to be its owner.
async fn find_owned_merchant(pool: &DbPool, user: &AuthUser, id: Uuid) -> AppResult<Merchant> {
    let merchant = find_merchant(pool, id).await?;
    if merchant.owner_id != Some(user.user_id) {
        return Err(AppError::Forbidden);
    }
    Ok(merchant)
}
