use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::merchants::{
        AddPhotoRequest, CreateMerchantRequest, CreateProductRequest, CreateReviewRequest,
        CreateServiceRequest, MerchantDetail, MerchantList, PhotoList, ProductList, ReviewList,
        ServiceList, UpdateMerchantRequest, UpdateProductRequest, UpdateServiceRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Merchant, MerchantPhoto, Product, Review, Service},
    response::ApiResponse,
    routes::params::MerchantListQuery,
    services::merchant_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_merchants).post(create_merchant))
        .route("/{id}", get(get_merchant).put(update_merchant))
        .route("/{id}/products", get(list_products).post(create_product))
        .route(
            "/{id}/products/{product_id}",
            put(update_product).delete(delete_product),
        )
        .route("/{id}/services", get(list_services).post(create_service))
        .route(
            "/{id}/services/{service_id}",
            put(update_service).delete(delete_service),
        )
        .route("/{id}/photos", get(list_photos).post(add_photo))
        .route("/{id}/reviews", get(list_reviews).post(create_review))
}

#[utoipa::path(
    get,
    path = "/api/merchants",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("city" = Option<String>, Query, description = "Filter by city"),
        ("category" = Option<String>, Query, description = "Filter by category")
    ),
    responses(
        (status = 200, description = "List merchants", body = ApiResponse<MerchantList>)
    ),
    tag = "Merchants"
)]
pub async fn list_merchants(
    State(state): State<AppState>,
    Query(query): Query<MerchantListQuery>,
) -> AppResult<Json<ApiResponse<MerchantList>>> {
    let resp = merchant_service::list_merchants(&state.pool, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/merchants/{id}",
    params(("id" = Uuid, Path, description = "Merchant ID")),
    responses(
        (status = 200, description = "Merchant with photos", body = ApiResponse<MerchantDetail>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Merchants"
)]
pub async fn get_merchant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MerchantDetail>>> {
    let resp = merchant_service::get_merchant(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/merchants",
    request_body = CreateMerchantRequest,
    responses(
        (status = 200, description = "Create merchant", body = ApiResponse<Merchant>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller lacks merchant role"),
    ),
    security(("bearer_auth" = [])),
    tag = "Merchants"
)]
pub async fn create_merchant(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMerchantRequest>,
) -> AppResult<Json<ApiResponse<Merchant>>> {
    let resp = merchant_service::create_merchant(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/merchants/{id}",
    params(("id" = Uuid, Path, description = "Merchant ID")),
    request_body = UpdateMerchantRequest,
    responses(
        (status = 200, description = "Update merchant", body = ApiResponse<Merchant>),
        (status = 403, description = "Caller does not own this merchant"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Merchants"
)]
pub async fn update_merchant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMerchantRequest>,
) -> AppResult<Json<ApiResponse<Merchant>>> {
    let resp = merchant_service::update_merchant(&state.pool, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/merchants/{id}/products",
    params(("id" = Uuid, Path, description = "Merchant ID")),
    responses(
        (status = 200, description = "List merchant products", body = ApiResponse<ProductList>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Merchants"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = merchant_service::list_products(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/merchants/{id}/products",
    params(("id" = Uuid, Path, description = "Merchant ID")),
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Create product", body = ApiResponse<Product>),
        (status = 403, description = "Caller does not own this merchant"),
    ),
    security(("bearer_auth" = [])),
    tag = "Merchants"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = merchant_service::create_product(&state.pool, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/merchants/{id}/products/{product_id}",
    params(
        ("id" = Uuid, Path, description = "Merchant ID"),
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Update product", body = ApiResponse<Product>),
        (status = 403, description = "Caller does not own this merchant"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Merchants"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, product_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp =
        merchant_service::update_product(&state.pool, &user, id, product_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/merchants/{id}/products/{product_id}",
    params(
        ("id" = Uuid, Path, description = "Merchant ID"),
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Delete product", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Caller does not own this merchant"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Merchants"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, product_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = merchant_service::delete_product(&state.pool, &user, id, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/merchants/{id}/services",
    params(("id" = Uuid, Path, description = "Merchant ID")),
    responses(
        (status = 200, description = "List merchant services", body = ApiResponse<ServiceList>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Merchants"
)]
pub async fn list_services(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ServiceList>>> {
    let resp = merchant_service::list_services(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/merchants/{id}/services",
    params(("id" = Uuid, Path, description = "Merchant ID")),
    request_body = CreateServiceRequest,
    responses(
        (status = 200, description = "Create service", body = ApiResponse<Service>),
        (status = 403, description = "Caller does not own this merchant"),
    ),
    security(("bearer_auth" = [])),
    tag = "Merchants"
)]
pub async fn create_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = merchant_service::create_service(&state.pool, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/merchants/{id}/services/{service_id}",
    params(
        ("id" = Uuid, Path, description = "Merchant ID"),
        ("service_id" = Uuid, Path, description = "Service ID")
    ),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Update service", body = ApiResponse<Service>),
        (status = 403, description = "Caller does not own this merchant"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Merchants"
)]
pub async fn update_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, service_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp =
        merchant_service::update_service(&state.pool, &user, id, service_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/merchants/{id}/services/{service_id}",
    params(
        ("id" = Uuid, Path, description = "Merchant ID"),
        ("service_id" = Uuid, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Delete service", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Caller does not own this merchant"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Merchants"
)]
pub async fn delete_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, service_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = merchant_service::delete_service(&state.pool, &user, id, service_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/merchants/{id}/photos",
    params(("id" = Uuid, Path, description = "Merchant ID")),
    responses(
        (status = 200, description = "List merchant photos", body = ApiResponse<PhotoList>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Merchants"
)]
pub async fn list_photos(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PhotoList>>> {
    let resp = merchant_service::list_photos(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/merchants/{id}/photos",
    params(("id" = Uuid, Path, description = "Merchant ID")),
    request_body = AddPhotoRequest,
    responses(
        (status = 200, description = "Add merchant photo", body = ApiResponse<MerchantPhoto>),
        (status = 403, description = "Caller does not own this merchant"),
    ),
    security(("bearer_auth" = [])),
    tag = "Merchants"
)]
pub async fn add_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddPhotoRequest>,
) -> AppResult<Json<ApiResponse<MerchantPhoto>>> {
    let resp = merchant_service::add_photo(&state.pool, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/merchants/{id}/reviews",
    params(("id" = Uuid, Path, description = "Merchant ID")),
    responses(
        (status = 200, description = "List merchant reviews", body = ApiResponse<ReviewList>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Merchants"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = merchant_service::list_reviews(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/merchants/{id}/reviews",
    params(("id" = Uuid, Path, description = "Merchant ID")),
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Create review", body = ApiResponse<Review>),
        (status = 400, description = "Rating out of range"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Merchants"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let resp = merchant_service::create_review(&state.pool, &user, id, payload).await?;
    Ok(Json(resp))
}
