use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::search::SearchResults,
    error::AppResult,
    response::ApiResponse,
    routes::params::SearchQuery,
    services::search_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search))
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(
        ("q" = Option<String>, Query, description = "Case-insensitive substring match on name"),
        ("city" = Option<String>, Query, description = "Merchant city filter"),
        ("category" = Option<String>, Query, description = "Merchant category filter"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("pageSize" = Option<i64>, Query, description = "Rows per entity kind, default 10, max 50")
    ),
    responses(
        (status = 200, description = "Combined merchants/products/services results", body = ApiResponse<SearchResults>)
    ),
    tag = "Search"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<SearchResults>>> {
    let resp = search_service::search(&state.pool, query).await?;
    Ok(Json(resp))
}
