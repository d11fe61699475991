use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::admin::{BootstrapRequest, BootstrapResponse},
    error::AppResult,
    response::ApiResponse,
    services::bootstrap_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(bootstrap))
}

#[utoipa::path(
    post,
    path = "/api/bootstrap",
    request_body = BootstrapRequest,
    responses(
        (status = 200, description = "Create-or-find identity and assign role", body = ApiResponse<BootstrapResponse>),
        (status = 400, description = "Missing email or password"),
    ),
    tag = "Bootstrap"
)]
pub async fn bootstrap(
    State(state): State<AppState>,
    Json(payload): Json<BootstrapRequest>,
) -> AppResult<Json<ApiResponse<BootstrapResponse>>> {
    let resp = bootstrap_service::bootstrap(&state.pool, payload).await?;
    Ok(Json(resp))
}
