use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod bootstrap;
pub mod cart;
pub mod chat;
pub mod doc;
pub mod health;
pub mod merchants;
pub mod orders;
pub mod params;
pub mod search;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/bookings", bookings::router())
        .nest("/cart", cart::router())
        .nest("/chat", chat::router())
        .nest("/merchants", merchants::router())
        .nest("/orders", orders::router())
        .nest("/search", search::router())
        .nest("/admin", admin::router())
        .nest("/bootstrap", bootstrap::router())
}
