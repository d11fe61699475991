pub mod admin_service;
pub mod auth_service;
pub mod booking_service;
pub mod bootstrap_service;
pub mod cart_service;
pub mod chat_service;
pub mod merchant_service;
pub mod order_service;
pub mod role_service;
pub mod search_service;
