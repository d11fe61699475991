pub mod admin;
pub mod auth;
pub mod bookings;
pub mod cart;
pub mod chat;
pub mod merchants;
pub mod orders;
pub mod search;
