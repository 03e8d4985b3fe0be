pub mod admin;
pub mod auth;
pub mod companies;
pub mod mobile;
pub mod orders;
pub mod products;
pub mod subscriptions;
pub mod uploads;
pub mod users;
