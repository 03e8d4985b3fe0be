pub mod auth;
pub mod bootstrap;
pub mod company_service;
pub mod order_service;
pub mod subscription_service;
