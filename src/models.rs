pub mod auth;
pub mod company;
pub mod location;
pub mod order;
pub mod product;
pub mod subscription;
