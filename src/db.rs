pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod subscription_repo;
pub use subscription_repo::SubscriptionRepository;
pub mod location_repo;
pub use location_repo::LocationRepository;
