pub mod auth;
pub mod etag;
pub mod rate_limit;
pub mod rbac;
pub mod subscription;
