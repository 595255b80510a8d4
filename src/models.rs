pub mod actor;
pub mod audit;
pub mod auth;
pub mod rbac;
pub mod voluntary_work;
pub mod volunteer;
