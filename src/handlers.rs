pub mod auth;
pub mod voluntary_work;
pub mod volunteer;
