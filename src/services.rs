pub mod auth;
pub mod eligibility;
pub mod rbac_service;
pub mod ownership;
pub mod work_locks;
pub mod registration_service;
pub mod rating_service;
pub mod notification_service;
pub mod audit_service;

#[cfg(test)]
pub(crate) mod fixtures;
