pub mod store;
pub use store::{ActorStore, AuditStore, CapacityPolicy, MembershipInsert, VoluntaryWorkStore};
pub mod rbac_repo;
pub use rbac_repo::RbacRepository;
pub mod actor_repo;
pub use actor_repo::ActorRepository;
pub mod voluntary_work_repo;
pub use voluntary_work_repo::VoluntaryWorkRepository;
pub mod audit_repo;
pub use audit_repo::AuditRepository;
pub mod memory_repo;
pub use memory_repo::InMemoryStore;
