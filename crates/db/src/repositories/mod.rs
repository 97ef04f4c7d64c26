//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or a transaction executor) as the first argument.

pub mod document_repo;
pub mod document_version_repo;
pub mod invitation_repo;
pub mod project_repo;
pub mod role_repo;
pub mod skill_repo;
pub mod tag_repo;
pub mod user_repo;

pub use document_repo::DocumentRepo;
pub use document_version_repo::DocumentVersionRepo;
pub use invitation_repo::InvitationRepo;
pub use project_repo::ProjectRepo;
pub use role_repo::RoleRepo;
pub use skill_repo::SkillRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
