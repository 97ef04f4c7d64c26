//! Well-known role key constants.
//!
//! These must match the seed data in `20260101000001_create_users_and_roles.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_COFOUNDER: &str = "cofounder";
pub const ROLE_MENTOR: &str = "mentor";
pub const ROLE_COACH: &str = "coach";
pub const ROLE_MEMBER: &str = "member";

/// Default set of roles that satisfy `mentors_only` visibility.
///
/// The deployed set is configuration (`MENTOR_ROLE_KEYS`); this is only the
/// fallback when the variable is unset.
pub const DEFAULT_MENTOR_ROLE_KEYS: &[&str] = &[ROLE_MENTOR, ROLE_COACH, ROLE_ADMIN, ROLE_COFOUNDER];

/// Roles allowed to create invitations (in addition to staff users).
pub const INVITER_ROLE_KEYS: &[&str] = &[ROLE_ADMIN, ROLE_COFOUNDER];
