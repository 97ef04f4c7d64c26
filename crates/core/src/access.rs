//! Document visibility evaluation.
//!
//! `can_view` is a pure function of the principal and the document's
//! visibility + ownership; role loading happens upstream so the decision
//! itself never touches I/O.

use crate::docs::DocumentVisibility;
use crate::types::DbId;

/// An authenticated actor: identity, staff flag, and resolved role keys.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: DbId,
    pub is_staff: bool,
    pub roles: Vec<String>,
}

impl Principal {
    /// True if the principal holds at least one of the given role keys.
    pub fn has_any_role<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        self.roles
            .iter()
            .any(|r| keys.iter().any(|k| k.as_ref() == r))
    }
}

/// Decide whether `principal` may read a document.
///
/// Rules, in order:
/// - no principal (unauthenticated) -> deny
/// - staff -> allow
/// - `community` -> allow
/// - `mentors_only` -> allow iff the principal holds any role in `mentor_roles`
/// - `private` -> allow iff the principal created the document
/// - unknown visibility value -> deny (fail closed)
pub fn can_view(
    principal: Option<&Principal>,
    visibility: &str,
    created_by: DbId,
    mentor_roles: &[String],
) -> bool {
    let Some(principal) = principal else {
        return false;
    };
    if principal.is_staff {
        return true;
    }
    match DocumentVisibility::parse(visibility) {
        Some(DocumentVisibility::Community) => true,
        Some(DocumentVisibility::MentorsOnly) => principal.has_any_role(mentor_roles),
        Some(DocumentVisibility::Private) => principal.user_id == created_by,
        None => false,
    }
}
