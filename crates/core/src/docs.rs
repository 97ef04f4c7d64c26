//! Document domain rules: visibility levels, slug generation, and input
//! validation.
//!
//! Slug *allocation* (probing `base`, `base-2`, ... against existing rows)
//! lives in the repository layer; only the pure base derivation is here.

use crate::error::CoreError;

/// Maximum length of a document slug, including any collision suffix.
pub const SLUG_MAX_LEN: usize = 220;

/// Fallback slug base when a title yields no usable characters.
pub const SLUG_FALLBACK: &str = "doc";

/// Maximum length of a document title.
pub const TITLE_MAX_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Who may read a document.
///
/// Stored as TEXT; parse at the evaluation boundary so unknown values fail
/// closed instead of panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentVisibility {
    Community,
    MentorsOnly,
    Private,
}

impl DocumentVisibility {
    /// All valid visibility values, as stored.
    pub const ALL: &[&str] = &["community", "mentors_only", "private"];

    /// Parse a stored visibility string. `None` for anything unknown.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "community" => Some(Self::Community),
            "mentors_only" => Some(Self::MentorsOnly),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Community => "community",
            Self::MentorsOnly => "mentors_only",
            Self::Private => "private",
        }
    }
}

impl Default for DocumentVisibility {
    fn default() -> Self {
        Self::Community
    }
}

// ---------------------------------------------------------------------------
// Slug generation
// ---------------------------------------------------------------------------

/// Derive a slug base from a document title.
///
/// Lowercases, collapses runs of non-alphanumeric characters to single
/// hyphens, trims leading/trailing hyphens, and truncates to
/// [`SLUG_MAX_LEN`]. Returns [`SLUG_FALLBACK`] when nothing usable remains.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_hyphen = true; // suppress leading hyphen
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(SLUG_MAX_LEN);

    if slug.is_empty() {
        SLUG_FALLBACK.to_string()
    } else {
        slug
    }
}

/// Build the `i`-th collision candidate for a slug base.
///
/// `i == 1` is the base itself; higher values append `-i`. Every candidate
/// is re-truncated to [`SLUG_MAX_LEN`] before use.
pub fn slug_candidate(base: &str, i: u32) -> String {
    let mut candidate = if i <= 1 {
        base.to_string()
    } else {
        format!("{base}-{i}")
    };
    candidate.truncate(SLUG_MAX_LEN);
    candidate
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a document title (non-empty, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a document body (non-empty).
pub fn validate_body(body_md: &str) -> Result<(), CoreError> {
    if body_md.trim().is_empty() {
        return Err(CoreError::Validation("Body must not be empty".into()));
    }
    Ok(())
}

/// Validate a visibility value against the known set.
pub fn validate_visibility(visibility: &str) -> Result<(), CoreError> {
    if DocumentVisibility::parse(visibility).is_none() {
        return Err(CoreError::Validation(format!(
            "Invalid visibility '{}'. Valid values: {}",
            visibility,
            DocumentVisibility::ALL.join(", ")
        )));
    }
    Ok(())
}
