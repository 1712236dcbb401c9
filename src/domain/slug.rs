//! Slug helpers.
//!
//! Slugs are supplied by callers on create and never rewritten afterwards,
//! so the only job here is to check that a candidate is already in the
//! canonical form `slug::slugify` would produce.

use slug::slugify;

use super::error::DomainError;

const MAX_SLUG_LEN: usize = 255;

/// Accept a slug only when it is non-empty, bounded and canonical.
pub fn validate_slug(candidate: &str) -> Result<(), DomainError> {
    if candidate.is_empty() || candidate.len() > MAX_SLUG_LEN || slugify(candidate) != candidate {
        return Err(DomainError::InvalidSlug {
            slug: candidate.to_string(),
        });
    }
    Ok(())
}
