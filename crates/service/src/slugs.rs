use models::slug::slugify;

use crate::errors::ServiceError;

pub(crate) const TITLE_MAX: usize = 200;
/// Width of the `slug` columns.
pub(crate) const SLUG_MAX: usize = 220;

/// Slug for a new row: the explicit value when present, else derived from `title`.
/// Both paths go through `slugify` so stored slugs are always URL-safe.
pub(crate) fn resolve_slug(title: &str, explicit: Option<&str>) -> Result<String, ServiceError> {
    let source = match explicit.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => title,
    };
    let mut slug = slugify(source);
    // NFKD can expand a 200-char title past the column (㎢ -> km2)
    if slug.len() > SLUG_MAX {
        slug.truncate(SLUG_MAX);
        let kept = slug.trim_end_matches('-').len();
        slug.truncate(kept);
    }
    if slug.is_empty() {
        return Err(ServiceError::Validation(format!("cannot derive a slug from '{}'", source.trim())));
    }
    Ok(slug)
}
