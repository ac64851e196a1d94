//! Slug to content file resolution.
//!
//! A slug such as `core/data-types` is backed by one of four files under the
//! content root, probed in this order:
//!
//! 1. `core/data-types.md`
//! 2. `core/data-types.mdx`
//! 3. `core/data-types/index.md`
//! 4. `core/data-types/index.mdx`

use std::path::{Path, PathBuf};

/// Extensions recognised as content pages, in probe order.
pub const CONTENT_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// The four candidate files for `slug`, in probe order.
pub fn candidate_paths(content_root: &Path, slug: &str) -> Vec<PathBuf> {
    let slug = slug.trim_matches('/');
    let direct = CONTENT_EXTENSIONS
        .iter()
        .map(|ext| content_root.join(format!("{}.{}", slug, ext)));
    let index = CONTENT_EXTENSIONS
        .iter()
        .map(|ext| content_root.join(slug).join(format!("index.{}", ext)));
    direct.chain(index).collect()
}

/// First existing candidate file for `slug`, if any.
pub fn resolve_slug(content_root: &Path, slug: &str) -> Option<PathBuf> {
    let found = candidate_paths(content_root, slug)
        .into_iter()
        .find(|p| p.is_file());

    match &found {
        Some(path) => tracing::debug!("Resolved slug {} to {}", slug, path.display()),
        None => tracing::debug!("No content file for slug {}", slug),
    }

    found
}
