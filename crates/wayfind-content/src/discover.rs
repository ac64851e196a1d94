//! Content root discovery.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::parser::{parse_page, ParsedPage};
use crate::resolver::{candidate_paths, CONTENT_EXTENSIONS};

/// A content page found under the content root.
#[derive(Debug, Clone)]
pub struct Page {
    /// Source file path
    pub source_path: PathBuf,

    /// Path relative to the content root
    pub relative_path: PathBuf,

    /// Slug the page is served under (empty for the home page)
    pub slug: String,

    pub parsed: ParsedPage,
}

impl Page {
    /// Display title: frontmatter, first heading, then the slug.
    pub fn title(&self) -> String {
        self.parsed
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| self.slug.clone())
    }

    /// Whether the page is skipped when building.
    pub fn is_draft(&self) -> bool {
        self.parsed.frontmatter.as_ref().is_some_and(|f| f.draft)
    }
}

/// Errors that can occur when discovering content.
#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    #[error("Content directory not found: {0}")]
    MissingRoot(PathBuf),

    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Slug for a content file given its path relative to the content root.
///
/// `getting-started.md` -> `getting-started`, `packages/index.mdx` ->
/// `packages`, `index.md` -> the empty slug.
pub fn slug_for_path(relative: &Path) -> String {
    let mut parts: Vec<String> = relative
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("index");
    if stem != "index" {
        parts.push(stem.to_string());
    }

    parts.join("/")
}

/// Every content page under `content_root`, sorted by slug.
///
/// When several files map to one slug (`core.md` and `core/index.md`), the
/// file slug resolution would pick wins and the others are dropped.
pub fn discover(content_root: &Path) -> Result<Vec<Page>, DiscoverError> {
    if !content_root.is_dir() {
        return Err(DiscoverError::MissingRoot(content_root.to_path_buf()));
    }

    let mut pages = Vec::new();

    for entry in WalkDir::new(content_root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !CONTENT_EXTENSIONS.contains(&ext) {
            continue;
        }

        let source = fs::read_to_string(path).map_err(|e| DiscoverError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let parsed = parse_page(&source).map_err(|e| DiscoverError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let relative_path = path
            .strip_prefix(content_root)
            .unwrap_or(path)
            .to_path_buf();

        pages.push(Page {
            source_path: path.to_path_buf(),
            slug: slug_for_path(&relative_path),
            relative_path,
            parsed,
        });
    }

    pages.sort_by_cached_key(|p| (p.slug.clone(), resolution_rank(content_root, p)));
    pages.dedup_by(|shadowed, kept| {
        if shadowed.slug != kept.slug {
            return false;
        }
        tracing::warn!(
            "{} is shadowed by {} for slug \"{}\"",
            shadowed.relative_path.display(),
            kept.relative_path.display(),
            kept.slug
        );
        true
    });
    tracing::debug!(
        "Discovered {} pages in {}",
        pages.len(),
        content_root.display()
    );

    Ok(pages)
}

/// Position of the page source in the slug's probe order.
fn resolution_rank(content_root: &Path, page: &Page) -> usize {
    candidate_paths(content_root, &page.slug)
        .iter()
        .position(|candidate| *candidate == page.source_path)
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn slugs_from_paths() {
        assert_eq!(slug_for_path(Path::new("getting-started.md")), "getting-started");
        assert_eq!(slug_for_path(Path::new("packages/index.mdx")), "packages");
        assert_eq!(slug_for_path(Path::new("core/data-types.md")), "core/data-types");
        assert_eq!(slug_for_path(Path::new("index.mdx")), "");
    }

    #[test]
    fn discovers_pages() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("packages")).unwrap();
        fs::write(root.join("index.mdx"), "---\ntitle: Home\n---\n").unwrap();
        fs::write(root.join("packages/index.md"), "# Packages").unwrap();
        fs::write(root.join("notes.txt"), "ignored").unwrap();

        let pages = discover(root).unwrap();
        let slugs: Vec<_> = pages.iter().map(|p| p.slug.as_str()).collect();

        assert_eq!(slugs, vec!["", "packages"]);
        assert_eq!(pages[0].title(), "Home");
        assert_eq!(pages[1].title(), "Packages");
    }

    #[test]
    fn shadowed_files_keep_resolution_order() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("core")).unwrap();
        fs::create_dir_all(root.join("packages")).unwrap();
        fs::write(root.join("core/index.md"), "# Core index").unwrap();
        fs::write(root.join("core.mdx"), "# Core direct").unwrap();
        fs::write(root.join("packages/index.mdx"), "# Packages mdx").unwrap();
        fs::write(root.join("packages/index.md"), "# Packages md").unwrap();

        let pages = discover(root).unwrap();
        let found: Vec<_> = pages
            .iter()
            .map(|p| (p.slug.as_str(), p.relative_path.clone()))
            .collect();

        assert_eq!(
            found,
            vec![
                ("core", PathBuf::from("core.mdx")),
                ("packages", PathBuf::from("packages/index.md")),
            ]
        );
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("broken.md"), "---\ntitle: x\n").unwrap();

        let err = discover(temp.path()).unwrap_err();

        assert!(matches!(err, DiscoverError::Parse { .. }));
        assert!(err.to_string().contains("broken.md"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = tempdir().unwrap();
        let result = discover(&temp.path().join("nope"));

        assert!(matches!(result, Err(DiscoverError::MissingRoot(_))));
    }
}
