//! Sidebar slug integrity.

use std::fmt;
use std::path::{Path, PathBuf};

use wayfind_config::SiteConfig;
use wayfind_content::{candidate_paths, resolve_slug};

/// Whether a slug is backed by a content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugOutcome {
    Resolved(PathBuf),
    Missing { tried: Vec<PathBuf> },
}

/// Outcome for one sidebar slug entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugResult {
    pub label: String,
    pub slug: String,
    pub outcome: SlugOutcome,
}

impl SlugResult {
    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome, SlugOutcome::Resolved(_))
    }
}

/// Results for every slug entry of a sidebar, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugReport {
    pub content_root: PathBuf,
    pub results: Vec<SlugResult>,
}

impl SlugReport {
    pub fn is_ok(&self) -> bool {
        self.results.iter().all(SlugResult::is_resolved)
    }

    pub fn missing(&self) -> impl Iterator<Item = &SlugResult> {
        self.results.iter().filter(|r| !r.is_resolved())
    }

    /// One message per unresolved slug.
    pub fn failures(&self) -> Vec<String> {
        self.missing()
            .map(|r| missing_message(&r.label, &r.slug, &self.content_root))
            .collect()
    }
}

impl fmt::Display for SlugReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            match &result.outcome {
                SlugOutcome::Resolved(path) => {
                    writeln!(f, "  ok      {} -> {}", result.slug, path.display())?
                }
                SlugOutcome::Missing { .. } => writeln!(
                    f,
                    "  missing {}\n          {}",
                    result.slug,
                    missing_message(&result.label, &result.slug, &self.content_root)
                )?,
            }
        }
        let missing = self.missing().count();
        write!(
            f,
            "{} slug(s) checked, {} missing",
            self.results.len(),
            missing
        )
    }
}

/// Resolve every slug entry of the configured sidebar against the content root.
pub fn check_slugs(config: &SiteConfig) -> SlugReport {
    let content_root = config.content_root();

    let results = config
        .collect_slugs()
        .into_iter()
        .map(|entry| {
            let outcome = match resolve_slug(&content_root, &entry.target) {
                Some(path) => SlugOutcome::Resolved(path),
                None => SlugOutcome::Missing {
                    tried: candidate_paths(&content_root, &entry.target),
                },
            };
            SlugResult {
                label: entry.label,
                slug: entry.target,
                outcome,
            }
        })
        .collect::<Vec<_>>();

    let missing = results.iter().filter(|r| !r.is_resolved()).count();
    if missing > 0 {
        tracing::warn!("{} of {} sidebar slugs have no content", missing, results.len());
    } else {
        tracing::info!("All {} sidebar slugs resolve", results.len());
    }

    SlugReport {
        content_root,
        results,
    }
}

fn missing_message(label: &str, slug: &str, content_root: &Path) -> String {
    let slug = slug.trim_matches('/');
    format!(
        "Sidebar entry \"{label}\" references slug \"{slug}\" but no matching content file was found in {root}. \
         Expected one of: {slug}.md, {slug}.mdx, {slug}/index.md, or {slug}/index.mdx",
        root = content_root.display(),
    )
}
