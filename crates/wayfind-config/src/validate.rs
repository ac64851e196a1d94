//! Structural validation of a loaded configuration.

use std::fmt;

use url::Url;

use crate::sidebar::{SidebarItem, MAX_DEPTH};
use crate::site::SiteConfig;

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Location in the configuration, e.g. `sidebar[1].items[0]`
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl SiteConfig {
    /// Check the configuration, returning every issue found.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.title.trim().is_empty() {
            issues.push(issue("title", "site title must not be empty"));
        }

        if let Some(site) = &self.site {
            if let Err(e) = Url::parse(site) {
                issues.push(issue("site", format!("invalid URL {:?}: {}", site, e)));
            }
        }

        if let Some(edit) = &self.edit_link {
            if let Err(e) = Url::parse(&edit.base_url) {
                issues.push(issue(
                    "edit_link.base_url",
                    format!("invalid URL {:?}: {}", edit.base_url, e),
                ));
            }
        }

        for (i, item) in self.sidebar.iter().enumerate() {
            validate_item(item, &format!("sidebar[{}]", i), 1, &mut issues);
        }

        issues
    }
}

fn validate_item(item: &SidebarItem, path: &str, depth: usize, issues: &mut Vec<ValidationIssue>) {
    if depth > MAX_DEPTH {
        issues.push(issue(
            path,
            format!("sidebar nesting exceeds {} levels", MAX_DEPTH),
        ));
        return;
    }

    if item.label().trim().is_empty() {
        issues.push(issue(path, "label must not be empty"));
    }

    match item {
        SidebarItem::Slug { slug, .. } => {
            if let Some(message) = slug_problem(slug) {
                issues.push(issue(path, format!("slug {:?} {}", slug, message)));
            }
        }
        SidebarItem::Link { link, .. } => {
            if let Some(message) = link_problem(link) {
                issues.push(issue(path, format!("link {:?} {}", link, message)));
            }
        }
        SidebarItem::Autogenerate { autogenerate, .. } => {
            if let Some(message) = slug_problem(&autogenerate.directory) {
                issues.push(issue(
                    path,
                    format!("directory {:?} {}", autogenerate.directory, message),
                ));
            }
        }
        SidebarItem::Group { items, .. } => {
            if items.is_empty() {
                issues.push(issue(path, "group has no items"));
            }
            for (i, child) in items.iter().enumerate() {
                validate_item(child, &format!("{}.items[{}]", path, i), depth + 1, issues);
            }
        }
    }
}

fn slug_problem(slug: &str) -> Option<&'static str> {
    if slug.is_empty() {
        Some("must not be empty")
    } else if slug.starts_with('/') || slug.ends_with('/') {
        Some("must not start or end with '/'")
    } else if slug.split('/').any(|s| s.is_empty() || s == "." || s == "..") {
        Some("contains an empty or relative segment")
    } else if slug.chars().any(char::is_whitespace) {
        Some("must not contain whitespace")
    } else {
        None
    }
}

fn link_problem(link: &str) -> Option<&'static str> {
    if link.starts_with('/') {
        return None;
    }
    match Url::parse(link) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => None,
        Ok(_) => Some("must use http or https"),
        Err(_) => Some("must be an absolute URL or start with '/'"),
    }
}

fn issue(path: &str, message: impl Into<String>) -> ValidationIssue {
    ValidationIssue {
        path: path.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(source: &str) -> SiteConfig {
        toml::from_str(source).unwrap()
    }

    #[test]
    fn accepts_valid_config() {
        let config = config(
            r#"
site = "https://extended-data.dev"
title = "Extended Data"

[[sidebar]]
label = "Getting Started"
items = [{ label = "Introduction", slug = "getting-started" }]

[[sidebar]]
label = "Enterprise"
items = [
  { label = "jbcom Hub", link = "https://jbcom.github.io" },
  { label = "API", link = "/api/secretsync/" },
]
"#,
        );

        assert!(config.validate().is_empty());
    }

    #[test]
    fn rejects_bad_slugs() {
        let config = config(
            r#"
[[sidebar]]
label = "Docs"
items = [
  { label = "Leading", slug = "/getting-started" },
  { label = "Parent", slug = "core/../secrets" },
  { label = "", slug = "ok" },
]
"#,
        );

        let issues = config.validate();

        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].path, "sidebar[0].items[0]");
        assert_eq!(issues[1].path, "sidebar[0].items[1]");
        assert_eq!(issues[2].message, "label must not be empty");
    }

    #[test]
    fn rejects_relative_links() {
        let config = config(
            r#"
[[sidebar]]
label = "Links"
items = [
  { label = "Bare", link = "jbcom.github.io" },
  { label = "Mail", link = "mailto:team@example.com" },
]
"#,
        );

        let issues = config.validate();

        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.contains("absolute URL"));
        assert!(issues[1].message.contains("http or https"));
    }

    #[test]
    fn rejects_deep_nesting() {
        let config = config(
            r#"
[[sidebar]]
label = "One"

[[sidebar.items]]
label = "Two"

[[sidebar.items.items]]
label = "Three"

[[sidebar.items.items.items]]
label = "Four"
slug = "too-deep"
"#,
        );

        let issues = config.validate();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "sidebar[0].items[0].items[0].items[0]");
        assert!(issues[0].message.contains("exceeds 3 levels"));
    }

    #[test]
    fn rejects_invalid_site_url() {
        let config = config("site = \"not a url\"");
        let issues = config.validate();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "site");
    }
}
