//! Site configuration model.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::sidebar::{self, slug_href, SidebarEntry, SidebarItem};

/// Top-level site configuration (`wayfind.toml`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Canonical deployment URL
    pub site: Option<String>,

    /// Directory holding the documentation sources
    pub content_dir: PathBuf,

    /// Directory the built site is written to
    pub output_dir: PathBuf,

    /// Site title
    pub title: String,

    /// Short tagline shown under the title
    pub tagline: Option<String>,

    /// Extra stylesheets
    pub custom_css: Vec<String>,

    pub logo: Option<Logo>,

    pub favicon: Option<String>,

    pub social: Vec<SocialLink>,

    /// Tags injected into every page `<head>`
    pub head: Vec<HeadTag>,

    pub sidebar: Vec<SidebarItem>,

    pub edit_link: Option<EditLink>,

    /// Show the last modification date of each page
    pub last_updated: bool,

    /// Minify copied stylesheets
    pub minify: bool,

    /// Expectations for `wayfind check site`
    pub check: CheckSettings,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub root: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: None,
            content_dir: PathBuf::from("src/content/docs"),
            output_dir: PathBuf::from("dist"),
            title: "Documentation".to_string(),
            tagline: None,
            custom_css: Vec::new(),
            logo: None,
            favicon: None,
            social: Vec::new(),
            head: Vec::new(),
            sidebar: Vec::new(),
            edit_link: None,
            last_updated: false,
            minify: true,
            check: CheckSettings::default(),
            root: PathBuf::new(),
        }
    }
}

/// Site logo.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Logo {
    /// Image path (used when no light/dark variants are given)
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub light: Option<String>,
    #[serde(default)]
    pub dark: Option<String>,
    #[serde(default)]
    pub alt: String,
    /// Hide the text title next to the logo
    #[serde(default)]
    pub replaces_title: bool,
}

/// Social link shown in the site header.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SocialLink {
    pub icon: String,
    pub label: String,
    pub href: String,
}

/// An element injected into `<head>`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HeadTag {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// "Edit this page" link settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EditLink {
    pub base_url: String,
}

/// Expected title of a specific route.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PageExpectation {
    pub route: String,
    /// Regular expression the page `<title>` must match
    pub title_pattern: String,
}

/// Settings for checks against a rendered site.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CheckSettings {
    /// Where the rendered site is reachable
    pub base_url: String,

    /// Regex for the home page title; defaults to the escaped site title
    pub title_pattern: Option<String>,

    /// Labels that must appear in the sidebar; defaults to the top-level groups
    pub expected_sections: Vec<String>,

    /// Page used to inspect the sidebar; defaults to the first slug entry
    pub sidebar_route: Option<String>,

    /// Route that must answer 404
    pub not_found_route: String,

    pub pages: Vec<PageExpectation>,

    /// Href fragments of sidebar links to follow
    pub navigation: Vec<String>,

    pub timeout_secs: u64,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4321".to_string(),
            title_pattern: None,
            expected_sections: Vec::new(),
            sidebar_route: None,
            not_found_route: "/this-page-does-not-exist/".to_string(),
            pages: Vec::new(),
            navigation: Vec::new(),
            timeout_secs: 10,
        }
    }
}

impl SiteConfig {
    /// Resolve a configured path against the configuration directory.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Content root on disk.
    pub fn content_root(&self) -> PathBuf {
        self.resolve_path(&self.content_dir)
    }

    /// Output directory on disk.
    pub fn output_root(&self) -> PathBuf {
        self.resolve_path(&self.output_dir)
    }

    /// Every `slug` entry of the sidebar.
    pub fn collect_slugs(&self) -> Vec<SidebarEntry> {
        sidebar::collect_slugs(&self.sidebar)
    }

    /// Every `link` entry of the sidebar.
    pub fn collect_links(&self) -> Vec<SidebarEntry> {
        sidebar::collect_links(&self.sidebar)
    }

    /// Labels of the top-level sidebar groups.
    pub fn sections(&self) -> Vec<String> {
        self.sidebar.iter().map(|i| i.label().to_string()).collect()
    }

    /// Edit URL for a page source, given its path relative to the content root.
    pub fn edit_url(&self, relative_source: &Path) -> Option<String> {
        let edit = self.edit_link.as_ref()?;
        let relative = relative_source
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Some(format!(
            "{}/{}",
            edit.base_url.trim_end_matches('/'),
            relative
        ))
    }

    /// Home page title pattern for site checks.
    pub fn title_pattern(&self) -> String {
        self.check
            .title_pattern
            .clone()
            .unwrap_or_else(|| regex::escape(&self.title))
    }

    /// Sections the rendered sidebar must contain.
    pub fn expected_sections(&self) -> Vec<String> {
        if self.check.expected_sections.is_empty() {
            self.sections()
        } else {
            self.check.expected_sections.clone()
        }
    }

    /// Route whose rendered sidebar is inspected.
    pub fn sidebar_route(&self) -> Option<String> {
        self.check.sidebar_route.clone().or_else(|| {
            self.collect_slugs()
                .first()
                .map(|entry| slug_href(&entry.target))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(source: &str) -> SiteConfig {
        toml::from_str(source).unwrap()
    }

    #[test]
    fn applies_defaults() {
        let config = config("title = \"Extended Data\"");

        assert_eq!(config.content_dir, PathBuf::from("src/content/docs"));
        assert_eq!(config.output_dir, PathBuf::from("dist"));
        assert!(config.minify);
        assert!(!config.last_updated);
        assert_eq!(config.check.not_found_route, "/this-page-does-not-exist/");
        assert_eq!(config.check.timeout_secs, 10);
    }

    #[test]
    fn builds_edit_url() {
        let config = config(
            r#"
[edit_link]
base_url = "https://github.com/extended-data-library/extended-data-types/edit/main/docs/"
"#,
        );

        assert_eq!(
            config.edit_url(Path::new("core/data-types.mdx")).as_deref(),
            Some("https://github.com/extended-data-library/extended-data-types/edit/main/docs/core/data-types.mdx")
        );
    }

    #[test]
    fn no_edit_url_without_base() {
        let config = config("");
        assert_eq!(config.edit_url(Path::new("index.mdx")), None);
    }

    #[test]
    fn check_defaults_follow_sidebar() {
        let config = config(
            r#"
title = "Extended Data"

[[sidebar]]
label = "Getting Started"
items = [{ label = "Introduction", slug = "getting-started" }]

[[sidebar]]
label = "Packages"
items = [{ label = "Overview", slug = "packages" }]
"#,
        );

        assert_eq!(config.title_pattern(), "Extended Data");
        assert_eq!(
            config.expected_sections(),
            vec!["Getting Started".to_string(), "Packages".to_string()]
        );
        assert_eq!(config.sidebar_route().as_deref(), Some("/getting-started/"));
    }

    #[test]
    fn escapes_title_for_pattern() {
        let config = config("title = \"Docs (beta) v1.0\"");
        assert_eq!(config.title_pattern(), r"Docs \(beta\) v1\.0");
    }

    #[test]
    fn resolves_relative_paths_against_root() {
        let mut config = config("content_dir = \"content\"");
        config.root = PathBuf::from("/srv/site");

        assert_eq!(config.content_root(), PathBuf::from("/srv/site/content"));
        assert_eq!(
            config.resolve_path("/abs/dist"),
            PathBuf::from("/abs/dist")
        );
    }
}
