//! Frontmatter extraction and parsing.

use serde::Deserialize;

/// Page layout.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Regular documentation page with sidebar
    #[default]
    Doc,
    /// Landing page without sidebar, usually with a hero
    Splash,
}

/// Call-to-action link in a hero section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HeroAction {
    pub text: String,
    pub link: String,
    #[serde(default)]
    pub variant: Option<String>,
}

/// Hero section of a landing page.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Hero {
    /// Overrides the page title inside the hero
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub actions: Vec<HeroAction>,
}

/// Per-page sidebar overrides, used by autogenerated groups.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PageSidebar {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub hidden: bool,
}

/// Parsed frontmatter from a content page.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Page title (required)
    pub title: String,

    /// Page description for SEO
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub template: Template,

    #[serde(default)]
    pub hero: Option<Hero>,

    #[serde(default)]
    pub sidebar: PageSidebar,

    /// Drafts are skipped when building
    #[serde(default)]
    pub draft: bool,
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            template: Template::Doc,
            hero: None,
            sidebar: PageSidebar::default(),
            draft: false,
        }
    }
}

/// Extract frontmatter from page content.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = &after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let frontmatter: Frontmatter = serde_yaml::from_str(yaml_content)
        .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_doc_frontmatter() {
        let source = r#"---
title: Introduction
description: Get started with Extended Data
sidebar:
  order: 1
---

# Introduction
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title, "Introduction");
        assert_eq!(
            fm.description,
            Some("Get started with Extended Data".to_string())
        );
        assert_eq!(fm.template, Template::Doc);
        assert_eq!(fm.sidebar.order, Some(1));
        assert!(content.starts_with("# Introduction"));
    }

    #[test]
    fn extracts_splash_hero() {
        let source = r#"---
title: Extended Data
template: splash
hero:
  tagline: Enterprise Python Infrastructure
  actions:
    - text: Get Started
      link: /getting-started/
      variant: primary
---
"#;

        let (fm, _) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();
        let hero = fm.hero.unwrap();

        assert_eq!(fm.template, Template::Splash);
        assert_eq!(
            hero.tagline.as_deref(),
            Some("Enterprise Python Infrastructure")
        );
        assert_eq!(hero.actions.len(), 1);
        assert_eq!(hero.actions[0].link, "/getting-started/");
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_missing_title() {
        let source = "---\ndescription: untitled\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }
}
