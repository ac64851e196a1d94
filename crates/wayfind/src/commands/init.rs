//! Scaffold a new documentation site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
///
/// Writes the config at `config_path`, a `github` profile overlay next to it
/// and starter pages under the default content directory.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing wayfind...");

    let root = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let docs_dir = root.join("src/content/docs");
    fs::create_dir_all(&docs_dir).context("Failed to create content directory")?;

    let files = [
        (config_path.to_path_buf(), DEFAULT_CONFIG),
        (
            wayfind_config::loader::profile_path(config_path, "github"),
            GITHUB_PROFILE,
        ),
        (docs_dir.join("index.mdx"), DEFAULT_INDEX),
        (docs_dir.join("getting-started.md"), DEFAULT_GETTING_STARTED),
        (docs_dir.join("guides/configuration.md"), DEFAULT_CONFIGURATION),
    ];

    for (path, contents) in files {
        if path.exists() && !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'wayfind build' and then 'wayfind serve' to preview the site.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# wayfind configuration

title = "My Documentation"
tagline = "Documentation for my project"

# content_dir = "src/content/docs"
# output_dir = "dist"

[[sidebar]]
label = "Start Here"
items = [
  { label = "Getting Started", slug = "getting-started" },
]

[[sidebar]]
label = "Guides"
autogenerate = { directory = "guides" }

[check]
expected_sections = ["Start Here", "Guides"]
"#;

const GITHUB_PROFILE: &str = r#"# Applied with `wayfind --profile github ...`
site = "https://example.github.io"
"#;

const DEFAULT_INDEX: &str = r#"---
title: My Documentation
template: splash
hero:
  tagline: Documentation for my project
  actions:
    - text: Get Started
      link: /getting-started/
      variant: primary
---

Welcome to your documentation site.
"#;

const DEFAULT_GETTING_STARTED: &str = r#"---
title: Getting Started
description: First steps with this project.
---

# Getting Started

## Project Structure

```
your-project/
├── src/content/docs/     # Documentation pages
│   ├── index.mdx         # Home page
│   └── guides/           # Pages listed automatically in the sidebar
├── wayfind.toml          # Site configuration and sidebar
└── wayfind.github.toml   # Overrides for the github profile
```

## Writing Pages

Each page starts with frontmatter:

```md
---
title: Page Title
---
```

Reference pages from the sidebar by slug: `guides/configuration` resolves to
`guides/configuration.md`, `guides/configuration.mdx` or an `index` file in a
`guides/configuration/` directory.

## Checking

```bash
wayfind check slugs
wayfind check site --serve
```
"#;

const DEFAULT_CONFIGURATION: &str = r#"---
title: Configuration
sidebar:
  order: 1
---

# Configuration

Settings live in `wayfind.toml`. Any key can be overridden from the
environment with the `WAYFIND_` prefix, using `__` for nested keys, for
example `WAYFIND_CHECK__BASE_URL`.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn scaffold_loads_and_resolves() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("wayfind.toml");

        run(&config_path, false).unwrap();

        assert!(temp.path().join("wayfind.github.toml").exists());
        let config = wayfind_config::load(&config_path, Some("github")).unwrap();
        assert_eq!(config.site.as_deref(), Some("https://example.github.io"));
        assert!(wayfind_check::check_slugs(&config).is_ok());
    }

    #[test]
    fn keeps_existing_files_without_yes() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("wayfind.toml");
        fs::write(&config_path, "title = \"Mine\"\n").unwrap();

        run(&config_path, false).unwrap();
        assert_eq!(fs::read_to_string(&config_path).unwrap(), "title = \"Mine\"\n");

        run(&config_path, true).unwrap();
        assert!(fs::read_to_string(&config_path)
            .unwrap()
            .contains("[[sidebar]]"));
    }
}
