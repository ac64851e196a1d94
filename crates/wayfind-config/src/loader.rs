//! Layered configuration loading.
//!
//! Layers, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. the base file (`wayfind.toml`)
//! 3. an optional profile overlay next to it (`wayfind.<profile>.toml`)
//! 4. `WAYFIND_*` environment variables, with `__` separating nested keys
//!
//! Tables merge key by key; arrays such as `sidebar` are replaced as a whole
//! by the later layer.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Toml};
use figment::Figment;

use crate::site::SiteConfig;
use crate::validate::ValidationIssue;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "wayfind.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "WAYFIND_";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Profile overlay not found: {0}")]
    ProfileNotFound(PathBuf),

    #[error("Failed to load config: {0}")]
    Load(Box<figment::Error>),

    #[error("Invalid config:\n{}", format_issues(.0))]
    Invalid(Vec<ValidationIssue>),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Load(Box::new(e))
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  - {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Path of the overlay file for `profile`, next to the base file.
pub fn profile_path(base: &Path, profile: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("wayfind");
    base.with_file_name(format!("{}.{}.toml", stem, profile))
}

/// Build the figment for a base file and optional profile without extracting.
pub fn figment(path: &Path, profile: Option<&str>) -> Result<Figment, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let mut figment = Figment::new().merge(Toml::file(path));

    if let Some(profile) = profile {
        let overlay = profile_path(path, profile);
        if !overlay.exists() {
            return Err(ConfigError::ProfileNotFound(overlay));
        }
        tracing::debug!("Applying profile overlay {}", overlay.display());
        figment = figment.merge(Toml::file(overlay));
    }

    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

/// Load, layer and validate the configuration at `path`.
pub fn load(path: &Path, profile: Option<&str>) -> Result<SiteConfig, ConfigError> {
    let mut config: SiteConfig = figment(path, profile)?.extract()?;

    config.root = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let issues = config.validate();
    if !issues.is_empty() {
        return Err(ConfigError::Invalid(issues));
    }

    tracing::info!(
        "Loaded config from {}{}",
        path.display(),
        profile.map(|p| format!(" (profile {})", p)).unwrap_or_default()
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    const BASE: &str = r#"
site = "https://extended-data.dev"
title = "Extended Data"

[logo]
src = "./src/assets/logo.svg"
alt = "Extended Data"

[[sidebar]]
label = "Getting Started"
items = [{ label = "Introduction", slug = "getting-started" }]

[[sidebar]]
label = "Packages"
items = [{ label = "Overview", slug = "packages" }]
"#;

    const GITHUB: &str = r#"
site = "https://extended-data-library.github.io"

[logo]
src = "./src/assets/houston.webp"
"#;

    fn to_figment_error(e: ConfigError) -> figment::Error {
        figment::Error::from(e.to_string())
    }

    #[test]
    fn loads_base_file() {
        Jail::expect_with(|jail| {
            jail.create_file("wayfind.toml", BASE)?;

            let config = load(Path::new("wayfind.toml"), None).map_err(to_figment_error)?;

            assert_eq!(config.site.as_deref(), Some("https://extended-data.dev"));
            assert_eq!(config.sidebar.len(), 2);
            assert_eq!(config.root, PathBuf::from("."));
            Ok(())
        });
    }

    #[test]
    fn profile_overrides_scalars_and_merges_tables() {
        Jail::expect_with(|jail| {
            jail.create_file("wayfind.toml", BASE)?;
            jail.create_file("wayfind.github.toml", GITHUB)?;

            let config =
                load(Path::new("wayfind.toml"), Some("github")).map_err(to_figment_error)?;

            assert_eq!(
                config.site.as_deref(),
                Some("https://extended-data-library.github.io")
            );
            let logo = config.logo.unwrap();
            assert_eq!(logo.src.as_deref(), Some("./src/assets/houston.webp"));
            assert_eq!(logo.alt, "Extended Data");
            assert_eq!(config.sidebar.len(), 2);
            Ok(())
        });
    }

    #[test]
    fn profile_replaces_sidebar() {
        Jail::expect_with(|jail| {
            jail.create_file("wayfind.toml", BASE)?;
            jail.create_file(
                "wayfind.short.toml",
                r#"
[[sidebar]]
label = "Only"
items = [{ label = "Intro", slug = "getting-started" }]
"#,
            )?;

            let config =
                load(Path::new("wayfind.toml"), Some("short")).map_err(to_figment_error)?;

            assert_eq!(config.sections(), vec!["Only".to_string()]);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_nested_keys() {
        Jail::expect_with(|jail| {
            jail.create_file("wayfind.toml", BASE)?;
            jail.set_env("WAYFIND_TITLE", "Staging Docs");
            jail.set_env("WAYFIND_CHECK__BASE_URL", "http://localhost:9000");

            let config = load(Path::new("wayfind.toml"), None).map_err(to_figment_error)?;

            assert_eq!(config.title, "Staging Docs");
            assert_eq!(config.check.base_url, "http://localhost:9000");
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_an_error() {
        Jail::expect_with(|_| {
            let result = load(Path::new("wayfind.toml"), None);
            assert!(matches!(result, Err(ConfigError::NotFound(_))));
            Ok(())
        });
    }

    #[test]
    fn missing_profile_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("wayfind.toml", BASE)?;

            let result = load(Path::new("wayfind.toml"), Some("production"));

            assert!(matches!(result, Err(ConfigError::ProfileNotFound(_))));
            Ok(())
        });
    }

    #[test]
    fn invalid_config_reports_issues() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "wayfind.toml",
                r#"
[[sidebar]]
label = "Docs"
items = [{ label = "Bad", slug = "/bad/" }]
"#,
            )?;

            let err = load(Path::new("wayfind.toml"), None).unwrap_err();

            assert!(err.to_string().contains("sidebar[0].items[0]"));
            Ok(())
        });
    }

    #[test]
    fn ambiguous_sidebar_item_names_the_item() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "wayfind.toml",
                r#"
[[sidebar]]
label = "Docs"
items = [{ label = "Overview", slug = "core", link = "https://example.com" }]
"#,
            )?;

            let err = load(Path::new("wayfind.toml"), None).unwrap_err();

            assert!(matches!(err, ConfigError::Load(_)));
            assert!(
                err.to_string()
                    .contains("sidebar item \"Overview\" sets both `slug` and `link`"),
                "{}",
                err
            );
            Ok(())
        });
    }

    #[test]
    fn profile_path_sits_next_to_base() {
        assert_eq!(
            profile_path(Path::new("docs/wayfind.toml"), "github"),
            PathBuf::from("docs/wayfind.github.toml")
        );
    }
}
