//! Slug and site check commands.

use std::path::Path;

use anyhow::{Context, Result};
use wayfind_check::{check_slugs, run_suite};
use wayfind_server::{ServerConfig, SiteServer};
use wayfind_static::StaticBuilder;

/// Verify every sidebar slug resolves; fails listing each missing one.
pub fn slugs(config_path: &Path, profile: Option<&str>) -> Result<()> {
    let config = super::load_config(config_path, profile)?;
    let report = check_slugs(&config);

    println!("{}", report);

    let failures = report.failures();
    if !failures.is_empty() {
        for failure in &failures {
            tracing::error!("{}", failure);
        }
        anyhow::bail!("{} sidebar slug(s) have no content file", failures.len());
    }

    Ok(())
}

/// Run site checks against `url`, the configured base URL, or a freshly
/// built copy served on a free port.
pub async fn site(
    config_path: &Path,
    profile: Option<&str>,
    url: Option<String>,
    serve: bool,
) -> Result<()> {
    let config = super::load_config(config_path, profile)?;

    let server = if serve {
        let result = StaticBuilder::new(config.clone())
            .build()
            .context("Failed to build site for checking")?;
        let server = SiteServer::new(ServerConfig {
            dir: result.output_dir,
            port: 0,
            ..Default::default()
        })
        .spawn()
        .await?;
        Some(server)
    } else {
        None
    };

    let base_url = match (&server, url) {
        (Some(server), _) => server.url(),
        (None, Some(url)) => url,
        (None, None) => config.check.base_url.clone(),
    };

    let report = run_suite(&config, &base_url).await;

    if let Some(server) = server {
        server.shutdown();
    }

    let report = report?;
    println!("{}", report);

    if !report.is_ok() {
        anyhow::bail!(
            "{} site check(s) failed against {}",
            report.failures().count(),
            base_url
        );
    }

    Ok(())
}
