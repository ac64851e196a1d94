//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use wayfind_static::StaticBuilder;

/// Run the build command.
pub fn run(
    config_path: &Path,
    profile: Option<&str>,
    output: Option<PathBuf>,
    minify: Option<bool>,
) -> Result<()> {
    tracing::info!("Building static site...");

    let config = super::load_config(config_path, profile)?;

    let mut builder = StaticBuilder::new(config);
    if let Some(output) = output {
        builder = builder.output_dir(output);
    }
    if let Some(minify) = minify {
        builder = builder.minify(minify);
    }

    let result = builder.build()?;

    tracing::info!("Built {} pages in {}ms", result.pages, result.duration_ms);
    if !result.missing_slugs.is_empty() {
        tracing::warn!(
            "{} sidebar slug(s) have no content; run 'wayfind check slugs' for details",
            result.missing_slugs.len()
        );
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
