//! Preview server command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use wayfind_server::{ServerConfig, SiteServer};

/// Run the serve command.
pub async fn run(
    config_path: &Path,
    profile: Option<&str>,
    port: u16,
    dir: Option<PathBuf>,
    open: bool,
) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => super::load_config(config_path, profile)?.output_root(),
    };

    let server = SiteServer::new(ServerConfig {
        dir,
        port,
        ..Default::default()
    })
    .spawn()
    .await?;

    if open {
        if let Err(e) = open::that(server.url()) {
            tracing::warn!("Could not open browser: {}", e);
        }
    }

    server.wait().await?;

    Ok(())
}
