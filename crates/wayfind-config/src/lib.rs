//! Site configuration for wayfind documentation sites.
//!
//! A single `wayfind.toml` describes the site metadata and the sidebar tree.
//! Environment-specific differences (site URL, logo, social links) live in
//! profile overlays such as `wayfind.github.toml` instead of copies of the
//! whole file.

pub mod loader;
pub mod sidebar;
pub mod site;
pub mod validate;

pub use loader::{load, ConfigError, CONFIG_FILE, ENV_PREFIX};
pub use sidebar::{LinkAttrs, SidebarEntry, SidebarItem, SidebarItemError};
pub use site::{CheckSettings, EditLink, HeadTag, Logo, PageExpectation, SiteConfig, SocialLink};
pub use validate::ValidationIssue;
