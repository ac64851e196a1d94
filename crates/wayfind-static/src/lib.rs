//! Static site generator for wayfind documentation.
//!
//! Renders the configured sidebar and the content pages into a static HTML
//! site with a splash home page, documentation pages and a not-found page.

pub mod assets;
pub mod builder;
pub mod templates;

pub use builder::{BuildError, BuildResult, StaticBuilder};
