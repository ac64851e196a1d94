//! Documentation content for wayfind sites.
//!
//! Parses Markdown/MDX pages with YAML frontmatter, maps sidebar slugs to the
//! files that back them, and discovers every page under a content root.

pub mod discover;
pub mod frontmatter;
pub mod parser;
pub mod resolver;

pub use discover::{discover, slug_for_path, DiscoverError, Page};
pub use frontmatter::{Frontmatter, Hero, HeroAction, PageSidebar, Template};
pub use parser::{parse_page, ParseError, ParsedPage, TocEntry};
pub use resolver::{candidate_paths, resolve_slug, CONTENT_EXTENSIONS};
