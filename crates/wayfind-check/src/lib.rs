//! Checks for wayfind documentation sites.
//!
//! Two families of checks live here:
//!
//! - [`check_slugs`] verifies that every sidebar slug is backed by a content
//!   file, without building anything.
//! - [`SiteChecker`] inspects a rendered site over HTTP: titles, hero, sidebar
//!   landmark and sections, navigation, the not-found route and sidebar links.

pub mod html;
pub mod site;
pub mod slugs;

pub use site::{run_suite, CheckError, CheckOutcome, CheckStatus, SiteChecker, SuiteReport};
pub use slugs::{check_slugs, SlugOutcome, SlugReport, SlugResult};
