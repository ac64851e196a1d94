//! Static file server for built wayfind sites.
//!
//! Serves an output directory the way a static host would: directories
//! resolve to their `index.html` and unknown routes answer 404 with the
//! site's `404.html`.

pub mod server;

pub use server::{RunningServer, ServerConfig, ServerError, SiteServer};
