//! Checks against a rendered site served over HTTP.

use std::fmt;
use std::time::{Duration, Instant};

use regex::Regex;
use url::Url;

use wayfind_config::SiteConfig;

use crate::html::{Document, Element};

/// Errors that stop a check run before any check executes.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Invalid base URL {0}: {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Failed(String),
    Skipped(String),
}

/// A named check and its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub name: String,
    pub status: CheckStatus,
}

impl CheckOutcome {
    fn passed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Passed,
        }
    }

    fn failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(reason.into()),
        }
    }

    fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Skipped(reason.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, CheckStatus::Failed(_))
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            CheckStatus::Passed => write!(f, "  pass  {}", self.name),
            CheckStatus::Failed(reason) => write!(f, "  FAIL  {}: {}", self.name, reason),
            CheckStatus::Skipped(reason) => write!(f, "  skip  {}: {}", self.name, reason),
        }
    }
}

/// Outcomes of a full check run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    /// True when no check failed.
    pub fn is_ok(&self) -> bool {
        !self.outcomes.iter().any(CheckOutcome::is_failed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    fn count(&self, matcher: fn(&CheckStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| matcher(&o.status)).count()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{}", outcome)?;
        }
        write!(
            f,
            "{} passed, {} failed, {} skipped",
            self.count(|s| matches!(s, CheckStatus::Passed)),
            self.count(|s| matches!(s, CheckStatus::Failed(_))),
            self.count(|s| matches!(s, CheckStatus::Skipped(_))),
        )
    }
}

/// A fetched page.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    /// URL after redirects
    pub url: Url,
    pub document: Document,
}

impl Fetched {
    fn has_visible_main(&self) -> bool {
        self.document.has_visible(|e| e.tag == "main")
    }

    fn visible_sidebar(&self) -> Option<&Element> {
        self.document.visible_main_nav()
    }
}

/// Runs checks one at a time against a served site.
pub struct SiteChecker {
    client: reqwest::Client,
    base: Url,
}

impl SiteChecker {
    /// Create a checker for the site at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CheckError> {
        let base = Url::parse(base_url)
            .map_err(|e| CheckError::InvalidUrl(base_url.to_string(), e))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wayfind/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base })
    }

    /// Base URL checks are run against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for a site route.
    ///
    /// Routes are appended to the base path, so a base of
    /// `https://example.github.io/docs` keeps its `/docs` prefix.
    pub fn url_for(&self, route: &str) -> Result<Url, url::ParseError> {
        if route.starts_with("http://") || route.starts_with("https://") {
            return Url::parse(route);
        }
        let base = self.base.as_str().trim_end_matches('/');
        let route = route.trim_start_matches('/');
        Url::parse(&format!("{}/{}", base, route))
    }

    /// GET a route, following redirects.
    pub async fn fetch(&self, route: &str) -> Result<Fetched, String> {
        let url = self
            .url_for(route)
            .map_err(|e| format!("invalid route {}: {}", route, e))?;

        let start = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| format!("request to {} failed: {}", url, e))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| format!("reading {} failed: {}", url, e))?;
        let document = Document::parse(&body);

        tracing::debug!(
            url = %url,
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched"
        );

        Ok(Fetched {
            status,
            url: final_url,
            document,
        })
    }

    async fn fetch_ok(&self, route: &str) -> Result<Fetched, String> {
        let page = self.fetch(route).await?;
        if !(200..300).contains(&page.status) {
            return Err(format!("{} returned status {}", route, page.status));
        }
        Ok(page)
    }

    /// The home page `<title>` matches `pattern`.
    pub async fn homepage_title(&self, pattern: &str) -> CheckOutcome {
        let name = "homepage title";
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(e) => return CheckOutcome::failed(name, format!("invalid pattern: {}", e)),
        };
        match self.fetch_ok("/").await {
            Ok(page) => title_matches(name, &page, &regex),
            Err(reason) => CheckOutcome::failed(name, reason),
        }
    }

    /// The home page shows a hero section.
    pub async fn homepage_hero(&self) -> CheckOutcome {
        let name = "homepage hero";
        match self.fetch_ok("/").await {
            Ok(page) if page.document.has_visible(|e| e.has_class("hero")) => CheckOutcome::passed(name),
            Ok(_) => CheckOutcome::failed(name, "no visible element with class \"hero\""),
            Err(reason) => CheckOutcome::failed(name, reason),
        }
    }

    /// `route` shows the main navigation landmark.
    pub async fn sidebar_present(&self, route: &str) -> CheckOutcome {
        let name = format!("sidebar present on {}", route);
        match self.fetch_ok(route).await {
            Ok(page) if page.visible_sidebar().is_some() => CheckOutcome::passed(name),
            Ok(_) => CheckOutcome::failed(name, "no visible nav[aria-label=\"Main\"]"),
            Err(reason) => CheckOutcome::failed(name, reason),
        }
    }

    /// The sidebar on `route` mentions every label in `sections`.
    pub async fn sidebar_sections(&self, route: &str, sections: &[String]) -> CheckOutcome {
        let name = format!("sidebar sections on {}", route);
        let page = match self.fetch_ok(route).await {
            Ok(page) => page,
            Err(reason) => return CheckOutcome::failed(name, reason),
        };
        let Some(nav) = page.visible_sidebar() else {
            return CheckOutcome::failed(name, "no visible nav[aria-label=\"Main\"]");
        };

        let text = nav.text();
        let missing: Vec<&str> = sections
            .iter()
            .filter(|s| !text.contains(s.as_str()))
            .map(String::as_str)
            .collect();

        if missing.is_empty() {
            CheckOutcome::passed(name)
        } else {
            CheckOutcome::failed(name, format!("missing section(s): {}", missing.join(", ")))
        }
    }

    /// `route` loads, its title matches `title_pattern` and it shows `main`.
    pub async fn page_loads(&self, route: &str, title_pattern: &str) -> CheckOutcome {
        let name = format!("page {}", route);
        let regex = match Regex::new(title_pattern) {
            Ok(regex) => regex,
            Err(e) => return CheckOutcome::failed(name, format!("invalid pattern: {}", e)),
        };
        let page = match self.fetch_ok(route).await {
            Ok(page) => page,
            Err(reason) => return CheckOutcome::failed(name, reason),
        };

        let outcome = title_matches(&name, &page, &regex);
        if outcome.is_failed() {
            return outcome;
        }
        if !page.has_visible_main() {
            return CheckOutcome::failed(name, "no visible main element");
        }
        outcome
    }

    /// Follow the sidebar link on `route` whose href contains `fragment`.
    ///
    /// The page reached after redirects must have `/{fragment}/` in its
    /// path. Skipped when the sidebar has no such link.
    pub async fn sidebar_navigation(&self, route: &str, fragment: &str) -> CheckOutcome {
        let name = format!("navigate to {}", fragment);
        let page = match self.fetch_ok(route).await {
            Ok(page) => page,
            Err(reason) => return CheckOutcome::failed(name, reason),
        };
        let Some(nav) = page.visible_sidebar() else {
            return CheckOutcome::failed(name, "no visible nav[aria-label=\"Main\"]");
        };
        let Some(href) = nav.hrefs().into_iter().find(|h| h.contains(fragment)) else {
            return CheckOutcome::skipped(name, format!("no sidebar link contains {}", fragment));
        };

        let target = match self.fetch_ok(&href).await {
            Ok(target) => target,
            Err(reason) => return CheckOutcome::failed(name, reason),
        };
        let expected = format!("/{}/", fragment.trim_matches('/'));
        if !target.url.path().contains(&expected) {
            return CheckOutcome::failed(
                name,
                format!("{} landed on {}", href, target.url),
            );
        }
        if !target.has_visible_main() {
            return CheckOutcome::failed(name, format!("{} has no visible main element", href));
        }
        CheckOutcome::passed(name)
    }

    /// `route` answers exactly 404.
    pub async fn not_found(&self, route: &str) -> CheckOutcome {
        let name = format!("not found {}", route);
        match self.fetch(route).await {
            Ok(page) if page.status == 404 => CheckOutcome::passed(name),
            Ok(page) => CheckOutcome::failed(name, format!("expected 404, got {}", page.status)),
            Err(reason) => CheckOutcome::failed(name, reason),
        }
    }

    /// Every internal sidebar link on `route` answers without a server error.
    pub async fn sidebar_links(&self, route: &str) -> CheckOutcome {
        let name = format!("sidebar links on {}", route);
        let page = match self.fetch_ok(route).await {
            Ok(page) => page,
            Err(reason) => return CheckOutcome::failed(name, reason),
        };
        let Some(nav) = page.visible_sidebar() else {
            return CheckOutcome::failed(name, "no visible nav[aria-label=\"Main\"]");
        };

        let links = internal_links(&nav.hrefs());
        if links.is_empty() {
            return CheckOutcome::failed(name, "sidebar has no internal links");
        }

        let start = Instant::now();
        let mut failures = Vec::new();
        for link in &links {
            match self.fetch(link).await {
                Ok(target) if target.status < 500 => {}
                Ok(target) => failures.push(format!("{} returned status {}", link, target.status)),
                Err(reason) => failures.push(reason),
            }
        }

        tracing::info!(
            links = links.len(),
            failed = failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Checked sidebar links"
        );

        if failures.is_empty() {
            CheckOutcome::passed(name)
        } else {
            CheckOutcome::failed(name, failures.join("; "))
        }
    }
}

/// Site-internal hrefs, first occurrence order, duplicates dropped.
fn internal_links(hrefs: &[String]) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for href in hrefs {
        if href.starts_with('/') && !href.starts_with("//") && !links.contains(href) {
            links.push(href.clone());
        }
    }
    links
}

fn title_matches(name: &str, page: &Fetched, regex: &Regex) -> CheckOutcome {
    match page.document.title() {
        Some(title) if regex.is_match(&title) => CheckOutcome::passed(name),
        Some(title) => CheckOutcome::failed(
            name,
            format!("title {:?} does not match /{}/", title, regex.as_str()),
        ),
        None => CheckOutcome::failed(name, "page has no <title>"),
    }
}

/// Run every configured check against the site at `base_url`.
pub async fn run_suite(config: &SiteConfig, base_url: &str) -> Result<SuiteReport, CheckError> {
    let checker = SiteChecker::new(base_url, Duration::from_secs(config.check.timeout_secs))?;
    let mut report = SuiteReport::default();

    tracing::info!("Checking {}", checker.base());
    let start = Instant::now();

    report
        .outcomes
        .push(checker.homepage_title(&config.title_pattern()).await);
    report.outcomes.push(checker.homepage_hero().await);

    match config.sidebar_route() {
        Some(route) => {
            report.outcomes.push(checker.sidebar_present(&route).await);
            report.outcomes.push(
                checker
                    .sidebar_sections(&route, &config.expected_sections())
                    .await,
            );
            for fragment in &config.check.navigation {
                report
                    .outcomes
                    .push(checker.sidebar_navigation(&route, fragment).await);
            }
            report.outcomes.push(checker.sidebar_links(&route).await);
        }
        None => report.outcomes.push(CheckOutcome::skipped(
            "sidebar",
            "no sidebar route configured and no slug entries",
        )),
    }

    for page in &config.check.pages {
        report
            .outcomes
            .push(checker.page_loads(&page.route, &page.title_pattern).await);
    }

    report
        .outcomes
        .push(checker.not_found(&config.check.not_found_route).await);

    for outcome in report.failures() {
        tracing::warn!("{}", outcome);
    }
    tracing::info!(
        checks = report.outcomes.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Site checks finished"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn internal_links_are_deduplicated_in_order() {
        let hrefs = vec![
            "/getting-started/".to_string(),
            "https://jbcom.github.io".to_string(),
            "/core/".to_string(),
            "//cdn.example.com/x".to_string(),
            "/getting-started/".to_string(),
            "#top".to_string(),
        ];

        assert_eq!(
            internal_links(&hrefs),
            vec!["/getting-started/".to_string(), "/core/".to_string()]
        );
    }

    #[test]
    fn routes_keep_base_path() {
        let checker =
            SiteChecker::new("https://example.github.io/docs/", Duration::from_secs(1)).unwrap();

        assert_eq!(
            checker.url_for("/core/").unwrap().as_str(),
            "https://example.github.io/docs/core/"
        );
        assert_eq!(
            checker.url_for("https://other.dev/").unwrap().as_str(),
            "https://other.dev/"
        );
    }

    #[test]
    fn invalid_base_url() {
        let result = SiteChecker::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(CheckError::InvalidUrl(..))));
    }

    #[test]
    fn report_is_ok_without_failures() {
        let mut report = SuiteReport {
            outcomes: vec![
                CheckOutcome::passed("a"),
                CheckOutcome::skipped("b", "nothing to do"),
            ],
        };
        assert!(report.is_ok());
        assert_eq!(
            report.to_string(),
            "  pass  a\n  skip  b: nothing to do\n1 passed, 0 failed, 1 skipped"
        );

        report.outcomes.push(CheckOutcome::failed("c", "broken"));
        assert!(!report.is_ok());
        assert_eq!(report.failures().count(), 1);
    }
}
