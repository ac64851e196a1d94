//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use wayfind_config::{SidebarItem, SiteConfig};
use wayfind_content::{discover, resolve_slug, Page, Template};

use crate::assets::AssetPipeline;
use crate::templates::{
    Context, HeadElement, HeroAction, HeroView, LogoView, NavItem, SocialItem, TemplateEngine,
    TocEntry,
};

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Sidebar slugs without a backing content file
    pub missing_slugs: Vec<String>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read content: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: SiteConfig,
    output_dir: PathBuf,
    minify: bool,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder writing to the configured output directory.
    pub fn new(config: SiteConfig) -> Self {
        Self {
            output_dir: config.output_root(),
            minify: config.minify,
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Override the output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Override stylesheet minification.
    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Build the static site.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let content_root = self.config.content_root();

        fs::create_dir_all(&self.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let pages: Vec<Page> = discover(&content_root)
            .map_err(|e| BuildError::ReadError(e.to_string()))?
            .into_iter()
            .filter(|p| !p.is_draft())
            .collect();

        let missing_slugs = self.missing_slugs(&content_root);
        for slug in &missing_slugs {
            tracing::warn!("Sidebar slug {} has no content file", slug);
        }

        let nav = self.build_navigation(&self.config.sidebar, &pages);
        let styles = self.generate_assets()?;

        pages
            .par_iter()
            .map(|page| self.build_page(page, &nav, &styles))
            .collect::<Result<Vec<_>, _>>()?;

        self.build_not_found(&nav, &styles)?;
        self.generate_search_index(&pages)?;
        self.generate_sitemap(&pages)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: pages.len(),
            missing_slugs,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.output_dir.clone(),
        })
    }

    fn missing_slugs(&self, content_root: &Path) -> Vec<String> {
        self.config
            .collect_slugs()
            .into_iter()
            .filter(|entry| resolve_slug(content_root, &entry.target).is_none())
            .map(|entry| entry.target)
            .collect()
    }

    /// Turn the configured sidebar into renderable nav items.
    fn build_navigation(&self, items: &[SidebarItem], pages: &[Page]) -> Vec<NavItem> {
        items
            .iter()
            .map(|item| match item {
                SidebarItem::Slug { label, badge, .. } | SidebarItem::Link { label, badge, .. } => {
                    NavItem {
                        label: label.clone(),
                        href: item.href(),
                        attrs: item.attrs().map(|a| a.pairs()).unwrap_or_default(),
                        badge: badge.clone(),
                        ..Default::default()
                    }
                }
                SidebarItem::Group {
                    label,
                    items,
                    collapsed,
                } => NavItem {
                    label: label.clone(),
                    children: self.build_navigation(items, pages),
                    group: true,
                    collapsed: *collapsed,
                    ..Default::default()
                },
                SidebarItem::Autogenerate {
                    label,
                    autogenerate,
                    collapsed,
                } => NavItem {
                    label: label.clone(),
                    children: autogenerated_items(&autogenerate.directory, pages),
                    group: true,
                    collapsed: *collapsed,
                    ..Default::default()
                },
            })
            .collect()
    }

    /// Build a single page.
    fn build_page(&self, page: &Page, nav: &[NavItem], styles: &[String]) -> Result<(), BuildError> {
        let fm = page.parsed.frontmatter.clone().unwrap_or_default();
        let title = page.title();
        let current_path = url_for_slug(&page.slug);

        let hero = match (fm.template, fm.hero) {
            (Template::Splash, Some(hero)) => Some(HeroView {
                title: hero.title.unwrap_or_else(|| title.clone()),
                tagline: hero.tagline.or_else(|| self.config.tagline.clone()),
                actions: hero
                    .actions
                    .into_iter()
                    .map(|a| HeroAction {
                        text: a.text,
                        link: a.link,
                        variant: a.variant.unwrap_or_else(|| "primary".to_string()),
                    })
                    .collect(),
            }),
            _ => None,
        };

        let context = Context {
            page_title: self.page_title(&title),
            title,
            description: fm.description,
            canonical: self.canonical(&current_path),
            content: render_markdown(&page.parsed.content),
            nav: nav.to_vec(),
            toc: page
                .parsed
                .toc
                .iter()
                .filter(|e| e.level > 1 && e.level < 4)
                .map(|e| TocEntry {
                    title: e.title.clone(),
                    id: e.id.clone(),
                    level: e.level,
                })
                .collect(),
            current_path,
            hero,
            edit_url: self.config.edit_url(&page.relative_path),
            last_updated: if self.config.last_updated {
                last_modified(&page.source_path)
            } else {
                None
            },
            ..self.site_context(styles)
        };

        let template = match fm.template {
            Template::Splash => "splash.html",
            Template::Doc => "doc.html",
        };

        let html = self
            .templates
            .render_page(template, &context)
            .map_err(|e| BuildError::TemplateError(format!("{}: {}", page.slug, e)))?;

        let output_path = self.output_path(&page.slug);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        fs::write(&output_path, html).map_err(|e| BuildError::WriteError(e.to_string()))?;
        tracing::debug!("Wrote {}", output_path.display());

        Ok(())
    }

    /// Render the not-found page served for unknown routes.
    fn build_not_found(&self, nav: &[NavItem], styles: &[String]) -> Result<(), BuildError> {
        let title = "Page not found".to_string();
        let context = Context {
            page_title: self.page_title(&title),
            title,
            nav: nav.to_vec(),
            current_path: "/404/".to_string(),
            ..self.site_context(styles)
        };

        let html = self
            .templates
            .render_page("404.html", &context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        fs::write(self.output_dir.join("404.html"), html)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Context fields shared by every page.
    fn site_context(&self, styles: &[String]) -> Context {
        Context {
            site_title: self.config.title.clone(),
            tagline: self.config.tagline.clone(),
            favicon: self
                .config
                .favicon
                .as_deref()
                .map(AssetPipeline::public_url),
            logo: self.config.logo.as_ref().and_then(|logo| {
                let src = logo.src.as_ref().or(logo.light.as_ref())?;
                Some(LogoView {
                    src: AssetPipeline::public_url(src),
                    alt: logo.alt.clone(),
                    replaces_title: logo.replaces_title,
                })
            }),
            social: self
                .config
                .social
                .iter()
                .map(|s| SocialItem {
                    icon: s.icon.clone(),
                    label: s.label.clone(),
                    href: s.href.clone(),
                })
                .collect(),
            head: self
                .config
                .head
                .iter()
                .map(|tag| HeadElement {
                    tag: tag.tag.clone(),
                    attrs: tag
                        .attrs
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                    content: tag.content.clone(),
                })
                .collect(),
            styles: styles.to_vec(),
            ..Default::default()
        }
    }

    /// `<title>` text: page title followed by the site title.
    fn page_title(&self, title: &str) -> String {
        if title.is_empty() || title == self.config.title {
            self.config.title.clone()
        } else {
            format!("{} | {}", title, self.config.title)
        }
    }

    fn canonical(&self, path: &str) -> Option<String> {
        self.config
            .site
            .as_ref()
            .map(|site| format!("{}{}", site.trim_end_matches('/'), path))
    }

    /// Output file for a slug: `<slug>/index.html`, the home page at the root.
    fn output_path(&self, slug: &str) -> PathBuf {
        if slug.is_empty() {
            self.output_dir.join("index.html")
        } else {
            self.output_dir.join(slug).join("index.html")
        }
    }

    /// Write theme assets and configured images and stylesheets.
    ///
    /// Returns the URLs of the custom stylesheets.
    fn generate_assets(&self) -> Result<Vec<String>, BuildError> {
        let assets_dir = self.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(assets_dir.join("main.js"), AssetPipeline::generate_js())
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let mut styles = Vec::new();
        for style in &self.config.custom_css {
            let source = self.config.resolve_path(style);
            let url = AssetPipeline::public_url(style);
            if !source.exists() {
                tracing::warn!("Stylesheet not found: {}", source.display());
                continue;
            }
            let css = AssetPipeline::load_stylesheet(&source, self.minify)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", source.display(), e)))?;
            fs::write(assets_dir.join(file_name(&source)), css)
                .map_err(|e| BuildError::WriteError(e.to_string()))?;
            tracing::info!("Copied stylesheet from {}", style);
            styles.push(url);
        }

        let images = self
            .config
            .logo
            .iter()
            .flat_map(|l| [&l.src, &l.light, &l.dark])
            .flatten()
            .chain(self.config.favicon.as_ref());

        for image in images {
            if !AssetPipeline::is_local(image) {
                continue;
            }
            let source = self.config.resolve_path(image);
            if source.exists() {
                fs::copy(&source, assets_dir.join(file_name(&source)))
                    .map_err(|e| BuildError::WriteError(e.to_string()))?;
            } else {
                tracing::warn!("Asset not found: {}", source.display());
            }
        }

        Ok(styles)
    }

    /// Generate search index.
    fn generate_search_index(&self, pages: &[Page]) -> Result<(), BuildError> {
        let index: Vec<serde_json::Value> = pages
            .iter()
            .map(|page| {
                let description = page
                    .parsed
                    .frontmatter
                    .as_ref()
                    .and_then(|f| f.description.clone())
                    .unwrap_or_default();

                let content: String = page.parsed.text.chars().take(500).collect();

                serde_json::json!({
                    "title": page.title(),
                    "description": description,
                    "url": url_for_slug(&page.slug),
                    "content": content,
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.output_dir.join("search-index.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Generate sitemap and robots.txt when the site URL is known.
    fn generate_sitemap(&self, pages: &[Page]) -> Result<(), BuildError> {
        let Some(site) = self.config.site.as_deref() else {
            tracing::debug!("No site URL configured, skipping sitemap");
            return Ok(());
        };
        let site = site.trim_end_matches('/');

        let urls: Vec<String> = pages
            .iter()
            .map(|page| {
                format!(
                    "  <url>\n    <loc>{}{}</loc>\n  </url>",
                    site,
                    url_for_slug(&page.slug)
                )
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let robots = format!("User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml", site);
        fs::write(self.output_dir.join("robots.txt"), robots)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// Items of an autogenerated group: pages beneath `directory`, ordered by
/// their sidebar order and then label.
fn autogenerated_items(directory: &str, pages: &[Page]) -> Vec<NavItem> {
    let prefix = format!("{}/", directory.trim_matches('/'));

    let mut entries: Vec<(i32, String, String)> = pages
        .iter()
        .filter(|p| p.slug.starts_with(&prefix))
        .filter_map(|p| {
            let sidebar = p
                .parsed
                .frontmatter
                .as_ref()
                .map(|f| f.sidebar.clone())
                .unwrap_or_default();
            if sidebar.hidden {
                return None;
            }
            let label = sidebar.label.unwrap_or_else(|| p.title());
            Some((sidebar.order.unwrap_or(i32::MAX), label, url_for_slug(&p.slug)))
        })
        .collect();

    entries.sort();

    entries
        .into_iter()
        .map(|(_, label, href)| NavItem {
            label,
            href: Some(href),
            ..Default::default()
        })
        .collect()
}

/// Site URL of a slug.
fn url_for_slug(slug: &str) -> String {
    if slug.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", slug)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("asset")
        .to_string()
}

/// Source file modification date as `YYYY-MM-DD`.
fn last_modified(path: &Path) -> Option<String> {
    let modified: SystemTime = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let date: DateTime<Utc> = modified.into();
    Some(date.format("%Y-%m-%d").to_string())
}

/// Render markdown to HTML, adding ids to headings for the table of contents.
fn render_markdown(content: &str) -> String {
    use pulldown_cmark::{html, CowStr, Event, Parser, Tag, TagEnd};
    use wayfind_content::parser::{markdown_options, slugify};

    let mut events: Vec<Event> = Parser::new_ext(content, markdown_options()).collect();

    // Give headings the ids the table of contents links to
    let mut i = 0;
    while i < events.len() {
        if let Event::Start(Tag::Heading { id: None, .. }) = &events[i] {
            let text: String = events[i + 1..]
                .iter()
                .take_while(|e| !matches!(e, Event::End(TagEnd::Heading(_))))
                .filter_map(|e| match e {
                    Event::Text(t) | Event::Code(t) => Some(t.to_string()),
                    _ => None,
                })
                .collect();
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                *id = Some(CowStr::from(slugify(&text)));
            }
        }
        i += 1;
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    html_output
}
