//! Template engine for rendering documentation pages.

use minijinja::{AutoEscape, Environment, ErrorKind, Output, State, Value};

/// A node of the rendered sidebar.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct NavItem {
    /// Display label
    pub label: String,
    /// Link target; `None` for groups
    pub href: Option<String>,
    /// Extra anchor attributes
    pub attrs: Vec<(String, String)>,
    pub badge: Option<String>,
    /// Child items
    pub children: Vec<NavItem>,
    /// Whether this node renders as a group
    pub group: bool,
    /// Groups start closed
    pub collapsed: bool,
}

/// A table of contents entry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// An element injected into `<head>`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HeadElement {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SocialItem {
    pub icon: String,
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct LogoView {
    pub src: String,
    pub alt: String,
    pub replaces_title: bool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HeroAction {
    pub text: String,
    pub link: String,
    pub variant: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HeroView {
    pub title: String,
    pub tagline: Option<String>,
    pub actions: Vec<HeroAction>,
}

/// Context for rendering a page template.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Context {
    /// Full `<title>` text
    pub page_title: String,
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub canonical: Option<String>,
    pub favicon: Option<String>,
    pub logo: Option<LogoView>,
    pub social: Vec<SocialItem>,
    pub head: Vec<HeadElement>,
    /// Stylesheet URLs after the main theme
    pub styles: Vec<String>,
    /// Rendered content HTML
    pub content: String,
    /// Sidebar tree
    pub nav: Vec<NavItem>,
    /// Table of contents
    pub toc: Vec<TocEntry>,
    /// URL of the page being rendered
    pub current_path: String,
    pub hero: Option<HeroView>,
    pub edit_url: Option<String>,
    pub last_updated: Option<String>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with default templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_formatter(html_formatter);

        for (name, source) in [
            ("base.html", BASE_TEMPLATE),
            ("doc.html", DOC_TEMPLATE),
            ("splash.html", SPLASH_TEMPLATE),
            ("404.html", NOT_FOUND_TEMPLATE),
            ("nav.html", NAV_TEMPLATE),
        ] {
            env.add_template(name, source)
                .expect("built-in templates are valid");
        }

        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        context: &Context,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes values with HTML escaping that leaves `/` intact, so hrefs stay
/// readable in the output.
fn html_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> Result<(), minijinja::Error> {
    if value.is_undefined() || value.is_none() {
        return Ok(());
    }

    let text = value.to_string();
    let written = if value.is_safe() || matches!(state.auto_escape(), AutoEscape::None) {
        out.write_str(&text)
    } else {
        out.write_str(&escape_html(&text))
    };

    written.map_err(|_| minijinja::Error::new(ErrorKind::WriteFailure, "failed to write output"))
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ page_title }}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}{% if canonical %}<link rel="canonical" href="{{ canonical }}">
  {% endif %}{% if favicon %}<link rel="icon" href="{{ favicon }}">
  {% endif %}{% for tag in head %}<{{ tag.tag }}{% for attr in tag.attrs %} {{ attr[0] }}="{{ attr[1] }}"{% endfor %}>{% if tag.content %}{{ tag.content }}</{{ tag.tag }}>{% endif %}
  {% endfor %}<link rel="stylesheet" href="/assets/main.css">
  {% for style in styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}
</head>
<body>
  <header class="header">
    <button class="menu-btn" type="button" aria-label="Menu">&#9776;</button>
    <a href="/" class="site-title">
      {% if logo %}<img src="{{ logo.src }}" alt="{{ logo.alt }}">{% endif %}
      {% if not logo or not logo.replaces_title %}<span>{{ site_title }}</span>{% endif %}
    </a>
    {% if social %}
    <ul class="social">
      {% for link in social %}<li><a href="{{ link.href }}" rel="me" class="social-{{ link.icon }}">{{ link.label }}</a></li>
      {% endfor %}
    </ul>
    {% endif %}
  </header>
  {% block body %}{% endblock %}
  <script src="/assets/main.js"></script>
</body>
</html>"##;

const DOC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<div class="layout">
  {% include "nav.html" %}
  <main class="main">
    <article class="doc">
      <div class="content">
        {{ content | safe }}
      </div>
      {% if edit_url or last_updated %}
      <footer class="page-meta">
        {% if edit_url %}<a href="{{ edit_url }}" class="edit-link">Edit page</a>{% endif %}
        {% if last_updated %}<p class="last-updated">Last updated: <time datetime="{{ last_updated }}">{{ last_updated }}</time></p>{% endif %}
      </footer>
      {% endif %}
    </article>

    {% if toc %}
    <aside class="toc">
      <h2>On this page</h2>
      <ul>
      {% for entry in toc %}
        <li class="toc-level-{{ entry.level }}">
          <a href="#{{ entry.id }}">{{ entry.title }}</a>
        </li>
      {% endfor %}
      </ul>
    </aside>
    {% endif %}
  </main>
</div>
{% endblock %}"##;

const SPLASH_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<main class="splash">
  {% if hero %}
  <div class="hero">
    <h1>{{ hero.title }}</h1>
    {% if hero.tagline %}<p class="tagline">{{ hero.tagline }}</p>{% endif %}
    {% if hero.actions %}
    <div class="actions">
      {% for action in hero.actions %}<a href="{{ action.link }}" class="action {{ action.variant }}">{{ action.text }}</a>
      {% endfor %}
    </div>
    {% endif %}
  </div>
  {% endif %}
  <div class="content">
    {{ content | safe }}
  </div>
</main>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<div class="layout">
  {% include "nav.html" %}
  <main class="main">
    <article class="doc">
      <div class="content">
        <h1>{{ title }}</h1>
        <p>The page you are looking for does not exist. Try the navigation or go back to the <a href="/">home page</a>.</p>
      </div>
    </article>
  </main>
</div>
{% endblock %}"##;

const NAV_TEMPLATE: &str = r##"<nav aria-label="Main" class="sidebar">
  <ul class="sidebar-list">
  {% for item in nav recursive %}
    {% if item.group %}
    <li class="sidebar-group">
      <details{% if not item.collapsed %} open{% endif %}>
        <summary>{{ item.label }}</summary>
        <ul class="sidebar-list">{{ loop(item.children) }}</ul>
      </details>
    </li>
    {% else %}
    <li class="sidebar-entry">
      <a href="{{ item.href }}"{% for attr in item.attrs %} {{ attr[0] }}="{{ attr[1] }}"{% endfor %}{% if item.href == current_path %} aria-current="page"{% endif %}>{{ item.label }}{% if item.badge %} <span class="badge">{{ item.badge }}</span>{% endif %}</a>
    </li>
    {% endif %}
  {% endfor %}
  </ul>
</nav>"##;
