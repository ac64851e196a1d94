//! Asset pipeline for stylesheets, scripts and images.

use std::fs;
use std::path::Path;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the main JavaScript file.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// Read a stylesheet, minifying it when requested.
    ///
    /// Falls back to the original text if minification fails.
    pub fn load_stylesheet(path: &Path, minify: bool) -> std::io::Result<String> {
        let css = fs::read_to_string(path)?;
        if !minify {
            return Ok(css);
        }
        match Self::minify_css(&css) {
            Ok(minified) => Ok(minified),
            Err(e) => {
                tracing::warn!("Keeping {} unminified: {}", path.display(), e);
                Ok(css)
            }
        }
    }

    /// Whether a configured asset path refers to a file to copy.
    pub fn is_local(configured: &str) -> bool {
        !(configured.starts_with('/')
            || configured.starts_with("http://")
            || configured.starts_with("https://"))
    }

    /// Public URL for a configured asset path.
    ///
    /// Site-absolute paths and full URLs are used as-is; anything else is
    /// copied into `assets/` and referenced from there.
    pub fn public_url(configured: &str) -> String {
        if !Self::is_local(configured) {
            return configured.to_string();
        }
        let filename = Path::new(configured)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(configured);
        format!("/assets/{}", filename)
    }
}

// Layout follows the Main navigation / content / table of contents split.
const DEFAULT_CSS: &str = r#"/* wayfind docs theme */

:root {
  --sidebar-width: 280px;
  --toc-width: 200px;
  --content-max-width: 800px;
  --background: #ffffff;
  --foreground: #17181c;
  --muted: #f6f6f7;
  --muted-foreground: #545861;
  --border: #e4e4e7;
  --primary: #4f46e5;
  --primary-foreground: #ffffff;
  --radius: 0.375rem;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

/* Header */
.header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 0.75rem 1.5rem;
  border-bottom: 1px solid var(--border);
}

.site-title {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  font-weight: 700;
  font-size: 1.25rem;
  color: var(--foreground);
  text-decoration: none;
}

.site-title img {
  height: 2rem;
}

.social {
  display: flex;
  gap: 1rem;
  list-style: none;
}

.social a {
  color: var(--muted-foreground);
  text-decoration: none;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: calc(100vh - 3.5rem);
}

/* Sidebar */
.sidebar {
  background: var(--muted);
  border-right: 1px solid var(--border);
  padding: 1.5rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
}

.sidebar-list {
  list-style: none;
}

.sidebar-group summary {
  font-weight: 600;
  padding: 0.5rem 0;
  cursor: pointer;
}

.sidebar-group .sidebar-list {
  margin-left: 0.75rem;
}

.sidebar-entry a {
  display: block;
  padding: 0.375rem 0.75rem;
  color: var(--muted-foreground);
  text-decoration: none;
  border-radius: var(--radius);
}

.sidebar-entry a:hover {
  color: var(--foreground);
}

.sidebar-entry a[aria-current="page"] {
  background: var(--primary);
  color: var(--primary-foreground);
}

.badge {
  font-size: 0.75rem;
  padding: 0 0.375rem;
  border-radius: var(--radius);
  border: 1px solid var(--border);
}

/* Main content */
.main {
  display: grid;
  grid-template-columns: 1fr var(--toc-width);
  gap: 2rem;
  padding: 2rem;
  max-width: calc(var(--content-max-width) + var(--toc-width) + 4rem);
}

.doc {
  max-width: var(--content-max-width);
}

.content h1 {
  font-size: 2.5rem;
  font-weight: 700;
  margin-bottom: 1.5rem;
}

.content h2 {
  font-size: 1.5rem;
  font-weight: 600;
  margin: 2rem 0 1rem;
  padding-bottom: 0.5rem;
  border-bottom: 1px solid var(--border);
}

.content p {
  margin-bottom: 1rem;
}

.content a {
  color: var(--primary);
  text-underline-offset: 4px;
}

.content pre {
  background: var(--muted);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  overflow-x: auto;
  font-family: ui-monospace, monospace;
  font-size: 0.875rem;
  margin-bottom: 1rem;
  position: relative;
}

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.25rem 0.75rem;
  font-size: 0.75rem;
  border: none;
  border-radius: var(--radius);
  cursor: pointer;
}

/* Splash hero */
.hero {
  text-align: center;
  padding: 4rem 1.5rem;
}

.hero h1 {
  font-size: 3rem;
  font-weight: 800;
}

.hero .tagline {
  font-size: 1.25rem;
  color: var(--muted-foreground);
  margin: 1rem 0 2rem;
}

.hero .actions {
  display: flex;
  justify-content: center;
  gap: 1rem;
}

.hero .action {
  padding: 0.75rem 1.5rem;
  border-radius: 999px;
  border: 1px solid var(--border);
  color: var(--foreground);
  text-decoration: none;
}

.hero .action.primary {
  background: var(--primary);
  color: var(--primary-foreground);
}

.splash {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 2rem;
}

/* Table of contents */
.toc {
  position: sticky;
  top: 2rem;
  align-self: start;
}

.toc h2 {
  font-size: 0.75rem;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--muted-foreground);
  margin-bottom: 0.75rem;
}

.toc ul {
  list-style: none;
}

.toc a {
  font-size: 0.875rem;
  color: var(--muted-foreground);
  text-decoration: none;
}

.toc-level-3 {
  padding-left: 1rem;
}

.toc-level-4 {
  padding-left: 2rem;
}

/* Page footer */
.page-meta {
  display: flex;
  justify-content: space-between;
  margin-top: 3rem;
  padding-top: 1rem;
  border-top: 1px solid var(--border);
  font-size: 0.875rem;
  color: var(--muted-foreground);
}

/* Responsive */
@media (max-width: 1024px) {
  .layout {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: fixed;
    left: -100%;
    z-index: 50;
    transition: left 0.3s;
    width: var(--sidebar-width);
  }

  .sidebar.open {
    left: 0;
  }

  .main {
    grid-template-columns: 1fr;
  }

  .toc {
    display: none;
  }
}

.menu-btn {
  display: none;
  padding: 0.5rem;
  border: none;
  border-radius: var(--radius);
  cursor: pointer;
}

@media (max-width: 1024px) {
  .menu-btn {
    display: block;
  }
}
"#;

const DEFAULT_JS: &str = r#"// wayfind docs runtime
(function() {
  'use strict';

  // Mobile menu toggle
  const menuBtn = document.querySelector('.menu-btn');
  const sidebar = document.querySelector('nav[aria-label="Main"]');

  if (menuBtn && sidebar) {
    menuBtn.addEventListener('click', () => {
      sidebar.classList.toggle('open');
    });
  }

  // Keep the group holding the current page expanded
  const current = document.querySelector('nav[aria-label="Main"] a[aria-current="page"]');
  if (current) {
    let node = current.closest('details');
    while (node) {
      node.open = true;
      node = node.parentElement ? node.parentElement.closest('details') : null;
    }
  }

  // Copy code button for pre blocks
  document.querySelectorAll('.content pre').forEach(pre => {
    if (pre.querySelector('.copy-btn')) return;

    const btn = document.createElement('button');
    btn.className = 'copy-btn';
    btn.textContent = 'Copy';
    btn.setAttribute('type', 'button');

    btn.addEventListener('click', async () => {
      const code = pre.querySelector('code');
      const text = code ? code.textContent : pre.textContent;

      try {
        await navigator.clipboard.writeText(text || '');
        btn.textContent = 'Copied!';
      } catch (err) {
        btn.textContent = 'Error';
      }
      setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
    });

    pre.appendChild(btn);
  });
})();
"#;
