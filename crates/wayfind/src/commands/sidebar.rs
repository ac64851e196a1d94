//! Print the sidebar tree.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use wayfind_config::{SidebarItem, SiteConfig};
use wayfind_content::resolve_slug;

/// Run the sidebar command.
pub fn run(config_path: &Path, profile: Option<&str>) -> Result<()> {
    let config = super::load_config(config_path, profile)?;
    print!("{}", render(&config));
    Ok(())
}

/// The sidebar as an indented tree, one node per line.
///
/// Slug entries show the file they resolve to relative to the content root,
/// or `(missing)`.
pub fn render(config: &SiteConfig) -> String {
    let mut out = String::new();
    render_items(&mut out, config, &config.sidebar, 0);
    out
}

fn render_items(out: &mut String, config: &SiteConfig, items: &[SidebarItem], depth: usize) {
    let indent = "  ".repeat(depth);
    let root = config.content_root();

    for item in items {
        let line = match item {
            SidebarItem::Slug { label, slug, .. } => {
                let file = resolve_slug(&root, slug)
                    .map(|p| p.strip_prefix(&root).unwrap_or(&p).display().to_string())
                    .unwrap_or_else(|| "(missing)".to_string());
                format!("{} -> {} [{}]", label, item.href().unwrap_or_default(), file)
            }
            SidebarItem::Link { label, link, .. } => format!("{} -> {}", label, link),
            SidebarItem::Autogenerate {
                label,
                autogenerate,
                ..
            } => format!("{} (autogenerated from {}/)", label, autogenerate.directory),
            SidebarItem::Group { label, .. } => label.clone(),
        };
        let _ = writeln!(out, "{}{}", indent, line);
        render_items(out, config, item.children(), depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn renders_tree_with_resolved_files() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("src/content/docs");
        fs::create_dir_all(docs.join("core")).unwrap();
        fs::write(docs.join("getting-started.md"), "").unwrap();
        fs::write(docs.join("core/index.mdx"), "").unwrap();
        fs::write(
            temp.path().join("wayfind.toml"),
            r#"
[[sidebar]]
label = "Getting Started"
items = [{ label = "Introduction", slug = "getting-started" }]

[[sidebar]]
label = "Core"
items = [
  { label = "Overview", slug = "core" },
  { label = "Data Types", slug = "core/data-types" },
  { label = "API", autogenerate = { directory = "api" } },
]

[[sidebar]]
label = "jbcom Hub"
link = "https://jbcom.github.io"
"#,
        )
        .unwrap();

        let config = wayfind_config::load(&temp.path().join("wayfind.toml"), None).unwrap();

        assert_eq!(
            render(&config),
            "Getting Started\n\
             \x20 Introduction -> /getting-started/ [getting-started.md]\n\
             Core\n\
             \x20 Overview -> /core/ [core/index.mdx]\n\
             \x20 Data Types -> /core/data-types/ [(missing)]\n\
             \x20 API (autogenerated from api/)\n\
             jbcom Hub -> https://jbcom.github.io\n"
        );
    }
}
