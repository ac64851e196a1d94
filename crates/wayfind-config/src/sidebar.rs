//! Sidebar tree definition and queries.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Maximum nesting of the sidebar: group -> item -> sub-item.
pub const MAX_DEPTH: usize = 3;

/// Presentation attributes attached to a sidebar link.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LinkAttrs {
    /// CSS class added to the anchor
    #[serde(default)]
    pub class: Option<String>,

    /// Browsing context for the anchor (e.g. `_blank`)
    #[serde(default)]
    pub target: Option<String>,

    /// Any other HTML attributes, emitted verbatim
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

impl LinkAttrs {
    /// All attributes as ordered `(name, value)` pairs.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(class) = &self.class {
            pairs.push(("class".to_string(), class.clone()));
        }
        if let Some(target) = &self.target {
            pairs.push(("target".to_string(), target.clone()));
            if target == "_blank" && !self.other.contains_key("rel") {
                pairs.push(("rel".to_string(), "noopener noreferrer".to_string()));
            }
        }
        for (name, value) in &self.other {
            pairs.push((name.clone(), value.clone()));
        }
        pairs
    }
}

/// Directory reference for an autogenerated group.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Autogenerate {
    /// Content directory whose pages populate the group
    pub directory: String,
}

/// A single node of the sidebar tree.
///
/// Variants are distinguished by which reference field is present, matching
/// the shape of the configuration file. An item must set exactly one of
/// `slug`, `link`, `items` or `autogenerate`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawSidebarItem")]
pub enum SidebarItem {
    /// Reference to a local content page.
    Slug {
        label: String,
        slug: String,
        attrs: LinkAttrs,
        badge: Option<String>,
    },

    /// External URL or site-absolute path.
    Link {
        label: String,
        link: String,
        attrs: LinkAttrs,
        badge: Option<String>,
    },

    /// Group filled from a content directory at render time.
    Autogenerate {
        label: String,
        autogenerate: Autogenerate,
        collapsed: bool,
    },

    /// Labelled group of nested items.
    Group {
        label: String,
        items: Vec<SidebarItem>,
        collapsed: bool,
    },
}

/// A sidebar item whose fields do not describe a single kind of entry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SidebarItemError {
    #[error("sidebar item \"{label}\" sets both `{first}` and `{second}`")]
    Ambiguous {
        label: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("sidebar item \"{0}\" needs one of `slug`, `link`, `items` or `autogenerate`")]
    NoTarget(String),

    #[error("sidebar item \"{label}\": `{field}` only applies to {applies_to}")]
    Misplaced {
        label: String,
        field: &'static str,
        applies_to: &'static str,
    },
}

/// Every field a sidebar item may carry, before its kind is decided.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSidebarItem {
    label: String,
    slug: Option<String>,
    link: Option<String>,
    items: Option<Vec<SidebarItem>>,
    autogenerate: Option<Autogenerate>,
    attrs: Option<LinkAttrs>,
    badge: Option<String>,
    collapsed: Option<bool>,
}

impl TryFrom<RawSidebarItem> for SidebarItem {
    type Error = SidebarItemError;

    fn try_from(raw: RawSidebarItem) -> Result<Self, Self::Error> {
        let set: Vec<&'static str> = [
            ("slug", raw.slug.is_some()),
            ("link", raw.link.is_some()),
            ("items", raw.items.is_some()),
            ("autogenerate", raw.autogenerate.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect();
        if let [first, second, ..] = set.as_slice() {
            return Err(SidebarItemError::Ambiguous {
                label: raw.label,
                first: *first,
                second: *second,
            });
        }

        let RawSidebarItem {
            label,
            slug,
            link,
            items,
            autogenerate,
            attrs,
            badge,
            collapsed,
        } = raw;

        let is_leaf = slug.is_some() || link.is_some();
        let misplaced = if set.is_empty() {
            None
        } else if is_leaf {
            collapsed.map(|_| ("collapsed", "groups"))
        } else if attrs.is_some() {
            Some(("attrs", "slug and link items"))
        } else {
            badge.as_ref().map(|_| ("badge", "slug and link items"))
        };
        if let Some((field, applies_to)) = misplaced {
            return Err(SidebarItemError::Misplaced {
                label,
                field,
                applies_to,
            });
        }

        match (slug, link, items, autogenerate) {
            (Some(slug), ..) => Ok(Self::Slug {
                label,
                slug,
                attrs: attrs.unwrap_or_default(),
                badge,
            }),
            (_, Some(link), ..) => Ok(Self::Link {
                label,
                link,
                attrs: attrs.unwrap_or_default(),
                badge,
            }),
            (_, _, Some(items), _) => Ok(Self::Group {
                label,
                items,
                collapsed: collapsed.unwrap_or_default(),
            }),
            (_, _, _, Some(autogenerate)) => Ok(Self::Autogenerate {
                label,
                autogenerate,
                collapsed: collapsed.unwrap_or_default(),
            }),
            (None, None, None, None) => Err(SidebarItemError::NoTarget(label)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Deserialize)]
    struct Tree {
        sidebar: Vec<SidebarItem>,
    }

    fn tree() -> Vec<SidebarItem> {
        let source = r#"
[[sidebar]]
label = "Getting Started"
items = [{ label = "Introduction", slug = "getting-started" }]

[[sidebar]]
label = "Extended Data Types"

[[sidebar.items]]
label = "Overview"
slug = "core/data-types"

[[sidebar.items]]
label = "API Reference"
link = "/api/extended-data-types/"
attrs = { class = "api-link" }

[[sidebar]]
label = "Enterprise"

[[sidebar.items]]
label = "jbcom Hub"
link = "https://jbcom.github.io"
attrs = { target = "_blank" }

[[sidebar]]
label = "API Reference"
autogenerate = { directory = "api" }
collapsed = true
"#;
        toml::from_str::<Tree>(source).unwrap().sidebar
    }

    #[test]
    fn distinguishes_entry_kinds() {
        let sidebar = tree();

        assert!(matches!(sidebar[0], SidebarItem::Group { .. }));
        assert!(matches!(sidebar[0].children()[0], SidebarItem::Slug { .. }));
        assert!(matches!(sidebar[1].children()[1], SidebarItem::Link { .. }));
        assert!(matches!(
            sidebar[3],
            SidebarItem::Autogenerate { collapsed: true, .. }
        ));
    }

    #[test]
    fn collects_slugs_in_order() {
        let slugs = collect_slugs(&tree());

        assert_eq!(
            slugs,
            vec![
                SidebarEntry {
                    label: "Introduction".to_string(),
                    target: "getting-started".to_string(),
                },
                SidebarEntry {
                    label: "Overview".to_string(),
                    target: "core/data-types".to_string(),
                },
            ]
        );
    }

    #[test]
    fn collects_links() {
        let links: Vec<_> = collect_links(&tree())
            .into_iter()
            .map(|e| e.target)
            .collect();

        assert_eq!(
            links,
            vec!["/api/extended-data-types/", "https://jbcom.github.io"]
        );
    }

    #[test]
    fn hrefs_for_slugs_and_links() {
        let sidebar = tree();

        assert_eq!(
            sidebar[0].children()[0].href().as_deref(),
            Some("/getting-started/")
        );
        assert_eq!(
            sidebar[2].children()[0].href().as_deref(),
            Some("https://jbcom.github.io")
        );
        assert_eq!(sidebar[0].href(), None);
    }

    #[test]
    fn blank_target_gets_rel() {
        let sidebar = tree();
        let attrs = sidebar[2].children()[0].attrs().unwrap();

        assert_eq!(
            attrs.pairs(),
            vec![
                ("target".to_string(), "_blank".to_string()),
                ("rel".to_string(), "noopener noreferrer".to_string()),
            ]
        );
    }

    fn parse_item(source: &str) -> Result<SidebarItem, String> {
        toml::from_str::<Tree>(source)
            .map(|tree| tree.sidebar.into_iter().next().unwrap())
            .map_err(|e| e.to_string())
    }

    #[test]
    fn slug_and_link_together_are_rejected() {
        let err = parse_item(
            r#"
[[sidebar]]
label = "Overview"
slug = "core"
link = "/core/"
"#,
        )
        .unwrap_err();

        assert!(
            err.contains("sidebar item \"Overview\" sets both `slug` and `link`"),
            "{}",
            err
        );
    }

    #[test]
    fn misspelled_field_is_rejected() {
        let err = parse_item(
            r#"
[[sidebar]]
label = "Overview"
slgu = "core"
"#,
        )
        .unwrap_err();

        assert!(err.contains("unknown field `slgu`"), "{}", err);
    }

    #[test]
    fn nested_errors_surface() {
        let err = parse_item(
            r#"
[[sidebar]]
label = "Core"
items = [{ label = "Types", autogenerate = { directory = "core" }, badge = "New" }]
"#,
        )
        .unwrap_err();

        assert!(
            err.contains("sidebar item \"Types\": `badge` only applies to slug and link items"),
            "{}",
            err
        );
    }

    #[test]
    fn item_without_target_is_rejected() {
        assert_eq!(
            SidebarItem::try_from(RawSidebarItem {
                label: "Orphan".to_string(),
                slug: None,
                link: None,
                items: None,
                autogenerate: None,
                attrs: None,
                badge: None,
                collapsed: None,
            }),
            Err(SidebarItemError::NoTarget("Orphan".to_string()))
        );
    }

    #[test]
    fn collapsed_leaf_is_rejected() {
        let err = parse_item(
            r#"
[[sidebar]]
label = "Hub"
link = "https://jbcom.github.io"
collapsed = true
"#,
        )
        .unwrap_err();

        assert!(
            err.contains("sidebar item \"Hub\": `collapsed` only applies to groups"),
            "{}",
            err
        );
    }

    #[test]
    fn slug_href_normalises_slashes() {
        assert_eq!(slug_href("packages"), "/packages/");
        assert_eq!(slug_href("/core/data-types/"), "/core/data-types/");
        assert_eq!(slug_href(""), "/");
    }
}
