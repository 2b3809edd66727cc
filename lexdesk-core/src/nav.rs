//! Sidebar navigation as a typed tree.
//!
//! Every node is either a link to a route or a labelled group of further
//! nodes. A single recursive walk turns the tree into depth-annotated rows
//! for rendering.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NavNode {
    Link { label: String, path: String },
    Group { label: String, children: Vec<NavNode> },
}

impl NavNode {
    pub fn link(label: &str, path: &str) -> Self {
        Self::Link {
            label: label.into(),
            path: path.into(),
        }
    }

    pub fn group(label: &str, children: Vec<NavNode>) -> Self {
        Self::Group {
            label: label.into(),
            children,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Link { label, .. } | Self::Group { label, .. } => label,
        }
    }
}

/// One rendered row of the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry<'a> {
    pub depth: usize,
    pub label: &'a str,
    /// `None` for group headers.
    pub path: Option<&'a str>,
}

/// The application's navigation.
pub fn default_tree() -> Vec<NavNode> {
    vec![
        NavNode::link("Dashboard", "/"),
        NavNode::link("Personal Assistant", "/assistant"),
        NavNode::group(
            "Practice",
            vec![
                NavNode::link("Tasks", "/tasks"),
                NavNode::link("Cases", "/cases"),
                NavNode::link("Clients", "/clients"),
                NavNode::link("Contacts", "/contacts"),
            ],
        ),
        NavNode::group(
            "Communication",
            vec![
                NavNode::link("Calls", "/calls"),
                NavNode::link("Channels", "/channels"),
                NavNode::link("Notifications", "/notifications"),
            ],
        ),
        NavNode::group(
            "AI Agents",
            vec![
                NavNode::link("Agent Builder", "/agents/builder"),
                NavNode::link("Spaces", "/spaces"),
            ],
        ),
    ]
}

/// Depth-first flattening, groups before their children.
pub fn flatten(nodes: &[NavNode]) -> Vec<NavEntry<'_>> {
    fn walk<'a>(nodes: &'a [NavNode], depth: usize, out: &mut Vec<NavEntry<'a>>) {
        for node in nodes {
            match node {
                NavNode::Link { label, path } => out.push(NavEntry {
                    depth,
                    label,
                    path: Some(path),
                }),
                NavNode::Group { label, children } => {
                    out.push(NavEntry {
                        depth,
                        label,
                        path: None,
                    });
                    walk(children, depth + 1, out);
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(nodes, 0, &mut out);
    out
}

/// Labels from the root down to the link whose path is `path`.
pub fn active_trail<'a>(nodes: &'a [NavNode], path: &str) -> Option<Vec<&'a str>> {
    for node in nodes {
        match node {
            NavNode::Link { label, path: p } if p == path => return Some(vec![label.as_str()]),
            NavNode::Link { .. } => {}
            NavNode::Group { label, children } => {
                if let Some(mut trail) = active_trail(children, path) {
                    trail.insert(0, label.as_str());
                    return Some(trail);
                }
            }
        }
    }
    None
}

/// Indented plain-text outline, one row per entry.
pub fn render_outline(nodes: &[NavNode]) -> String {
    flatten(nodes)
        .iter()
        .map(|entry| {
            let indent = "  ".repeat(entry.depth);
            match entry.path {
                Some(path) => format!("{indent}{}  {path}", entry.label),
                None => format!("{indent}{}/", entry.label),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_places_children_under_their_group() {
        let tree = vec![
            NavNode::link("Home", "/"),
            NavNode::group("Work", vec![NavNode::link("Tasks", "/tasks")]),
        ];
        let rows = flatten(&tree);
        assert_eq!(
            rows,
            vec![
                NavEntry { depth: 0, label: "Home", path: Some("/") },
                NavEntry { depth: 0, label: "Work", path: None },
                NavEntry { depth: 1, label: "Tasks", path: Some("/tasks") },
            ]
        );
    }

    #[test]
    fn active_trail_walks_nested_groups() {
        let tree = vec![NavNode::group(
            "Outer",
            vec![NavNode::group("Inner", vec![NavNode::link("Leaf", "/leaf")])],
        )];
        assert_eq!(active_trail(&tree, "/leaf"), Some(vec!["Outer", "Inner", "Leaf"]));
        assert_eq!(active_trail(&tree, "/missing"), None);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(NavNode::link("Cases", "/cases")).unwrap();
        assert_eq!(json["kind"], "link");
        assert_eq!(json["path"], "/cases");
    }

    #[test]
    fn default_tree_links_are_unique() {
        let tree = default_tree();
        let mut paths: Vec<_> = flatten(&tree).into_iter().filter_map(|e| e.path).collect();
        let total = paths.len();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), total);
    }

    #[test]
    fn outline_indents_by_depth() {
        let tree = vec![NavNode::group("Work", vec![NavNode::link("Tasks", "/tasks")])];
        assert_eq!(render_outline(&tree), "Work/\n  Tasks  /tasks");
    }
}
