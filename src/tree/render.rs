//! Plain-text folder tree output.

use std::fmt::Write;

use super::draft::{FolderNode, FolderTree};

/// Render `tree` under a `title` line.
///
/// ```text
/// Clientes (3 subfolders)
/// ├── A (1)
/// │   └── A1
/// └── B
/// ```
pub fn render_tree(title: &str, tree: &FolderTree) -> String {
    let mut out = String::new();
    let total = tree.count_total();
    let _ = match total {
        0 => writeln!(out, "{title}"),
        1 => writeln!(out, "{title} (1 subfolder)"),
        n => writeln!(out, "{title} ({n} subfolders)"),
    };
    render_level(&mut out, tree.nodes(), "");
    out
}

fn render_level(out: &mut String, nodes: &[FolderNode], prefix: &str) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let branch = if last { "└── " } else { "├── " };
        let _ = if node.subfolders.is_empty() {
            writeln!(out, "{prefix}{branch}{}", node.name)
        } else {
            writeln!(out, "{prefix}{branch}{} ({})", node.name, node.subfolders.len())
        };
        let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
        render_level(out, &node.subfolders, &child_prefix);
    }
}
