// src/dot.rs
//! Graphviz rendering of any [`TreeNode`] tree.

use crate::tree::{Child, TreeNode};
use std::fmt::{self, Write};

const NODE_STYLE: &str = "shape=box, style=\"rounded,filled\", fillcolor=skyblue";
const LEAF_STYLE: &str = "shape=box, style=filled, fillcolor=sandybrown";

struct DotWriter {
    out: String,
    next_id: usize,
}

impl DotWriter {
    fn fresh_id(&mut self) -> String {
        self.next_id += 1;
        format!("node{}", self.next_id)
    }

    fn declare(&mut self, id: &str, label: &str, style: &str) -> fmt::Result {
        writeln!(self.out, "  {} [label=\"{}\", {}];", id, escape(label), style)
    }

    fn edge(&mut self, from: &str, to: &str, label: Option<&str>) -> fmt::Result {
        match label {
            Some(label) => writeln!(self.out, "  {} -> {} [label=\"{}\"];", from, to, escape(label)),
            None => writeln!(self.out, "  {} -> {};", from, to),
        }
    }

    fn node(&mut self, node: &dyn TreeNode) -> Result<String, fmt::Error> {
        let id = self.fresh_id();
        self.declare(&id, node.kind(), NODE_STYLE)?;

        for (field, child) in node.children() {
            match child {
                Child::Absent => {}
                Child::Leaf(value) => {
                    let leaf_id = self.fresh_id();
                    self.declare(&leaf_id, &value, LEAF_STYLE)?;
                    self.edge(&id, &leaf_id, Some(field))?;
                }
                Child::Node(inner) => {
                    let inner_id = self.node(inner)?;
                    self.edge(&id, &inner_id, Some(field))?;
                }
                Child::List(items) => {
                    let list_id = self.fresh_id();
                    self.declare(&list_id, &format!("list_{}", field), "shape=ellipse")?;
                    self.edge(&id, &list_id, Some(field))?;
                    for item in items {
                        let item_id = self.node(item)?;
                        self.edge(&list_id, &item_id, None)?;
                    }
                }
            }
        }
        Ok(id)
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Renders the tree rooted at `root` as a `digraph AST` document.
pub fn render_dot(root: &dyn TreeNode) -> Result<String, fmt::Error> {
    let mut writer = DotWriter { out: String::new(), next_id: 0 };
    writeln!(writer.out, "digraph AST {{")?;
    writeln!(writer.out, "  node [fontname=\"helvetica\"];")?;
    writeln!(writer.out, "  edge [fontname=\"helvetica\", fontsize=10];")?;
    writer.node(root)?;
    writeln!(writer.out, "}}")?;
    Ok(writer.out)
}
