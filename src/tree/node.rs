use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::error::TreeError;

pub type NodeId = u64;

/// One entry of the displayed hierarchy. The `id` must be unique across the
/// whole hierarchy and stable for the node's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// A tree file holds either a single root or a list of roots.
#[derive(Deserialize)]
#[serde(untagged)]
enum TreeFile {
    Many(Vec<Node>),
    One(Node),
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            children: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Build a forest from slash separated tag paths such as
    /// `/CompSci/Programming Languages/Java`. Shared prefixes merge into one
    /// node; ids are handed out in creation order starting at zero.
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Vec<Node> {
        let mut roots: Vec<Node> = Vec::new();
        let mut next_id: NodeId = 0;

        for path in paths {
            let mut level = &mut roots;
            for segment in path.as_ref().split('/').filter(|s| !s.is_empty()) {
                let pos = match level.iter().position(|n| n.name == segment) {
                    Some(pos) => pos,
                    None => {
                        level.push(Node::new(next_id, segment));
                        next_id += 1;
                        level.len() - 1
                    }
                };
                level = &mut level[pos].children;
            }
        }

        roots
    }

    /// Depth-first, pre-order walk over `roots` yielding `(level, node)`.
    pub fn walk(roots: &[Node]) -> Vec<(usize, &Node)> {
        fn visit<'a>(nodes: &'a [Node], level: usize, out: &mut Vec<(usize, &'a Node)>) {
            for node in nodes {
                out.push((level, node));
                visit(&node.children, level + 1, out);
            }
        }

        let mut out = Vec::new();
        visit(roots, 0, &mut out);
        out
    }

    pub fn find(roots: &[Node], id: NodeId) -> Option<&Node> {
        for node in roots {
            if node.id == id {
                return Some(node);
            }
            if let Some(found) = Node::find(&node.children, id) {
                return Some(found);
            }
        }
        None
    }

    pub fn parent_of(roots: &[Node], id: NodeId) -> Option<&Node> {
        for node in roots {
            if node.children.iter().any(|c| c.id == id) {
                return Some(node);
            }
            if let Some(parent) = Node::parent_of(&node.children, id) {
                return Some(parent);
            }
        }
        None
    }

    pub fn validate_unique_ids(roots: &[Node]) -> Result<(), TreeError> {
        let mut seen = HashSet::new();
        for (_, node) in Node::walk(roots) {
            if !seen.insert(node.id) {
                return Err(TreeError::DuplicateId { id: node.id });
            }
        }
        Ok(())
    }

    pub fn parse_json(text: &str) -> Result<Vec<Node>> {
        let roots = match serde_json::from_str::<TreeFile>(text)
            .context("tree file is not a node or a list of nodes")?
        {
            TreeFile::Many(roots) => roots,
            TreeFile::One(root) => vec![root],
        };
        Node::validate_unique_ids(&roots)?;
        Ok(roots)
    }

    pub fn load(path: &Path) -> Result<Vec<Node>> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tree file {}", path.display()))?;
        let roots = Node::parse_json(&text)
            .with_context(|| format!("failed to parse tree file {}", path.display()))?;
        log::info!(
            "tree: loaded {} nodes from {}",
            Node::walk(&roots).len(),
            path.display()
        );
        Ok(roots)
    }
}

pub fn demo_tree() -> Vec<Node> {
    Node::from_paths(&[
        "/CompSci/Google",
        "/CompSci/Linux",
        "/CompSci/Microsoft",
        "/CompSci/Programming Languages/C++",
        "/CompSci/Programming Languages/Java",
        "/History/WWII",
        "/History/United States/WWII",
    ])
}
