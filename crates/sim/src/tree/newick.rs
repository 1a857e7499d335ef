//! Newick reading and writing.
//!
//! Trees are written in the "format 1" flavour: every node, internal ones
//! included, carries its label and branch length. The root writes its label
//! and the length of the stem from the origin, e.g.
//!
//! ```text
//! ((t3:1,t5:0.8)n1:2);
//! ```
//!
//! becomes `(t3:1,t5:0.8)n1:2;` for a root `n1` with stem 2.

use crate::errors::TreeError;
use crate::tree::{Node, NodeId, NodeKind, PhyloTree};

const SPECIAL: &[char] = &['(', ')', '[', ']', '\'', ':', ';', ',', ' ', '\t', '\n'];

/// Serialize `tree` as a single-line Newick string terminated by `;`.
pub fn write_newick(tree: &PhyloTree) -> String {
    enum Step {
        Open(NodeId),
        Close(NodeId),
        Comma,
    }

    let mut out = String::with_capacity(tree.len() * 16);
    let mut stack = vec![Step::Open(tree.root())];
    while let Some(step) = stack.pop() {
        match step {
            Step::Open(id) if tree.node(id).is_leaf() => push_node(tree, id, &mut out),
            Step::Open(id) => {
                out.push('(');
                stack.push(Step::Close(id));
                for (i, &child) in tree.node(id).children.iter().enumerate().rev() {
                    stack.push(Step::Open(child));
                    if i > 0 {
                        stack.push(Step::Comma);
                    }
                }
            }
            Step::Close(id) => {
                out.push(')');
                push_node(tree, id, &mut out);
            }
            Step::Comma => out.push(','),
        }
    }
    out.push(';');
    out
}

fn push_node(tree: &PhyloTree, id: NodeId, out: &mut String) {
    push_label(&tree.node(id).label, out);
    out.push(':');
    out.push_str(&tree.branch_length(id).to_string());
}

fn push_label(label: &str, out: &mut String) {
    if label.contains(SPECIAL) {
        out.push('\'');
        out.push_str(&label.replace('\'', "''"));
        out.push('\'');
    } else {
        out.push_str(label);
    }
}

/// Parse a Newick string into a `PhyloTree`.
///
/// Branch lengths are converted to node times by placing the deepest leaf at
/// the present; the origin sits one root-stem length above the root.
/// Leaves get `NodeKind::Tip` since Newick does not carry sampling status.
pub fn parse_newick(input: &str) -> Result<PhyloTree, TreeError> {
    let mut parser = Parser {
        bytes: input.as_bytes(),
        pos: 0,
        nodes: Vec::new(),
        lengths: Vec::new(),
    };
    let root = parser.tree()?;
    parser.skip_ignored();
    parser.expect(b';')?;
    parser.skip_ignored();
    if parser.pos != parser.bytes.len() {
        return Err(parser.error("trailing characters after ';'"));
    }

    let Parser {
        mut nodes, lengths, ..
    } = parser;

    // Depth from the root, then flip to time before present.
    let mut depth = vec![0.0; nodes.len()];
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        for &child in &nodes[id].children {
            depth[child] = depth[id] + lengths[child];
            stack.push(child);
        }
    }
    let max_depth = depth.iter().copied().fold(0.0, f64::max);
    for (node, d) in nodes.iter_mut().zip(&depth) {
        node.time = max_depth - d;
    }
    let origin = nodes[root].time + lengths[root];

    PhyloTree::from_nodes(nodes, root, origin)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    nodes: Vec<Node>,
    lengths: Vec<f64>,
}

impl Parser<'_> {
    /// Read nodes in preorder. `open` holds the internal nodes whose child
    /// lists are still being read.
    fn tree(&mut self) -> Result<NodeId, TreeError> {
        let root = self.push_node(None);
        let mut current = root;
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            self.skip_ignored();
            if self.peek() == Some(b'(') {
                self.pos += 1;
                self.nodes[current].kind = NodeKind::Internal;
                open.push(current);
                current = self.push_node(Some(current));
                continue;
            }

            self.finish_node(current)?;
            loop {
                let Some(&parent) = open.last() else {
                    return Ok(root);
                };
                self.skip_ignored();
                match self.peek() {
                    Some(b',') => {
                        self.pos += 1;
                        current = self.push_node(Some(parent));
                        break;
                    }
                    Some(b')') => {
                        self.pos += 1;
                        open.pop();
                        self.finish_node(parent)?;
                    }
                    _ => return Err(self.error("expected ',' or ')'")),
                }
            }
        }
    }

    fn push_node(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            label: String::new(),
            parent,
            children: Vec::new(),
            time: 0.0,
            kind: NodeKind::Tip,
        });
        self.lengths.push(0.0);
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    /// Label and optional `:length` after a leaf or a closing parenthesis.
    fn finish_node(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.skip_ignored();
        self.nodes[id].label = self.label()?;
        self.skip_ignored();
        if self.peek() == Some(b':') {
            self.pos += 1;
            self.skip_ignored();
            self.lengths[id] = self.number()?;
        }
        Ok(())
    }

    fn label(&mut self) -> Result<String, TreeError> {
        if self.peek() == Some(b'\'') {
            self.pos += 1;
            let mut label = String::new();
            loop {
                match self.peek() {
                    None => return Err(self.error("unterminated quoted label")),
                    Some(b'\'') if self.bytes.get(self.pos + 1) == Some(&b'\'') => {
                        label.push('\'');
                        self.pos += 2;
                    }
                    Some(b'\'') => {
                        self.pos += 1;
                        return Ok(label);
                    }
                    Some(_) => {
                        let start = self.pos;
                        while self.peek().is_some_and(|b| b != b'\'') {
                            self.pos += 1;
                        }
                        label.push_str(&String::from_utf8_lossy(&self.bytes[start..self.pos]));
                    }
                }
            }
        }

        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !SPECIAL.contains(&(b as char)))
        {
            self.pos += 1;
        }
        Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }

    fn number(&mut self) -> Result<f64, TreeError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
        {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| self.error("invalid branch length"))?;
        text.parse::<f64>()
            .map_err(|_| self.error(&format!("invalid branch length '{text}'")))
    }

    fn skip_ignored(&mut self) {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'[') => {
                    while self.peek().is_some_and(|b| b != b']') {
                        self.pos += 1;
                    }
                    if self.peek().is_some() {
                        self.pos += 1;
                    }
                }
                _ => return,
            }
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), TreeError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn error(&self, message: &str) -> TreeError {
        TreeError::Parse {
            position: self.pos,
            message: message.to_string(),
        }
    }
}
