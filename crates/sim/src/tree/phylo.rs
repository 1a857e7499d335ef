use serde::{Deserialize, Serialize};

use crate::errors::TreeError;

/// Index of a node inside its `PhyloTree` arena.
pub type NodeId = usize;

/// What happened at a node of a simulated tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Branching point (birth, or the attachment point of a sampled ancestor).
    Internal,
    /// Lineage alive at present and sampled with probability rho.
    RhoSampled,
    /// Lineage psi-sampled and removed.
    PsiSampled,
    /// Zero-length leaf marking a psi-sampling without removal.
    SampledAncestor,
    /// Lineage died without being sampled.
    Extinct,
    /// Lineage removed after an unsequenced omega occurrence.
    OccurrenceRemoved,
    /// Lineage alive at present but not sampled.
    Unsampled,
    /// Leaf of a tree read from disk, sampling status unknown.
    Tip,
}

impl NodeKind {
    /// True for leaves that carry a sequence in the reconstructed tree.
    #[inline]
    pub fn is_sampled(self) -> bool {
        matches!(
            self,
            Self::RhoSampled | Self::PsiSampled | Self::SampledAncestor | Self::Tip
        )
    }

    /// Status label used in taxa files and Nexus taxon sets.
    pub fn status(self) -> Option<&'static str> {
        match self {
            Self::RhoSampled => Some("extant"),
            Self::PsiSampled => Some("extinct"),
            Self::SampledAncestor => Some("ancestor"),
            _ => None,
        }
    }

    /// Sampling scheme that produced a sampled leaf.
    pub fn sampling(self) -> Option<&'static str> {
        match self {
            Self::RhoSampled => Some("rho"),
            Self::PsiSampled | Self::SampledAncestor => Some("psi"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub label: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Time before present.
    pub time: f64,
    pub kind: NodeKind,
}

impl Node {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Rooted, ordered tree with node times measured backwards from the present.
///
/// Nodes live in an arena; children keep the order in which they were
/// attached, which is also the order used when writing Newick. The process
/// starts at `origin`, so the root edge has length `origin - root.time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhyloTree {
    nodes: Vec<Node>,
    root: NodeId,
    origin: f64,
}

impl PhyloTree {
    /// Build a tree from an arena whose parent/children links are already
    /// consistent.
    pub fn from_nodes(nodes: Vec<Node>, root: NodeId, origin: f64) -> Result<Self, TreeError> {
        if root >= nodes.len() {
            return Err(TreeError::Empty);
        }
        Ok(Self {
            nodes,
            root,
            origin,
        })
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn origin(&self) -> f64 {
        self.origin
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Length of the edge above `id`. For the root this is the stem from the
    /// origin.
    pub fn branch_length(&self, id: NodeId) -> f64 {
        let node = &self.nodes[id];
        match node.parent {
            Some(parent) => self.nodes[parent].time - node.time,
            None => self.origin - node.time,
        }
    }

    /// Node ids in preorder (parent before children, children left to right).
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// Node ids in postorder (children before parent).
    pub fn postorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter());
        }
        order.reverse();
        order
    }

    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| self.nodes[id].is_leaf())
            .collect()
    }

    pub fn leaf_labels(&self) -> Vec<&str> {
        self.leaves()
            .into_iter()
            .map(|id| self.nodes[id].label.as_str())
            .collect()
    }

    /// Leaves of the given kind, left to right.
    pub fn leaves_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.leaves()
            .into_iter()
            .filter(|&id| self.nodes[id].kind == kind)
            .collect()
    }

    /// Sum of all branch lengths, root stem included.
    pub fn total_length(&self) -> f64 {
        (0..self.nodes.len()).map(|id| self.branch_length(id)).sum()
    }

    /// Prune to sampled leaves and collapse the resulting unary nodes.
    ///
    /// Retained nodes keep their labels, times and kinds, so every leaf of
    /// the result is also a leaf of `self`. Returns `None` when no leaf is
    /// sampled.
    pub fn reconstructed(&self) -> Option<PhyloTree> {
        let mut mapped: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        let mut nodes: Vec<Node> = Vec::new();

        for id in self.postorder() {
            let node = &self.nodes[id];
            if node.is_leaf() {
                if node.kind.is_sampled() {
                    mapped[id] = Some(nodes.len());
                    nodes.push(Node {
                        children: Vec::new(),
                        parent: None,
                        ..node.clone()
                    });
                }
                continue;
            }

            let kept: Vec<NodeId> = node.children.iter().filter_map(|&c| mapped[c]).collect();
            mapped[id] = match kept.len() {
                0 => None,
                1 => Some(kept[0]),
                _ => {
                    let new_id = nodes.len();
                    for &child in &kept {
                        nodes[child].parent = Some(new_id);
                    }
                    nodes.push(Node {
                        label: node.label.clone(),
                        parent: None,
                        children: kept,
                        time: node.time,
                        kind: node.kind,
                    });
                    Some(new_id)
                }
            };
        }

        let root = mapped[self.root]?;
        Some(PhyloTree {
            nodes,
            root,
            origin: self.origin,
        })
    }
}
