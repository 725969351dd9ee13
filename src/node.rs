/// A single node of a tree.
///
/// Nodes are stored in an arena owned by the [`Tree`](crate::Tree) and the
/// `id` of a node is its position in that arena. Children are referenced by
/// id, so the only link in the structure is from parent to child.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: usize,
    pub(crate) level: usize,
    pub(crate) kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A terminal node holding the row indices of the points routed here.
    Leaf { indices: Vec<usize> },
    /// A split on the projected dimension `level % ncols`.
    ///
    /// Projected values strictly less than `threshold` go `left`, all others
    /// (including equal values) go `right`.
    Internal {
        threshold: f64,
        left: usize,
        right: usize,
    },
}

impl Node {
    pub(crate) fn leaf(id: usize, level: usize, indices: Vec<usize>) -> Self {
        Self {
            id,
            level,
            kind: NodeKind::Leaf { indices },
        }
    }

    pub(crate) fn internal(
        id: usize,
        level: usize,
        threshold: f64,
        left: usize,
        right: usize,
    ) -> Self {
        Self {
            id,
            level,
            kind: NodeKind::Internal {
                threshold,
                left,
                right,
            },
        }
    }

    /// The id of this node, unique within its tree and assigned in discovery order.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The depth of this node. The root is at level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        match self.kind {
            NodeKind::Leaf { .. } => true,
            NodeKind::Internal { .. } => false,
        }
    }

    /// The split value of an internal node.
    pub fn threshold(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Internal { threshold, .. } => Some(threshold),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// The point indices retained by a leaf.
    pub fn indices(&self) -> Option<&[usize]> {
        match &self.kind {
            NodeKind::Leaf { indices } => Some(indices),
            NodeKind::Internal { .. } => None,
        }
    }

    /// The ids of the `(left, right)` children of an internal node.
    pub fn children(&self) -> Option<(usize, usize)> {
        match self.kind {
            NodeKind::Internal { left, right, .. } => Some((left, right)),
            NodeKind::Leaf { .. } => None,
        }
    }
}

/// The `|-` prefix used to indent diagnostics by tree level.
pub(crate) fn indent(level: usize) -> String {
    "|-".repeat(level)
}
