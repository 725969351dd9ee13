use crate::node::{indent, Node, NodeKind};
use itertools::Itertools;
use std::collections::VecDeque;
use std::fmt;

/// What the breadth-first walk reports about one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visit<'a> {
    Internal {
        id: usize,
        level: usize,
        /// The projected dimension this node splits on.
        dimension: usize,
        threshold: f64,
    },
    Leaf {
        id: usize,
        level: usize,
        indices: &'a [usize],
    },
}

impl<'a> Visit<'a> {
    pub fn id(&self) -> usize {
        match *self {
            Visit::Internal { id, .. } | Visit::Leaf { id, .. } => id,
        }
    }

    pub fn level(&self) -> usize {
        match *self {
            Visit::Internal { level, .. } | Visit::Leaf { level, .. } => level,
        }
    }

    pub fn is_leaf(&self) -> bool {
        match self {
            Visit::Leaf { .. } => true,
            Visit::Internal { .. } => false,
        }
    }
}

impl<'a> fmt::Display for Visit<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let level = self.level();
        write!(
            f,
            "{}L {}: leaf?{}, id:{} --> ",
            indent(level),
            level,
            self.is_leaf() as u8,
            self.id()
        )?;
        match self {
            Visit::Internal {
                dimension,
                threshold,
                ..
            } => write!(f, "New col:{}, val:{}", dimension, threshold),
            Visit::Leaf { indices, .. } => write!(f, "pidxs:[{}]", indices.iter().join(", ")),
        }
    }
}

/// Breadth-first iterator over the nodes of a tree: level by level, and
/// left before right within a level.
#[derive(Debug, Clone)]
pub struct Traverse<'a> {
    nodes: &'a [Node],
    ncols: usize,
    queue: VecDeque<usize>,
}

impl<'a> Traverse<'a> {
    pub(crate) fn new(nodes: &'a [Node], ncols: usize) -> Self {
        let mut queue = VecDeque::new();
        if !nodes.is_empty() {
            queue.push_back(0);
        }
        Self {
            nodes,
            ncols,
            queue,
        }
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Visit<'a>> {
        let nodes = self.nodes;
        let node = &nodes[self.queue.pop_front()?];
        Some(match &node.kind {
            NodeKind::Leaf { indices } => Visit::Leaf {
                id: node.id,
                level: node.level,
                indices,
            },
            NodeKind::Internal {
                threshold,
                left,
                right,
            } => {
                self.queue.push_back(*left);
                self.queue.push_back(*right);
                Visit::Internal {
                    id: node.id,
                    level: node.level,
                    dimension: node.level % self.ncols,
                    threshold: *threshold,
                }
            }
        })
    }
}
