use crate::node::{indent, Node, NodeKind};
use crate::partition::{MedianSplit, Partition, Partitioner};
use crate::projection::{ProjectedData, Projection};
use crate::traverse::Traverse;
use crate::{Error, Result};
use itertools::Itertools;
use log::{info, trace};
use ndarray::{ArrayView1, ArrayView2};
use rand::Rng;
use std::collections::VecDeque;

/// Hyper-parameters for building a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// The largest number of points a leaf may hold.
    pub leaf_size: usize,
}

impl TreeParams {
    pub fn new(leaf_size: usize) -> Self {
        Self { leaf_size }
    }
}

impl Default for TreeParams {
    fn default() -> Self {
        Self { leaf_size: 10 }
    }
}

/// A k-d tree built over randomly projected points.
///
/// Level `l` of the tree always splits on projected dimension `l % ncols`.
/// The projection used to build the tree is kept inside it and reused for
/// every query, so queries and points are always projected alike.
#[derive(Debug, Clone)]
pub struct Tree<P> {
    /// Every node, indexed by id. The root is always `nodes[0]`.
    nodes: Vec<Node>,
    projection: P,
    ncols: usize,
    len: usize,
}

/// A node whose candidates have not been partitioned yet.
struct Work {
    id: usize,
    level: usize,
    indices: Vec<usize>,
}

/// Breadth-first construction state.
///
/// Ids are handed out when a node is queued and the queue is first-in
/// first-out, so nodes are finished in id order and `nodes.len()` is always
/// the id of the next node to finish.
struct Builder<'a> {
    projected: &'a ProjectedData,
    leaf_size: usize,
    queue: VecDeque<Work>,
    nodes: Vec<Node>,
    next_id: usize,
}

impl<'a> Builder<'a> {
    fn new(projected: &'a ProjectedData, leaf_size: usize) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(Work {
            id: 0,
            level: 0,
            indices: (0..projected.nrows()).collect(),
        });
        Self {
            projected,
            leaf_size,
            queue,
            nodes: vec![],
            next_id: 1,
        }
    }

    fn run(mut self, partitioner: &impl Partitioner) -> Vec<Node> {
        while let Some(work) = self.queue.pop_front() {
            trace!(
                "{}level {}, node {}, {} points",
                indent(work.level),
                work.level,
                work.id,
                work.indices.len()
            );
            let values = self.projected.gather(work.level, &work.indices);
            let partition = partitioner.partition(self.leaf_size, &values, &work.indices);
            self.split_node(work, partition);
        }
        self.nodes
    }

    /// Records the node described by `work` and queues its children, if any.
    fn split_node(&mut self, work: Work, partition: Partition) {
        let Work { id, level, indices } = work;
        debug_assert_eq!(id, self.nodes.len());
        let node = match partition {
            Partition::Leaf => Node::leaf(id, level, indices),
            Partition::Split {
                threshold,
                left,
                right,
            } => {
                assert!(
                    !left.is_empty() && !right.is_empty(),
                    "rpkd::Tree::build(): partitioner produced an empty side for node {} \
                     ({} left, {} right)",
                    id,
                    left.len(),
                    right.len(),
                );
                assert!(
                    left.iter().chain(&right).sorted().eq(indices.iter().sorted()),
                    "rpkd::Tree::build(): partitioner lost or duplicated points of node {}",
                    id
                );
                let (left_id, right_id) = (self.next_id, self.next_id + 1);
                self.next_id += 2;
                self.queue.push_back(Work {
                    id: left_id,
                    level: level + 1,
                    indices: left,
                });
                self.queue.push_back(Work {
                    id: right_id,
                    level: level + 1,
                    indices: right,
                });
                Node::internal(id, level, threshold, left_id, right_id)
            }
        };
        self.nodes.push(node);
    }
}

impl<P> Tree<P>
where
    P: Projection,
{
    /// Draws a fresh projection from `rng` and builds a tree over the rows of
    /// `data`, splitting nodes at the median.
    ///
    /// An empty `data`, or one with no more than `leaf_size` rows, gives a tree
    /// with a single leaf. A `data` without columns is rejected with
    /// [`Error::NoDimensions`] even if it also has no rows, since there is no
    /// dimension to project to.
    pub fn build<R>(data: ArrayView2<'_, f64>, params: &TreeParams, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let projection = P::prepare(data, rng)?;
        Self::build_with(data, params, projection, &MedianSplit)
    }

    /// Builds a tree using the given projection parameters and split policy.
    pub fn build_with(
        data: ArrayView2<'_, f64>,
        params: &TreeParams,
        projection: P,
        partitioner: &impl Partitioner,
    ) -> Result<Self> {
        if params.leaf_size == 0 {
            return Err(Error::InvalidLeafSize);
        }
        info!(
            "building k-d tree with {} projection on {} points in {} dims; max leaf size: {}",
            P::STRATEGY,
            data.nrows(),
            data.ncols(),
            params.leaf_size
        );
        let projected = projection.project_matrix(data)?;
        let nodes = Builder::new(&projected, params.leaf_size).run(partitioner);
        Ok(Self {
            nodes,
            ncols: projection.ncols(),
            projection,
            len: data.nrows(),
        })
    }

    /// Finds the candidate neighbors of `query`: the points of the leaf its
    /// single root-to-leaf descent ends in.
    pub fn search(&self, query: ArrayView1<'_, f64>) -> Result<&[usize]> {
        match &self.search_leaf(query)?.kind {
            NodeKind::Leaf { indices } => Ok(indices.as_slice()),
            NodeKind::Internal { .. } => {
                unreachable!("rpkd::Tree::search(): descent ended on an internal node")
            }
        }
    }

    /// Finds the leaf that `query` descends to.
    ///
    /// At every internal node the projected value for that level is compared
    /// to the threshold. Strictly less goes left, anything else goes right.
    pub fn search_leaf(&self, query: ArrayView1<'_, f64>) -> Result<&Node> {
        let projected = self.projection.project_query(query)?;
        let mut node = self.root();
        while let NodeKind::Internal {
            threshold,
            left,
            right,
        } = node.kind
        {
            let value = projected[self.dimension(node.level)];
            node = if value < threshold {
                &self.nodes[left]
            } else {
                &self.nodes[right]
            };
        }
        trace!("search reached node {} at level {}", node.id, node.level);
        Ok(node)
    }

    /// Logs the projection parameters and then every node in breadth-first order.
    pub fn log_tree(&self) {
        info!("{}", self.projection);
        for visit in self.traverse() {
            info!("{}", visit);
        }
    }
}

impl<P> Tree<P> {
    /// Walks every node breadth-first.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse::new(&self.nodes, self.ncols())
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Gets a node by id.
    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// All nodes in id order, which is also breadth-first order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// The level of the deepest node.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(Node::level).max().unwrap_or(0)
    }

    /// The number of points the tree was built over.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of projected dimensions.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// The projected dimension that nodes at `level` split on.
    pub fn dimension(&self, level: usize) -> usize {
        level % self.ncols
    }
}
