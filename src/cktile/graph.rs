//! Transform flow graph assembly
//!
//! Replays a pipeline against a map of "live" hidden dimensions to recover
//! the data dependencies between bottom anchors, transforms, the dimensions
//! they produce, and the top anchors.
//!
//! The live map starts with one entry per bottom dimension. For each
//! transform, in declaration order:
//!
//! - every `lower` index that is live gets an edge from its producer and is
//!   consumed (removed from the map);
//! - a transform with no `lower` indices (`replicate`) draws from the first
//!   bottom dimension that no transform has claimed yet. The bottom stays
//!   live, so a later transform may still consume it;
//! - every `upper` index gets a fresh dimension node that becomes its live
//!   producer.
//!
//! Top anchors are connected to whatever produces them at the end. Indices
//! with no live producer are left unconnected: the input comes from heuristic
//! parsing and a partial graph is still worth drawing.

use crate::cktile::pipeline::{DimensionIndex, TransformKind, TransformPipeline};
use serde::Serialize;
use std::collections::HashMap;

/// Index into [`TransformGraph::nodes`]
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Storage-facing anchor
    Bottom { dim: DimensionIndex },
    /// The `index`-th transform of the pipeline
    Transform {
        index: usize,
        transform: TransformKind,
        lower: Vec<DimensionIndex>,
        upper: Vec<DimensionIndex>,
    },
    /// Dimension produced by transform `transform` in its `slot`-th upper position
    Dimension {
        transform: usize,
        slot: usize,
        dim: DimensionIndex,
    },
    /// Logical-facing anchor
    Top { dim: DimensionIndex },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

/// Directed flow graph from bottom to top dimensions
///
/// Nodes are stored in creation order: bottoms, then each transform followed
/// by its produced dimensions, then tops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl TransformGraph {
    /// Assemble the graph from parallel per-transform lists
    ///
    /// `kinds` decides how many transforms there are; missing `lower` or
    /// `upper` entries count as empty.
    pub fn build(
        kinds: &[TransformKind],
        lower: &[Vec<DimensionIndex>],
        upper: &[Vec<DimensionIndex>],
        bottom: &[DimensionIndex],
        top: &[DimensionIndex],
    ) -> Self {
        let mut graph = TransformGraph::default();
        let mut live: HashMap<DimensionIndex, NodeId> = HashMap::new();
        let mut unclaimed: Vec<DimensionIndex> = bottom.to_vec();

        for &dim in bottom {
            let id = graph.add_node(Node::Bottom { dim });
            live.insert(dim, id);
        }

        for (index, &transform) in kinds.iter().enumerate() {
            let lower = lower.get(index).map(Vec::as_slice).unwrap_or(&[]);
            let upper = upper.get(index).map(Vec::as_slice).unwrap_or(&[]);

            let node = graph.add_node(Node::Transform {
                index,
                transform,
                lower: lower.to_vec(),
                upper: upper.to_vec(),
            });

            if lower.is_empty() {
                let claim = unclaimed.iter().position(|dim| live.contains_key(dim));
                if let Some(pos) = claim {
                    let dim = unclaimed.remove(pos);
                    if let Some(&producer) = live.get(&dim) {
                        graph.add_edge(producer, node);
                        tracing::trace!(transform = index, dim = dim, "implicit bottom binding");
                    }
                }
            } else {
                for dim in lower {
                    match live.remove(dim) {
                        Some(producer) => graph.add_edge(producer, node),
                        None => tracing::debug!(
                            transform = index,
                            dim = *dim,
                            "lower dimension has no live producer"
                        ),
                    }
                    unclaimed.retain(|d| d != dim);
                }
            }

            for (slot, &dim) in upper.iter().enumerate() {
                let produced = graph.add_node(Node::Dimension {
                    transform: index,
                    slot,
                    dim,
                });
                graph.add_edge(node, produced);
                live.insert(dim, produced);
            }
        }

        for &dim in top {
            let id = graph.add_node(Node::Top { dim });
            match live.get(&dim) {
                Some(&producer) => graph.add_edge(producer, id),
                None => tracing::debug!(dim = dim, "top dimension is not reachable"),
            }
        }

        graph
    }

    pub fn from_pipeline(pipeline: &TransformPipeline) -> Self {
        Self::build(
            &pipeline.kinds(),
            &pipeline.lower_dims(),
            &pipeline.upper_dims(),
            &pipeline.bottom_dims,
            &pipeline.top_dims,
        )
    }

    fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.edges.push(Edge { from, to });
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Producers feeding `id`, in edge creation order
    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|edge| edge.to == id)
            .map(|edge| edge.from)
            .collect()
    }

    /// Ids of all transform nodes, in pipeline order
    pub fn transform_nodes(&self) -> Vec<NodeId> {
        self.ids_where(|node| matches!(node, Node::Transform { .. }))
    }

    /// Ids of the dimensions produced by the `index`-th transform
    pub fn produced_by(&self, index: usize) -> Vec<NodeId> {
        self.ids_where(|node| matches!(node, Node::Dimension { transform, .. } if *transform == index))
    }

    pub fn bottom_nodes(&self) -> Vec<NodeId> {
        self.ids_where(|node| matches!(node, Node::Bottom { .. }))
    }

    pub fn top_nodes(&self) -> Vec<NodeId> {
        self.ids_where(|node| matches!(node, Node::Top { .. }))
    }

    /// Top dimensions that ended up with no producer
    pub fn disconnected_tops(&self) -> Vec<DimensionIndex> {
        self.top_nodes()
            .into_iter()
            .filter(|id| self.predecessors(*id).is_empty())
            .filter_map(|id| match self.nodes[id] {
                Node::Top { dim } => Some(dim),
                _ => None,
            })
            .collect()
    }

    fn ids_where(&self, predicate: impl Fn(&Node) -> bool) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| predicate(node))
            .map(|(id, _)| id)
            .collect()
    }
}
