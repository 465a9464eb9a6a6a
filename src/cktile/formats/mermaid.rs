//! Mermaid flowchart serialization
//!
//! Renders a [`TransformGraph`] as a fenced `graph TD` block that can be
//! pasted into any Markdown viewer with Mermaid support.
//!
//! ## Example
//!
//! ```text
//! graph TD
//!     %% Tensor Descriptor Transform Flow
//!
//!     B0["Bottom[0]"]
//!     style B0 fill:#e1f5fe
//!
//!     T0{"[0] embed<br/>[0] → [1,2]"}
//!     style T0 fill:#fff3e0
//!     B0 --> T0
//!     D0_0["Dim[1]"]
//!     T0 --> D0_0
//! ```
//!
//! Node ids: `B<dim>` for bottoms, `T<i>` for transforms, `D<i>_<j>` for the
//! j-th dimension produced by transform i, `X<dim>` for tops. Negative
//! dimensions are spelled `n<abs>` since Mermaid ids cannot contain `-`.

use crate::cktile::graph::{Node, NodeId, TransformGraph};
use crate::cktile::pipeline::{DimensionIndex, TransformKind};

const BOTTOM_FILL: &str = "#e1f5fe";
const TOP_FILL: &str = "#c8e6c9";

/// Fill colour for a transform node
pub fn transform_fill(kind: TransformKind) -> &'static str {
    match kind {
        TransformKind::Embed => "#fff3e0",
        TransformKind::Unmerge => "#fce4ec",
        TransformKind::Merge | TransformKind::MergeV2 => "#e8f5e9",
        TransformKind::PassThrough => "#f3e5f5",
        TransformKind::Replicate => "#e3f2fd",
        TransformKind::Xor => "#ffebee",
        TransformKind::Pad | TransformKind::RightPad | TransformKind::LeftPad => "#fff9c4",
        TransformKind::Slice => "#efebe9",
        TransformKind::Freeze => "#eceff1",
    }
}

fn dim_id(dim: DimensionIndex) -> String {
    if dim < 0 {
        format!("n{}", dim.unsigned_abs())
    } else {
        dim.to_string()
    }
}

fn node_id(node: &Node) -> String {
    match node {
        Node::Bottom { dim } => format!("B{}", dim_id(*dim)),
        Node::Transform { index, .. } => format!("T{}", index),
        Node::Dimension {
            transform, slot, ..
        } => format!("D{}_{}", transform, slot),
        Node::Top { dim } => format!("X{}", dim_id(*dim)),
    }
}

fn joined(dims: &[DimensionIndex]) -> String {
    dims.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Node declaration: id, shape and label
fn declaration(node: &Node) -> String {
    let id = node_id(node);
    match node {
        Node::Bottom { dim } => format!("{}[\"Bottom[{}]\"]", id, dim),
        Node::Dimension { dim, .. } => format!("{}[\"Dim[{}]\"]", id, dim),
        Node::Top { dim } => format!("{}[\"Top[{}]\"]", id, dim),
        Node::Transform {
            index,
            transform,
            lower,
            upper,
        } => {
            let flow = format!("[{}] → [{}]", joined(lower), joined(upper));
            match transform {
                TransformKind::Embed
                | TransformKind::Unmerge
                | TransformKind::Merge
                | TransformKind::MergeV2 => {
                    format!("{}{{\"[{}] {}<br/>{}\"}}", id, index, transform, flow)
                }
                TransformKind::Xor => format!("{}[[\"[{}] XOR<br/>{}\"]]", id, index, flow),
                _ => format!("{}[\"[{}] {}<br/>{}\"]", id, index, transform, flow),
            }
        }
    }
}

fn fill(node: &Node) -> Option<&'static str> {
    match node {
        Node::Bottom { .. } => Some(BOTTOM_FILL),
        Node::Top { .. } => Some(TOP_FILL),
        Node::Transform { transform, .. } => Some(transform_fill(*transform)),
        Node::Dimension { .. } => None,
    }
}

struct Writer<'g> {
    graph: &'g TransformGraph,
    lines: Vec<String>,
}

impl<'g> Writer<'g> {
    fn line(&mut self, text: impl AsRef<str>) {
        self.lines.push(format!("    {}", text.as_ref()));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Declaration, style, then every edge that feeds the node
    fn node(&mut self, id: NodeId) {
        let Some(node) = self.graph.node(id) else {
            return;
        };
        self.line(declaration(node));
        if let Some(colour) = fill(node) {
            self.line(format!("style {} fill:{}", node_id(node), colour));
        }
        for from in self.graph.predecessors(id) {
            if let Some(source) = self.graph.node(from) {
                self.line(format!("{} --> {}", node_id(source), node_id(node)));
            }
        }
    }
}

/// Serialize a graph as a fenced Mermaid block
pub fn to_mermaid(graph: &TransformGraph, title: &str) -> String {
    let mut writer = Writer {
        graph,
        lines: vec!["```mermaid".to_string(), "graph TD".to_string()],
    };
    writer.line(format!("%% {}", title));
    writer.blank();

    let bottoms = graph.bottom_nodes();
    for &id in &bottoms {
        writer.node(id);
    }
    if !bottoms.is_empty() {
        writer.blank();
    }

    for (index, id) in graph.transform_nodes().into_iter().enumerate() {
        writer.node(id);
        for produced in graph.produced_by(index) {
            writer.node(produced);
        }
        writer.blank();
    }

    let tops = graph.top_nodes();
    if !tops.is_empty() {
        writer.line("%% Top Dimensions");
        for id in tops {
            writer.node(id);
        }
    }

    writer.lines.push("```".to_string());
    writer.lines.join("\n")
}
