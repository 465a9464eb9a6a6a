//! Output formats for recovered transform graphs
//!
//! - [`mermaid`]: fenced Mermaid `graph TD` flowchart

pub mod mermaid;

pub use mermaid::to_mermaid;
