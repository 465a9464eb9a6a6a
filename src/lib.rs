//! # tilescope
//!
//! Readable views of ck_tile tensor types for debugger sessions.
//!
//! ck_tile encodes tensor shapes, coordinate-transform pipelines and
//! distribution metadata entirely in template parameters. This crate recovers
//! that structure from the type strings a debugger reports (optionally helped
//! by live member values) and renders it as text or as a Mermaid flow graph.
//!
//! The entry points live under [`cktile`]:
//!
//! - [`cktile::parsing`] turns type strings into pipelines and encodings
//! - [`cktile::graph`] assembles the bottom-to-top transform flow graph
//! - [`cktile::printers`] renders values through the ordered dispatch table
//! - [`cktile::commands`] bundles the print, type-print and mermaid queries

pub mod cktile;
