//! Type-string parsing for ck_tile template instantiations
//!
//! The debugger hands us type strings such as
//! `ck_tile::tensor_descriptor<ck_tile::tuple<ck_tile::embed<...>>, ...>`.
//! Everything in this module works on those strings directly:
//!
//! - [`lexer`]: logos token definitions for the signature grammar
//! - [`brackets`]: matching `<`/`>` pairs and splitting top-level parameters
//! - [`templates`]: locating `name<...>` occurrences and their content
//! - [`transforms`]: the ordered transform vocabulary matcher
//! - [`sequences`]: `sequence<...>` bodies and integer literals
//! - [`signature`]: descriptor/adaptor parameter layout into a pipeline
//! - [`encoding`]: `tile_distribution_encoding` R/H/P/Y data
//! - [`rendered`]: re-reading already rendered printer output
//!
//! None of these functions fail hard. Malformed or truncated input yields
//! `None` or empty collections so that callers can keep rendering whatever
//! else they have.

pub mod brackets;
pub mod encoding;
pub mod lexer;
pub mod rendered;
pub mod sequences;
pub mod signature;
pub mod templates;
pub mod transforms;

pub use brackets::{find_matching_close, split_top_level};
pub use encoding::DistributionEncoding;
pub use rendered::{parse_ntransform, parse_rendered_description};
pub use sequences::{constant_value, parse_dimension_sequences, parse_sequence_values};
pub use signature::parse_pipeline;
pub use templates::{extract_all_templates, extract_template, find_template, TemplateSpan};
pub use transforms::{parse_transform_list, TransformMatch};
