//! Main module for ck_tile type inspection

pub mod commands;
pub mod config;
pub mod error;
pub mod formats;
pub mod graph;
pub mod parsing;
pub mod pipeline;
pub mod printers;
pub mod value;
