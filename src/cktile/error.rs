//! Error types for value access and commands

use std::fmt;

/// Reasons a member or element of a value could not be read
///
/// These never reach the user directly: printers catch them where the member
/// is read and fall back to type-derived data or leave the line out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The value is a compile-time alias with no storage behind it
    NoRuntimeStorage { member: String },
    /// The value has no member with this name
    MissingMember(String),
    /// Element index past the end of an array-like value
    IndexOutOfRange { index: usize, len: usize },
    /// The value exists but is not an integer (or not readable as one)
    NotAnInteger { type_name: String },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::NoRuntimeStorage { member } => {
                write!(f, "No runtime storage for member '{}'", member)
            }
            AccessError::MissingMember(name) => write!(f, "No member named '{}'", name),
            AccessError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range for {} elements", index, len)
            }
            AccessError::NotAnInteger { type_name } => {
                write!(f, "Value of type '{}' is not an integer", type_name)
            }
        }
    }
}

impl std::error::Error for AccessError {}

/// Failures of the print, type-print and mermaid commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The mermaid command was given something other than a descriptor or adaptor
    UnsupportedType,
    /// Neither the type string nor the rendered text yielded any transform
    NoTransforms,
    /// A snapshot file could not be read or decoded
    Snapshot(String),
    /// Structured output could not be produced
    Serialize(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnsupportedType => {
                write!(f, "Not a tensor_descriptor or tensor_adaptor")
            }
            CommandError::NoTransforms => write!(f, "No transforms found"),
            CommandError::Snapshot(msg) => write!(f, "Invalid snapshot: {}", msg),
            CommandError::Serialize(msg) => write!(f, "Failed to serialize output: {}", msg),
        }
    }
}

impl std::error::Error for CommandError {}
