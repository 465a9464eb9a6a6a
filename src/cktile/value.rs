//! Value access layer
//!
//! Printers read values through [`ValueSource`], which is either a live
//! handle supplied by the host (a debugger, or a [`SnapshotValue`] loaded from
//! disk) or just a type string. Every accessor returns `Result`/[`Reading`] so
//! the printers decide locally what to do when a member has no storage.

pub mod snapshot;

pub use snapshot::SnapshotValue;

use crate::cktile::config::LimitsConfig;
use crate::cktile::error::AccessError;
use crate::cktile::parsing::brackets::split_top_level;
use crate::cktile::parsing::sequences::constant_argument;
use crate::cktile::parsing::templates::{extract_full_template, find_template};
use std::fmt;

/// A value owned by the host
///
/// Implementations only need to answer simple questions; the formatting logic
/// lives entirely on this side of the boundary.
pub trait ValueHandle {
    /// Declared type, as the host prints it
    fn type_name(&self) -> String;

    /// Named member (data member or base-class field)
    fn member(&self, name: &str) -> Result<Box<dyn ValueHandle + '_>, AccessError>;

    /// Element of an array-like value
    fn element(&self, index: usize) -> Result<Box<dyn ValueHandle + '_>, AccessError>;

    /// Integer content of a scalar value
    fn as_int(&self) -> Result<i64, AccessError>;

    /// The host's own one-line rendering, used for leaves we do not format
    fn render(&self) -> String;
}

impl<T: ValueHandle + ?Sized> ValueHandle for &T {
    fn type_name(&self) -> String {
        (**self).type_name()
    }

    fn member(&self, name: &str) -> Result<Box<dyn ValueHandle + '_>, AccessError> {
        (**self).member(name)
    }

    fn element(&self, index: usize) -> Result<Box<dyn ValueHandle + '_>, AccessError> {
        (**self).element(index)
    }

    fn as_int(&self) -> Result<i64, AccessError> {
        (**self).as_int()
    }

    fn render(&self) -> String {
        (**self).render()
    }
}

/// Where a printer gets its data from
pub enum ValueSource<'a> {
    /// Backed by runtime storage
    Live(Box<dyn ValueHandle + 'a>),
    /// Only the type is known; values are inferred from template arguments
    TypeOnly(String),
}

impl fmt::Debug for ValueSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Live(handle) => f.debug_tuple("Live").field(&handle.type_name()).finish(),
            ValueSource::TypeOnly(type_str) => f.debug_tuple("TypeOnly").field(type_str).finish(),
        }
    }
}

/// Result of reading an integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Known(i64),
    /// Read succeeded but the value is implausible (garbage memory)
    Uninitialized,
    /// Nothing could be read
    Unavailable,
}

impl Reading {
    /// Apply the sanity bound to a raw value
    pub fn checked(value: i64, limits: &LimitsConfig) -> Self {
        if value.unsigned_abs() > limits.max_sane_value {
            tracing::debug!(value = value, "value exceeds sanity bound");
            Reading::Uninitialized
        } else {
            Reading::Known(value)
        }
    }

    pub fn known(&self) -> Option<i64> {
        match self {
            Reading::Known(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Reading::Unavailable)
    }

    /// `Known` readings win over `self` when `self` has nothing
    pub fn or(self, other: Reading) -> Reading {
        match self {
            Reading::Unavailable => other,
            reading => reading,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Known(value) => write!(f, "{}", value),
            Reading::Uninitialized => write!(f, "UNINITIALIZED"),
            Reading::Unavailable => write!(f, "?"),
        }
    }
}

/// One element of a `ck_tile::tuple`
#[derive(Debug)]
pub enum TupleElement<'a> {
    /// A compile-time `constant<N>` or a readable integer
    Int(i64),
    /// Anything else, to be dispatched through the printer table
    Value(ValueSource<'a>),
}

const INTEGER_TYPES: &[&str] = &[
    "int",
    "long",
    "long int",
    "unsigned int",
    "unsigned long",
    "index_t",
    "ck_tile::index_t",
    "long_index_t",
    "ck_tile::long_index_t",
];

/// True for the scalar types that are read as plain integers
pub fn is_integer_type(type_name: &str) -> bool {
    let bare = type_name.trim().trim_start_matches("const ").trim();
    INTEGER_TYPES.contains(&bare)
}

impl<'a> ValueSource<'a> {
    pub fn live(handle: impl ValueHandle + 'a) -> Self {
        ValueSource::Live(Box::new(handle))
    }

    pub fn type_only(type_str: impl Into<String>) -> Self {
        ValueSource::TypeOnly(type_str.into())
    }

    pub fn type_name(&self) -> String {
        match self {
            ValueSource::Live(handle) => handle.type_name(),
            ValueSource::TypeOnly(type_str) => type_str.clone(),
        }
    }

    pub fn is_type_only(&self) -> bool {
        matches!(self, ValueSource::TypeOnly(_))
    }

    /// Runtime member; type-only values have none
    pub fn member(&self, name: &str) -> Result<ValueSource<'_>, AccessError> {
        match self {
            ValueSource::Live(handle) => handle.member(name).map(ValueSource::Live),
            ValueSource::TypeOnly(_) => Err(AccessError::NoRuntimeStorage {
                member: name.to_string(),
            }),
        }
    }

    /// Runtime member, or the first `template<...>` in our own type as a type-only stand-in
    ///
    /// Used for members that carry their whole meaning in their type, such as
    /// the descriptor of a view or the adaptor of a distribution.
    pub fn member_or_type(&self, name: &str, template: &str) -> Option<ValueSource<'_>> {
        match self.member(name) {
            Ok(member) => Some(member),
            Err(err) => {
                tracing::trace!(member = name, error = %err, "falling back to type");
                extract_full_template(&self.type_name(), template).map(ValueSource::TypeOnly)
            }
        }
    }

    pub fn element(&self, index: usize) -> Result<ValueSource<'_>, AccessError> {
        match self {
            ValueSource::Live(handle) => handle.element(index).map(ValueSource::Live),
            ValueSource::TypeOnly(_) => Err(AccessError::NoRuntimeStorage {
                member: format!("[{}]", index),
            }),
        }
    }

    /// Integer content of this value, honoring `constant<N>` types
    pub fn as_int(&self) -> Result<i64, AccessError> {
        let type_name = self.type_name();
        if let Some(value) = constant_argument(strip_cv_ref(&type_name)) {
            return Ok(value);
        }
        match self {
            ValueSource::Live(handle) => handle
                .as_int()
                .or_else(|_| handle.member("value").and_then(|v| v.as_int())),
            ValueSource::TypeOnly(_) => Err(AccessError::NotAnInteger { type_name }),
        }
    }

    /// Read an integer member with the sanity bound applied
    pub fn read_int(&self, name: &str, limits: &LimitsConfig) -> Reading {
        match self.member(name).and_then(|member| member.as_int()) {
            Ok(value) => Reading::checked(value, limits),
            Err(err) => {
                tracing::trace!(member = name, error = %err, "integer member not readable");
                Reading::Unavailable
            }
        }
    }

    /// Host rendering for live values, the type itself otherwise
    pub fn render(&self) -> String {
        match self {
            ValueSource::Live(handle) => handle.render(),
            ValueSource::TypeOnly(type_str) => type_str.clone(),
        }
    }

    /// Elements of a `ck_tile::tuple`, in order
    ///
    /// Element types are read from the tuple's template arguments. Constant
    /// elements never need storage; the rest are read live when possible and
    /// otherwise become type-only values. An element that cannot be read at
    /// all is skipped.
    pub fn tuple_elements(&self) -> Vec<TupleElement<'_>> {
        let type_name = self.type_name();
        let Some(span) = find_template(&type_name, "tuple", 0) else {
            return Vec::new();
        };
        let params = split_top_level(span.content(&type_name));

        params
            .iter()
            .enumerate()
            .filter_map(|(index, param)| {
                if let Some(value) = constant_argument(param) {
                    return Some(TupleElement::Int(value));
                }
                match self {
                    ValueSource::TypeOnly(_) => {
                        Some(TupleElement::Value(ValueSource::TypeOnly(param.to_string())))
                    }
                    ValueSource::Live(_) => match self.element(index) {
                        Ok(element) if is_integer_type(&element.type_name()) => {
                            element.as_int().ok().map(TupleElement::Int)
                        }
                        Ok(element) => Some(TupleElement::Value(element)),
                        Err(err) => {
                            tracing::trace!(index = index, error = %err, "tuple element not readable");
                            None
                        }
                    },
                }
            })
            .collect()
    }

    /// Integer values of a tuple member such as `up_lengths_`
    ///
    /// Falls back to the constant arguments of the member's type when the
    /// member has no storage but its type is spelled out in ours.
    pub fn int_tuple(&self) -> Vec<i64> {
        self.tuple_elements()
            .into_iter()
            .filter_map(|element| match element {
                TupleElement::Int(value) => Some(value),
                TupleElement::Value(_) => None,
            })
            .collect()
    }
}

/// Drop `const`, `volatile`, `&` and `*` decorations around a type
pub fn strip_cv_ref(type_name: &str) -> &str {
    let mut name = type_name.trim();
    loop {
        let before = name;
        name = name
            .strip_prefix("const ")
            .or_else(|| name.strip_prefix("volatile "))
            .unwrap_or(name)
            .trim_end_matches(['&', '*'])
            .trim();
        if let Some(stripped) = name.strip_suffix(" const") {
            name = stripped.trim();
        }
        if name == before {
            return name;
        }
    }
}
