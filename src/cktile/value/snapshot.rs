//! Serialized value trees
//!
//! A [`SnapshotValue`] is a debugger value written out as JSON or YAML, so the
//! printers can be driven without a live debugger session:
//!
//! ```yaml
//! type: "ck_tile::tensor_descriptor<...>"
//! members:
//!   ntransform_: { type: int, value: 1 }
//!   element_space_size_: { type: "ck_tile::constant<8192l>" }
//! ```

use super::ValueHandle;
use crate::cktile::error::{AccessError, CommandError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotValue {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    /// Host rendering for leaves that are not integers (floats, pointers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub members: BTreeMap<String, SnapshotValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<SnapshotValue>,
}

impl SnapshotValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        SnapshotValue {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_member(mut self, name: impl Into<String>, member: SnapshotValue) -> Self {
        self.members.insert(name.into(), member);
        self
    }

    pub fn with_elements(mut self, elements: Vec<SnapshotValue>) -> Self {
        self.elements = elements;
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self, CommandError> {
        serde_json::from_str(text).map_err(|e| CommandError::Snapshot(e.to_string()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, CommandError> {
        serde_yaml::from_str(text).map_err(|e| CommandError::Snapshot(e.to_string()))
    }

    /// Load a snapshot file; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CommandError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| CommandError::Snapshot(format!("{}: {}", path.display(), e)))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }
}

impl ValueHandle for SnapshotValue {
    fn type_name(&self) -> String {
        self.type_name.clone()
    }

    fn member(&self, name: &str) -> Result<Box<dyn ValueHandle + '_>, AccessError> {
        self.members
            .get(name)
            .map(|member| Box::new(member) as Box<dyn ValueHandle + '_>)
            .ok_or_else(|| AccessError::MissingMember(name.to_string()))
    }

    fn element(&self, index: usize) -> Result<Box<dyn ValueHandle + '_>, AccessError> {
        self.elements
            .get(index)
            .map(|element| Box::new(element) as Box<dyn ValueHandle + '_>)
            .ok_or(AccessError::IndexOutOfRange {
                index,
                len: self.elements.len(),
            })
    }

    fn as_int(&self) -> Result<i64, AccessError> {
        self.value.ok_or_else(|| AccessError::NotAnInteger {
            type_name: self.type_name.clone(),
        })
    }

    fn render(&self) -> String {
        match (&self.display, self.value) {
            (Some(display), _) => display.clone(),
            (None, Some(value)) => value.to_string(),
            (None, None) => self.type_name.clone(),
        }
    }
}
