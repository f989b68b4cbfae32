//! Path-addressed telemetry document
//!
//! Dotted names such as `truck.engine_rpm` are merged into nested objects:
//!
//! ```text
//! upsert("truck.engine_rpm", 1500.0)
//! upsert("truck.speed", 22.5)
//!
//! { "truck": { "engine_rpm": 1500.0, "speed": 22.5 } }
//! ```
//!
//! Writing an existing path replaces the leaf in place. Paths with an empty
//! segment (`".a"`, `"a."`, `"a..b"`, `""`) are rejected before anything is
//! touched. Keys are kept in a `BTreeMap`, so serialization is deterministic.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{DashError, Result};
use crate::value::Value;

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Leaf(Value),
    Object(BTreeMap<String, Node>),
}

impl Node {
    /// Borrow this node as an object, replacing a leaf with an empty object
    fn make_object(&mut self) -> &mut BTreeMap<String, Node> {
        if let Node::Leaf(_) = self {
            *self = Node::Object(BTreeMap::new());
        }
        match self {
            Node::Object(children) => children,
            Node::Leaf(_) => unreachable!("leaf was replaced by an object"),
        }
    }

    /// Get the leaf value, if this node is a leaf
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Leaf(v) => Some(v),
            Node::Object(_) => None,
        }
    }

    /// Get the children, if this node is an object
    pub fn as_object(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Object(children) => Some(children),
            Node::Leaf(_) => None,
        }
    }
}

/// Split a dotted path into segments, rejecting empty segments
fn split_path(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(DashError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(segments)
}

/// An object tree addressed by dotted paths
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tree {
    children: BTreeMap<String, Node>,
}

impl Tree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the leaf at `path`, creating intermediate objects
    pub fn upsert(&mut self, path: &str, value: Value) -> Result<()> {
        let segments = split_path(path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(DashError::InvalidPath {
                path: path.to_string(),
            });
        };

        let mut children = &mut self.children;
        for segment in parents {
            children = children
                .entry((*segment).to_string())
                .or_insert_with(|| Node::Object(BTreeMap::new()))
                .make_object();
        }
        children.insert((*last).to_string(), Node::Leaf(value));
        Ok(())
    }

    /// Look up the node at `path`
    pub fn node(&self, path: &str) -> Option<&Node> {
        let segments = split_path(path).ok()?;
        let (first, rest) = segments.split_first()?;
        let mut node = self.children.get(*first)?;
        for segment in rest {
            node = node.as_object()?.get(*segment)?;
        }
        Some(node)
    }

    /// Look up the leaf value at `path`
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.node(path)?.as_value()
    }

    /// Top-level children
    pub fn children(&self) -> &BTreeMap<String, Node> {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Lifecycle state reported in the document's `state` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Startup,
    Drive,
    Pause,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Startup => "startup",
            SessionState::Drive => "drive",
            SessionState::Pause => "pause",
        }
    }
}

/// The broadcast document: live telemetry, static configuration, and state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    telemetry: Tree,
    config: Tree,
    state: SessionState,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a channel update as `telemetry.<name>`
    pub fn upsert_telemetry(&mut self, name: &str, value: Value) -> Result<()> {
        self.telemetry.upsert(name, value)
    }

    /// Apply a configuration attribute as `config.<source>.<attribute>`
    pub fn upsert_config(&mut self, source: &str, attribute: &str, value: Value) -> Result<()> {
        let path = format!("{}.{}", source, attribute);
        self.config.upsert(&path, value)
    }

    pub fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn telemetry(&self) -> &Tree {
        &self.telemetry
    }

    pub fn config(&self) -> &Tree {
        &self.config
    }

    /// Serialize the whole document as compact JSON
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
