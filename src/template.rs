//! Node templates ("kinds") and the registry the host passes in when the user
//! drops a new node onto the canvas.

use crate::error::{GraphError, Result};
use crate::geometry::Point;
use crate::graph::{Action, Node, Pin, Stream};
use crate::style::color_serde;
use serde::{Deserialize, Serialize};
use slint::Color;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinTemplate {
    pub name: String,
    #[serde(default)]
    pub docs: String,
    #[serde(default)]
    pub dtype: String,
    pub action: Action,
    pub stream: Stream,
    #[serde(default)]
    pub required: bool,
}

impl PinTemplate {
    pub fn new(name: impl Into<String>, dtype: impl Into<String>, action: Action, stream: Stream) -> Self {
        Self {
            name: name.into(),
            docs: String::new(),
            dtype: dtype.into(),
            action,
            stream,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn instantiate(&self) -> Pin {
        Pin::new(self.name.clone(), self.dtype.clone(), self.action, self.stream)
            .with_docs(self.docs.clone())
            .with_required(self.required)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub name: String,
    #[serde(default)]
    pub docs: String,
    #[serde(default)]
    pub icon: String,
    #[serde(with = "color_serde")]
    pub color: Color,
    pub pins: Vec<PinTemplate>,
}

impl NodeTemplate {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            docs: String::new(),
            icon: String::new(),
            color,
            pins: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = docs.into();
        self
    }

    pub fn with_pin(mut self, pin: PinTemplate) -> Self {
        self.pins.push(pin);
        self
    }

    /// Build an unplaced node at `position` (world coordinates).
    pub fn instantiate(&self, position: Point) -> Node {
        self.pins.iter().fold(
            Node::new(self.name.clone(), position)
                .with_docs(self.docs.clone())
                .with_icon(self.icon.clone())
                .with_color(self.color),
            |node, pin| node.with_pin(pin.instantiate()),
        )
    }
}

/// Catalog of node templates keyed by kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, NodeTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under `kind`, replacing any previous one.
    pub fn register(&mut self, kind: impl Into<String>, template: NodeTemplate) {
        self.templates.insert(kind.into(), template);
    }

    pub fn get(&self, kind: &str) -> Option<&NodeTemplate> {
        self.templates.get(kind)
    }

    /// Registered kinds in sorted order
    pub fn kinds(&self) -> impl Iterator<Item = &str> + '_ {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn instantiate(&self, kind: &str, position: Point) -> Result<Node> {
        self.get(kind)
            .map(|t| t.instantiate(position))
            .ok_or_else(|| GraphError::TemplateNotFound(kind.to_string()))
    }
}
