#![forbid(unsafe_code)]

//! Opaque tagged element nodes.
//!
//! A node is what the host's commands operate on: an SVG tag, the
//! host-assigned logical name, and the merged attribute/style/text state
//! accumulated by `add_element`/`change_element`. Nested structure is not
//! modeled; the surface owns a flat, ordered list of nodes and a node's only
//! child content is its optional text.

use std::collections::BTreeMap;

use unicode_normalization::UnicodeNormalization;

/// Stable handle for a node registered on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

/// One live graphic element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    tag: String,
    name: String,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: Option<String>,
}

impl ElementNode {
    #[must_use]
    pub fn new(tag: &str, name: &str) -> Self {
        Self {
            tag: tag.to_string(),
            name: name.to_string(),
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
            text: None,
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Host-assigned logical name; empty for the surface root.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    #[must_use]
    pub fn style(&self) -> &BTreeMap<String, String> {
        &self.style
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set one attribute; existing keys are overwritten, others untouched.
    pub fn set_attr(&mut self, key: &str, value: String) {
        self.attrs.insert(key.to_string(), value);
    }

    /// Set one style property; existing keys are overwritten, others untouched.
    pub fn set_style(&mut self, key: &str, value: String) {
        self.style.insert(key.to_string(), value);
    }

    /// Replace all child content with a single NFC-normalized text node.
    pub fn set_text(&mut self, text: &str) {
        self.text = Some(text.nfc().collect());
    }
}
