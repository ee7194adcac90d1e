#![forbid(unsafe_code)]

//! The live surface: an ordered, flat collection of tagged nodes plus the
//! root element's applied parameters and the host-supplied screen transform.
//!
//! The surface is a pure model. It never talks to a DOM; the bridge crate
//! mutates it from decoded commands and queries it for extents, markup, and
//! coordinate mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, shape_extent};
use crate::markup::{escape_attr, push_element, style_attr_value};
use crate::node::{ElementNode, NodeId};
use crate::transform::Transform2d;

/// A width or height as supplied by the host: numeric or raw string
/// (`"100%"` and friends pass through untouched).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Number(f64),
    Text(String),
}

impl core::fmt::Display for Dimension {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Externally supplied surface parameters, re-applied in full on any change.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceParams {
    pub view_box: String,
    pub width: Dimension,
    pub height: Dimension,
    pub style: BTreeMap<String, String>,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            view_box: "0 0 500 500".to_string(),
            width: Dimension::Number(500.0),
            height: Dimension::Number(500.0),
            style: BTreeMap::new(),
        }
    }
}

/// The vector-graphics surface the bridge renders into.
#[derive(Debug, Clone)]
pub struct Surface {
    root_attrs: BTreeMap<String, String>,
    root_style: BTreeMap<String, String>,
    nodes: BTreeMap<NodeId, ElementNode>,
    order: Vec<NodeId>,
    next_id: u32,
    screen: Transform2d,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// New empty surface. Aspect-ratio scaling is disabled on the root so the
    /// view box maps linearly onto the element, matching the screen-transform
    /// model used for event coordinates.
    #[must_use]
    pub fn new() -> Self {
        let mut root_attrs = BTreeMap::new();
        root_attrs.insert("preserveAspectRatio".to_string(), "none".to_string());
        Self {
            root_attrs,
            root_style: BTreeMap::new(),
            nodes: BTreeMap::new(),
            order: Vec::new(),
            next_id: 0,
            screen: Transform2d::IDENTITY,
        }
    }

    /// Create a node and append it to the surface, returning its handle.
    pub fn create_element(&mut self, tag: &str, name: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, ElementNode::new(tag, name));
        self.order.push(id);
        id
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&ElementNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut ElementNode> {
        self.nodes.get_mut(&id)
    }

    /// Logical name of an event target, or `None` when the handle is stale.
    #[must_use]
    pub fn target_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(ElementNode::name)
    }

    /// Remove a node from the surface. Returns false for stale handles.
    pub fn detach(&mut self, id: NodeId) -> bool {
        if self.nodes.remove(&id).is_some() {
            self.order.retain(|&existing| existing != id);
            true
        } else {
            false
        }
    }

    /// Remove every child node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.order.len()
    }

    /// Re-apply the full parameter set to the root element: `viewBox`,
    /// `width`, `height`, and each style key, unconditionally. Style keys
    /// merge onto the root; keys not listed are left untouched.
    pub fn apply_parameters(&mut self, params: &SurfaceParams) {
        self.root_attrs
            .insert("viewBox".to_string(), params.view_box.clone());
        self.root_attrs
            .insert("width".to_string(), params.width.to_string());
        self.root_attrs
            .insert("height".to_string(), params.height.to_string());
        for (key, value) in &params.style {
            self.root_style.insert(key.clone(), value.clone());
        }
    }

    /// Current screen transform (local → client coordinates).
    #[must_use]
    pub fn screen_transform(&self) -> Transform2d {
        self.screen
    }

    /// Host-supplied screen transform; changes whenever the surface is
    /// panned, zoomed, or resized.
    pub fn set_screen_transform(&mut self, transform: Transform2d) {
        self.screen = transform;
    }

    /// Map client coordinates into surface-local space through the inverse of
    /// the current screen transform. The inverse is computed per call; a
    /// singular transform falls back to the untransformed input.
    #[must_use]
    pub fn screen_to_local(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        match self.screen.invert() {
            Some(inverse) => inverse.apply(client_x, client_y),
            None => (client_x, client_y),
        }
    }

    /// Union of the deterministic extents of all children, in insertion
    /// order. `None` when no child has a computable extent.
    #[must_use]
    pub fn content_bbox(&self) -> Option<BBox> {
        let mut bbox: Option<BBox> = None;
        for id in &self.order {
            let node = &self.nodes[id];
            if let Some(extent) = shape_extent(node.tag(), node.attrs()) {
                bbox = Some(match bbox {
                    Some(prior) => prior.union(extent),
                    None => extent,
                });
            }
        }
        bbox
    }

    /// Serialized markup of the surface's children (no root element).
    #[must_use]
    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        for id in &self.order {
            push_element(&mut out, &self.nodes[id]);
        }
        out
    }

    /// Complete standalone document: root element carrying the applied
    /// parameters, wrapping the child markup.
    #[must_use]
    pub fn document_markup(&self) -> String {
        let mut out = String::from("<svg xmlns=\"http://www.w3.org/2000/svg\"");
        for (key, value) in &self.root_attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        if !self.root_style.is_empty() {
            out.push_str(" style=\"");
            out.push_str(&escape_attr(&style_attr_value(&self.root_style)));
            out.push('"');
        }
        out.push('>');
        out.push_str(&self.inner_markup());
        out.push_str("</svg>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_detach_and_clear() {
        let mut surface = Surface::new();
        let a = surface.create_element("rect", "a");
        let b = surface.create_element("circle", "b");
        assert_eq!(surface.child_count(), 2);
        assert_eq!(surface.target_name(a), Some("a"));

        assert!(surface.detach(a));
        assert!(!surface.detach(a));
        assert_eq!(surface.child_count(), 1);
        assert_eq!(surface.target_name(b), Some("b"));

        surface.clear();
        assert_eq!(surface.child_count(), 0);
        assert_eq!(surface.inner_markup(), "");
    }

    #[test]
    fn content_bbox_unions_children_and_skips_text() {
        let mut surface = Surface::new();
        let r = surface.create_element("rect", "r");
        {
            let node = surface.node_mut(r).unwrap();
            node.set_attr("x", "0".to_string());
            node.set_attr("y", "0".to_string());
            node.set_attr("width", "10".to_string());
            node.set_attr("height", "10".to_string());
        }
        let c = surface.create_element("circle", "c");
        {
            let node = surface.node_mut(c).unwrap();
            node.set_attr("cx", "20".to_string());
            node.set_attr("cy", "5".to_string());
            node.set_attr("r", "5".to_string());
        }
        let t = surface.create_element("text", "t");
        surface
            .node_mut(t)
            .unwrap()
            .set_attr("x", "999".to_string());

        let bbox = surface.content_bbox().unwrap();
        assert_eq!(bbox.x, 0.0);
        assert_eq!(bbox.y, 0.0);
        assert_eq!(bbox.width, 25.0);
        assert_eq!(bbox.height, 10.0);
    }

    #[test]
    fn empty_surface_has_no_content_bbox() {
        assert!(Surface::new().content_bbox().is_none());
    }

    #[test]
    fn parameters_reapply_in_full() {
        let mut surface = Surface::new();
        let mut params = SurfaceParams::default();
        params.style.insert("border".to_string(), "1px".to_string());
        surface.apply_parameters(&params);

        params.view_box = "0 0 10 10".to_string();
        params.width = Dimension::Text("100%".to_string());
        surface.apply_parameters(&params);

        let doc = surface.document_markup();
        assert_eq!(
            doc,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" height=\"500\" \
             preserveAspectRatio=\"none\" viewBox=\"0 0 10 10\" width=\"100%\" \
             style=\"border: 1px\"></svg>"
        );
    }

    #[test]
    fn screen_to_local_inverts_per_call() {
        let mut surface = Surface::new();
        assert_eq!(surface.screen_transform(), Transform2d::IDENTITY);
        surface.set_screen_transform(
            Transform2d::scale(2.0, 2.0).then(Transform2d::translate(100.0, 50.0)),
        );
        let (x, y) = surface.screen_to_local(120.0, 90.0);
        assert!((x - 10.0).abs() < 1e-9);
        assert!((y - 20.0).abs() < 1e-9);

        // Transform changes take effect on the next mapping.
        surface.set_screen_transform(Transform2d::translate(1.0, 1.0));
        let (x, y) = surface.screen_to_local(120.0, 90.0);
        assert!((x - 119.0).abs() < 1e-9);
        assert!((y - 89.0).abs() < 1e-9);
    }

    #[test]
    fn singular_screen_transform_falls_back_to_client_coords() {
        let mut surface = Surface::new();
        surface.set_screen_transform(Transform2d::scale(0.0, 0.0));
        assert_eq!(surface.screen_to_local(7.0, 8.0), (7.0, 8.0));
    }
}
