#![forbid(unsafe_code)]

//! Element registry and command interpreter.
//!
//! The interpreter applies one ordered batch against the registry and the
//! surface. It mutates surface state directly and reports everything the host
//! must hear about as [`CommandEffect`] values; turning effects into outbound
//! messages is the bridge's job. Batches run synchronously start-to-finish;
//! the first item that fails to decode aborts the remainder while earlier
//! effects persist.

use serde_json::Value;
use tracing::{debug, warn};

use vellum_core::geometry::BBox;
use vellum_core::node::{ElementNode, NodeId};
use vellum_core::surface::Surface;

use crate::command::{Command, CommandError, ScalarMap, decode_command};

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Mapping from logical names to live nodes.
///
/// Registering an existing name silently replaces the prior entry
/// (last-write-wins); the displaced node is detached from the surface by the
/// interpreter so markup never shows both. Lookups of unknown names are a
/// non-fatal condition for callers.
#[derive(Debug, Default, Clone)]
pub struct ElementRegistry {
    by_name: std::collections::BTreeMap<String, NodeId>,
}

impl ElementRegistry {
    /// Register `id` under `name`, returning any displaced handle.
    pub fn add(&mut self, name: &str, id: NodeId) -> Option<NodeId> {
        self.by_name.insert(name.to_string(), id)
    }

    /// Look up a name. Missing names are not an error.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Delete the entry if present; no-op for absent names.
    pub fn remove(&mut self, name: &str) -> Option<NodeId> {
        self.by_name.remove(name)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.by_name.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Host-visible consequence of one command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandEffect {
    /// `fit` measured a positive-area content extent.
    BoundingBox(BBox),
    /// `fit` with `changeView` produced a new view box string.
    ViewBox(String),
    /// `get_text` serialized the current child markup.
    TextReply(String),
}

/// Result of applying one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Items applied before the batch completed or aborted.
    pub applied: usize,
    /// Effects of the applied items, in order.
    pub effects: Vec<CommandEffect>,
    /// The decoding failure that aborted the batch, if any.
    pub error: Option<CommandError>,
}

// ---------------------------------------------------------------------------
// Interpreter
// ---------------------------------------------------------------------------

/// Applies command batches against the registry and the surface.
#[derive(Debug, Default, Clone)]
pub struct Interpreter {
    registry: ElementRegistry,
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Apply one ordered batch. Items decode and apply strictly in order; the
    /// first malformed item aborts the rest and is reported in the outcome.
    pub fn apply_batch(&mut self, surface: &mut Surface, items: &[Value]) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            applied: 0,
            effects: Vec::new(),
            error: None,
        };
        for (index, item) in items.iter().enumerate() {
            match decode_command(item, index) {
                Ok(command) => {
                    self.apply(surface, command, &mut outcome.effects);
                    outcome.applied += 1;
                }
                Err(err) => {
                    warn!(%err, "aborting remainder of command batch");
                    outcome.error = Some(err);
                    break;
                }
            }
        }
        debug!(
            applied = outcome.applied,
            total = items.len(),
            effects = outcome.effects.len(),
            "applied command batch"
        );
        outcome
    }

    fn apply(&mut self, surface: &mut Surface, command: Command, effects: &mut Vec<CommandEffect>) {
        match command {
            Command::Fit { change_view } => {
                let Some(bbox) = surface.content_bbox() else {
                    return;
                };
                // Degenerate content: no report, no view change.
                if bbox.is_degenerate() {
                    return;
                }
                effects.push(CommandEffect::BoundingBox(bbox));
                if change_view {
                    effects.push(CommandEffect::ViewBox(bbox.to_view_box()));
                }
            }
            Command::AddElement {
                tag,
                name,
                atts,
                style,
                text,
            } => {
                let id = surface.create_element(&tag, &name);
                if let Some(node) = surface.node_mut(id) {
                    update_node(node, atts.as_ref(), style.as_ref(), text.as_deref());
                }
                if let Some(displaced) = self.registry.add(&name, id) {
                    surface.detach(displaced);
                }
            }
            Command::ChangeElement {
                name,
                atts,
                style,
                text,
            } => match self.registry.get(&name).and_then(|id| surface.node_mut(id)) {
                Some(node) => update_node(node, atts.as_ref(), style.as_ref(), text.as_deref()),
                None => warn!(name = %name, "couldn't find element to change"),
            },
            Command::Delete { names } => {
                for name in &names {
                    if let Some(id) = self.registry.remove(name) {
                        surface.detach(id);
                    }
                }
            }
            Command::Empty => {
                self.registry.clear();
                surface.clear();
            }
            Command::GetText => {
                effects.push(CommandEffect::TextReply(surface.inner_markup()));
            }
        }
    }
}

/// Shared update rules for `add_element` and `change_element`: attributes and
/// style properties merge key by key; supplied text replaces all existing
/// child content with a single text node.
fn update_node(
    node: &mut ElementNode,
    atts: Option<&ScalarMap>,
    style: Option<&ScalarMap>,
    text: Option<&str>,
) {
    if let Some(atts) = atts {
        for (key, value) in atts {
            node.set_attr(key, value.to_attr_string());
        }
    }
    if let Some(style) = style {
        for (key, value) in style {
            node.set_style(key, value.to_attr_string());
        }
    }
    if let Some(text) = text {
        node.set_text(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn apply(
        interpreter: &mut Interpreter,
        surface: &mut Surface,
        items: serde_json::Value,
    ) -> BatchOutcome {
        let items = items.as_array().expect("test batch is an array").clone();
        interpreter.apply_batch(surface, &items)
    }

    #[test]
    fn add_then_change_merges_attributes() {
        let mut surface = Surface::new();
        let mut interpreter = Interpreter::new();
        let outcome = apply(
            &mut interpreter,
            &mut surface,
            json!([
                {"command": "add_element", "tag": "rect", "name": "r1", "atts": {"x": "1"}},
                {"command": "change_element", "name": "r1", "atts": {"y": "2"}},
            ]),
        );
        assert_eq!(outcome.applied, 2);
        assert!(outcome.error.is_none());

        let id = interpreter.registry().get("r1").unwrap();
        let node = surface.node(id).unwrap();
        assert_eq!(node.attrs().get("x").map(String::as_str), Some("1"));
        assert_eq!(node.attrs().get("y").map(String::as_str), Some("2"));
    }

    #[test]
    fn change_after_delete_is_missing_target_noop() {
        let mut surface = Surface::new();
        let mut interpreter = Interpreter::new();
        let outcome = apply(
            &mut interpreter,
            &mut surface,
            json!([
                {"command": "add_element", "tag": "rect", "name": "r1"},
                {"command": "delete", "names": ["r1"]},
                {"command": "change_element", "name": "r1", "atts": {"x": "5"}},
                {"command": "add_element", "tag": "circle", "name": "c1"},
            ]),
        );
        // The missing target is non-fatal; the whole batch still applies.
        assert_eq!(outcome.applied, 4);
        assert!(outcome.error.is_none());
        assert_eq!(surface.child_count(), 1);
        assert!(interpreter.registry().get("r1").is_none());
        assert!(interpreter.registry().get("c1").is_some());
    }

    #[test]
    fn duplicate_add_is_last_write_wins() {
        let mut surface = Surface::new();
        let mut interpreter = Interpreter::new();
        apply(
            &mut interpreter,
            &mut surface,
            json!([
                {"command": "add_element", "tag": "rect", "name": "dup", "atts": {"x": "1"}},
                {"command": "add_element", "tag": "circle", "name": "dup", "atts": {"r": "3"}},
            ]),
        );
        assert_eq!(interpreter.registry().len(), 1);
        // The displaced rect is detached; only the circle remains.
        assert_eq!(surface.child_count(), 1);
        let id = interpreter.registry().get("dup").unwrap();
        assert_eq!(surface.node(id).unwrap().tag(), "circle");
    }

    #[test]
    fn malformed_item_aborts_remainder_but_keeps_prior_effects() {
        let mut surface = Surface::new();
        let mut interpreter = Interpreter::new();
        let outcome = apply(
            &mut interpreter,
            &mut surface,
            json!([
                {"command": "add_element", "tag": "rect", "name": "kept"},
                {"command": "sparkle"},
                {"command": "add_element", "tag": "rect", "name": "never"},
            ]),
        );
        assert_eq!(outcome.applied, 1);
        assert!(matches!(
            outcome.error,
            Some(CommandError::Item { index: 1, .. })
        ));
        assert!(interpreter.registry().get("kept").is_some());
        assert!(interpreter.registry().get("never").is_none());
    }

    #[test]
    fn fit_reports_extent_and_view_box() {
        let mut surface = Surface::new();
        let mut interpreter = Interpreter::new();
        let outcome = apply(
            &mut interpreter,
            &mut surface,
            json!([
                {"command": "add_element", "tag": "rect", "name": "r1",
                 "atts": {"x": 2, "y": 3, "width": 10, "height": 20}},
                {"command": "fit", "changeView": true},
            ]),
        );
        assert_eq!(
            outcome.effects,
            vec![
                CommandEffect::BoundingBox(BBox {
                    x: 2.0,
                    y: 3.0,
                    width: 10.0,
                    height: 20.0,
                }),
                CommandEffect::ViewBox("2 3 10 20".to_string()),
            ]
        );
    }

    #[test]
    fn fit_without_change_view_reports_only_bbox() {
        let mut surface = Surface::new();
        let mut interpreter = Interpreter::new();
        let outcome = apply(
            &mut interpreter,
            &mut surface,
            json!([
                {"command": "add_element", "tag": "rect", "name": "r1",
                 "atts": {"width": 5, "height": 5}},
                {"command": "fit", "changeView": false},
            ]),
        );
        assert_eq!(outcome.effects.len(), 1);
        assert!(matches!(
            outcome.effects[0],
            CommandEffect::BoundingBox(_)
        ));
    }

    #[test]
    fn fit_on_degenerate_content_is_silent() {
        let mut surface = Surface::new();
        let mut interpreter = Interpreter::new();
        let outcome = apply(
            &mut interpreter,
            &mut surface,
            json!([
                // A horizontal line has zero height: degenerate.
                {"command": "add_element", "tag": "line", "name": "l1",
                 "atts": {"x1": 0, "y1": 5, "x2": 10, "y2": 5}},
                {"command": "fit", "changeView": true},
            ]),
        );
        assert_eq!(outcome.applied, 2);
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn fit_on_empty_surface_is_silent() {
        let mut surface = Surface::new();
        let mut interpreter = Interpreter::new();
        let outcome = apply(
            &mut interpreter,
            &mut surface,
            json!([{"command": "fit", "changeView": true}]),
        );
        assert!(outcome.effects.is_empty());
        assert!(outcome.error.is_none());
    }

    #[test]
    fn empty_then_get_text_yields_empty_markup() {
        let mut surface = Surface::new();
        let mut interpreter = Interpreter::new();
        let outcome = apply(
            &mut interpreter,
            &mut surface,
            json!([
                {"command": "add_element", "tag": "rect", "name": "r1", "atts": {"x": 1}},
                {"command": "empty"},
                {"command": "get_text"},
            ]),
        );
        assert_eq!(
            outcome.effects,
            vec![CommandEffect::TextReply(String::new())]
        );
        assert!(interpreter.registry().is_empty());
    }

    #[test]
    fn get_text_serializes_children_in_order() {
        let mut surface = Surface::new();
        let mut interpreter = Interpreter::new();
        let outcome = apply(
            &mut interpreter,
            &mut surface,
            json!([
                {"command": "add_element", "tag": "rect", "name": "r1",
                 "atts": {"x": 1, "width": 4}},
                {"command": "add_element", "tag": "text", "name": "t1",
                 "atts": {"x": 2}, "text": "hello"},
                {"command": "get_text"},
            ]),
        );
        assert_eq!(
            outcome.effects,
            vec![CommandEffect::TextReply(
                r#"<rect width="4" x="1"/><text x="2">hello</text>"#.to_string()
            )]
        );
    }
}
