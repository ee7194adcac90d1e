#![forbid(unsafe_code)]

//! Outbound traffic to the host.
//!
//! Two shapes leave the bridge: custom messages tagged
//! `{"indicator": ..., "payload": ...}` (coalesced events, markup replies)
//! and writes to the host's generic property store (bounding box, view box,
//! readiness and pending flags, watch acknowledgements). Both accumulate in
//! one bounded, host-drained queue.

use serde::Serialize;

use vellum_core::geometry::BBox;

use crate::events::EventRecord;

/// Custom message to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "indicator", content = "payload")]
pub enum HostMessage {
    /// One coalesced interaction event.
    #[serde(rename = "event")]
    Event(EventRecord),
    /// Reply to `get_text`: the surface's current child markup.
    #[serde(rename = "SVG_text")]
    SvgText(String),
}

/// Write to the host's property store. Property names are wire-stable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "property", content = "value")]
pub enum PropertyUpdate {
    /// Content extent reported by `fit`.
    #[serde(rename = "boundingBox")]
    BoundingBox(BBox),
    /// View box applied by `fit` with `changeView`.
    #[serde(rename = "viewBox")]
    ViewBox(String),
    /// Cleared when a batch finishes (success or failure); doubles as the
    /// per-batch change notification.
    #[serde(rename = "command_pending")]
    CommandPending(bool),
    /// Set once after the first successful render.
    #[serde(rename = "rendered")]
    Rendered(bool),
    /// Watch request acknowledged: the property resets to the empty string.
    #[serde(rename = "watch_event")]
    WatchEvent(String),
    /// Unwatch request acknowledged likewise.
    #[serde(rename = "unwatch_event")]
    UnwatchEvent(String),
}

/// One queued item of outbound traffic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outbound {
    Message(HostMessage),
    Property(PropertyUpdate),
}

impl Outbound {
    /// Encode as a stable JSON string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Append to a bounded queue, dropping oldest items on overflow.
pub(crate) fn push_bounded<T>(queue: &mut Vec<T>, item: T, limit: usize) {
    if queue.len() >= limit {
        let overflow = queue.len() - limit + 1;
        queue.drain(..overflow);
    }
    queue.push(item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PointerRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn event_message_wire_shape() {
        let message = Outbound::Message(HostMessage::Event(EventRecord {
            pointer: PointerRecord::new("click", 3.0, 4.0),
            name: "r1".to_string(),
            svg_x: 1.0,
            svg_y: 2.0,
        }));
        let json: serde_json::Value =
            serde_json::from_str(&message.to_json_string().unwrap()).unwrap();
        assert_eq!(json["indicator"], "event");
        assert_eq!(json["payload"]["name"], "r1");
        assert_eq!(json["payload"]["svgX"], 1.0);
        assert_eq!(json["payload"]["clientX"], 3.0);
    }

    #[test]
    fn text_reply_wire_shape() {
        let message = Outbound::Message(HostMessage::SvgText("<rect/>".to_string()));
        let json: serde_json::Value =
            serde_json::from_str(&message.to_json_string().unwrap()).unwrap();
        assert_eq!(json["indicator"], "SVG_text");
        assert_eq!(json["payload"], "<rect/>");
    }

    #[test]
    fn property_update_wire_names() {
        let cases = [
            (
                Outbound::Property(PropertyUpdate::CommandPending(false)),
                "command_pending",
            ),
            (
                Outbound::Property(PropertyUpdate::ViewBox("0 0 1 1".to_string())),
                "viewBox",
            ),
            (
                Outbound::Property(PropertyUpdate::WatchEvent(String::new())),
                "watch_event",
            ),
        ];
        for (update, property) in cases {
            let json: serde_json::Value =
                serde_json::from_str(&update.to_json_string().unwrap()).unwrap();
            assert_eq!(json["property"], property);
        }
    }

    #[test]
    fn bounded_push_drops_oldest() {
        let mut queue = Vec::new();
        for i in 0..5 {
            push_bounded(&mut queue, i, 3);
        }
        assert_eq!(queue, vec![2, 3, 4]);
    }
}
