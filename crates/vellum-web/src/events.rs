#![forbid(unsafe_code)]

//! Interaction event records.
//!
//! The browser shim extracts a fixed, allow-listed set of primitive fields
//! from each native event into a [`PointerRecord`], never reflection over
//! the opaque event object. The bridge resolves the target's logical name and
//! the surface-local position, producing the [`EventRecord`] that is buffered,
//! coalesced, and eventually delivered as an `event` message.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// DOM `buttons` bitset: the set of buttons held during an event.
    ///
    /// Encoded as a compact `u8` in JSON, exactly as the DOM reports it.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        const PRIMARY   = 0b0000_0001;
        const SECONDARY = 0b0000_0010;
        const AUXILIARY = 0b0000_0100;
        const BACK      = 0b0000_1000;
        const FORWARD   = 0b0001_0000;
    }
}

impl PointerButtons {
    #[must_use]
    pub const fn from_bits_truncate_u8(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }
}

mod buttons_bits {
    use super::PointerButtons;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        buttons: &PointerButtons,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(buttons.bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<PointerButtons, D::Error> {
        Ok(PointerButtons::from_bits_truncate(u8::deserialize(
            deserializer,
        )?))
    }
}

/// Allow-listed primitive fields of a native pointer/mouse event.
///
/// Field names match the DOM property names so the delivered payload reads
/// like the native event it was extracted from. Optional fields are omitted
/// from JSON when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerRecord {
    /// DOM event type (`"click"`, `"mousemove"`, ...); the coalescing key.
    #[serde(rename = "type")]
    pub event_type: String,
    pub client_x: f64,
    pub client_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<i16>,
    #[serde(default, with = "buttons_bits")]
    pub buttons: PointerButtons,
    #[serde(default)]
    pub alt_key: bool,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub meta_key: bool,
    #[serde(default)]
    pub shift_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<f64>,
}

impl PointerRecord {
    /// Minimal record: event type plus client coordinates, everything else
    /// absent or false.
    #[must_use]
    pub fn new(event_type: &str, client_x: f64, client_y: f64) -> Self {
        Self {
            event_type: event_type.to_string(),
            client_x,
            client_y,
            page_x: None,
            page_y: None,
            offset_x: None,
            offset_y: None,
            screen_x: None,
            screen_y: None,
            movement_x: None,
            movement_y: None,
            button: None,
            buttons: PointerButtons::empty(),
            alt_key: false,
            ctrl_key: false,
            meta_key: false,
            shift_key: false,
            detail: None,
            time_stamp: None,
        }
    }
}

/// One buffered (and eventually delivered) interaction event: the extracted
/// primitive fields plus the target's logical name and the event position in
/// surface-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(flatten)]
    pub pointer: PointerRecord,
    /// Logical name of the event target; empty for the bare surface.
    pub name: String,
    #[serde(rename = "svgX")]
    pub svg_x: f64,
    #[serde(rename = "svgY")]
    pub svg_y: f64,
}

impl EventRecord {
    /// The coalescing key: the DOM event type.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.pointer.event_type
    }
}
