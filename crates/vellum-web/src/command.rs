#![forbid(unsafe_code)]

//! Command schema and JSON decoding.
//!
//! The host delivers one message per batch: a JSON pair
//! `[counter, [command, command, ...]]`. Each command is an object tagged by
//! its `"command"` field. Decoding is per item, in order: an item that fails
//! to decode aborts the remainder of its batch while the effects of earlier
//! items persist, so the envelope is split from item decoding here.
//!
//! Unknown tags and missing required fields are decoding errors, not
//! missing-method faults.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from decoding host input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The `[counter, commands]` envelope did not parse.
    Envelope(String),
    /// One batch item did not decode as a known command.
    Item { index: usize, message: String },
    /// A serialized style mapping did not parse.
    StyleMap(String),
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Envelope(msg) => write!(f, "malformed command envelope: {msg}"),
            Self::Item { index, message } => {
                write!(f, "malformed command at index {index}: {message}")
            }
            Self::StyleMap(msg) => write!(f, "malformed style mapping: {msg}"),
        }
    }
}

impl std::error::Error for CommandError {}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// Attribute or style value as sent by the host: the producer historically
/// sent numbers for coordinates and strings for everything else.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Natural string form for use as an attribute or style value
    /// (`1`, not `1.0`; `1.5` stays `1.5`).
    #[must_use]
    pub fn to_attr_string(&self) -> String {
        match self {
            Self::Flag(flag) => flag.to_string(),
            Self::Number(number) => format!("{number}"),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Attribute/style payload: key → scalar.
pub type ScalarMap = BTreeMap<String, Scalar>;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// One drawing/update instruction, tagged by its `"command"` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Fit the reported bounding box (and optionally the view box) to the
    /// surface's current content extent.
    Fit {
        #[serde(rename = "changeView")]
        change_view: bool,
    },
    /// Create a node, apply the update rules, append it, register its name.
    AddElement {
        tag: String,
        name: String,
        #[serde(default)]
        atts: Option<ScalarMap>,
        #[serde(default)]
        style: Option<ScalarMap>,
        #[serde(default)]
        text: Option<String>,
    },
    /// Apply the update rules to an existing named node.
    ChangeElement {
        name: String,
        #[serde(default)]
        atts: Option<ScalarMap>,
        #[serde(default)]
        style: Option<ScalarMap>,
        #[serde(default)]
        text: Option<String>,
    },
    /// Remove the named nodes; absent names are ignored.
    Delete { names: Vec<String> },
    /// Remove every node and clear the registry.
    Empty,
    /// Reply with the surface's current child markup.
    GetText,
}

/// Decode the `[counter, commands]` pair, leaving items undecoded.
pub fn decode_envelope(json: &str) -> Result<(u64, Vec<Value>), CommandError> {
    let (counter, items): (u64, Vec<Value>) =
        serde_json::from_str(json).map_err(|err| CommandError::Envelope(err.to_string()))?;
    Ok((counter, items))
}

/// Decode one batch item at `index`.
pub fn decode_command(value: &Value, index: usize) -> Result<Command, CommandError> {
    Command::deserialize(value).map_err(|err| CommandError::Item {
        index,
        message: err.to_string(),
    })
}

/// Decode a serialized style mapping (`{"key": value, ...}`) into strings.
pub fn decode_style_map(json: &str) -> Result<BTreeMap<String, String>, CommandError> {
    let raw: ScalarMap =
        serde_json::from_str(json).map_err(|err| CommandError::StyleMap(err.to_string()))?;
    Ok(raw
        .iter()
        .map(|(key, value)| (key.clone(), value.to_attr_string()))
        .collect())
}
