#![forbid(unsafe_code)]

//! `vellum-web` is the view-side half of the Vellum rendering protocol.
//!
//! A host process sends ordered batches of drawing commands; this crate
//! applies them to a [`vellum_core::Surface`] and reports interaction events
//! back, coalesced per type within a short window.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes command messages,
//!   property writes, and raw events; outbound traffic accumulates in a
//!   bounded queue the host drains.
//! - **Deterministic time**: the host advances a monotonic clock explicitly;
//!   the coalescing window is a deadline, not a wall-clock timer.
//! - **No blocking / no threads**: suitable for single-threaded event-loop
//!   embeddings, `wasm32-unknown-unknown` included.
//!
//! This crate intentionally does not bind to `wasm-bindgen`; it provides the
//! building blocks a thin browser shim wraps with a stable JS API.

pub mod bridge;
pub mod coalesce;
pub mod command;
pub mod events;
pub mod interpreter;
pub mod messages;
pub mod params;

pub use bridge::{Bridge, BridgeConfig};
pub use coalesce::{CoalescerConfig, CoalescerState, EventCoalescer};
pub use command::{Command, CommandError, Scalar};
pub use events::{EventRecord, PointerButtons, PointerRecord};
pub use interpreter::{BatchOutcome, CommandEffect, ElementRegistry, Interpreter};
pub use messages::{HostMessage, Outbound, PropertyUpdate};
pub use params::ParameterSync;
