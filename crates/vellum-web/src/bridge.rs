#![forbid(unsafe_code)]

//! Bridge controller.
//!
//! Wires the interpreter, parameter sync, and event coalescer to the host's
//! message channel. Inbound: command batch envelopes and property writes.
//! Outbound: everything accumulates in one bounded queue the host drains
//! after each call; this core never pushes into the transport itself.
//!
//! Time is host-advanced: the host calls [`Bridge::tick`] with its monotonic
//! clock (typically from the timer it schedules for
//! [`Bridge::next_deadline`]), which keeps the coalescing window
//! deterministic and testable.

use std::time::Duration;

use tracing::debug;

use vellum_core::node::NodeId;
use vellum_core::surface::{Dimension, Surface, SurfaceParams};
use vellum_core::transform::Transform2d;

use crate::coalesce::{CoalescerConfig, EventCoalescer};
use crate::command::{CommandError, decode_envelope};
use crate::events::{EventRecord, PointerRecord};
use crate::interpreter::{CommandEffect, Interpreter};
use crate::messages::{HostMessage, Outbound, PropertyUpdate, push_bounded};
use crate::params::ParameterSync;

/// Default bound for the host-drained outbound queue.
pub const DEFAULT_OUTBOUND_LIMIT: usize = 512;

/// Bridge tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Outbound queue bound; oldest items drop on overflow.
    pub outbound_limit: usize,
    pub coalescer: CoalescerConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            outbound_limit: DEFAULT_OUTBOUND_LIMIT,
            coalescer: CoalescerConfig::default(),
        }
    }
}

/// The view-side half of the rendering protocol.
#[derive(Debug)]
pub struct Bridge {
    config: BridgeConfig,
    surface: Surface,
    interpreter: Interpreter,
    params: ParameterSync,
    coalescer: EventCoalescer,
    outbound: Vec<Outbound>,
    command_pending: bool,
    rendered: bool,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    #[must_use]
    pub fn with_config(config: BridgeConfig) -> Self {
        Self {
            config,
            surface: Surface::new(),
            interpreter: Interpreter::new(),
            params: ParameterSync::new(SurfaceParams::default()),
            coalescer: EventCoalescer::new(config.coalescer),
            outbound: Vec::new(),
            command_pending: false,
            rendered: false,
        }
    }

    // -- readiness ----------------------------------------------------------

    /// First call applies the parameter set, marks the surface rendered, and
    /// notifies the host once. Later calls are no-ops.
    pub fn render(&mut self) {
        if self.rendered {
            return;
        }
        self.params.apply(&mut self.surface);
        self.rendered = true;
        self.push(Outbound::Property(PropertyUpdate::Rendered(true)));
    }

    #[must_use]
    pub fn rendered(&self) -> bool {
        self.rendered
    }

    #[must_use]
    pub fn command_pending(&self) -> bool {
        self.command_pending
    }

    // -- inbound: commands --------------------------------------------------

    /// Apply one `[counter, commands]` batch message.
    ///
    /// The pending flag is cleared and the per-batch change notification is
    /// posted on every exit path, so a malformed batch cannot leave the host
    /// waiting on completion.
    pub fn handle_commands(&mut self, json: &str) -> Result<(), CommandError> {
        self.command_pending = true;
        let result = self.run_batch(json);
        self.command_pending = false;
        self.push(Outbound::Property(PropertyUpdate::CommandPending(false)));
        result
    }

    fn run_batch(&mut self, json: &str) -> Result<(), CommandError> {
        let (counter, items) = decode_envelope(json)?;
        // The transport guarantees ordering; the counter is informational.
        debug!(counter, items = items.len(), "received command batch");
        let outcome = self.interpreter.apply_batch(&mut self.surface, &items);
        for effect in outcome.effects {
            match effect {
                CommandEffect::BoundingBox(bbox) => {
                    self.push(Outbound::Property(PropertyUpdate::BoundingBox(bbox)));
                }
                CommandEffect::ViewBox(view_box) => {
                    self.params.set_view_box(&view_box, &mut self.surface);
                    self.push(Outbound::Property(PropertyUpdate::ViewBox(view_box)));
                }
                CommandEffect::TextReply(markup) => {
                    self.push(Outbound::Message(HostMessage::SvgText(markup)));
                }
            }
        }
        match outcome.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    // -- inbound: property writes -------------------------------------------

    pub fn set_view_box(&mut self, view_box: &str) {
        self.params.set_view_box(view_box, &mut self.surface);
    }

    pub fn set_width(&mut self, width: Dimension) {
        self.params.set_width(width, &mut self.surface);
    }

    pub fn set_height(&mut self, height: Dimension) {
        self.params.set_height(height, &mut self.surface);
    }

    /// Merge a serialized style mapping into the surface parameters.
    pub fn set_style(&mut self, json: &str) -> Result<(), CommandError> {
        self.params.set_style_json(json, &mut self.surface)
    }

    /// Start watching a space-or-comma-separated event type list, then
    /// acknowledge by resetting the property (write-once-consume).
    pub fn watch_events(&mut self, list: &str) {
        if list.trim().is_empty() {
            return;
        }
        self.coalescer.watch(list);
        self.push(Outbound::Property(PropertyUpdate::WatchEvent(String::new())));
    }

    /// Stop watching the listed event types, then acknowledge likewise.
    /// Records already buffered still flush on the next tick past deadline.
    pub fn unwatch_events(&mut self, list: &str) {
        if list.trim().is_empty() {
            return;
        }
        self.coalescer.unwatch(list);
        self.push(Outbound::Property(PropertyUpdate::UnwatchEvent(String::new())));
    }

    /// Host-supplied screen transform (local → client coordinates).
    pub fn set_screen_transform(&mut self, transform: Transform2d) {
        self.surface.set_screen_transform(transform);
    }

    // -- inbound: interaction events ----------------------------------------

    /// Resolve a target name for the shim: the registry lookup half of the
    /// event path.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<NodeId> {
        self.interpreter.registry().get(name)
    }

    /// Observe one raw interaction event at host time `now`.
    ///
    /// The target's logical name (empty for the bare surface or a stale
    /// handle) and the surface-local position are attached before the record
    /// enters the coalescing buffer. The position maps through the inverse of
    /// the current screen transform, recomputed per event. Returns whether
    /// the record was buffered (unwatched types are ignored).
    pub fn observe_event(
        &mut self,
        target: Option<NodeId>,
        pointer: PointerRecord,
        now: Duration,
    ) -> bool {
        if !self.coalescer.is_watched(&pointer.event_type) {
            return false;
        }
        let name = target
            .and_then(|id| self.surface.target_name(id))
            .unwrap_or_default()
            .to_string();
        let (svg_x, svg_y) = self
            .surface
            .screen_to_local(pointer.client_x, pointer.client_y);
        self.coalescer.observe(
            EventRecord {
                pointer,
                name,
                svg_x,
                svg_y,
            },
            now,
        )
    }

    // -- timing and outbound -------------------------------------------------

    /// Advance host time: flush the coalescer if its deadline has passed,
    /// queueing one `event` message per buffered type. Returns the number of
    /// messages queued.
    pub fn tick(&mut self, now: Duration) -> usize {
        let flushed = self.coalescer.poll(now);
        let count = flushed.len();
        for record in flushed {
            self.push(Outbound::Message(HostMessage::Event(record)));
        }
        count
    }

    /// When the host should next call [`Bridge::tick`].
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.coalescer.next_deadline()
    }

    /// Take all queued outbound traffic, oldest first.
    pub fn drain_outbound(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbound)
    }

    /// The live surface, for markup and extent queries.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    fn push(&mut self, item: Outbound) {
        push_bounded(&mut self.outbound, item, self.config.outbound_limit);
    }
}
