//! User-facing notifications
//!
//! The dispatcher reports progress through an [`EventSink`]. Events are
//! delivered synchronously, inline, in the order they are generated. Two
//! shapes exist on the wire:
//!
//! ```json
//! {"type": "message", "data": {"content": "Playback paused."}}
//! {"type": "status", "data": {"status": "complete", "level": "info", "description": "Done", "done": true}}
//! ```

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Whether the request is still being worked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusState {
    InProgress,
    Complete,
}

/// Severity of a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Info,
    Error,
}

/// Payload of a status event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: StatusState,
    pub level: StatusLevel,
    pub description: String,
    pub done: bool,
}

/// Payload of a message event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub content: String,
}

/// A notification for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    Message(MessageContent),
    Status(StatusUpdate),
}

impl Event {
    pub fn message(content: impl Into<String>) -> Self {
        Event::Message(MessageContent {
            content: content.into(),
        })
    }

    /// `in_progress`, `info`, not done.
    pub fn in_progress(description: impl Into<String>) -> Self {
        Event::Status(StatusUpdate {
            status: StatusState::InProgress,
            level: StatusLevel::Info,
            description: description.into(),
            done: false,
        })
    }

    /// `complete`, `info`, done.
    pub fn completed(description: impl Into<String>) -> Self {
        Event::Status(StatusUpdate {
            status: StatusState::Complete,
            level: StatusLevel::Info,
            description: description.into(),
            done: true,
        })
    }

    /// `complete`, `error`, done.
    pub fn failed(description: impl Into<String>) -> Self {
        Event::Status(StatusUpdate {
            status: StatusState::Complete,
            level: StatusLevel::Error,
            description: description.into(),
            done: true,
        })
    }

    pub fn is_status(&self) -> bool {
        matches!(self, Event::Status(_))
    }
}

/// Receiver of dispatcher events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event) {}
}

/// Records events in memory, in order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Event>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Contents of the message events, in order.
    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Event::Message(m) => Some(m.content.clone()),
                Event::Status(_) => None,
            })
            .collect()
    }

    /// Status payloads, in order.
    pub fn statuses(&self) -> Vec<StatusUpdate> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Event::Status(s) => Some(s.clone()),
                Event::Message(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: Event) {
        self.events.lock().push(event);
    }
}

/// Forwards events to an unbounded tokio channel.
///
/// Sending never blocks; events emitted after the receiver is dropped are
/// discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: Event) {
        if self.tx.send(event).is_err() {
            debug!("Event receiver dropped; discarding event");
        }
    }
}

/// Prints messages to stdout and routes statuses to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, event: Event) {
        match event {
            Event::Message(m) => println!("{}", m.content),
            Event::Status(s) => match s.level {
                StatusLevel::Info => info!(done = s.done, "{}", s.description),
                StatusLevel::Error => warn!(done = s.done, "{}", s.description),
            },
        }
    }
}

/// Wraps a sink and drops status events; used when UI mode is off.
pub struct MessagesOnly<'a> {
    inner: &'a dyn EventSink,
}

impl<'a> MessagesOnly<'a> {
    pub fn new(inner: &'a dyn EventSink) -> Self {
        Self { inner }
    }
}

impl EventSink for MessagesOnly<'_> {
    fn emit(&self, event: Event) {
        if !event.is_status() {
            self.inner.emit(event);
        }
    }
}
