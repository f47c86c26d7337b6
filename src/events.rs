//! Circulation events for external integrations.
//!
//! The library appends an [`Event`] to its journal for every state change.
//! Callers either drain the journal themselves or flush it into an
//! [`EventSink`], which writes one JSON object per line.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::ids::MemberId;

pub const EVENT_SCHEMA_VERSION: &str = "circulate.event.v1";

/// High-level event kinds emitted by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    BookAdded,
    BookRepaired,
    BookDisposed,
    MemberAdded,
    PendingListOpened,
    LoanStaged,
    PendingLoansCleared,
    LoansCommitted,
    CommitRejected,
    OverdueSweep,
    LoanDischarged,
    BookLost,
    FineAdded,
    FinePaid,
}

/// A structured event with optional payload.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub schema_version: &'static str,
    pub event: EventKind,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Event {
    /// Build a new event with no payload.
    pub fn new(event: EventKind, member: Option<MemberId>) -> Self {
        Self {
            schema_version: EVENT_SCHEMA_VERSION,
            event,
            timestamp: Utc::now(),
            member,
            data: None,
        }
    }

    /// Attach a JSON payload to the event.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Writes events as JSON lines
pub struct EventSink {
    writer: Box<dyn Write + Send>,
}

impl EventSink {
    /// Sink over any writer, e.g. a socket or an in-memory buffer
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
        }
    }

    /// Sink appending to the journal file at `path`, created if missing
    pub fn append_to(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }

    /// Write one event as a single line
    pub fn emit(&mut self, event: &Event) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
