//! Persistence and notification seams.
//!
//! The model never talks to a backing store or a user directly; it is
//! handed a [`SnapshotSink`] and a [`Notifier`] and calls them. The
//! default implementations here cover the common deployment: a JSON
//! document on disk and tracing-backed notifications. Hosts with a
//! richer transport (an ORM record, a websocket, a toast system)
//! implement the traits themselves.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::table::Table;

/// Errors raised while persisting or loading a table document.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to serialize table document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Receiver of the full `{columns, rows}` document after every
/// committed mutation.
///
/// Calls are fire-and-forget from the editor's perspective: a failure
/// is reported through the [`Notifier`] and the in-memory table is not
/// rolled back, so state and backing store diverge until the next
/// successful persist. The sink imposes no ordering or debouncing -
/// the last write wins.
pub trait SnapshotSink {
    fn persist(&self, table: &Table) -> Result<(), SinkError>;
}

/// How urgently a notification should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable; the operation was skipped (e.g. oversized upload).
    Warning,
    /// The backing store may now be stale (e.g. persistence failure).
    Danger,
}

/// User-facing message channel for warnings and persistence failures.
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// A sink that writes the document as pretty-printed JSON to a fixed
/// path.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document back from disk, applying the legacy column
    /// tolerance described in [`crate::types`].
    pub fn load(&self) -> Result<Table, SinkError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| SinkError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl SnapshotSink for JsonFileSink {
    fn persist(&self, table: &Table) -> Result<(), SinkError> {
        let json = serde_json::to_string_pretty(table)?;
        std::fs::write(&self.path, json).map_err(|source| SinkError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "table document persisted");
        Ok(())
    }
}

/// A notifier that routes messages into the tracing pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Warning => warn!("{message}"),
            Severity::Danger => error!("{message}"),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording doubles shared by the crate's test modules.

    use std::sync::{Arc, Mutex};

    use super::{Notifier, Severity, SinkError, SnapshotSink};
    use crate::table::Table;

    /// Records every persisted document; optionally fails each call.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSink {
        pub(crate) persisted: Arc<Mutex<Vec<Table>>>,
        pub(crate) fail: bool,
    }

    impl SnapshotSink for RecordingSink {
        fn persist(&self, table: &Table) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError::Write {
                    path: "unwritable".into(),
                    source: std::io::Error::other("backing store down"),
                });
            }
            self.persisted.lock().unwrap().push(table.clone());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct RecordingNotifier {
        pub(crate) messages: Arc<Mutex<Vec<(String, Severity)>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str, severity: Severity) {
            self.messages
                .lock()
                .unwrap()
                .push((message.to_owned(), severity));
        }
    }
}
