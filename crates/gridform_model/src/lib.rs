//! Dynamic Table Model
//!
//! # Philosophy: One Aggregate, One Mutation Surface
//!
//! A gridform table is a schema-mutable grid: its column definitions
//! (name, type, selection options) can change at runtime, and every row
//! is kept in sync with the current schema. All of that synchronization
//! lives in a single [`Table`] aggregate - there is exactly one owner of
//! columns and rows, and the listed operations are its only mutation
//! surface. Nothing else holds the state.
//!
//! On top of the aggregate, [`TableEditor`] wires in the two injected
//! collaborators every deployment needs:
//!
//! - a [`SnapshotSink`] that receives the full document after each
//!   committed mutation (write-back persistence doubles as the change
//!   notification hook), and
//! - a [`Notifier`] that surfaces user-facing warnings and errors
//!   (oversized image uploads, persistence failures).
//!
//! # Modules
//!
//! - [`types`]: column definitions, column types, cell values
//! - [`table`]: the aggregate and its mutation operations
//! - [`editor`]: committed mutations + write-back
//! - [`ingest`]: size-bounded image ingestion into data URIs
//! - [`store`]: the sink/notifier seams and their default implementations

pub mod editor;
pub mod ingest;
pub mod store;
pub mod table;
pub mod types;

pub use editor::TableEditor;
pub use ingest::{IngestError, IngestOutcome, MAX_IMAGE_BYTES};
pub use store::{JsonFileSink, Notifier, Severity, SinkError, SnapshotSink, TracingNotifier};
pub use table::{ModelError, Row, Table};
pub use types::{CellValue, Column, ColumnType};
