//! Size-bounded image ingestion.
//!
//! Image cells hold self-describing data URIs. Ingestion checks the
//! file length synchronously before anything else: an oversized file
//! is rejected with a single warning and no state change. Within the
//! bound, the read is the one asynchronous step in the model - the
//! cell assignment and write-back happen only after it completes, so
//! dropping the in-flight future cancels the ingestion cleanly. The
//! resuming path re-validates the target row index before writing
//! rather than trusting an index captured before the read.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;
use tracing::debug;

use crate::editor::TableEditor;
use crate::store::{Notifier, Severity, SnapshotSink};
use crate::table::ModelError;
use crate::types::CellValue;

/// Upper bound on an ingested image file, in bytes.
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

const SIZE_LIMIT_MESSAGE: &str = "Image size must be less than 2MB";

/// Errors raised by image ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to inspect {path}: {source}")]
    Inspect {
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

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Which ingestion path ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The data URI was assigned to the cell and persisted.
    Stored,
    /// The file exceeded [`MAX_IMAGE_BYTES`]; a warning was emitted
    /// and the table was left untouched.
    RejectedTooLarge { size: u64 },
}

/// Encode file bytes as a `data:{mime};base64,{payload}` URI. The MIME
/// type is guessed from the path, falling back to
/// `application/octet-stream`.
pub fn image_data_uri(path: &Path, bytes: &[u8]) -> String {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

impl<S: SnapshotSink, N: Notifier> TableEditor<S, N> {
    /// Ingest the image file at `path` into the named cell of row
    /// `row_index`.
    pub async fn attach_image(
        &mut self,
        row_index: usize,
        column_name: &str,
        path: &Path,
    ) -> Result<IngestOutcome, IngestError> {
        let size = std::fs::metadata(path)
            .map_err(|source| IngestError::Inspect {
                path: path.to_owned(),
                source,
            })?
            .len();
        if size > MAX_IMAGE_BYTES {
            self.notifier().notify(SIZE_LIMIT_MESSAGE, Severity::Warning);
            return Ok(IngestOutcome::RejectedTooLarge { size });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| IngestError::Read {
                path: path.to_owned(),
                source,
            })?;
        let uri = image_data_uri(path, &bytes);
        debug!(
            path = %path.display(),
            bytes = bytes.len(),
            "image encoded for ingestion"
        );

        // The row may have gone away while the read was in flight.
        self.table_mut()
            .edit_cell(row_index, column_name, CellValue::Text(uri))?;
        self.commit();
        Ok(IngestOutcome::Stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{RecordingNotifier, RecordingSink};
    use crate::table::Table;
    use crate::types::{Column, ColumnType};

    fn photo_table() -> Table {
        let mut table = Table {
            columns: vec![Column::new("Photo", ColumnType::Image)],
            rows: vec![],
        };
        table.add_row();
        table
    }

    #[test]
    fn test_image_data_uri_mime_from_path() {
        let uri = image_data_uri(Path::new("f.png"), b"f");
        assert_eq!(uri, "data:image/png;base64,Zg==");

        let uri = image_data_uri(Path::new("blob"), b"f");
        assert!(uri.starts_with("data:application/octet-stream;base64,"));
    }

    #[tokio::test]
    async fn test_attach_image_stores_data_uri_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("pic.png");
        std::fs::write(&image, b"f").unwrap();

        let sink = RecordingSink::default();
        let mut editor =
            TableEditor::new(photo_table(), sink.clone(), RecordingNotifier::default());

        let outcome = editor.attach_image(0, "Photo", &image).await.unwrap();

        assert_eq!(outcome, IngestOutcome::Stored);
        assert_eq!(
            editor.table().rows[0]["Photo"],
            CellValue::Text("data:image/png;base64,Zg==".into())
        );
        assert_eq!(sink.persisted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_attach_image_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("huge.png");
        std::fs::write(&image, vec![0u8; 3_000_000]).unwrap();

        let sink = RecordingSink::default();
        let notifier = RecordingNotifier::default();
        let mut editor = TableEditor::new(photo_table(), sink.clone(), notifier.clone());
        let before = editor.table().clone();

        let outcome = editor.attach_image(0, "Photo", &image).await.unwrap();

        assert_eq!(outcome, IngestOutcome::RejectedTooLarge { size: 3_000_000 });
        assert_eq!(editor.table(), &before);
        assert!(sink.persisted.lock().unwrap().is_empty());

        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0],
            (SIZE_LIMIT_MESSAGE.to_owned(), Severity::Warning)
        );
    }

    #[tokio::test]
    async fn test_attach_image_revalidates_row_index() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("pic.png");
        std::fs::write(&image, b"f").unwrap();

        let sink = RecordingSink::default();
        let mut editor = TableEditor::new(
            Table {
                columns: vec![Column::new("Photo", ColumnType::Image)],
                rows: vec![],
            },
            sink.clone(),
            RecordingNotifier::default(),
        );

        let err = editor.attach_image(0, "Photo", &image).await.unwrap_err();

        assert!(matches!(
            err,
            IngestError::Model(ModelError::RowIndexOutOfRange { index: 0, len: 0 })
        ));
        assert!(sink.persisted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_attach_image_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let mut editor = TableEditor::new(
            photo_table(),
            RecordingSink::default(),
            RecordingNotifier::default(),
        );

        let err = editor
            .attach_image(0, "Photo", &dir.path().join("absent.png"))
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Inspect { .. }));
    }
}
