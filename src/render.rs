//! Turns a completed request record into a printable PDF document.
//!
//! Rendering is split in two: [`Layout`] places every element of the form on
//! A4 pages, and the PDF writer serialises those pages. Both are pure
//! functions of the record, so the same record always renders to the same
//! bytes.

use std::{future::Future, io};

use tracing::{debug, instrument};

use crate::domain::{Config, OverflowPolicy, RequestId, RequestRecord};

pub mod layout;
pub use layout::{Layout, badge_color, badge_label};

/// Helvetica font metrics and line wrapping.
pub mod metrics;

mod pdf;

/// Errors raised while generating a document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The record is missing required data.
    #[error(
        "cannot generate a document for an incomplete request (missing: {})",
        missing.join(", ")
    )]
    Incomplete {
        /// Names of the missing fields.
        missing: Vec<&'static str>,
    },

    /// The document could not be written.
    #[error("failed to write document: {0}")]
    Write(#[from] io::Error),
}

/// A generated document, ready to be saved or attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    /// Suggested file name, `IT_Request_<prefix>.pdf`.
    pub filename: String,
    /// The PDF file contents.
    pub bytes: Vec<u8>,
    /// The layout the bytes were produced from.
    pub layout: Layout,
    /// Fingerprint of the record the document was generated from.
    pub fingerprint: String,
}

/// The file name of the document generated for request `id`.
#[must_use]
pub fn filename(id: RequestId) -> String {
    format!("IT_Request_{}.pdf", id.prefix())
}

/// Something that can turn a record into a document.
///
/// Rendering may take time; the wizard awaits the returned future.
pub trait DocumentRenderer {
    /// Generate the document for `record`.
    fn render(
        &self,
        record: &RequestRecord,
    ) -> impl Future<Output = Result<RenderedDocument, RenderError>> + Send;
}

/// Renders the fixed-layout A4 request form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PdfRenderer {
    overflow: OverflowPolicy,
}

impl PdfRenderer {
    /// A renderer handling long descriptions with `overflow`.
    #[must_use]
    pub const fn new(overflow: OverflowPolicy) -> Self {
        Self { overflow }
    }

    /// A renderer configured from `config`.
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self::new(config.description_overflow)
    }

    /// Generate the document for `record` synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Incomplete`] if any required field is empty.
    #[instrument(level = "debug", skip_all, fields(request = %record.id().prefix()))]
    pub fn generate(&self, record: &RequestRecord) -> Result<RenderedDocument, RenderError> {
        let missing = record.missing_fields();
        if !missing.is_empty() {
            return Err(RenderError::Incomplete { missing });
        }

        let layout = Layout::new(record, self.overflow);
        let mut bytes = Vec::new();
        pdf::write_pdf(&layout, &mut bytes)?;
        debug!(
            "Rendered {} page(s), {} bytes",
            layout.pages().len(),
            bytes.len()
        );

        Ok(RenderedDocument {
            filename: filename(record.id()),
            bytes,
            layout,
            fingerprint: record.fingerprint(),
        })
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(
        &self,
        record: &RequestRecord,
    ) -> impl Future<Output = Result<RenderedDocument, RenderError>> + Send {
        std::future::ready(self.generate(record))
    }
}
