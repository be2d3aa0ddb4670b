//! Hands a generated document over to IT support.
//!
//! The wizard does not send anything itself. It saves the document where the
//! user can attach it and prepares an email draft that a mail client can
//! open through a `mailto:` link.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use crate::{
    domain::RequestRecord, render::RenderedDocument, wizard::validation::is_email_address,
};

/// Errors raised by the hand-off.
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    /// No recipient address was given.
    #[error("no recipient address given")]
    MissingRecipient,

    /// The recipient is not an email address.
    #[error("'{0}' is not a valid email address")]
    InvalidRecipient(String),

    /// The subject or message was left blank.
    #[error("the email {0} is empty")]
    Blank(&'static str),

    /// There is no document to hand over yet.
    #[error("the request document has not been generated")]
    NotRendered,

    /// The document could not be saved.
    #[error("failed to save document: {0}")]
    Io(#[from] std::io::Error),
}

/// An email to IT support announcing an attached request document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl EmailDraft {
    /// The standard hand-off email for `record`, addressed to `to`.
    #[must_use]
    pub fn for_record(record: &RequestRecord, to: &str) -> Self {
        Self {
            to: to.trim().to_string(),
            subject: format!("IT Intervention Request #{}", record.id().prefix()),
            body: format!(
                "Dear IT Support Team,\n\n\
                 Please find attached the IT intervention request form for your review and \
                 action.\n\n\
                 Best regards,\n{}",
                record.requester().name
            ),
        }
    }

    /// Replace the subject and message with the user's own wording.
    pub fn edit(&mut self, subject: impl Into<String>, body: impl Into<String>) {
        self.subject = subject.into();
        self.body = body.into();
    }

    /// A `mailto:` link opening this draft in a mail client.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipient is blank or not an email address,
    /// or if the subject or message is blank.
    pub fn mailto(&self) -> Result<String, HandoffError> {
        if self.to.is_empty() {
            return Err(HandoffError::MissingRecipient);
        }
        if !is_email_address(&self.to) {
            return Err(HandoffError::InvalidRecipient(self.to.clone()));
        }
        if self.subject.trim().is_empty() {
            return Err(HandoffError::Blank("subject"));
        }
        if self.body.trim().is_empty() {
            return Err(HandoffError::Blank("message"));
        }
        Ok(format!(
            "mailto:{}?subject={}&body={}",
            self.to,
            percent_encode(&self.subject),
            percent_encode(&self.body)
        ))
    }
}

/// Write `document` into `dir` under its own file name.
///
/// The directory is created if needed. An existing file of the same name is
/// replaced.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
#[instrument(level = "debug", skip(document), fields(file = %document.filename))]
pub fn save_document(document: &RenderedDocument, dir: &Path) -> Result<PathBuf, HandoffError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&document.filename);
    fs::write(&path, &document.bytes)?;
    debug!("Saved {} bytes", document.bytes.len());
    Ok(path)
}

/// Percent-encode `text` for a URI query value.
///
/// Leaves the same characters unescaped as JavaScript's
/// `encodeURIComponent`, so spaces become `%20` and newlines `%0A`.
fn percent_encode(text: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(char::from(byte)),
            _ => {
                encoded.push('%');
                encoded.push(char::from(HEX[usize::from(byte >> 4)]));
                encoded.push(char::from(HEX[usize::from(byte & 0x0F)]));
            }
        }
    }
    encoded
}
