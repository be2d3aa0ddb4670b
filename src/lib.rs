//! IT intervention requests
//!
//! A requester fills in a short multi-step wizard describing who they are and
//! what is wrong. Once both steps validate, the request is rendered as a
//! fixed-layout A4 PDF and handed over to IT support by email.

pub mod domain;
pub use domain::{Config, Priority, RequestId, RequestRecord};

pub mod wizard;
pub use wizard::{Step, Wizard};

pub mod render;
pub use render::{DocumentRenderer, PdfRenderer, RenderedDocument};

pub mod handoff;
pub use handoff::EmailDraft;
