//! Domain models for IT intervention requests.
//!
//! This module contains the request record accumulated by the wizard, the
//! value sets its enumerated fields are checked against, and configuration.

/// The request record and its sub-records.
pub mod record;
pub use record::{Fragment, Issue, Location, RequestId, RequestRecord, Requester};

mod priority;
pub use priority::{ParsePriorityError, Priority};

mod domains;
pub use domains::{DEFAULT_CATEGORIES, DEFAULT_DEPARTMENTS, Domains};

mod config;
pub use config::{Config, ConfigError, OverflowPolicy};
