//! The multi-step request wizard.
//!
//! The [`Wizard`] owns the request record and the current [`Step`]. Each
//! data-entry step edits a [`Draft`] (usually through a [`Form`]), which is
//! validated and merged into the record as a whole before the wizard moves
//! on.
//!
//! ```
//! use helpdesk::{
//!     domain::Domains,
//!     wizard::{RequesterDraft, Step, Wizard},
//! };
//!
//! let mut wizard = Wizard::new(Domains::default());
//! let draft = RequesterDraft {
//!     name: "A B".to_string(),
//!     employee_id: "1".to_string(),
//!     email: "a@b.com".to_string(),
//!     department: "Direction Technique".to_string(),
//!     phone: "+213000".to_string(),
//! };
//!
//! wizard.submit(&draft).unwrap();
//! assert_eq!(wizard.step(), Step::Issue);
//! ```

mod controller;
pub use controller::{
    AdvanceError, RenderGateError, RenderTicket, SubmitError, Transition, Wizard,
};

mod draft;
pub use draft::{Draft, IssueDraft, IssueField, RequesterDraft, RequesterField};

mod form;
pub use form::Form;

mod step;
pub use step::Step;

/// Per-step validation rules.
pub mod validation;
pub use validation::FieldErrors;
