use std::fmt;

use tracing::{debug, info, instrument, warn};

use super::{
    Step,
    draft::Draft,
    validation::{FieldErrors, validate_issue, validate_requester},
};
use crate::{
    domain::{Domains, Fragment, RequestRecord},
    handoff::{EmailDraft, HandoffError},
    render::{DocumentRenderer, RenderError, RenderedDocument},
    wizard::draft::{IssueDraft, RequesterDraft},
};

/// The outcome of a navigation request.
///
/// `from == to` when the request was a no-op (for example retreating from
/// the first step). Presentation layers use a change to reset their view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The step before the request.
    pub from: Step,
    /// The step after the request.
    pub to: Step,
}

impl Transition {
    const fn stay(step: Step) -> Self {
        Self {
            from: step,
            to: step,
        }
    }

    /// Whether the current step changed.
    #[must_use]
    pub fn changed(self) -> bool {
        self.from != self.to
    }
}

/// Reasons the wizard refuses to leave the current step.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AdvanceError {
    /// The record's data for the step does not pass validation.
    #[error("{step} is incomplete: {}", fields.join(", "))]
    Invalid {
        /// The step being left.
        step: Step,
        /// Fields that failed validation.
        fields: Vec<String>,
    },

    /// The request cannot be completed before its document is generated.
    #[error("the request document must be generated before the request can be completed")]
    NotRendered,

    /// A document is being generated.
    #[error("cannot change step while the document is being generated")]
    RenderPending,
}

/// Errors returned when submitting a step's draft.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError<F: Ord> {
    /// The draft belongs to a different step than the current one.
    #[error("cannot submit {submitted} while on {current}")]
    WrongStep {
        /// The wizard's current step.
        current: Step,
        /// The step the draft belongs to.
        submitted: Step,
    },

    /// The draft failed validation. Nothing was merged.
    #[error("{0}")]
    Invalid(FieldErrors<F>),
}

/// Reasons a render cannot start or its result cannot be accepted.
#[derive(Debug, thiserror::Error)]
pub enum RenderGateError {
    /// Documents are only generated on the render step.
    #[error("documents can only be generated on {render}, not {0}", render = Step::Render)]
    WrongStep(Step),

    /// The record does not pass validation, so no document is generated.
    #[error("the request is invalid: {}", fields.join(", "))]
    Invalid {
        /// Fields that failed validation.
        fields: Vec<String>,
    },

    /// Another render is still pending.
    #[error("a document is already being generated")]
    Pending,

    /// The record changed (or was reset) after the render started.
    #[error("the request changed while the document was being generated")]
    Stale,

    /// The renderer failed.
    #[error(transparent)]
    Failed(#[from] RenderError),
}

/// Proof that a render was started.
///
/// Holds the snapshot of the record being rendered. Exactly one ticket can
/// be outstanding at a time; hand it back with [`Wizard::finish_render`].
#[derive(Debug)]
#[must_use = "a pending render blocks navigation until it is finished"]
pub struct RenderTicket {
    generation: u64,
    record: RequestRecord,
    fingerprint: String,
}

impl RenderTicket {
    /// The record to render.
    #[must_use]
    pub const fn record(&self) -> &RequestRecord {
        &self.record
    }
}

/// Drives a single request through the wizard steps.
///
/// The wizard exclusively owns the request record for the lifetime of a
/// session. The record only changes through whole-fragment merges, and the
/// wizard only leaves a step once that step's gate is satisfied.
#[derive(Debug)]
pub struct Wizard {
    step: Step,
    record: RequestRecord,
    domains: Domains,
    document: Option<RenderedDocument>,
    pending_render: Option<u64>,
    render_generation: u64,
}

impl Wizard {
    /// Start a session with a fresh record.
    #[must_use]
    pub fn new(domains: Domains) -> Self {
        Self::with_record(RequestRecord::new(), domains)
    }

    /// Start a session around an existing (typically empty) record.
    #[must_use]
    pub const fn with_record(record: RequestRecord, domains: Domains) -> Self {
        Self {
            step: Step::Requester,
            record,
            domains,
            document: None,
            pending_render: None,
            render_generation: 0,
        }
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    /// The request record.
    #[must_use]
    pub const fn record(&self) -> &RequestRecord {
        &self.record
    }

    /// The value sets drafts are validated against.
    #[must_use]
    pub const fn domains(&self) -> &Domains {
        &self.domains
    }

    /// Whether a document has been generated for the current record.
    #[must_use]
    pub const fn is_rendered(&self) -> bool {
        self.document.is_some()
    }

    /// Whether a render is in progress.
    #[must_use]
    pub const fn is_rendering(&self) -> bool {
        self.pending_render.is_some()
    }

    /// The document generated for the current record, if any.
    #[must_use]
    pub const fn document(&self) -> Option<&RenderedDocument> {
        self.document.as_ref()
    }

    /// A draft for step `D`, pre-filled from the record.
    #[must_use]
    pub fn draft<D: Draft>(&self) -> D {
        D::from_record(&self.record)
    }

    /// Validate a draft for the current step, merge it and advance.
    ///
    /// On failure the record and step are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::WrongStep`] if the draft is for another step,
    /// or [`SubmitError::Invalid`] with the field errors if validation
    /// fails.
    #[instrument(level = "debug", skip_all, fields(step = %D::STEP))]
    pub fn submit<D: Draft>(&mut self, draft: &D) -> Result<Transition, SubmitError<D::Field>> {
        if self.step != D::STEP {
            warn!("Refused submission for {} while on {}", D::STEP, self.step);
            return Err(SubmitError::WrongStep {
                current: self.step,
                submitted: D::STEP,
            });
        }

        let fragment = draft.validate(&self.domains).map_err(|errors| {
            debug!("Validation failed: {errors}");
            SubmitError::Invalid(errors)
        })?;

        self.merge(fragment.into());
        Ok(self.move_to_next())
    }

    /// Replace a sub-record with a validated fragment.
    ///
    /// A merge that changes the record invalidates any generated document.
    pub(crate) fn merge(&mut self, fragment: Fragment) {
        if self.record.merge(fragment) {
            info!("Merged changes into request {}", self.record.id().prefix());
            if self.document.take().is_some() {
                info!("Discarded document generated before the change");
            }
        }
    }

    /// Move to the next step if the current step's gate is satisfied.
    ///
    /// Advancing from the terminal step is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the record's data for the current step is
    /// invalid, if the document has not been generated on the render step,
    /// or if a render is pending.
    pub fn advance(&mut self) -> Result<Transition, AdvanceError> {
        if self.is_rendering() {
            warn!("Refused to advance while a render is pending");
            return Err(AdvanceError::RenderPending);
        }

        match self.step {
            Step::Requester => {
                let draft = RequesterDraft::from_record(&self.record);
                gate(self.step, validate_requester(&draft, &self.domains).err())?;
            }
            Step::Issue => {
                let draft = IssueDraft::from_record(&self.record);
                gate(self.step, validate_issue(&draft, &self.domains).err())?;
            }
            Step::Review | Step::Confirmation => {}
            Step::Render => {
                if !self.is_rendered() {
                    warn!("Refused to complete request before its document was generated");
                    return Err(AdvanceError::NotRendered);
                }
            }
        }

        Ok(self.move_to_next())
    }

    /// Move to the previous step.
    ///
    /// Retreating from the first step, or while a render is pending, is a
    /// no-op.
    pub fn retreat(&mut self) -> Transition {
        if self.is_rendering() {
            warn!("Ignored retreat while a render is pending");
            return Transition::stay(self.step);
        }

        let from = self.step;
        if let Some(previous) = from.previous() {
            self.step = previous;
            debug!("Moved back from {from} to {previous}");
        }
        Transition { from, to: self.step }
    }

    /// Discard the record and start over at the first step.
    ///
    /// The new record has a new identifier and creation date. A render that
    /// is still pending will be rejected as stale when it finishes.
    pub fn reset(&mut self) -> Transition {
        let from = self.step;
        self.record = RequestRecord::new();
        self.step = Step::Requester;
        self.document = None;
        self.pending_render = None;
        info!("Started new request {}", self.record.id().prefix());
        Transition { from, to: self.step }
    }

    /// Start generating the document for the current record.
    ///
    /// # Errors
    ///
    /// Returns an error if the wizard is not on the render step, another
    /// render is pending, or the record no longer passes validation.
    pub fn begin_render(&mut self) -> Result<RenderTicket, RenderGateError> {
        if self.step != Step::Render {
            return Err(RenderGateError::WrongStep(self.step));
        }
        if self.is_rendering() {
            warn!("Refused concurrent render");
            return Err(RenderGateError::Pending);
        }

        let fields = self.invalid_fields();
        if !fields.is_empty() {
            warn!("Refused to render an invalid request: {}", fields.join(", "));
            return Err(RenderGateError::Invalid { fields });
        }

        self.render_generation += 1;
        self.pending_render = Some(self.render_generation);
        debug!("Render {} started", self.render_generation);

        Ok(RenderTicket {
            generation: self.render_generation,
            record: self.record.clone(),
            fingerprint: self.record.fingerprint(),
        })
    }

    /// Accept the outcome of a render started with [`Self::begin_render`].
    ///
    /// A failed render leaves the wizard as it was before the render, apart
    /// from the render no longer being pending; the caller may retry.
    ///
    /// # Errors
    ///
    /// Returns the render failure, or [`RenderGateError::Stale`] if the
    /// record was changed or reset while the render was running.
    pub fn finish_render(
        &mut self,
        ticket: RenderTicket,
        outcome: Result<RenderedDocument, RenderError>,
    ) -> Result<&RenderedDocument, RenderGateError> {
        let RenderTicket {
            generation,
            record,
            fingerprint,
        } = ticket;

        if self.pending_render != Some(generation) {
            warn!("Discarded result of stale render {generation}");
            return Err(RenderGateError::Stale);
        }
        self.pending_render = None;

        let document = outcome.inspect_err(|e| warn!("Render failed: {e}"))?;

        if record.id() != self.record.id() || fingerprint != self.record.fingerprint() {
            warn!("Discarded render of an outdated record");
            return Err(RenderGateError::Stale);
        }

        info!("Generated {}", document.filename);
        Ok(self.mark_rendered(document))
    }

    /// Generate the document with `renderer`, awaiting its completion.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_render`] and [`Self::finish_render`].
    pub async fn render<R: DocumentRenderer + Sync>(
        &mut self,
        renderer: &R,
    ) -> Result<&RenderedDocument, RenderGateError> {
        let ticket = self.begin_render()?;
        let outcome = renderer.render(ticket.record()).await;
        self.finish_render(ticket, outcome)
    }

    /// The email hand-off for the generated document.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError::NotRendered`] if no document has been
    /// generated for the current record.
    pub fn email_draft(&self, to: &str) -> Result<EmailDraft, HandoffError> {
        if !self.is_rendered() {
            return Err(HandoffError::NotRendered);
        }
        Ok(EmailDraft::for_record(&self.record, to))
    }

    /// Fields of the record that fail their step's validation.
    fn invalid_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        let requester = RequesterDraft::from_record(&self.record);
        if let Err(errors) = validate_requester(&requester, &self.domains) {
            fields.extend(errors.fields().map(|field| field.to_string()));
        }
        let issue = IssueDraft::from_record(&self.record);
        if let Err(errors) = validate_issue(&issue, &self.domains) {
            fields.extend(errors.fields().map(|field| field.to_string()));
        }
        fields
    }

    fn mark_rendered(&mut self, document: RenderedDocument) -> &RenderedDocument {
        self.document.insert(document)
    }

    fn move_to_next(&mut self) -> Transition {
        let from = self.step;
        if let Some(next) = from.next() {
            self.step = next;
            debug!("Advanced from {from} to {next}");
        }
        Transition { from, to: self.step }
    }
}

fn gate<F: Ord + Copy + fmt::Display>(
    step: Step,
    errors: Option<FieldErrors<F>>,
) -> Result<(), AdvanceError> {
    errors.map_or(Ok(()), |errors| {
        warn!("Refused to leave {step}: {errors}");
        Err(AdvanceError::Invalid {
            step,
            fields: errors.fields().map(|field| field.to_string()).collect(),
        })
    })
}
