use super::{
    Transition, Wizard,
    controller::SubmitError,
    draft::Draft,
    validation::FieldErrors,
};

/// The local state of one step's form: the draft being edited and the
/// errors from the last submit attempt.
///
/// Editing a field clears that field's error only; the whole draft is
/// validated again on the next submit.
#[derive(Debug, Clone)]
pub struct Form<D: Draft> {
    draft: D,
    errors: FieldErrors<D::Field>,
}

impl<D: Draft> Form<D> {
    /// A form pre-filled from the wizard's record.
    #[must_use]
    pub fn open(wizard: &Wizard) -> Self {
        Self::new(wizard.draft())
    }

    /// A form around an explicit draft.
    #[must_use]
    pub fn new(draft: D) -> Self {
        Self {
            draft,
            errors: FieldErrors::default(),
        }
    }

    /// The draft being edited.
    #[must_use]
    pub const fn draft(&self) -> &D {
        &self.draft
    }

    /// Errors from the last submit attempt that have not been edited away.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors<D::Field> {
        &self.errors
    }

    /// The current value of `field`.
    #[must_use]
    pub fn get(&self, field: D::Field) -> &str {
        self.draft.get(field)
    }

    /// Change one field and clear its error.
    pub fn set(&mut self, field: D::Field, value: impl Into<String>) {
        self.draft.set(field, value.into());
        self.errors.clear(field);
    }

    /// Submit the draft to the wizard.
    ///
    /// On a validation failure the errors are kept on the form and also
    /// returned.
    ///
    /// # Errors
    ///
    /// See [`Wizard::submit`].
    pub fn submit(&mut self, wizard: &mut Wizard) -> Result<Transition, SubmitError<D::Field>> {
        match wizard.submit(&self.draft) {
            Ok(transition) => {
                self.errors = FieldErrors::default();
                Ok(transition)
            }
            Err(SubmitError::Invalid(errors)) => {
                self.errors = errors.clone();
                Err(SubmitError::Invalid(errors))
            }
            Err(other) => Err(other),
        }
    }
}
