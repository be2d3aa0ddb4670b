use std::fmt;

use serde::Deserialize;

use super::{
    Step,
    validation::{FieldErrors, validate_issue, validate_requester},
};
use crate::domain::{Domains, Fragment, Issue, RequestRecord, Requester};

/// The editable, unvalidated input of a single wizard step.
///
/// A draft is pre-filled from the record, edited field by field, and turned
/// into a typed fragment by [`Draft::validate`].
pub trait Draft: Clone + Default {
    /// Identifies one input of the step.
    type Field: Copy + Ord + fmt::Debug + fmt::Display;

    /// The validated sub-record this step contributes.
    type Fragment: Into<Fragment>;

    /// The step this draft belongs to.
    const STEP: Step;

    /// Pre-fill a draft from the current record.
    fn from_record(record: &RequestRecord) -> Self;

    /// The current value of `field`.
    fn get(&self, field: Self::Field) -> &str;

    /// Replace the value of `field`.
    fn set(&mut self, field: Self::Field, value: String);

    /// Validate the draft, producing the fragment to merge.
    ///
    /// # Errors
    ///
    /// Returns the field errors if any rule fails.
    fn validate(&self, domains: &Domains) -> Result<Self::Fragment, FieldErrors<Self::Field>>;

    /// The field errors of the draft; empty if it is valid.
    fn check(&self, domains: &Domains) -> FieldErrors<Self::Field> {
        self.validate(domains).err().unwrap_or_default()
    }
}

/// Inputs of the requester step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequesterField {
    /// Full name.
    Name,
    /// Employee number.
    EmployeeId,
    /// Email address.
    Email,
    /// Department.
    Department,
    /// Phone number.
    Phone,
}

impl RequesterField {
    /// All requester fields, in form order.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::EmployeeId,
        Self::Email,
        Self::Department,
        Self::Phone,
    ];

    /// Machine name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::EmployeeId => "employee_id",
            Self::Email => "email",
            Self::Department => "department",
            Self::Phone => "phone",
        }
    }

    /// Label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::EmployeeId => "Employee ID",
            Self::Email => "Email Address",
            Self::Department => "Department",
            Self::Phone => "Phone Number",
        }
    }
}

impl fmt::Display for RequesterField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs of the issue step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IssueField {
    /// Issue category.
    Category,
    /// Priority level.
    Priority,
    /// Free-text description.
    Description,
    /// Floor of the location.
    Floor,
    /// Office number of the location.
    OfficeNumber,
}

impl IssueField {
    /// All issue fields, in form order.
    pub const ALL: [Self; 5] = [
        Self::Category,
        Self::Priority,
        Self::Description,
        Self::Floor,
        Self::OfficeNumber,
    ];

    /// Machine name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Priority => "priority",
            Self::Description => "description",
            Self::Floor => "floor",
            Self::OfficeNumber => "office_number",
        }
    }

    /// Label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "Issue Category",
            Self::Priority => "Priority Level",
            Self::Description => "Issue Description",
            Self::Floor => "Floor Number",
            Self::OfficeNumber => "Office Number",
        }
    }
}

impl fmt::Display for IssueField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draft of the requester step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequesterDraft {
    /// Full name.
    pub name: String,
    /// Employee number.
    pub employee_id: String,
    /// Email address.
    pub email: String,
    /// Department.
    pub department: String,
    /// Phone number.
    pub phone: String,
}

impl Draft for RequesterDraft {
    type Field = RequesterField;
    type Fragment = Requester;

    const STEP: Step = Step::Requester;

    fn from_record(record: &RequestRecord) -> Self {
        let requester = record.requester();
        Self {
            name: requester.name.clone(),
            employee_id: requester.employee_id.clone(),
            email: requester.email.clone(),
            department: requester.department.clone(),
            phone: requester.phone.clone(),
        }
    }

    fn get(&self, field: RequesterField) -> &str {
        match field {
            RequesterField::Name => &self.name,
            RequesterField::EmployeeId => &self.employee_id,
            RequesterField::Email => &self.email,
            RequesterField::Department => &self.department,
            RequesterField::Phone => &self.phone,
        }
    }

    fn set(&mut self, field: RequesterField, value: String) {
        let slot = match field {
            RequesterField::Name => &mut self.name,
            RequesterField::EmployeeId => &mut self.employee_id,
            RequesterField::Email => &mut self.email,
            RequesterField::Department => &mut self.department,
            RequesterField::Phone => &mut self.phone,
        };
        *slot = value;
    }

    fn validate(&self, domains: &Domains) -> Result<Requester, FieldErrors<RequesterField>> {
        validate_requester(self, domains)
    }
}

/// Draft of the issue step.
///
/// The priority is kept as text until validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IssueDraft {
    /// Issue category.
    pub category: String,
    /// Priority name (`Low`, `Medium`, `High` or `Critical`).
    pub priority: String,
    /// Free-text description.
    pub description: String,
    /// Floor of the location.
    pub floor: String,
    /// Office number of the location.
    pub office_number: String,
}

impl Default for IssueDraft {
    fn default() -> Self {
        Self {
            category: String::new(),
            priority: crate::domain::Priority::default().to_string(),
            description: String::new(),
            floor: String::new(),
            office_number: String::new(),
        }
    }
}

impl Draft for IssueDraft {
    type Field = IssueField;
    type Fragment = Issue;

    const STEP: Step = Step::Issue;

    fn from_record(record: &RequestRecord) -> Self {
        let issue = record.issue();
        Self {
            category: issue.category.clone(),
            priority: issue.priority.to_string(),
            description: issue.description.clone(),
            floor: issue.location.floor.clone(),
            office_number: issue.location.office_number.clone(),
        }
    }

    fn get(&self, field: IssueField) -> &str {
        match field {
            IssueField::Category => &self.category,
            IssueField::Priority => &self.priority,
            IssueField::Description => &self.description,
            IssueField::Floor => &self.floor,
            IssueField::OfficeNumber => &self.office_number,
        }
    }

    fn set(&mut self, field: IssueField, value: String) {
        let slot = match field {
            IssueField::Category => &mut self.category,
            IssueField::Priority => &mut self.priority,
            IssueField::Description => &mut self.description,
            IssueField::Floor => &mut self.floor,
            IssueField::OfficeNumber => &mut self.office_number,
        };
        *slot = value;
    }

    fn validate(&self, domains: &Domains) -> Result<Issue, FieldErrors<IssueField>> {
        validate_issue(self, domains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, record::tests::complete_record};

    #[test]
    fn drafts_prefill_from_record() {
        let record = complete_record();

        let requester = RequesterDraft::from_record(&record);
        assert_eq!(requester.get(RequesterField::Name), "Amina Benali");
        assert_eq!(requester.get(RequesterField::Department), "Direction Technique");

        let issue = IssueDraft::from_record(&record);
        assert_eq!(issue.get(IssueField::Priority), "High");
        assert_eq!(issue.get(IssueField::OfficeNumber), "312");
    }

    #[test]
    fn fresh_record_prefills_default_priority() {
        let draft = IssueDraft::from_record(&RequestRecord::new());
        assert_eq!(draft.priority, Priority::Medium.to_string());
        assert_eq!(draft, IssueDraft::default());
    }

    #[test]
    fn prefilled_drafts_validate_back_to_the_record() {
        let record = complete_record();
        let domains = Domains::default();
        assert_eq!(
            &RequesterDraft::from_record(&record).validate(&domains).unwrap(),
            record.requester()
        );
        assert_eq!(
            &IssueDraft::from_record(&record).validate(&domains).unwrap(),
            record.issue()
        );
    }

    #[test]
    fn set_replaces_only_the_named_field() {
        let mut draft = RequesterDraft::default();
        for field in RequesterField::ALL {
            draft.set(field, field.label().to_string());
        }
        draft.set(RequesterField::Phone, "0555".to_string());
        assert_eq!(draft.get(RequesterField::Name), "Full Name");
        assert_eq!(draft.get(RequesterField::Phone), "0555");
    }

    #[test]
    fn check_is_empty_for_valid_draft() {
        let draft = RequesterDraft::from_record(&complete_record());
        assert!(draft.check(&Domains::default()).is_empty());
        assert_eq!(RequesterDraft::default().check(&Domains::default()).len(), 5);
    }
}
