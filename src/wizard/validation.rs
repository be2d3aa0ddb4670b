//! Per-step validation rules.
//!
//! Validators are pure: they take a step's draft and the enumerated value
//! sets, and either produce the typed fragment to merge or a map of field
//! errors. They run on every submit attempt.

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;

use super::draft::{IssueDraft, IssueField, RequesterDraft, RequesterField};
use crate::domain::{Domains, Issue, Location, Priority, Requester};

/// Minimum length of an issue description, in characters, after trimming.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid regex"));

/// Whether `value` has the shape `local@domain.tld`.
///
/// Exactly one `@`, non-empty local and domain parts, no whitespace, and at
/// least one dot in the domain with non-empty labels on either side.
#[must_use]
pub fn is_email_address(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

/// Human-readable validation errors, keyed by field.
///
/// An empty map means the draft is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: Ord>(BTreeMap<F, String>);

impl<F: Ord> Default for FieldErrors<F> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<F: Ord + Copy> FieldErrors<F> {
    /// Record an error for `field`, replacing any previous one.
    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// The error for `field`, if any.
    #[must_use]
    pub fn get(&self, field: F) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Remove the error for `field`.
    ///
    /// Returns `true` if there was one.
    pub fn clear(&mut self, field: F) -> bool {
        self.0.remove(&field).is_some()
    }

    /// Whether there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The fields that have errors, in field order.
    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.0.keys().copied()
    }

    /// Iterate over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl<F: Ord + Copy + fmt::Display> fmt::Display for FieldErrors<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, (field, message)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Records `message` against `field` if `value` is blank.
///
/// Returns `true` if the value was present.
fn require<F: Ord + Copy>(
    errors: &mut FieldErrors<F>,
    field: F,
    value: &str,
    message: &str,
) -> bool {
    if value.trim().is_empty() {
        errors.insert(field, message);
        false
    } else {
        true
    }
}

/// Validate the requester step.
///
/// # Errors
///
/// Returns the field errors if any rule fails. Nothing is returned partially.
pub fn validate_requester(
    draft: &RequesterDraft,
    domains: &Domains,
) -> Result<Requester, FieldErrors<RequesterField>> {
    let mut errors = FieldErrors::default();

    require(&mut errors, RequesterField::Name, &draft.name, "Name is required");
    require(
        &mut errors,
        RequesterField::EmployeeId,
        &draft.employee_id,
        "Employee ID is required",
    );
    if require(&mut errors, RequesterField::Email, &draft.email, "Email is required")
        && !is_email_address(&draft.email)
    {
        errors.insert(RequesterField::Email, "Email is invalid");
    }
    if require(
        &mut errors,
        RequesterField::Department,
        &draft.department,
        "Department is required",
    ) && !domains.is_department(draft.department.trim())
    {
        errors.insert(
            RequesterField::Department,
            format!("'{}' is not a recognised department", draft.department.trim()),
        );
    }
    require(
        &mut errors,
        RequesterField::Phone,
        &draft.phone,
        "Phone number is required",
    );

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Requester {
        name: draft.name.trim().to_string(),
        employee_id: draft.employee_id.trim().to_string(),
        email: draft.email.trim().to_string(),
        department: draft.department.trim().to_string(),
        phone: draft.phone.trim().to_string(),
    })
}

/// Validate the issue step.
///
/// # Errors
///
/// Returns the field errors if any rule fails. Nothing is returned partially.
pub fn validate_issue(
    draft: &IssueDraft,
    domains: &Domains,
) -> Result<Issue, FieldErrors<IssueField>> {
    let mut errors = FieldErrors::default();

    if require(
        &mut errors,
        IssueField::Category,
        &draft.category,
        "Category is required",
    ) && !domains.is_category(draft.category.trim())
    {
        errors.insert(
            IssueField::Category,
            format!("'{}' is not a recognised category", draft.category.trim()),
        );
    }

    let priority = draft
        .priority
        .parse::<Priority>()
        .map_err(|e| errors.insert(IssueField::Priority, e.to_string()))
        .ok();

    if require(
        &mut errors,
        IssueField::Description,
        &draft.description,
        "Description is required",
    ) && draft.description.trim().chars().count() < MIN_DESCRIPTION_CHARS
    {
        errors.insert(
            IssueField::Description,
            format!("Description must be at least {MIN_DESCRIPTION_CHARS} characters"),
        );
    }
    require(&mut errors, IssueField::Floor, &draft.floor, "Floor number is required");
    require(
        &mut errors,
        IssueField::OfficeNumber,
        &draft.office_number,
        "Office number is required",
    );

    match priority {
        Some(priority) if errors.is_empty() => Ok(Issue {
            category: draft.category.trim().to_string(),
            priority,
            description: draft.description.trim().to_string(),
            location: Location {
                floor: draft.floor.trim().to_string(),
                office_number: draft.office_number.trim().to_string(),
            },
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn requester() -> RequesterDraft {
        RequesterDraft {
            name: "A B".to_string(),
            employee_id: "1".to_string(),
            email: "a@b.com".to_string(),
            department: "Direction Technique".to_string(),
            phone: "+213000".to_string(),
        }
    }

    fn issue() -> IssueDraft {
        IssueDraft {
            category: "Hardware".to_string(),
            priority: "High".to_string(),
            description: "Screen flickers after docking".to_string(),
            floor: "2".to_string(),
            office_number: "204".to_string(),
        }
    }

    #[test_case("a@b.com", true; "simple")]
    #[test_case("first.last@example.co.uk", true; "dotted")]
    #[test_case("  a@b.com  ", true; "surrounding whitespace")]
    #[test_case("a@b", false; "no dot in domain")]
    #[test_case("@b.com", false; "empty local part")]
    #[test_case("a@@b.com", false; "two at signs")]
    #[test_case("a@b.com@c.org", false; "two addresses")]
    #[test_case("a b@c.com", false; "inner whitespace")]
    #[test_case("a@b.", false; "empty top-level label")]
    #[test_case("ab.com", false; "no at sign")]
    fn email_shape(input: &str, expected: bool) {
        assert_eq!(is_email_address(input), expected);
    }

    #[test]
    fn valid_requester_is_trimmed() {
        let mut draft = requester();
        draft.name = "  A B ".to_string();
        let requester = validate_requester(&draft, &Domains::default()).unwrap();
        assert_eq!(requester.name, "A B");
        assert_eq!(requester.department, "Direction Technique");
    }

    #[test]
    fn blank_requester_reports_every_field() {
        let draft = RequesterDraft {
            name: " ".to_string(),
            ..RequesterDraft::default()
        };
        let errors = validate_requester(&draft, &Domains::default()).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get(RequesterField::Name), Some("Name is required"));
        assert_eq!(errors.get(RequesterField::Email), Some("Email is required"));
        assert_eq!(
            errors.get(RequesterField::Phone),
            Some("Phone number is required")
        );
    }

    #[test]
    fn malformed_email_is_invalid_not_missing() {
        let mut draft = requester();
        draft.email = "not-an-address".to_string();
        let errors = validate_requester(&draft, &Domains::default()).unwrap_err();
        assert_eq!(errors.get(RequesterField::Email), Some("Email is invalid"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn unknown_department_is_rejected() {
        let mut draft = requester();
        draft.department = "Marketing".to_string();
        let errors = validate_requester(&draft, &Domains::default()).unwrap_err();
        assert!(
            errors
                .get(RequesterField::Department)
                .unwrap()
                .contains("Marketing")
        );
    }

    #[test]
    fn short_description_is_rejected() {
        let mut draft = issue();
        draft.description = "Short".to_string();
        let errors = validate_issue(&draft, &Domains::default()).unwrap_err();
        assert_eq!(
            errors.get(IssueField::Description),
            Some("Description must be at least 10 characters")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn description_length_ignores_surrounding_whitespace() {
        let mut draft = issue();
        draft.description = "   123456789   ".to_string();
        assert!(validate_issue(&draft, &Domains::default()).is_err());

        draft.description = "   1234567890   ".to_string();
        let issue = validate_issue(&draft, &Domains::default()).unwrap();
        assert_eq!(issue.description, "1234567890");
    }

    #[test]
    fn description_length_counts_characters_not_bytes() {
        let mut draft = issue();
        draft.description = "éééééééé".to_string();
        let errors = validate_issue(&draft, &Domains::default()).unwrap_err();
        assert!(errors.get(IssueField::Description).is_some());
    }

    #[test]
    fn unparseable_priority_is_a_field_error() {
        let mut draft = issue();
        draft.priority = "Whenever".to_string();
        let errors = validate_issue(&draft, &Domains::default()).unwrap_err();
        assert!(errors.get(IssueField::Priority).is_some());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn missing_location_reports_both_parts() {
        let mut draft = issue();
        draft.floor = String::new();
        draft.office_number = "\t".to_string();
        let errors = validate_issue(&draft, &Domains::default()).unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec![IssueField::Floor, IssueField::OfficeNumber]
        );
    }

    #[test]
    fn valid_issue_produces_typed_priority() {
        let issue = validate_issue(&issue(), &Domains::default()).unwrap();
        assert_eq!(issue.priority, Priority::High);
        assert_eq!(issue.location.office_number, "204");
    }

    #[test]
    fn errors_display_in_field_order() {
        let mut errors = FieldErrors::default();
        errors.insert(IssueField::Floor, "Floor number is required");
        errors.insert(IssueField::Category, "Category is required");
        assert_eq!(
            errors.to_string(),
            "category: Category is required; floor: Floor number is required"
        );
    }
}
