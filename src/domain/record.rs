use std::fmt;

use borsh::BorshSerialize;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::Priority;

/// Opaque, globally unique identifier of a request.
///
/// Generated once when the record is created and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn uuid(self) -> Uuid {
        self.0
    }

    /// The short reference shown to users: the first 8 characters of the
    /// hyphenated identifier.
    #[must_use]
    pub fn prefix(self) -> String {
        let mut buffer = Uuid::encode_buffer();
        let hyphenated = self.0.hyphenated().encode_lower(&mut buffer);
        hyphenated[..8].to_string()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// The person asking for help.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize)]
pub struct Requester {
    /// Full name.
    pub name: String,
    /// Employee number.
    pub employee_id: String,
    /// Contact email address.
    pub email: String,
    /// Department, one of the configured departments.
    pub department: String,
    /// Contact phone number.
    pub phone: String,
}

/// Where the problem is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize)]
pub struct Location {
    /// Floor of the building.
    pub floor: String,
    /// Office number on that floor.
    pub office_number: String,
}

/// What the problem is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize)]
pub struct Issue {
    /// Category, one of the configured categories.
    pub category: String,
    /// How urgent the issue is.
    pub priority: Priority,
    /// Free-text description of the problem.
    pub description: String,
    /// Where the intervention is needed.
    pub location: Location,
}

/// The part of a [`RequestRecord`] contributed by one wizard step.
///
/// Fragments are always merged whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Contributed by the requester step.
    Requester(Requester),
    /// Contributed by the issue step.
    Issue(Issue),
}

impl From<Requester> for Fragment {
    fn from(requester: Requester) -> Self {
        Self::Requester(requester)
    }
}

impl From<Issue> for Fragment {
    fn from(issue: Issue) -> Self {
        Self::Issue(issue)
    }
}

/// A single IT intervention request, accumulated across the wizard steps.
///
/// The identifier and request date are fixed at creation. The requester and
/// issue are replaced whole when their step is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    id: RequestId,
    request_date: NaiveDate,
    requester: Requester,
    issue: Issue,
}

impl RequestRecord {
    /// Create an empty record with a fresh identifier, dated today.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(RequestId::new(), Local::now().date_naive())
    }

    /// Create an empty record with the given identity.
    #[must_use]
    pub fn with_id(id: RequestId, request_date: NaiveDate) -> Self {
        Self {
            id,
            request_date,
            requester: Requester::default(),
            issue: Issue::default(),
        }
    }

    /// The request identifier.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// The day the request was created.
    #[must_use]
    pub const fn request_date(&self) -> NaiveDate {
        self.request_date
    }

    /// The requester details.
    #[must_use]
    pub const fn requester(&self) -> &Requester {
        &self.requester
    }

    /// The issue details.
    #[must_use]
    pub const fn issue(&self) -> &Issue {
        &self.issue
    }

    /// Replace the sub-record the fragment belongs to.
    ///
    /// Returns `true` if the record changed.
    pub(crate) fn merge(&mut self, fragment: Fragment) -> bool {
        match fragment {
            Fragment::Requester(requester) => {
                let changed = self.requester != requester;
                self.requester = requester;
                changed
            }
            Fragment::Issue(issue) => {
                let changed = self.issue != issue;
                self.issue = issue;
                changed
            }
        }
    }

    /// Names of the mandatory fields that are still blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let Requester {
            name,
            employee_id,
            email,
            department,
            phone,
        } = &self.requester;
        let Issue {
            category,
            description,
            location,
            ..
        } = &self.issue;

        [
            ("name", name),
            ("employee_id", employee_id),
            ("email", email),
            ("department", department),
            ("phone", phone),
            ("category", category),
            ("description", description),
            ("floor", &location.floor),
            ("office_number", &location.office_number),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// A SHA256 over the user-supplied content of the record.
    ///
    /// Identifies which version of the record a rendered document was made
    /// from. The identifier and date do not contribute.
    ///
    /// # Panics
    ///
    /// Panics if borsh serialization fails (which should never happen for this
    /// data structure).
    #[must_use]
    pub fn fingerprint(&self) -> String {
        #[derive(BorshSerialize)]
        struct FingerprintData<'a> {
            requester: &'a Requester,
            issue: &'a Issue,
        }

        let data = FingerprintData {
            requester: &self.requester,
            issue: &self.issue,
        };

        let encoded = borsh::to_vec(&data).expect("this should never fail");
        let hash = Sha256::digest(encoded);
        format!("{hash:x}")
    }
}

impl Default for RequestRecord {
    fn default() -> Self {
        Self::new()
    }
}
