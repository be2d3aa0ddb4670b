/// Departments offered when the configuration does not list any.
pub const DEFAULT_DEPARTMENTS: [&str; 3] = [
    "Direction Technique",
    "Direction Administration",
    "Direction Exploitation",
];

/// Issue categories offered when the configuration does not list any.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Hardware", "Software", "Network", "Email", "Printer", "Account", "Training", "Other",
];

/// The fixed value sets that enumerated fields are validated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    departments: Vec<String>,
    categories: Vec<String>,
}

impl Domains {
    /// Create domains from explicit value lists.
    ///
    /// An empty list falls back to the built-in defaults.
    #[must_use]
    pub fn new(departments: Vec<String>, categories: Vec<String>) -> Self {
        let departments = if departments.is_empty() {
            owned(&DEFAULT_DEPARTMENTS)
        } else {
            departments
        };
        let categories = if categories.is_empty() {
            owned(&DEFAULT_CATEGORIES)
        } else {
            categories
        };
        Self {
            departments,
            categories,
        }
    }

    /// The allowed departments, in display order.
    #[must_use]
    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    /// The allowed issue categories, in display order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Whether `value` is one of the allowed departments.
    #[must_use]
    pub fn is_department(&self, value: &str) -> bool {
        self.departments.iter().any(|d| d == value)
    }

    /// Whether `value` is one of the allowed categories.
    #[must_use]
    pub fn is_category(&self, value: &str) -> bool {
        self.categories.iter().any(|c| c == value)
    }
}

impl Default for Domains {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}
