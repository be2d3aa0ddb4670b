use std::fmt;

/// One screen of the request wizard.
///
/// Steps are numbered from 1 and visited strictly in order; only a reset
/// jumps back to the first step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// Contact details of the requester.
    #[default]
    Requester = 1,
    /// Category, priority, description and location of the issue.
    Issue = 2,
    /// Read-only confirmation of everything entered so far.
    Review = 3,
    /// Generate the document and hand it off.
    Render = 4,
    /// The request is complete.
    Confirmation = 5,
}

impl Step {
    /// All steps, in order.
    pub const ALL: [Self; 5] = [
        Self::Requester,
        Self::Issue,
        Self::Review,
        Self::Render,
        Self::Confirmation,
    ];

    /// The 1-based position of the step.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Look up a step by its 1-based position.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Requester),
            2 => Some(Self::Issue),
            3 => Some(Self::Review),
            4 => Some(Self::Render),
            5 => Some(Self::Confirmation),
            _ => None,
        }
    }

    /// The following step, or `None` at the terminal step.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// The preceding step, or `None` at the first step.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    /// Whether this is the last step.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmation)
    }

    /// Heading shown for the step.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Requester => "Requester Information",
            Self::Issue => "Issue Details",
            Self::Review => "Review Request",
            Self::Render => "PDF Generation & Email",
            Self::Confirmation => "Request Submitted",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}
