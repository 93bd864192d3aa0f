use colored::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a constraint violation.
///
/// Ordered from least to most severe, so `severity >= fail_on` decides
/// whether a violation fails an audit.
///
/// # Examples
///
/// ```
/// use archlens::validation::Severity;
///
/// assert!(Severity::Blocker > Severity::Critical);
/// assert_eq!(Severity::Major.as_str(), "MAJOR");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
    Blocker,
}

impl Severity {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Minor => "MINOR",
            Self::Major => "MAJOR",
            Self::Critical => "CRITICAL",
            Self::Blocker => "BLOCKER",
        }
    }

    /// Terminal color for this severity
    #[inline]
    pub const fn color(self) -> Color {
        match self {
            Self::Blocker => Color::Magenta,
            Self::Critical => Color::Red,
            Self::Major => Color::Yellow,
            Self::Minor => Color::Blue,
            Self::Info => Color::Green,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
