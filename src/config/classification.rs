use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{Error, Result};

/// User-facing classification settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Qualified-name globs of types to skip entirely.
    ///
    /// `*` matches within one package segment, `**` matches across segments.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Qualified name -> kind name (e.g. `AGGREGATE_ROOT`, `REPOSITORY`)
    #[serde(default)]
    pub explicit: BTreeMap<String, String>,

    #[serde(default)]
    pub validation: ValidationPolicy,
}

impl ClassificationConfig {
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    pub fn with_explicit(mut self, qualified_name: impl Into<String>, kind: impl Into<String>) -> Self {
        self.explicit.insert(qualified_name.into(), kind.into());
        self
    }

    /// Compile the exclusion globs
    pub fn exclusion_matcher(&self) -> Result<ExclusionMatcher> {
        ExclusionMatcher::new(&self.exclude_patterns)
    }
}

/// Policy applied to classification results by callers deciding pass/fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Fail when a type carries a signal but no kind could be assigned (default: false)
    #[serde(default = "default_fail_on_unclassified")]
    pub fail_on_unclassified: bool,

    /// Fail when arbitration ends in CONFLICT (default: true)
    #[serde(default = "default_fail_on_conflict")]
    pub fail_on_conflict: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            fail_on_unclassified: default_fail_on_unclassified(),
            fail_on_conflict: default_fail_on_conflict(),
        }
    }
}

fn default_fail_on_unclassified() -> bool {
    false
}

fn default_fail_on_conflict() -> bool {
    true
}

/// Compiled form of the exclusion globs
#[derive(Debug, Clone, Default)]
pub struct ExclusionMatcher {
    patterns: Vec<Regex>,
}

impl ExclusionMatcher {
    pub fn new(globs: &[String]) -> Result<Self> {
        let patterns = globs
            .iter()
            .map(|glob| {
                Regex::new(&glob_to_regex(glob)).map_err(|source| Error::InvalidPattern {
                    pattern: glob.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_excluded(&self, qualified_name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(qualified_name))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Translate a qualified-name glob into an anchored regex
fn glob_to_regex(glob: &str) -> String {
    let mut regex = String::with_capacity(glob.len() * 2 + 2);
    regex.push('^');
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                regex.push_str(".*");
            }
            '*' => regex.push_str("[^.]*"),
            '?' => regex.push_str("[^.]"),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');
    regex
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matcher(globs: &[&str]) -> ExclusionMatcher {
        ExclusionMatcher::new(&globs.iter().map(|g| g.to_string()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_single_star_stays_within_segment() {
        let m = matcher(&["com.acme.*.Legacy"]);
        assert!(m.is_excluded("com.acme.billing.Legacy"));
        assert!(!m.is_excluded("com.acme.billing.old.Legacy"));
    }

    #[test]
    fn test_double_star_crosses_segments() {
        let m = matcher(&["com.acme.generated.**"]);
        assert!(m.is_excluded("com.acme.generated.dto.OrderDto"));
        assert!(!m.is_excluded("com.acme.order.Order"));
    }

    #[test]
    fn test_dots_are_literal() {
        let m = matcher(&["com.acme.Order"]);
        assert!(m.is_excluded("com.acme.Order"));
        assert!(!m.is_excluded("comXacmeXOrder"));
    }

    #[test]
    fn test_default_policy() {
        let policy = ValidationPolicy::default();
        assert!(!policy.fail_on_unclassified);
        assert!(policy.fail_on_conflict);
    }

    proptest! {
        #[test]
        fn prop_literal_names_match_themselves(segments in prop::collection::vec("[a-z][a-z0-9]{0,6}", 1..5)) {
            let name = segments.join(".");
            let m = matcher(&[name.as_str()]);
            prop_assert!(m.is_excluded(&name));
            let double_star = format!("{}.**", segments[0]);
            let m = matcher(&[double_star.as_str()]);
            prop_assert_eq!(m.is_excluded(&name), segments.len() > 1);
        }
    }
}
