//! Pre-release tags of a version: `a`, `b` and `rc`, each with a number.
//!
//! Ordering follows release maturity: alpha < beta < release candidate.

use crate::error::{PepbumpError, Result};
use std::fmt;
use std::str::FromStr;

/// Pre-release tag kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreReleaseKind {
    /// Alpha pre-release, rendered `a`
    Alpha,
    /// Beta pre-release, rendered `b`
    Beta,
    /// Release candidate, rendered `rc`
    Rc,
}

impl PreReleaseKind {
    /// The tag as written in a version string.
    pub fn tag(self) -> &'static str {
        match self {
            PreReleaseKind::Alpha => "a",
            PreReleaseKind::Beta => "b",
            PreReleaseKind::Rc => "rc",
        }
    }
}

impl FromStr for PreReleaseKind {
    type Err = PepbumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "a" => Ok(PreReleaseKind::Alpha),
            "b" => Ok(PreReleaseKind::Beta),
            "rc" => Ok(PreReleaseKind::Rc),
            other => Err(PepbumpError::version(format!(
                "Invalid pre-release tag: '{}' (expected a, b or rc)",
                other
            ))),
        }
    }
}

impl fmt::Display for PreReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A pre-release tag with its number, e.g. `rc2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreRelease {
    pub kind: PreReleaseKind,
    pub number: u64,
}

impl PreRelease {
    pub fn new(kind: PreReleaseKind, number: u64) -> Self {
        PreRelease { kind, number }
    }

    pub fn alpha(number: u64) -> Self {
        PreRelease::new(PreReleaseKind::Alpha, number)
    }

    pub fn beta(number: u64) -> Self {
        PreRelease::new(PreReleaseKind::Beta, number)
    }

    pub fn rc(number: u64) -> Self {
        PreRelease::new(PreReleaseKind::Rc, number)
    }

    /// Number held by this tag when it is of the given kind.
    pub fn number_for(&self, kind: PreReleaseKind) -> Option<u64> {
        (self.kind == kind).then_some(self.number)
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.number)
    }
}
