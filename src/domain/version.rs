use crate::domain::prerelease::{PreRelease, PreReleaseKind};
use crate::error::{PepbumpError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Canonical grammar: `major(.minor(.micro)?)?((a|b|rc)N)?(.postN)?(.devN)?`
const CANONICAL_PATTERN: &str = r"^(0|[1-9][0-9]*)(?:\.(0|[1-9][0-9]*))?(?:\.(0|[1-9][0-9]*))?(?:(a|b|rc)(0|[1-9][0-9]*))?(?:\.post(0|[1-9][0-9]*))?(?:\.dev(0|[1-9][0-9]*))?$";

fn canonical_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CANONICAL_PATTERN).expect("canonical version pattern is valid"))
}

/// Returns true when `s` is a canonical version string.
pub fn is_canonical(s: &str) -> bool {
    canonical_regex().is_match(s)
}

/// A PEP 440 style version: `major[.minor[.micro]][{a|b|rc}N][.postN][.devN]`.
///
/// Equality is field-wise, so `1.0` and `1.0.0` are different values even
/// though they order the same way on their release segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Version {
    pub major: u64,
    pub minor: Option<u64>,
    pub micro: Option<u64>,
    pub pre: Option<PreRelease>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
}

impl Version {
    /// Create a `major.minor.micro` release
    pub fn new(major: u64, minor: u64, micro: u64) -> Self {
        Version {
            major,
            minor: Some(minor),
            micro: Some(micro),
            ..Version::default()
        }
    }

    pub fn with_dev(mut self, dev: u64) -> Self {
        self.dev = Some(dev);
        self
    }

    /// Parse a canonical version string (e.g. "0.5", "1.2a1", "0.2.5.dev1", "1.2.4rc1.post2")
    pub fn parse(s: &str) -> Result<Self> {
        let caps = canonical_regex().captures(s).ok_or_else(|| {
            PepbumpError::version(format!(
                "'{}' is not a canonical version (expected major[.minor[.micro]][aN|bN|rcN][.postN][.devN])",
                s
            ))
        })?;

        let number = |idx: usize| -> Result<Option<u64>> {
            caps.get(idx)
                .map(|m| {
                    m.as_str().parse::<u64>().map_err(|_| {
                        PepbumpError::version(format!("Number out of range in '{}'", s))
                    })
                })
                .transpose()
        };

        let pre = match (caps.get(4), number(5)?) {
            (Some(tag), Some(n)) => Some(PreRelease::new(tag.as_str().parse()?, n)),
            _ => None,
        };

        let version = Version {
            major: number(1)?.unwrap_or(0),
            minor: number(2)?,
            micro: number(3)?,
            pre,
            post: number(6)?,
            dev: number(7)?,
        };
        version.validate()?;
        Ok(version)
    }

    /// Check the canonical form of this value.
    ///
    /// A `micro` without a `minor` has no string rendering that parses back
    /// to the same value, so it is rejected here.
    pub fn validate(&self) -> Result<()> {
        if self.minor.is_none() && self.micro.is_some() {
            return Err(PepbumpError::version(format!(
                "micro level set without a minor level ({:?})",
                self
            )));
        }
        let rendered = self.to_string();
        if !is_canonical(&rendered) {
            return Err(PepbumpError::version(format!(
                "'{}' is not a canonical version",
                rendered
            )));
        }
        Ok(())
    }

    /// Number of the given pre-release kind, if that tag is set.
    pub fn pre_number(&self, kind: PreReleaseKind) -> Option<u64> {
        self.pre.and_then(|pre| pre.number_for(kind))
    }

    fn release(&self) -> (u64, u64, u64) {
        (
            self.major,
            self.minor.unwrap_or(0),
            self.micro.unwrap_or(0),
        )
    }

    /// Sort key for the pre-release phase.
    ///
    /// A dev release with no pre or post tag sorts before every pre-release of
    /// the same release; a final release sorts after all of them.
    fn pre_key(&self) -> (u8, Option<PreRelease>) {
        match self.pre {
            Some(pre) => (1, Some(pre)),
            None if self.dev.is_some() && self.post.is_none() => (0, None),
            None => (2, None),
        }
    }

    fn dev_key(&self) -> (u8, u64) {
        match self.dev {
            Some(n) => (0, n),
            None => (1, 0),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{}", minor)?;
        }
        if let Some(micro) = self.micro {
            write!(f, ".{}", micro)?;
        }
        if let Some(pre) = self.pre {
            write!(f, "{}", pre)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{}", post)?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{}", dev)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = PepbumpError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.release()
            .cmp(&other.release())
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| (self.minor, self.micro).cmp(&(other.minor, other.micro)))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
