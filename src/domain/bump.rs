//! Version increments.
//!
//! Levels are ranked major > minor > micro > pre-release > post > dev.
//! Bumping a level resets every lower one: `minor` and `micro` drop to `0`
//! when present, everything else is removed.

use crate::domain::prerelease::{PreRelease, PreReleaseKind};
use crate::domain::version::Version;
use crate::error::{PepbumpError, Result};

/// The set of levels to increment in one call.
///
/// Only one pre-release kind can be requested at a time, which the
/// `pre` field makes unrepresentable to get wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BumpLevels {
    pub major: bool,
    pub minor: bool,
    pub micro: bool,
    pub pre: Option<PreReleaseKind>,
    pub post: bool,
    pub dev: bool,
}

impl BumpLevels {
    pub fn major() -> Self {
        BumpLevels {
            major: true,
            ..Self::default()
        }
    }

    pub fn minor() -> Self {
        BumpLevels {
            minor: true,
            ..Self::default()
        }
    }

    pub fn micro() -> Self {
        BumpLevels {
            micro: true,
            ..Self::default()
        }
    }

    pub fn pre(kind: PreReleaseKind) -> Self {
        BumpLevels {
            pre: Some(kind),
            ..Self::default()
        }
    }

    pub fn post() -> Self {
        BumpLevels {
            post: true,
            ..Self::default()
        }
    }

    pub fn dev() -> Self {
        BumpLevels {
            dev: true,
            ..Self::default()
        }
    }

    /// Build from individual pre-release flags, keeping rc over beta over alpha.
    pub fn pre_from_flags(alpha: bool, beta: bool, rc: bool) -> Option<PreReleaseKind> {
        if rc {
            Some(PreReleaseKind::Rc)
        } else if beta {
            Some(PreReleaseKind::Beta)
        } else if alpha {
            Some(PreReleaseKind::Alpha)
        } else {
            None
        }
    }

    /// Names of the requested levels, highest rank first.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.major {
            names.push("major");
        }
        if self.minor {
            names.push("minor");
        }
        if self.micro {
            names.push("micro");
        }
        match self.pre {
            Some(PreReleaseKind::Rc) => names.push("rc"),
            Some(PreReleaseKind::Beta) => names.push("beta"),
            Some(PreReleaseKind::Alpha) => names.push("alpha"),
            None => {}
        }
        if self.post {
            names.push("post");
        }
        if self.dev {
            names.push("dev");
        }
        names
    }
}

fn increment_safe(value: Option<u64>, level: &str) -> Result<u64> {
    match value {
        None => Ok(1),
        Some(n) => n.checked_add(1).ok_or_else(|| {
            PepbumpError::version(format!("{} level {} cannot be incremented", level, n))
        }),
    }
}

fn reset_numeric(value: Option<u64>) -> Option<u64> {
    value.map(|_| 0)
}

impl Version {
    /// Increment the requested levels, in rank order, resetting lower levels.
    ///
    /// # Example
    /// ```ignore
    /// let v = Version::parse("1.2.3rc1.post2")?;
    /// assert_eq!(v.increment(&BumpLevels::major())?.to_string(), "2.0.0");
    /// assert_eq!(v.increment(&BumpLevels::minor())?.to_string(), "1.3.0");
    /// ```
    pub fn increment(&self, levels: &BumpLevels) -> Result<Version> {
        let mut next = *self;

        if levels.major {
            next.major = increment_safe(Some(next.major), "major")?;
            next.minor = reset_numeric(next.minor);
            next.micro = reset_numeric(next.micro);
            next.pre = None;
            next.post = None;
            next.dev = None;
        }

        if levels.minor {
            next.minor = Some(increment_safe(next.minor, "minor")?);
            next.micro = reset_numeric(next.micro);
            next.pre = None;
            next.post = None;
            next.dev = None;
        }

        if levels.micro {
            // A micro level implies a minor level in the rendered string.
            next.minor = Some(next.minor.unwrap_or(0));
            next.micro = Some(increment_safe(next.micro, "micro")?);
            next.pre = None;
            next.post = None;
            next.dev = None;
        }

        if let Some(kind) = levels.pre {
            let number = increment_safe(next.pre_number(kind), kind.tag())?;
            next.pre = Some(PreRelease::new(kind, number));
            next.post = None;
            next.dev = None;
        }

        if levels.post {
            next.post = Some(increment_safe(next.post, "post")?);
            next.dev = None;
        }

        if levels.dev {
            next.dev = Some(increment_safe(next.dev, "dev")?);
        }

        next.validate()?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump(s: &str, levels: BumpLevels) -> String {
        Version::parse(s)
            .unwrap()
            .increment(&levels)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_bump_major_resets_everything() {
        assert_eq!(bump("1.2.3rc1.post2", BumpLevels::major()), "2.0.0");
        assert_eq!(bump("1.2.3.dev4", BumpLevels::major()), "2.0.0");
    }

    #[test]
    fn test_bump_major_keeps_absent_levels_absent() {
        assert_eq!(bump("1", BumpLevels::major()), "2");
        assert_eq!(bump("1.4", BumpLevels::major()), "2.0");
    }

    #[test]
    fn test_bump_minor() {
        assert_eq!(bump("1.2.3", BumpLevels::minor()), "1.3.0");
        assert_eq!(bump("1.2", BumpLevels::minor()), "1.3");
        assert_eq!(bump("1", BumpLevels::minor()), "1.1");
        assert_eq!(bump("0.9.9b2.post1.dev1", BumpLevels::minor()), "0.10.0");
    }

    #[test]
    fn test_bump_micro() {
        assert_eq!(bump("1.2.3", BumpLevels::micro()), "1.2.4");
        assert_eq!(bump("1.2", BumpLevels::micro()), "1.2.1");
        assert_eq!(bump("1", BumpLevels::micro()), "1.0.1");
        assert_eq!(bump("1.2.3a4", BumpLevels::micro()), "1.2.4");
    }

    #[test]
    fn test_bump_prerelease_starts_at_one() {
        assert_eq!(bump("1.2.3", BumpLevels::pre(PreReleaseKind::Alpha)), "1.2.3a1");
        assert_eq!(bump("1.2.3", BumpLevels::pre(PreReleaseKind::Rc)), "1.2.3rc1");
    }

    #[test]
    fn test_bump_same_prerelease_increments() {
        assert_eq!(bump("1.2.3b1", BumpLevels::pre(PreReleaseKind::Beta)), "1.2.3b2");
    }

    #[test]
    fn test_bump_other_prerelease_replaces_tag() {
        assert_eq!(bump("1.2.3a3", BumpLevels::pre(PreReleaseKind::Beta)), "1.2.3b1");
        assert_eq!(bump("1.2.3rc2", BumpLevels::pre(PreReleaseKind::Alpha)), "1.2.3a1");
    }

    #[test]
    fn test_bump_prerelease_resets_post_and_dev() {
        assert_eq!(
            bump("1.0rc1.post1.dev2", BumpLevels::pre(PreReleaseKind::Rc)),
            "1.0rc2"
        );
    }

    #[test]
    fn test_bump_post_keeps_prerelease() {
        assert_eq!(bump("1.0rc1", BumpLevels::post()), "1.0rc1.post1");
        assert_eq!(bump("1.0rc1.post1.dev3", BumpLevels::post()), "1.0rc1.post2");
    }

    #[test]
    fn test_bump_dev() {
        assert_eq!(bump("0.2.5", BumpLevels::dev()), "0.2.5.dev1");
        assert_eq!(bump("0.2.5.dev1", BumpLevels::dev()), "0.2.5.dev2");
        assert_eq!(bump("1.0a1.post1", BumpLevels::dev()), "1.0a1.post1.dev1");
    }

    #[test]
    fn test_bump_minor_and_dev_together() {
        let levels = BumpLevels {
            minor: true,
            dev: true,
            ..BumpLevels::default()
        };
        assert_eq!(bump("1.2.3.dev5", levels), "1.3.0.dev1");
    }

    #[test]
    fn test_bump_is_independent_of_flag_order() {
        let a = BumpLevels {
            dev: true,
            ..BumpLevels::minor()
        };
        let b = BumpLevels {
            minor: true,
            ..BumpLevels::dev()
        };
        assert_eq!(bump("2.4.1rc3", a), bump("2.4.1rc3", b));
    }

    #[test]
    fn test_bump_minor_property() {
        for s in ["0", "1.2", "1.2.3", "3.1rc2.post4.dev1", "5.0.0.dev3"] {
            let before = Version::parse(s).unwrap();
            let after = before.increment(&BumpLevels::minor()).unwrap();
            assert_eq!(after.major, before.major);
            assert_eq!(after.minor, Some(before.minor.unwrap_or(0) + 1));
            assert!(after.micro.is_none() || after.micro == Some(0));
            assert_eq!(after.pre, None);
            assert_eq!(after.post, None);
            assert_eq!(after.dev, None);
        }
    }

    #[test]
    fn test_empty_bump_is_identity() {
        let v = Version::parse("1.2.3rc1").unwrap();
        assert_eq!(v.increment(&BumpLevels::default()).unwrap(), v);
    }

    #[test]
    fn test_bump_at_numeric_limit_is_an_error() {
        let max = u64::MAX;
        let cases = [
            (format!("{}", max), BumpLevels::major()),
            (format!("1.{}", max), BumpLevels::minor()),
            (format!("1.0.{}", max), BumpLevels::micro()),
            (format!("1.0a{}", max), BumpLevels::pre(PreReleaseKind::Alpha)),
            (format!("1.0b{}", max), BumpLevels::pre(PreReleaseKind::Beta)),
            (format!("1.0rc{}", max), BumpLevels::pre(PreReleaseKind::Rc)),
            (format!("1.0.post{}", max), BumpLevels::post()),
            (format!("1.0.dev{}", max), BumpLevels::dev()),
        ];

        for (input, levels) in cases {
            let version = Version::parse(&input).unwrap();
            let err = version.increment(&levels).unwrap_err();
            assert!(
                matches!(err, PepbumpError::InvalidVersion(_)),
                "expected InvalidVersion for {}, got {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_bump_below_numeric_limit_still_works() {
        let input = format!("1.{}", u64::MAX - 1);
        assert_eq!(bump(&input, BumpLevels::minor()), format!("1.{}", u64::MAX));
    }

    #[test]
    fn test_pre_from_flags_priority() {
        assert_eq!(
            BumpLevels::pre_from_flags(true, true, true),
            Some(PreReleaseKind::Rc)
        );
        assert_eq!(
            BumpLevels::pre_from_flags(true, true, false),
            Some(PreReleaseKind::Beta)
        );
        assert_eq!(
            BumpLevels::pre_from_flags(true, false, false),
            Some(PreReleaseKind::Alpha)
        );
        assert_eq!(BumpLevels::pre_from_flags(false, false, false), None);
    }

    #[test]
    fn test_names() {
        let levels = BumpLevels {
            major: true,
            pre: Some(PreReleaseKind::Beta),
            dev: true,
            ..BumpLevels::default()
        };
        assert_eq!(levels.names(), vec!["major", "beta", "dev"]);
    }
}
