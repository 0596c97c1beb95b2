//! Range satisfaction over npm version ranges
//!
//! Range grammar and precedence are npm's (`^`, `~`, comparators, hyphen
//! ranges, `x`-ranges, `||`), delegated to `nodejs-semver`. Version
//! validity is strict SemVer 2.0, checked with the `semver` crate.

use tracing::warn;

/// Range used in place of an empty expression (npm treats `""` as `*`)
const EMPTY_RANGE_EQUIVALENT: &str = "*";

/// Trait for version validity and range matching rules
pub trait VersionMatcher: Send + Sync {
    /// Whether `version` is a syntactically valid version string
    ///
    /// Must depend only on its argument.
    fn is_valid_version(&self, version: &str) -> bool;

    /// Highest version in `versions` satisfying `range`, or `None`
    ///
    /// An unparseable range matches nothing.
    fn max_satisfying<'a>(&self, versions: &[&'a str], range: &str) -> Option<&'a str>;
}

/// npm-compatible matcher
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmVersionMatcher;

impl NpmVersionMatcher {
    /// Parse a range expression, mapping empty input to `*`
    fn parse_range(range: &str) -> Option<nodejs_semver::Range> {
        let expr = if range.trim().is_empty() {
            EMPTY_RANGE_EQUIVALENT
        } else {
            range
        };

        nodejs_semver::Range::parse(expr)
            .inspect_err(|e| warn!(range, error = %e, "invalid version range, treating as no match"))
            .ok()
    }
}

impl VersionMatcher for NpmVersionMatcher {
    fn is_valid_version(&self, version: &str) -> bool {
        semver::Version::parse(version).is_ok()
    }

    fn max_satisfying<'a>(&self, versions: &[&'a str], range: &str) -> Option<&'a str> {
        let range = Self::parse_range(range)?;

        versions
            .iter()
            .filter_map(|&raw| {
                let ordered = semver::Version::parse(raw).ok()?;
                let npm = nodejs_semver::Version::parse(raw).ok()?;
                range.satisfies(&npm).then_some((ordered, raw))
            })
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, raw)| raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const VERSIONS: &[&str] = &[
        "0.9.0",
        "1.0.0",
        "1.0.1",
        "1.1.0",
        "1.2.0-beta.1",
        "2.0.0",
        "2.1.0",
    ];

    #[rstest]
    #[case("1.0.0", true)]
    #[case("1.2.3-alpha.1+build.5", true)]
    #[case("created", false)]
    #[case("modified", false)]
    #[case("v1.0.0", false)]
    #[case("1.0", false)]
    #[case("01.0.0", false)]
    #[case("", false)]
    fn validates_versions_strictly(#[case] version: &str, #[case] valid: bool) {
        assert_eq!(NpmVersionMatcher.is_valid_version(version), valid);
    }

    #[test]
    fn validity_does_not_depend_on_position() {
        let inputs = ["created", "1.0.0", "modified", "2.0.0"];
        let first_pass: Vec<bool> = inputs
            .iter()
            .map(|v| NpmVersionMatcher.is_valid_version(v))
            .collect();
        let reversed: Vec<bool> = inputs
            .iter()
            .rev()
            .map(|v| NpmVersionMatcher.is_valid_version(v))
            .collect();
        let mut expected = first_pass.clone();
        expected.reverse();
        assert_eq!(reversed, expected);
        assert_eq!(first_pass, vec![false, true, false, true]);
    }

    #[rstest]
    #[case("^1.0.0", Some("1.1.0"))]
    #[case("~1.0.0", Some("1.0.1"))]
    #[case("*", Some("2.1.0"))]
    #[case("", Some("2.1.0"))]
    #[case("1.0.0", Some("1.0.0"))]
    #[case(">=1.0.0 <2.0.0", Some("1.1.0"))]
    #[case("1.0.0 - 1.0.1", Some("1.0.1"))]
    #[case("1.x", Some("1.1.0"))]
    #[case("^0.1.0 || ^2.0.0", Some("2.1.0"))]
    #[case("^3.0.0", None)]
    #[case("<0.1.0", None)]
    fn picks_highest_satisfying(#[case] range: &str, #[case] expected: Option<&str>) {
        assert_eq!(NpmVersionMatcher.max_satisfying(VERSIONS, range), expected);
    }

    #[test]
    fn prereleases_need_opt_in() {
        assert_eq!(
            NpmVersionMatcher.max_satisfying(&["1.2.0-beta.1"], "^1.0.0"),
            None
        );
        assert_eq!(
            NpmVersionMatcher.max_satisfying(&["1.2.0-beta.1"], "^1.2.0-beta.0"),
            Some("1.2.0-beta.1")
        );
    }

    #[test]
    fn invalid_range_matches_nothing() {
        assert_eq!(NpmVersionMatcher.max_satisfying(VERSIONS, "not a range!"), None);
    }

    #[test]
    fn empty_candidate_list() {
        assert_eq!(NpmVersionMatcher.max_satisfying(&[], "*"), None);
    }

    #[test]
    fn ordering_is_semantic_not_lexical() {
        assert_eq!(
            NpmVersionMatcher.max_satisfying(&["1.9.0", "1.10.0", "1.2.0"], "^1.0.0"),
            Some("1.10.0")
        );
    }
}
