//! Dependency spec tokens of the form `name` or `name@range`

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Range used when a token carries no `@` separator
pub const ANY_RANGE: &str = "*";

/// Separator between package name and range
const SEPARATOR: char = '@';

/// A (package name, version range) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencySpec {
    /// Package name
    pub name: String,
    /// Version range expression, passed through uninterpreted
    pub range: String,
}

impl DependencySpec {
    /// Creates a new spec
    pub fn new(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
        }
    }

    /// Split a `name` / `name@range` token
    ///
    /// A missing separator defaults the range to `*`; a present separator
    /// with nothing after it yields an empty range. Scoped names
    /// (`@scope/pkg@1.0.0`) contain more than one separator and are
    /// rejected rather than guessed at.
    pub fn parse(token: &str) -> Result<Self, ResolveError> {
        let mut parts = token.split(SEPARATOR);
        let name = parts.next().unwrap_or_default();
        let range = parts.next();

        if parts.next().is_some() {
            return Err(ResolveError::invalid_spec(
                token,
                "more than one '@' separator (scoped package names are not supported)",
            ));
        }
        if name.is_empty() {
            return Err(ResolveError::invalid_spec(token, "missing package name"));
        }

        Ok(Self::new(name, range.unwrap_or(ANY_RANGE)))
    }
}

impl FromStr for DependencySpec {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, SEPARATOR, self.range)
    }
}
