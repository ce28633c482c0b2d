//! Runtime version resolution against a catalog of concrete versions.
//!
//! A specifier comes from a free-form text file and may be empty (use the
//! catalog default), a full version (`3.6.4`, exact match), or a prefix
//! (`3.6` or `3`, highest version sharing the prefix). Wildcards such as
//! `3.6.x` and explicit comparators such as `>=3.5` are accepted too.

use semver::{Version, VersionReq};
use std::fmt;
use thiserror::Error;

const NAME_PREFIX: &str = "python-";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no version of {name} matches '{requested}' (available: {})", .available.join(", "))]
    NoMatchingVersion {
        name: String,
        requested: String,
        available: Vec<String>,
    },
}

/// User-requested version, normalized on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSpecifier(String);

impl VersionSpecifier {
    /// Normalizes raw `runtime.txt` content.
    ///
    /// Literal `\r` / `\n` escape sequences (backslash followed by a letter) are
    /// dropped before surrounding whitespace is trimmed.
    pub fn parse(raw: &str) -> Self {
        let cleaned = raw.replace("\\r", "").replace("\\n", "");
        Self(cleaned.trim().to_string())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The specifier without its `python-` name token.
    pub fn short(&self) -> &str {
        self.0.strip_prefix(NAME_PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Concrete versions of one component plus the version the catalog names as default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCatalog {
    pub name: String,
    pub versions: Vec<String>,
    pub default: String,
}

impl VersionCatalog {
    pub fn new(name: impl Into<String>, versions: Vec<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            versions,
            default: default.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedDependency {
    pub name: String,
    pub version: String,
}

impl ResolvedDependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ResolvedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

pub fn resolve(
    specifier: &VersionSpecifier,
    catalog: &VersionCatalog,
) -> Result<ResolvedDependency, ResolveError> {
    if specifier.is_empty() {
        return Ok(ResolvedDependency::new(&catalog.name, &catalog.default));
    }

    find_matching_version(specifier.short(), &catalog.versions)
        .map(|version| ResolvedDependency::new(&catalog.name, version))
        .ok_or_else(|| ResolveError::NoMatchingVersion {
            name: catalog.name.clone(),
            requested: specifier.as_str().to_string(),
            available: catalog.versions.clone(),
        })
}

/// Highest catalog entry satisfying `constraint`, or `None`.
pub fn find_matching_version(constraint: &str, versions: &[String]) -> Option<String> {
    if let Some(exact) = versions.iter().find(|v| v.as_str() == constraint) {
        return Some(exact.clone());
    }

    let req = parse_constraint(constraint)?;

    versions
        .iter()
        .filter_map(|raw| parse_lenient(raw).map(|parsed| (parsed, raw)))
        .filter(|(parsed, _)| req.matches(parsed))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, raw)| raw.clone())
}

fn parse_constraint(constraint: &str) -> Option<VersionReq> {
    let constraint = constraint.trim();
    if constraint.is_empty() {
        return None;
    }

    let has_operator = constraint.starts_with(['=', '>', '<', '~', '^']);
    let has_wildcard = constraint
        .split('.')
        .any(|part| matches!(part, "x" | "X" | "*"));

    if has_operator || has_wildcard {
        VersionReq::parse(constraint).ok()
    } else {
        // A bare version is a prefix: "3.6" covers every 3.6.z and nothing else.
        VersionReq::parse(&format!("={}", constraint)).ok()
    }
}

/// Parses `3`, `3.6` or `3.6.4`; missing components are zero.
fn parse_lenient(raw: &str) -> Option<Version> {
    if let Ok(version) = Version::parse(raw) {
        return Some(version);
    }

    let parts: Vec<u64> = raw
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [major] => Some(Version::new(*major, 0, 0)),
        [major, minor] => Some(Version::new(*major, *minor, 0)),
        _ => None,
    }
}
