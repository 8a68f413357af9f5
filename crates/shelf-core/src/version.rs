//! API versions: tags, per-request handler resolution and per-document
//! operation partitions.
//!
//! Version membership is declared once, as data, when operations are
//! registered. Nothing here inspects handlers; the tables are built before
//! the server starts and only read afterwards.

use std::{
  collections::{BTreeMap, BTreeSet},
  fmt,
  str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Error;

/// A `major.minor` API version, e.g. `1.0`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct VersionTag {
  pub major: u16,
  pub minor: u16,
}

impl VersionTag {
  /// The version assumed when a request does not designate one.
  pub const DEFAULT: Self = Self::new(1, 0);

  pub const fn new(major: u16, minor: u16) -> Self { Self { major, minor } }
}

impl Default for VersionTag {
  fn default() -> Self { Self::DEFAULT }
}

impl fmt::Display for VersionTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.major, self.minor)
  }
}

impl FromStr for VersionTag {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || Error::InvalidVersion(s.to_owned());
    let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
    Ok(Self {
      major: major.parse().map_err(|_| invalid())?,
      minor: minor.parse().map_err(|_| invalid())?,
    })
  }
}

impl TryFrom<String> for VersionTag {
  type Error = Error;

  fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<VersionTag> for String {
  fn from(v: VersionTag) -> Self { v.to_string() }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// No registered variant of an operation serves the requested version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported api version {0}")]
pub struct NoMatchingVersion(pub VersionTag);

/// Two variants of one operation claim the same version.
///
/// Raised while the routing table is built, never per request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation}: more than one variant registered for {version}")]
pub struct AmbiguousRegistration {
  pub operation: String,
  pub version:   String,
}

// ─── Candidates ──────────────────────────────────────────────────────────────

/// An item tagged with the versions it belongs to.
///
/// An empty version set marks the item as version-neutral.
#[derive(Debug, Clone)]
pub struct Candidate<H> {
  pub versions: BTreeSet<VersionTag>,
  pub item:     H,
}

impl<H> Candidate<H> {
  pub fn new(versions: impl IntoIterator<Item = VersionTag>, item: H) -> Self {
    Self {
      versions: versions.into_iter().collect(),
      item,
    }
  }

  /// A candidate that belongs to every version.
  pub fn neutral(item: H) -> Self {
    Self {
      versions: BTreeSet::new(),
      item,
    }
  }

  pub fn is_neutral(&self) -> bool { self.versions.is_empty() }

  /// Whether this candidate belongs to `version`, explicitly or by being
  /// neutral.
  pub fn serves(&self, version: VersionTag) -> bool {
    self.is_neutral() || self.versions.contains(&version)
  }
}

/// Pick the handler for a request.
///
/// Without a designation the `default` version is used. An explicit
/// declaration of the wanted version beats a version-neutral candidate.
pub fn resolve_handler<H>(
  requested: Option<VersionTag>,
  default: VersionTag,
  candidates: &[Candidate<H>],
) -> Result<&H, NoMatchingVersion> {
  let wanted = requested.unwrap_or(default);
  candidates
    .iter()
    .find(|c| c.versions.contains(&wanted))
    .or_else(|| candidates.iter().find(|c| c.is_neutral()))
    .map(|c| &c.item)
    .ok_or(NoMatchingVersion(wanted))
}

/// Reject a set of variants for one operation if any version is claimed
/// twice, or if more than one variant is version-neutral.
pub fn check_unambiguous<H>(
  operation: &str,
  candidates: &[Candidate<H>],
) -> Result<(), AmbiguousRegistration> {
  let ambiguous = |version: String| AmbiguousRegistration {
    operation: operation.to_owned(),
    version,
  };

  let mut seen = BTreeSet::new();
  let mut neutral = false;
  for candidate in candidates {
    if candidate.is_neutral() {
      if neutral {
        return Err(ambiguous("every version".to_owned()));
      }
      neutral = true;
    }
    for version in &candidate.versions {
      if !seen.insert(*version) {
        return Err(ambiguous(format!("version {version}")));
      }
    }
  }
  Ok(())
}

/// The operations that belong in the document for `version`.
pub fn partition_for_document<O>(
  version: VersionTag,
  operations: &[Candidate<O>],
) -> Vec<&O> {
  operations
    .iter()
    .filter(|c| c.serves(version))
    .map(|c| &c.item)
    .collect()
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Every known version with its precomputed document partition.
///
/// The known versions are the default plus every version any operation
/// declares. Built once; read-only afterwards.
#[derive(Debug, Clone)]
pub struct ApiCatalog<O> {
  default:    VersionTag,
  partitions: BTreeMap<VersionTag, Vec<O>>,
}

impl<O: Clone> ApiCatalog<O> {
  pub fn build(default: VersionTag, operations: &[Candidate<O>]) -> Self {
    let mut versions: BTreeSet<VersionTag> = operations
      .iter()
      .flat_map(|c| c.versions.iter().copied())
      .collect();
    versions.insert(default);

    let partitions = versions
      .into_iter()
      .map(|v| {
        let ops = partition_for_document(v, operations)
          .into_iter()
          .cloned()
          .collect();
        (v, ops)
      })
      .collect();

    Self {
      default,
      partitions,
    }
  }
}

impl<O> ApiCatalog<O> {
  pub fn default_version(&self) -> VersionTag { self.default }

  pub fn versions(&self) -> impl Iterator<Item = VersionTag> + '_ {
    self.partitions.keys().copied()
  }

  pub fn partition(&self, version: VersionTag) -> Option<&[O]> {
    self.partitions.get(&version).map(Vec::as_slice)
  }
}
