//! Buildpack reference parsing
//!
//! A manifest entry is a URI string pointing at a buildpack source. A
//! reference is either an archive (path ends in `.zip`, fetched and
//! extracted) or a git repository (cloned, with an optional branch/tag
//! carried as a `#fragment`).

use std::fmt;

const ARCHIVE_SUFFIX: &str = ".zip";

/// How a buildpack reference is acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Zip archive, downloaded and extracted
    Archive,
    /// Git repository, cloned
    Git,
}

/// A single parsed entry from the buildpack manifest
///
/// Immutable once parsed. The raw string is kept verbatim; everything else
/// is derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildpackReference {
    raw: String,
}

impl BuildpackReference {
    /// Parse a manifest entry
    pub fn parse(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The reference exactly as written in the manifest
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Archive if the URI path ends in the archive suffix, git otherwise
    pub fn kind(&self) -> ReferenceKind {
        if self.path_part().ends_with(ARCHIVE_SUFFIX) {
            ReferenceKind::Archive
        } else {
            ReferenceKind::Git
        }
    }

    /// Optional branch/tag/commit carried as a URI fragment
    pub fn fragment(&self) -> Option<&str> {
        match self.raw.split_once('#') {
            Some((_, frag)) if !frag.is_empty() => Some(frag),
            _ => None,
        }
    }

    /// The reference with any fragment stripped, safe to hand to the clone tool
    pub fn clone_url(&self) -> &str {
        self.path_part()
    }

    /// The identity string a cache partition is keyed on
    ///
    /// The fragment is stripped so the same source shares one partition
    /// regardless of which branch is checked out.
    pub fn identity(&self) -> &str {
        self.path_part()
    }

    /// File name an archive is downloaded to (final path segment)
    pub fn archive_name(&self) -> &str {
        self.final_segment()
    }

    /// Local directory name the buildpack is materialized under
    ///
    /// Archive suffix is stripped for archives; git references use the
    /// final path segment as-is.
    pub fn dir_name(&self) -> &str {
        let segment = self.final_segment();
        segment.strip_suffix(ARCHIVE_SUFFIX).unwrap_or(segment)
    }

    fn path_part(&self) -> &str {
        match self.raw.split_once('#') {
            Some((path, _)) => path,
            None => &self.raw,
        }
    }

    fn final_segment(&self) -> &str {
        self.path_part()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("")
    }
}

impl fmt::Display for BuildpackReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
