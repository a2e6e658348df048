//! Array paths for addressing nested arrays
//!
//! Provides [`ArrayPath`] for hierarchical addressing of arrays nested
//! inside a target array.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One step of an [`ArrayPath`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    /// String key (`'name' => ...`)
    Key(String),
    /// Integer key (`3 => ...`)
    Index(i64),
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<i64> for PathSegment {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

/// Path of keys from a target array to a nested array
///
/// The empty path addresses the target array itself.
///
/// # Examples
/// - `["rules", "email"]` → `rules.email`
/// - `["levels", 0]` → `levels.0`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ArrayPath(Vec<PathSegment>);

impl ArrayPath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Create path from a single segment
    #[inline]
    #[must_use]
    pub fn single(segment: impl Into<PathSegment>) -> Self {
        Self(vec![segment.into()])
    }

    /// Empty path (the target array itself)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Path made of the first `len` segments
    #[inline]
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    /// Iterator over segments from outermost to innermost
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &PathSegment> {
        self.0.iter()
    }
}

impl Display for ArrayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for ArrayPath {
    type Err = PathError;

    /// Parse dot notation; all-digit segments (optionally signed) are
    /// integer keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<PathSegment> = s
            .split('.')
            .map(parse_segment)
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

fn parse_segment(seg: &str) -> Result<PathSegment, PathError> {
    if seg.is_empty() {
        return Err(PathError::EmptySegment);
    }
    let digits = seg.strip_prefix('-').unwrap_or(seg);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return seg
            .parse::<i64>()
            .map(PathSegment::Index)
            .map_err(|_| PathError::IndexOverflow(seg.to_string()));
    }
    Ok(PathSegment::Key(seg.to_string()))
}

impl From<Vec<PathSegment>> for ArrayPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl From<&[PathSegment]> for ArrayPath {
    fn from(segments: &[PathSegment]) -> Self {
        Self(segments.to_vec())
    }
}

impl FromIterator<PathSegment> for ArrayPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Errors related to array paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Integer segment does not fit in 64 bits
    #[error("integer segment out of range: {0}")]
    IndexOverflow(String),
}
