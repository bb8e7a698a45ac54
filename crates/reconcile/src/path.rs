//! OU paths: sequences of sibling names from the organization root.
//!
//! Live and desired topologies are matched by path, never by identifier -
//! identifiers are assigned by the directory on creation and desired-state
//! nodes have none.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Path of an organizational unit: the names leading from the organization
/// root down to the unit. The root itself is the empty path.
///
/// Ordering is lexicographic on segments, which places every parent ahead
/// of its descendants - the natural creation order.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OuPath(Vec<String>);

impl OuPath {
    /// The root path (no segments).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a `/`-separated path like `"Apps/CAMPPS/Production"`.
    ///
    /// `""` and `"/"` denote the root. Leading and trailing separators are
    /// tolerated; empty or blank segments are rejected.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let trimmed = s.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for segment in trimmed.split('/') {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(ParseError::InvalidPath {
                    path: s.to_string(),
                    reason: "empty path segment".to_string(),
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self(segments))
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments (the root has depth 0).
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The path segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last segment, i.e. the unit's own name. `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Parent path. `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Extend the path with one child segment.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    /// Whether `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl fmt::Display for OuPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("/")
        } else {
            f.write_str(&self.0.join("/"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let path = OuPath::parse("Apps/CAMPPS/Production").unwrap();
        assert_eq!(path.depth(), 3);
        assert_eq!(path.to_string(), "Apps/CAMPPS/Production");
        assert_eq!(path.name(), Some("Production"));

        assert!(OuPath::parse("").unwrap().is_root());
        assert!(OuPath::parse("/").unwrap().is_root());
        assert_eq!(OuPath::parse("/Apps/").unwrap().to_string(), "Apps");
    }

    #[test]
    fn test_parse_rejects_empty_segment() {
        assert!(OuPath::parse("Apps//Production").is_err());
        assert!(OuPath::parse("Apps/ /Production").is_err());
    }

    #[test]
    fn test_parent_and_child() {
        let path = OuPath::parse("Apps/CAMPPS").unwrap();
        assert_eq!(path.parent(), Some(OuPath::parse("Apps").unwrap()));
        assert_eq!(
            path.child("Production"),
            OuPath::parse("Apps/CAMPPS/Production").unwrap()
        );
        assert_eq!(OuPath::root().parent(), None);
    }

    #[test]
    fn test_ordering_places_parents_first() {
        let mut paths = vec![
            OuPath::parse("Apps/CAMPPS/Production").unwrap(),
            OuPath::parse("Apps").unwrap(),
            OuPath::parse("Core").unwrap(),
            OuPath::parse("Apps/CAMPPS").unwrap(),
        ];
        paths.sort();
        let rendered: Vec<String> = paths.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["Apps", "Apps/CAMPPS", "Apps/CAMPPS/Production", "Core"]
        );
    }

    #[test]
    fn test_starts_with() {
        let prod = OuPath::parse("Apps/CAMPPS/Production").unwrap();
        let apps = OuPath::parse("Apps").unwrap();
        assert!(prod.starts_with(&apps));
        assert!(prod.starts_with(&OuPath::root()));
        assert!(prod.starts_with(&prod));
        assert!(!apps.starts_with(&prod));
        // Segment boundaries matter, not string prefixes
        assert!(!OuPath::parse("Applications").unwrap().starts_with(&apps));
    }
}
