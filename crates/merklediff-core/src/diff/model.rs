//! Diff output types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a differing key range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Present only in the right-hand tree
    Added,
    /// Present only in the left-hand tree
    Removed,
    /// Present in both with different content, or a structural mismatch
    Changed,
}

impl DiffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffKind::Added => "added",
            DiffKind::Removed => "removed",
            DiffKind::Changed => "changed",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive `[start, end]` span of keys that differ
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyRange {
    pub start: Vec<u8>,
    pub end: Vec<u8>,
    pub kind: DiffKind,
}

impl KeyRange {
    pub fn new(start: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>, kind: DiffKind) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            kind,
        }
    }

    pub fn start_lossy(&self) -> String {
        String::from_utf8_lossy(&self.start).into_owned()
    }

    pub fn end_lossy(&self) -> String {
        String::from_utf8_lossy(&self.end).into_owned()
    }

    /// Bounds in byte-wise order, whichever way round they were recorded.
    ///
    /// Trees built from unsorted input can produce ranges with `start > end`.
    pub fn ordered_bounds(&self) -> (&[u8], &[u8]) {
        if self.start <= self.end {
            (&self.start, &self.end)
        } else {
            (&self.end, &self.start)
        }
    }

    /// Whether `key` falls inside the range (inclusive, byte-wise)
    pub fn contains(&self, key: &[u8]) -> bool {
        let (lo, hi) = self.ordered_bounds();
        lo <= key && key <= hi
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}]",
            self.kind,
            String::from_utf8_lossy(&self.start),
            String::from_utf8_lossy(&self.end)
        )
    }
}

/// Range counts by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

impl DiffStats {
    pub fn from_ranges(ranges: &[KeyRange]) -> Self {
        ranges.iter().fold(Self::default(), |mut stats, r| {
            match r.kind {
                DiffKind::Added => stats.added += 1,
                DiffKind::Removed => stats.removed += 1,
                DiffKind::Changed => stats.changed += 1,
            }
            stats
        })
    }

    pub fn total(&self) -> usize {
        self.added + self.removed + self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DiffKind::Added).unwrap(), "\"added\"");
        assert_eq!(
            serde_json::from_str::<DiffKind>("\"changed\"").unwrap(),
            DiffKind::Changed
        );
    }

    #[test]
    fn test_range_display() {
        let r = KeyRange::new("a", "c", DiffKind::Removed);
        assert_eq!(r.to_string(), "removed [a, c]");
    }

    #[test]
    fn test_contains_is_inclusive() {
        let r = KeyRange::new("b", "d", DiffKind::Changed);
        assert!(r.contains(b"b"));
        assert!(r.contains(b"c"));
        assert!(r.contains(b"d"));
        assert!(!r.contains(b"a"));
        assert!(!r.contains(b"e"));
    }

    #[test]
    fn test_reversed_bounds_are_normalized() {
        let r = KeyRange::new("d", "b", DiffKind::Changed);
        assert_eq!(r.ordered_bounds(), (&b"b"[..], &b"d"[..]));
        assert!(r.contains(b"c"));
    }

    #[test]
    fn test_stats_from_ranges() {
        let ranges = vec![
            KeyRange::new("a", "a", DiffKind::Added),
            KeyRange::new("b", "b", DiffKind::Changed),
            KeyRange::new("c", "c", DiffKind::Changed),
        ];
        let stats = DiffStats::from_ranges(&ranges);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.removed, 0);
        assert_eq!(stats.changed, 2);
        assert_eq!(stats.total(), 3);
        assert!(DiffStats::default().is_empty());
    }
}
