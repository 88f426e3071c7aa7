//! Byte-offset spans into cached source files.

use serde::{Deserialize, Serialize};

/// Index of a file in the [`SourceCache`](crate::SourceCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl FileId {
    /// Placeholder for nodes built without a source file (tests, synthesized code).
    pub const DUMMY: FileId = FileId(u32::MAX);
}

/// Half-open byte range `[start, end)` in one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub file_id: FileId,
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const DUMMY: Span = Span {
        file_id: FileId::DUMMY,
        start: 0,
        end: 0,
    };

    pub fn new(file_id: FileId, start: u32, end: u32) -> Self {
        Self { file_id, start, end }
    }

    pub fn is_dummy(&self) -> bool {
        self.file_id == FileId::DUMMY
    }

    /// Length in bytes; zero for inverted ranges.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::DUMMY
    }
}

/// A span resolved to a human-readable position (1-indexed line and column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_span() {
        assert!(Span::DUMMY.is_dummy());
        assert!(Span::default().is_dummy());
        assert!(!Span::new(FileId(0), 1, 4).is_dummy());
    }

    #[test]
    fn test_len_saturates() {
        assert_eq!(Span::new(FileId(0), 3, 10).len(), 7);
        assert_eq!(Span::new(FileId(0), 10, 3).len(), 0);
        assert!(Span::new(FileId(0), 5, 5).is_empty());
    }

    #[test]
    fn test_location_display() {
        let loc = Location {
            file: "main.js".to_string(),
            line: 3,
            column: 14,
        };
        assert_eq!(loc.to_string(), "main.js:3:14");
    }
}
