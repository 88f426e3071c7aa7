//! Source text kept around for rendering diagnostics.

use crate::span::{FileId, Location, Span};
use std::path::{Path, PathBuf};

/// One cached file plus its line index.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: FileId,
    pub path: PathBuf,
    pub source: String,
    /// Byte offset of the first character of each line
    line_starts: Vec<u32>,
}

impl SourceFile {
    fn new(id: FileId, path: PathBuf, source: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .bytes()
                    .enumerate()
                    .filter(|(_, b)| *b == b'\n')
                    .map(|(i, _)| (i + 1) as u32),
            )
            .collect();
        Self {
            id,
            path,
            source,
            line_starts,
        }
    }

    /// 1-indexed `(line, column)` of a byte offset, clamped to the file end.
    pub fn line_column(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.source.len() as u32);
        let line_idx = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let column = offset - self.line_starts[line_idx] + 1;
        ((line_idx + 1) as u32, column)
    }

    /// Text of a 1-indexed line without its terminator.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&e| e as usize)
            .unwrap_or(self.source.len());
        Some(self.source[start..end].trim_end_matches(|c: char| c == '\n' || c == '\r'))
    }
}

/// All files seen during a run, addressed by [`FileId`].
#[derive(Debug, Default)]
pub struct SourceCache {
    files: Vec<SourceFile>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Add a file, or return the existing id if this path was added before.
    pub fn add_file(&mut self, path: impl AsRef<Path>, source: String) -> FileId {
        let path = path.as_ref();
        if let Some(existing) = self.files.iter().find(|f| f.path == path) {
            return existing.id;
        }
        let id = FileId(self.files.len() as u32);
        self.files.push(SourceFile::new(id, path.to_path_buf(), source));
        id
    }

    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }

    /// Resolve the start of a span; `None` for dummy spans or unknown files.
    pub fn location(&self, span: Span) -> Option<Location> {
        if span.is_dummy() {
            return None;
        }
        let file = self.get_file(span.file_id)?;
        let (line, column) = file.line_column(span.start);
        Some(Location {
            file: file.path.to_string_lossy().into_owned(),
            line,
            column,
        })
    }

    /// The source text a span covers.
    pub fn snippet(&self, span: Span) -> Option<&str> {
        if span.is_dummy() {
            return None;
        }
        let file = self.get_file(span.file_id)?;
        file.source.get(span.start as usize..span.end as usize)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column() {
        let mut cache = SourceCache::new();
        let id = cache.add_file("a.js", "var a;\nvar bc;\n".to_string());
        let file = cache.get_file(id).unwrap();

        assert_eq!(file.line_column(0), (1, 1));
        assert_eq!(file.line_column(5), (1, 6));
        assert_eq!(file.line_column(7), (2, 1));
        assert_eq!(file.line_column(11), (2, 5));
        // Past the end clamps to the last offset
        assert_eq!(file.line_column(500), (3, 1));
    }

    #[test]
    fn test_line_text_strips_crlf() {
        let mut cache = SourceCache::new();
        let id = cache.add_file("a.js", "x = 1;\r\ny = 2;".to_string());
        let file = cache.get_file(id).unwrap();

        assert_eq!(file.line_text(1), Some("x = 1;"));
        assert_eq!(file.line_text(2), Some("y = 2;"));
        assert_eq!(file.line_text(0), None);
        assert_eq!(file.line_text(3), None);
    }

    #[test]
    fn test_same_path_reuses_id() {
        let mut cache = SourceCache::new();
        let a = cache.add_file("a.js", "1".to_string());
        let b = cache.add_file("b.js", "2".to_string());
        let again = cache.add_file("a.js", "ignored".to_string());
        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_location_and_snippet() {
        let mut cache = SourceCache::new();
        let id = cache.add_file("m.js", "var x = 42;\nwith (o) {}".to_string());

        let span = Span::new(id, 12, 16);
        let loc = cache.location(span).unwrap();
        assert_eq!((loc.line, loc.column), (2, 1));
        assert_eq!(cache.snippet(span), Some("with"));
        assert!(cache.location(Span::DUMMY).is_none());
    }
}
