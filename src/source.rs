//! In-memory concatenation of several byte sources into one stream.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::Result;

/// Builds one contiguous buffer from files, readers and byte slices, in append order.
///
/// No line or marker awareness: a source without a trailing newline runs straight into the next.
///
/// ```
/// use std::io::Read;
/// use pembundle::source::ConcatSource;
///
/// let mut out = String::new();
/// ConcatSource::new()
///     .append_bytes(b"str1")
///     .append_bytes(b"***str2***")
///     .materialize()
///     .read_to_string(&mut out)
///     .unwrap();
/// assert_eq!(out, "str1***str2***");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConcatSource {
    contents: Vec<u8>,
}

impl ConcatSource {
    /// An empty source; sources may be appended later.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `files` in order into a new source.
    pub fn from_files<I, P>(files: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        files
            .into_iter()
            .try_fold(Self::new(), |source, path| source.append_file(path))
    }

    /// Appends everything `reader` yields.
    pub fn append(mut self, mut reader: impl Read) -> Result<Self> {
        reader.read_to_end(&mut self.contents)?;
        Ok(self)
    }

    /// Appends the contents of the file at `path`.
    pub fn append_file(self, path: impl AsRef<Path>) -> Result<Self> {
        self.append(File::open(path)?)
    }

    pub fn append_bytes(mut self, bytes: &[u8]) -> Self {
        self.contents.extend_from_slice(bytes);
        self
    }

    /// Number of bytes accumulated so far.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// A reader over a snapshot of the accumulated contents.
    pub fn materialize(&self) -> Cursor<Vec<u8>> {
        Cursor::new(self.contents.clone())
    }

    /// Consumes the source, returning a reader over its contents.
    pub fn into_reader(self) -> Cursor<Vec<u8>> {
        Cursor::new(self.contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PARTS: [&str; 3] = ["str1", "***str2***", "__3__"];

    fn expected() -> Vec<u8> {
        PARTS.concat().into_bytes()
    }

    fn contents(source: &ConcatSource) -> Vec<u8> {
        let mut out = Vec::new();
        source.materialize().read_to_end(&mut out).unwrap();
        out
    }

    fn temp_files() -> Vec<tempfile::NamedTempFile> {
        PARTS
            .iter()
            .map(|part| {
                let mut file = tempfile::NamedTempFile::new().unwrap();
                file.write_all(part.as_bytes()).unwrap();
                file
            })
            .collect()
    }

    #[test]
    fn test_append_readers() {
        let source = PARTS
            .iter()
            .try_fold(ConcatSource::new(), |s, part| s.append(part.as_bytes()))
            .unwrap();
        assert_eq!(contents(&source), expected());
        assert_eq!(source.len(), expected().len());
    }

    #[test]
    fn test_append_files() {
        let files = temp_files();
        let mut source = ConcatSource::new();
        for file in &files {
            source = source.append_file(file.path()).unwrap();
        }
        assert_eq!(contents(&source), expected());
    }

    #[test]
    fn test_from_files() {
        let files = temp_files();
        let source = ConcatSource::from_files(files.iter().map(|f| f.path())).unwrap();
        assert_eq!(contents(&source), expected());
    }

    #[test]
    fn test_empty() {
        let source = ConcatSource::new();
        assert_eq!(source.len(), 0);
        assert!(source.is_empty());
        assert!(contents(&source).is_empty());
    }

    #[test]
    fn test_materialize_is_repeatable() {
        let source = ConcatSource::new().append_bytes(b"abc");
        assert_eq!(contents(&source), b"abc");
        assert_eq!(contents(&source), b"abc");
        let source = source.append_bytes(b"def");
        assert_eq!(contents(&source), b"abcdef");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConcatSource::from_files([dir.path().join("missing.pem")]).unwrap_err();
        assert!(matches!(err, crate::error::PemBundleError::Io(_)));
    }
}
