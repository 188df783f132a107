//! Store file reader
//!
//! Reads the store line by line and keeps only well-formed records.
//! A malformed line is skipped, never fatal. Bytes that are not valid
//! UTF-8 are decoded as U+FFFD, so one damaged line never hides the rest.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::errors::{StorageError, StorageResult};
use super::record::User;

/// Sequential reader over a store file or any buffered source.
pub struct StoreReader<R> {
    /// Path reported in errors
    source_path: PathBuf,
    /// Buffered line source
    reader: R,
    /// 1-based number of the last line read
    line_number: usize,
    /// Lines dropped for having the wrong shape
    skipped: usize,
}

impl StoreReader<BufReader<File>> {
    /// Opens the store file for reading.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the file does not exist and
    /// `StorageError::Io` for any other open failure.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = File::open(path).map_err(|e| StorageError::from_read(path, e))?;
        Ok(Self::from_reader(path, BufReader::new(file)))
    }
}

impl<R: BufRead> StoreReader<R> {
    /// Wraps an already open buffered source.
    pub fn from_reader(source_path: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            source_path: source_path.into(),
            reader,
            line_number: 0,
            skipped: 0,
        }
    }

    /// Reads the next well-formed record.
    ///
    /// Returns `Ok(None)` at end of input.
    pub fn read_next(&mut self) -> StorageResult<Option<User>> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = self
                .reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| StorageError::from_read(&self.source_path, e))?;
            if n == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf);
            // Invalid UTF-8 is replaced rather than failing the whole scan
            let line = String::from_utf8_lossy(bytes);
            if let Cow::Owned(_) = line {
                debug!(
                    path = %self.source_path.display(),
                    line = self.line_number,
                    "store line is not valid UTF-8"
                );
            }
            match User::from_line(&line) {
                Some(user) => return Ok(Some(user)),
                None => {
                    self.skipped += 1;
                    debug!(
                        path = %self.source_path.display(),
                        line = self.line_number,
                        "skipping malformed store line"
                    );
                }
            }
        }
    }

    /// Reads all remaining well-formed records.
    pub fn read_all(&mut self) -> StorageResult<Vec<User>> {
        let mut users = Vec::new();
        while let Some(user) = self.read_next()? {
            users.push(user);
        }
        Ok(users)
    }

    /// Returns the number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the number of malformed lines skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn reader_over(text: &str) -> StoreReader<Cursor<Vec<u8>>> {
        StoreReader::from_reader("mem", Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_reads_in_file_order() {
        let mut reader = reader_over("1;a;a@x;S\n2;b;b@x;S\n");
        let users = reader.read_all().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "a");
        assert_eq!(users[1].name, "b");
        assert_eq!(reader.line_number(), 2);
    }

    #[test]
    fn test_skips_malformed_lines() {
        let mut reader = reader_over("1;a;a@x;S\ngarbage\n\n2;b;b@x\n3;c;c@x;S;extra\n4;d;d@x;S\n");
        let users = reader.read_all().unwrap();
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["a", "d"]);
        assert_eq!(reader.skipped(), 4);
    }

    #[test]
    fn test_last_line_without_terminator() {
        let mut reader = reader_over("1;a;a@x;S\n2;b;b@x;S");
        assert_eq!(reader.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_crlf_lines() {
        let mut reader = reader_over("1;a;a@x;CONVITE ENVIADO\r\n");
        let user = reader.read_next().unwrap().unwrap();
        assert_eq!(user.status.as_str(), "CONVITE ENVIADO");
    }

    #[test]
    fn test_invalid_utf8_line_does_not_stop_scan() {
        let mut reader = StoreReader::from_reader(
            "mem",
            Cursor::new(b"1;ana;ana@x;S\n2;b\xff;b@x;S\n3;caio;caio@x;S\n".to_vec()),
        );
        let users = reader.read_all().unwrap();
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["ana", "b\u{FFFD}", "caio"]);
    }

    #[test]
    fn test_open_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = StoreReader::open(&temp.path().join("users.txt"))
            .err()
            .unwrap();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_open_reads_real_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("users.txt");
        fs::write(&path, "1;a;a@x;S\n").unwrap();

        let mut reader = StoreReader::open(&path).unwrap();
        assert_eq!(reader.read_all().unwrap().len(), 1);
    }
}
