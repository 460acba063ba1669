//! CSV-backed credential table.
//!
//! The file starts with one header row (`FIELD_NAMES`) followed by one
//! row per credential in insertion order. Rows are only ever appended.
//!
//! The table never encrypts or decrypts: callers hand it records whose
//! password field is already ciphertext. Titles are not deduplicated
//! here; lookups return the first match.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::errors::{FerneyError, Result};
use crate::fsutil;

use super::credential::{normalize_title, CredentialRecord, FIELD_NAMES};

/// Handle on the credential table file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create an empty table holding only the header row.
    pub fn create(&self) -> Result<()> {
        let file = fsutil::create_private(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(FIELD_NAMES)
            .map_err(|e| self.csv_error(e))?;
        writer
            .flush()
            .map_err(|e| FerneyError::from_io(&self.path, e))?;
        drop(writer);

        fsutil::restrict_to_owner(&self.path)?;
        tracing::debug!(path = %self.path.display(), "created credential table");
        Ok(())
    }

    /// Append one record to the end of the table.
    ///
    /// The table must already exist; a missing file is `FileMissing`.
    pub fn append(&self, record: &CredentialRecord) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| FerneyError::from_io(&self.path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(record).map_err(|e| self.csv_error(e))?;
        writer
            .flush()
            .map_err(|e| FerneyError::from_io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), "appended credential row");
        Ok(())
    }

    /// Find the first record whose title matches `title` after normalization.
    ///
    /// Returns `Ok(None)` when nothing matches, including for a table
    /// with no data rows.
    pub fn find_by_title(&self, title: &str) -> Result<Option<CredentialRecord>> {
        let wanted = normalize_title(title);
        let mut reader = self.open_reader()?;

        for row in reader.deserialize::<CredentialRecord>() {
            let record = row.map_err(|e| self.csv_error(e))?;
            if record.has_title(&wanted) {
                return Ok(Some(record));
            }
        }

        Ok(None)
    }

    /// All records in insertion order.
    pub fn records(&self) -> Result<Vec<CredentialRecord>> {
        let mut reader = self.open_reader()?;
        reader
            .deserialize::<CredentialRecord>()
            .map(|row| row.map_err(|e| self.csv_error(e)))
            .collect()
    }

    /// Open the table and check its header row.
    fn open_reader(&self) -> Result<csv::Reader<File>> {
        let file = File::open(&self.path).map_err(|e| FerneyError::from_io(&self.path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader.headers().map_err(|e| self.csv_error(e))?;
        if !headers.iter().eq(FIELD_NAMES) {
            return Err(FerneyError::InvalidStoreFormat(format!(
                "expected header {:?}, found {:?}",
                FIELD_NAMES.join(","),
                headers.iter().collect::<Vec<_>>().join(",")
            )));
        }

        Ok(reader)
    }

    /// I/O failures keep their missing/permission classification; every
    /// other CSV error means the file itself is malformed.
    fn csv_error(&self, err: csv::Error) -> FerneyError {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(e) => FerneyError::from_io(&self.path, e),
            _ => FerneyError::InvalidStoreFormat(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(title: &str, password: &str) -> CredentialRecord {
        CredentialRecord {
            title: title.into(),
            site: "example.com".into(),
            username: "alice".into(),
            encrypted_password: password.into(),
            notes: String::new(),
        }
    }

    fn new_store() -> (TempDir, CredentialStore) {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("password manager.csv"));
        store.create().unwrap();
        (dir, store)
    }

    #[test]
    fn create_writes_header_only() {
        let (_dir, store) = new_store();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "Title,Website/App,Username,Password,Notes\n");
        assert!(store.records().unwrap().is_empty());
    }

    #[test]
    fn append_preserves_insertion_order() {
        let (_dir, store) = new_store();
        store.append(&record("Zeta", "c1")).unwrap();
        store.append(&record("Alpha", "c2")).unwrap();

        let titles: Vec<String> = store.records().unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn find_returns_first_duplicate() {
        let (_dir, store) = new_store();
        store.append(&record("Email", "first")).unwrap();
        store.append(&record("Email", "second")).unwrap();

        let found = store.find_by_title("email").unwrap().unwrap();
        assert_eq!(found.encrypted_password, "first");
    }

    #[test]
    fn find_absent_title_is_none() {
        let (_dir, store) = new_store();
        assert!(store.find_by_title("nonexistent").unwrap().is_none());

        store.append(&record("Email", "c")).unwrap();
        assert!(store.find_by_title("nonexistent").unwrap().is_none());
    }

    #[test]
    fn fields_with_commas_and_newlines_survive() {
        let (_dir, store) = new_store();
        let mut r = record("Work", "c");
        r.notes = "line one,\nline \"two\"".into();
        store.append(&r).unwrap();

        assert_eq!(store.find_by_title("work").unwrap().unwrap(), r);
    }

    #[test]
    fn wrong_header_is_invalid_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        fs::write(&path, "Name,Password\nx,y\n").unwrap();

        let store = CredentialStore::new(&path);
        assert!(matches!(
            store.find_by_title("x"),
            Err(FerneyError::InvalidStoreFormat(_))
        ));
    }

    #[test]
    fn short_row_is_invalid_format() {
        let (_dir, store) = new_store();
        fs::write(
            store.path(),
            "Title,Website/App,Username,Password,Notes\nOnly,two\n",
        )
        .unwrap();
        assert!(matches!(
            store.records(),
            Err(FerneyError::InvalidStoreFormat(_))
        ));
    }

    #[test]
    fn missing_table_is_file_missing() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("absent.csv"));
        assert!(matches!(
            store.find_by_title("x"),
            Err(FerneyError::FileMissing(_))
        ));
        assert!(matches!(
            store.append(&record("X", "c")),
            Err(FerneyError::FileMissing(_))
        ));
    }
}
