//! Persisted client session state.
//!
//! One token string under a fixed key in a caller-supplied directory, read at
//! startup and rewritten on every login/logout. Only the guard and the
//! explicit login/logout operations write it.

use std::{
    fs, io,
    path::PathBuf,
};

/// Fixed storage key, the file name under the store directory.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(TOKEN_KEY)
    }

    /// Read the stored token. Absent, unreadable or empty storage reads as
    /// `None`.
    #[must_use]
    pub fn read(&self) -> Option<String> {
        let token = fs::read_to_string(self.path()).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// Persist the token, creating the store directory when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn write(&self, token: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(), token)
    }

    /// Remove the stored token. Removing an absent token is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(self.path()) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_clear_round_trip() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = TokenStore::new(dir.path());

        assert_eq!(store.read(), None);

        store.write("abc.def.ghi")?;
        assert_eq!(store.read(), Some("abc.def.ghi".to_string()));

        store.clear()?;
        assert_eq!(store.read(), None);
        Ok(())
    }

    #[test]
    fn clear_is_idempotent() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = TokenStore::new(dir.path());

        store.clear()?;
        store.clear()?;
        Ok(())
    }

    #[test]
    fn empty_file_reads_as_none() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = TokenStore::new(dir.path());

        store.write("  \n")?;
        assert_eq!(store.read(), None);
        Ok(())
    }

    #[test]
    fn creates_missing_store_directory() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = TokenStore::new(dir.path().join("nested").join("store"));

        store.write("abc.def.ghi")?;
        assert_eq!(store.read(), Some("abc.def.ghi".to_string()));
        Ok(())
    }
}
