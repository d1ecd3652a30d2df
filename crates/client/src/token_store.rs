//! Durable storage for the bearer credential.
//!
//! Exactly one credential is held at a time. The role returned alongside it at
//! login is kept next to it as an offline hint and is cleared with it.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use pass_core::Role;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors raised when the backing storage is unavailable.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Reading or writing a storage file failed.
    #[error("token storage unavailable at {}: {source}", .path.display())]
    Io {
        /// File that could not be accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// An opaque bearer token.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for building the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Persistence for the single bearer credential.
pub trait TokenStore: Send + Sync {
    /// The stored credential, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    fn get(&self) -> Result<Option<Credential>, TokenStoreError>;

    /// Store a credential, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn set(&self, credential: Credential) -> Result<(), TokenStoreError>;

    /// Remove the credential and the role hint. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if existing entries cannot be removed.
    fn clear(&self) -> Result<(), TokenStoreError>;

    /// Role reported at the last login, if remembered.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    fn role_hint(&self) -> Result<Option<Role>, TokenStoreError>;

    /// Remember the role reported at login.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn set_role_hint(&self, role: Role) -> Result<(), TokenStoreError>;
}

/// Token store backed by a file, with the role hint in `<token file>.role`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    token_path: PathBuf,
    role_path: PathBuf,
}

impl FileTokenStore {
    /// Create a store for the given token file. Nothing is touched on disk
    /// until the first write.
    #[must_use]
    pub fn new(token_path: impl Into<PathBuf>) -> Self {
        let token_path = token_path.into();
        let mut role_path = token_path.clone().into_os_string();
        role_path.push(".role");
        let role_path = PathBuf::from(role_path);
        Self {
            token_path,
            role_path,
        }
    }

    /// Path of the token file.
    #[must_use]
    pub fn token_path(&self) -> &Path {
        &self.token_path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<Credential>, TokenStoreError> {
        Ok(read_trimmed(&self.token_path)?.map(Credential::new))
    }

    fn set(&self, credential: Credential) -> Result<(), TokenStoreError> {
        write_private(&self.token_path, credential.expose())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        remove_if_present(&self.token_path)?;
        remove_if_present(&self.role_path)
    }

    fn role_hint(&self) -> Result<Option<Role>, TokenStoreError> {
        Ok(read_trimmed(&self.role_path)?.and_then(|raw| raw.parse().ok()))
    }

    fn set_role_hint(&self, role: Role) -> Result<(), TokenStoreError> {
        write_private(&self.role_path, role.as_str())
    }
}

fn io_error(path: &Path, source: io::Error) -> TokenStoreError {
    TokenStoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_trimmed(path: &Path) -> Result<Option<String>, TokenStoreError> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            let trimmed = raw.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error(path, e)),
    }
}

fn write_private(path: &Path, contents: &str) -> Result<(), TokenStoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let written = options.open(path).and_then(|mut file| {
        // `mode` only applies to new files; tighten a pre-existing one before
        // any content lands in it.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    });

    written.map_err(|e| {
        let _ = fs::remove_file(path);
        io_error(path, e)
    })
}

fn remove_if_present(path: &Path) -> Result<(), TokenStoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error(path, e)),
    }
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: Mutex<MemoryEntries>,
}

#[derive(Debug, Default)]
struct MemoryEntries {
    credential: Option<Credential>,
    role: Option<Role>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries().credential = Some(Credential::new(token));
        store
    }

    fn entries(&self) -> MutexGuard<'_, MemoryEntries> {
        // Entries are plain values, so a panic mid-update cannot corrupt them.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<Credential>, TokenStoreError> {
        Ok(self.entries().credential.clone())
    }

    fn set(&self, credential: Credential) -> Result<(), TokenStoreError> {
        self.entries().credential = Some(credential);
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut entries = self.entries();
        entries.credential = None;
        entries.role = None;
        Ok(())
    }

    fn role_hint(&self) -> Result<Option<Role>, TokenStoreError> {
        Ok(self.entries().role)
    }

    fn set_role_hint(&self, role: Role) -> Result<(), TokenStoreError> {
        self.entries().role = Some(role);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn token(store: &dyn TokenStore) -> Option<String> {
        store.get().unwrap().map(|c| c.expose().to_owned())
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("super-secret");
        assert_eq!(format!("{credential:?}"), "Credential([REDACTED])");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));

        assert_eq!(token(&store), None);
        store.set(Credential::new("T1")).unwrap();
        assert_eq!(token(&store), Some("T1".to_owned()));

        store.set(Credential::new("T2")).unwrap();
        assert_eq!(token(&store), Some("T2".to_owned()));
    }

    #[test]
    fn test_file_store_clear_removes_role_hint_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token"));
        store.set(Credential::new("T1")).unwrap();
        store.set_role_hint(Role::Student).unwrap();
        assert_eq!(store.role_hint().unwrap(), Some(Role::Student));

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(token(&store), None);
        assert_eq!(store.role_hint().unwrap(), None);
        assert!(!dir.path().join("token.role").exists());
    }

    #[test]
    fn test_file_store_blank_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(token(&FileTokenStore::new(path)), None);
    }

    #[test]
    fn test_file_store_unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the token file should be.
        let store = FileTokenStore::new(dir.path());
        assert!(matches!(store.get(), Err(TokenStoreError::Io { .. })));
    }

    #[test]
    fn test_role_hint_never_shares_the_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("pass.role"));
        store.set(Credential::new("T1")).unwrap();
        store.set_role_hint(Role::Advisor).unwrap();

        assert_eq!(token(&store), Some("T1".to_owned()));
        assert_eq!(store.role_hint().unwrap(), Some(Role::Advisor));
        assert!(dir.path().join("pass.role.role").exists());
    }

    #[test]
    fn test_role_hint_is_appended_to_token_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token.json"));
        store.set(Credential::new("T1")).unwrap();
        store.set_role_hint(Role::Student).unwrap();

        assert!(dir.path().join("token.json.role").exists());
        assert!(!dir.path().join("token.role").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_writes_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileTokenStore::new(&path);
        store.set(Credential::new("T1")).unwrap();
        store.set_role_hint(Role::Advisor).unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), 0o600);
        assert_eq!(mode(&dir.path().join("token.role")), 0o600);
        assert_eq!(token(&store), Some("T1".to_owned()));
    }

    #[test]
    fn test_write_over_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the token file should be.
        let path = dir.path().join("token");
        fs::create_dir(&path).unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(
            store.set(Credential::new("T1")),
            Err(TokenStoreError::Io { .. })
        ));
        assert!(path.is_dir());
        assert_eq!(store.get().ok().flatten().map(|c| c.expose().to_owned()), None);
    }

    #[test]
    fn test_memory_store_clear() {
        let store = MemoryTokenStore::with_token("T1");
        store.set_role_hint(Role::Advisor).unwrap();
        store.clear().unwrap();
        assert_eq!(token(&store), None);
        assert_eq!(store.role_hint().unwrap(), None);
    }
}
