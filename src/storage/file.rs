//! JSON-file-based session store.
//!
//! Keeps the logged-in session in `session.json` under a configurable
//! directory (default: `$XDG_DATA_HOME/fintrack-ledger/`).

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[cfg(feature = "async")]
use core::future::{self, Future};

use crate::error::{LedgerError, Result};
use crate::session::Session;

/// Application name used for the XDG data directory.
const APP_NAME: &str = "fintrack-ledger";

/// File holding the serialized session.
const SESSION_FILE: &str = "session.json";

/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "storage.lock";

/// File-backed session store.
///
/// # Concurrency
///
/// Thread safety within a single process is provided by an in-process
/// [`Mutex`]. Cross-process safety is achieved via an advisory file lock
/// on `storage.lock` (using [`std::fs::File::lock`] /
/// [`std::fs::File::lock_shared`]).
///
/// Reads acquire a shared lock, writes an exclusive one. Writes go to a
/// temporary file that is then renamed over `session.json`, so a crash
/// never leaves a half-written token behind.
///
/// # File layout
///
/// ```text
/// <dir>/
///   storage.lock          (cross-process lock sentinel)
///   session.json          (owner-only, mode 0600 on unix)
/// ```
#[derive(Debug)]
pub struct FileStorage {
    /// Directory containing the session and lock files.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
}

impl FileStorage {
    /// Creates a new file store rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist, and opens
    /// (or creates) the `storage.lock` sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the default XDG-compliant data directory for this application.
    ///
    /// On Linux: `$XDG_DATA_HOME/fintrack-ledger/` (typically
    /// `~/.local/share/fintrack-ledger/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| {
                LedgerError::Storage("could not determine platform data directory".into())
            })
    }

    // ── Private helpers ─────────────────────────────────────────────

    /// Returns the full path for a given file name.
    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Acquires an in-process mutex guard and a shared (read) file lock,
    /// executes `op`, then releases the file lock.
    fn with_shared_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock_shared().map_err(storage_io_error)?;
        let result = op();
        // Only surface the unlock error when the operation succeeded;
        // otherwise the original error is more useful.
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Acquires an in-process mutex guard and an exclusive (write) file
    /// lock, executes `op`, then releases the file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Reads the session file. Returns `None` if it does not exist.
    fn read_session(&self) -> Result<Option<Session>> {
        self.with_shared_lock(|| match fs::read_to_string(self.path(SESSION_FILE)) {
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(LedgerError::from),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_io_error(err)),
        })
    }

    /// Atomically writes the session file (write-to-tmp then rename).
    fn write_session(&self, session: &Session) -> Result<()> {
        self.with_exclusive_lock(|| {
            let path = self.path(SESSION_FILE);
            let tmp_path = self.path(&format!("{SESSION_FILE}.tmp"));
            let json = serde_json::to_string_pretty(session).map_err(LedgerError::from)?;
            write_private(&tmp_path, json.as_bytes()).map_err(storage_io_error)?;
            fs::rename(&tmp_path, &path).map_err(storage_io_error)?;
            tracing::debug!(path = %path.display(), "session saved");
            Ok(())
        })
    }

    /// Deletes the session file.
    ///
    /// The `storage.lock` sentinel is preserved; it is infrastructure, not
    /// data.
    fn remove_session(&self) -> Result<()> {
        self.with_exclusive_lock(|| match fs::remove_file(self.path(SESSION_FILE)) {
            Ok(()) => {
                tracing::debug!("session removed");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_io_error(err)),
        })
    }
}

// ── Free-standing helpers ───────────────────────────────────────────────

/// Writes `contents` to a freshly created file that only the owner can
/// read (mode `0600` on unix). A leftover file at `path` is replaced.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    let mut file = private_file_options().open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Open options for a new owner-only file.
#[cfg(unix)]
fn private_file_options() -> fs::OpenOptions {
    use std::os::unix::fs::OpenOptionsExt as _;

    let mut options = fs::OpenOptions::new();
    let _opts = options.write(true).create_new(true).mode(0o600);
    options
}

/// Open options for a new file; other platforms keep their default ACLs.
#[cfg(not(unix))]
fn private_file_options() -> fs::OpenOptions {
    let mut options = fs::OpenOptions::new();
    let _opts = options.write(true).create_new(true);
    options
}

/// Wraps an I/O error into a [`LedgerError::Storage`].
fn storage_io_error(err: std::io::Error) -> LedgerError {
    LedgerError::Storage(Box::new(err))
}

/// Wraps a mutex poison error into a [`LedgerError::Storage`].
fn lock_poison_error<T>(err: &std::sync::PoisonError<T>) -> LedgerError {
    LedgerError::Storage(err.to_string().into())
}

// ── BlockingSessionStore implementation ─────────────────────────────────

#[cfg(feature = "blocking")]
impl super::BlockingSessionStore for FileStorage {
    #[inline]
    fn load_session(&self) -> Result<Option<Session>> {
        self.read_session()
    }

    #[inline]
    fn save_session(&self, session: Session) -> Result<()> {
        self.write_session(&session)
    }

    #[inline]
    fn clear_session(&self) -> Result<()> {
        self.remove_session()
    }
}

// ── SessionStore (async) implementation ─────────────────────────────────

#[cfg(feature = "async")]
impl super::SessionStore for FileStorage {
    #[inline]
    fn load_session(&self) -> impl Future<Output = Result<Option<Session>>> + Send {
        future::ready(self.read_session())
    }

    #[inline]
    fn save_session(&self, session: Session) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.write_session(&session))
    }

    #[inline]
    fn clear_session(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.remove_session())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    /// Helper to create a [`FileStorage`] in a temporary directory.
    fn temp_storage() -> (FileStorage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        (storage, dir)
    }

    fn session(token: &str) -> Session {
        Session::new(SecretString::from(token.to_owned()))
    }

    #[test]
    fn new_creates_nested_directory_and_lock_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let _storage = FileStorage::new(nested.clone()).unwrap();
        assert!(nested.join(LOCK_FILE).exists());
    }

    #[test]
    fn default_dir_ends_with_app_name() {
        if let Ok(path) = FileStorage::default_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_readable_by_owner_only() {
        use std::os::unix::fs::PermissionsExt as _;

        let (storage, dir) = temp_storage();
        // A world-readable leftover from an interrupted write.
        fs::write(dir.path().join(format!("{SESSION_FILE}.tmp")), "stale").unwrap();
        storage.write_session(&session("jwt-secret")).unwrap();

        let mode = fs::metadata(dir.path().join(SESSION_FILE))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(storage.read_session().unwrap().is_some());
    }

    #[test]
    fn corrupt_session_file_is_an_error() {
        let (storage, dir) = temp_storage();
        fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();
        assert!(matches!(
            storage.read_session(),
            Err(LedgerError::Serialization(_))
        ));
    }

    #[cfg(feature = "blocking")]
    mod blocking {
        use super::*;
        use crate::storage::BlockingSessionStore;

        #[test]
        fn session_initially_none() {
            let (storage, _dir) = temp_storage();
            assert!(storage.load_session().unwrap().is_none());
        }

        #[test]
        fn save_load_clear() {
            let (storage, dir) = temp_storage();
            storage.save_session(session("tok-1")).unwrap();
            assert_eq!(storage.load_session().unwrap(), Some(session("tok-1")));
            assert!(!dir.path().join("session.json.tmp").exists());

            storage.save_session(session("tok-2")).unwrap();
            assert_eq!(storage.load_session().unwrap(), Some(session("tok-2")));

            storage.clear_session().unwrap();
            assert!(storage.load_session().unwrap().is_none());
            assert!(dir.path().join(LOCK_FILE).exists());
        }

        #[test]
        fn clear_without_session_is_ok() {
            let (storage, _dir) = temp_storage();
            storage.clear_session().unwrap();
        }

        #[test]
        fn session_survives_reopen() {
            let dir = tempfile::tempdir().unwrap();
            FileStorage::new(dir.path().to_path_buf())
                .unwrap()
                .save_session(session("persisted"))
                .unwrap();
            let reopened = FileStorage::new(dir.path().to_path_buf()).unwrap();
            assert_eq!(reopened.load_session().unwrap(), Some(session("persisted")));
        }
    }

    #[cfg(feature = "async")]
    mod async_tests {
        use super::*;
        use crate::storage::SessionStore;

        #[tokio::test]
        async fn save_then_load() {
            let (storage, _dir) = temp_storage();
            storage.save_session(session("async-tok")).await.unwrap();
            assert_eq!(
                storage.load_session().await.unwrap(),
                Some(session("async-tok"))
            );
            storage.clear_session().await.unwrap();
            assert!(storage.load_session().await.unwrap().is_none());
        }
    }
}
