//! In-memory session store for testing.
//!
//! Provides [`InMemoryStorage`], a thread-safe in-memory implementation of
//! the session store traits. Useful in tests where file I/O is undesirable.

use std::sync::Mutex;

#[cfg(feature = "async")]
use core::future::{self, Future};

use crate::error::{LedgerError, Result};
use crate::session::Session;

/// Thread-safe in-memory session store.
///
/// This type implements both [`super::SessionStore`] (async) and
/// [`super::BlockingSessionStore`] (blocking), providing a zero-setup
/// backend for tests. Nothing survives the process.
///
/// # Example
///
/// ```rust
/// use fintrack_ledger::storage::InMemoryStorage;
///
/// let storage = InMemoryStorage::new();
/// // Use with the Ledger or LedgerBlocking builders:
/// // LedgerBlocking::builder().storage(storage).build()
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    /// Stored session behind a mutex for thread-safe interior mutability.
    inner: Mutex<Option<Session>>,
}

impl InMemoryStorage {
    /// Creates a new empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `session`.
    #[inline]
    #[must_use]
    pub const fn with_session(session: Session) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R, F: FnOnce(&mut Option<Session>) -> R>(&self, op: F) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(op(&mut inner))
    }
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> LedgerError {
    LedgerError::Storage(err.to_string().into())
}

// ── BlockingSessionStore implementation ─────────────────────────────────

#[cfg(feature = "blocking")]
impl super::BlockingSessionStore for InMemoryStorage {
    #[inline]
    fn load_session(&self) -> Result<Option<Session>> {
        self.with_lock(|inner| inner.clone())
    }

    #[inline]
    fn save_session(&self, session: Session) -> Result<()> {
        self.with_lock(|inner| *inner = Some(session))
    }

    #[inline]
    fn clear_session(&self) -> Result<()> {
        self.with_lock(|inner| *inner = None)
    }
}

// ── SessionStore (async) implementation ─────────────────────────────────

#[cfg(feature = "async")]
impl super::SessionStore for InMemoryStorage {
    #[inline]
    fn load_session(&self) -> impl Future<Output = Result<Option<Session>>> + Send {
        future::ready(self.with_lock(|inner| inner.clone()))
    }

    #[inline]
    fn save_session(&self, session: Session) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| *inner = Some(session)))
    }

    #[inline]
    fn clear_session(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| *inner = None))
    }
}
