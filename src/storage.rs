//! Pluggable session credential stores.
//!
//! This module defines the [`SessionStore`] (async) and
//! [`BlockingSessionStore`] (blocking) traits via a shared macro, mirroring
//! the client generation pattern in [`crate::client`].

#[cfg(feature = "storage-file")]
mod file;
mod memory;

#[cfg(feature = "storage-file")]
pub use file::FileStorage;
pub use memory::InMemoryStorage;

/// Generates a session store trait (async or blocking).
///
/// Uses `@methods` to define the method list once, and `@method` to render
/// each method in async (`impl Future + Send`) or blocking (`fn`) style.
macro_rules! define_storage {
    // ── Entry points ────────────────────────────────────────────────
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: async_mode,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_storage!(@methods async_mode);
        }
    };
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: blocking,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_storage!(@methods blocking);
        }
    };

    // ── Single method list (shared between both variants) ───────────
    (@methods $mode:ident) => {
        define_storage!(@method $mode, load_session,
            "Returns the stored session.\n\nReturns `Ok(None)` if nobody is logged in.\n\n# Errors\n\nReturns an error if the storage backend fails to read.",
            -> Result<Option<Session>>);
        define_storage!(@method $mode, save_session,
            "Stores the session, replacing any previous one.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            session: Session, -> Result<()>);
        define_storage!(@method $mode, clear_session,
            "Removes the stored session. Clearing an empty store is not an error.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            -> Result<()>);
    };

    // ── Blocking method renderer ────────────────────────────────────
    (@method blocking, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*) -> $ret;
    };

    // ── Async method renderer (returns impl Future + Send) ──────────
    (@method async_mode, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*)
            -> impl core::future::Future<Output = $ret> + Send;
    };
}

#[cfg(feature = "async")]
mod async_storage {
    //! Async session store trait definition.

    use crate::error::Result;
    use crate::session::Session;

    define_storage! {
        trait_name: SessionStore,
        trait_doc: "Async store for the logged-in session.\n\nAll methods take `&self`; implementations use interior mutability\n(e.g. `Mutex`) for thread-safe mutation.",
        mode: async_mode,
    }
}

#[cfg(feature = "blocking")]
mod blocking_storage {
    //! Blocking session store trait definition.

    use crate::error::Result;
    use crate::session::Session;

    define_storage! {
        trait_name: BlockingSessionStore,
        trait_doc: "Blocking store for the logged-in session.\n\nAll methods take `&self`; implementations use interior mutability\n(e.g. `Mutex`) for thread-safe mutation.",
        mode: blocking,
    }
}

#[cfg(feature = "async")]
pub use async_storage::SessionStore;
#[cfg(feature = "blocking")]
pub use blocking_storage::BlockingSessionStore;
