//! High-level ledger client with an integrated session store.
//!
//! Combines the low-level HTTP client with a [`SessionStore`] /
//! [`BlockingSessionStore`] backend: `login` persists the issued session,
//! `logout` clears it, and every authenticated helper loads it from the
//! store and hands it to the HTTP client explicitly.
//!
//! [`SessionStore`]: crate::storage::SessionStore
//! [`BlockingSessionStore`]: crate::storage::BlockingSessionStore

/// Generates a high-level ledger client (async or blocking).
macro_rules! define_ledger {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_client: $http_client:ty,
        storage_trait: $storage_trait:ident,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder<S: $storage_trait> {
            /// Base URL override.
            base_url: Option<String>,
            /// Session store.
            storage: Option<S>,
        }

        impl<S: $storage_trait> $builder<S> {
            /// Overrides the base URL of the ledger service.
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Sets the session store.
            #[inline]
            #[must_use]
            pub fn storage(mut self, storage: S) -> Self {
                self.storage = Some(storage);
                self
            }

            /// Builds the high-level client.
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::Storage`] if no store was provided.
            /// Returns [`LedgerError::InvalidUrl`] if the base URL does not parse.
            /// Returns [`LedgerError::Http`] if the HTTP client fails to build.
            #[inline]
            pub fn build(self) -> Result<$client<S>> {
                let storage = self.storage.ok_or_else(|| {
                    LedgerError::Storage("session store is required".into())
                })?;

                let mut http_builder = <$http_client>::builder();
                if let Some(url) = self.base_url {
                    http_builder = http_builder.base_url(url);
                }
                let client = http_builder.build()?;

                Ok($client { client, storage })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client<S: $storage_trait> {
            /// Low-level HTTP client.
            client: $http_client,
            /// Session store.
            storage: S,
        }

        impl<S: $storage_trait> $client<S> {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder<S> {
                $builder {
                    base_url: None,
                    storage: None,
                }
            }

            /// Returns the low-level HTTP client.
            #[inline]
            #[must_use]
            pub const fn client(&self) -> &$http_client {
                &self.client
            }

            /// Returns the session store.
            #[inline]
            #[must_use]
            pub const fn storage(&self) -> &S {
                &self.storage
            }

            // ── Session ─────────────────────────────────────────────

            /// Registers a new user. Does not log in.
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::Validation`] if the email or password is
            /// rejected locally, or an HTTP/API error from the server.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn register(
                &self,
                email: &str,
                password: SecretString,
            ) -> Result<RegisteredUser> {
                let request = CredentialsRequest::register(email, password)?;
                let user = self.client.register(&request) $( .$await_ext )? ?;
                tracing::info!(user = %user.user_urn, "user registered");
                Ok(user)
            }

            /// Logs in and stores the issued session, replacing any previous one.
            ///
            /// # Errors
            ///
            /// Returns an error if validation, the HTTP call or the store fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn login(&self, email: &str, password: SecretString) -> Result<()> {
                let request = CredentialsRequest::login(email, password)?;
                let session = self.client.login(&request) $( .$await_ext )? ?;
                self.storage.save_session(session) $( .$await_ext )? ?;
                tracing::info!("logged in");
                Ok(())
            }

            /// Invalidates the stored session on the server, then removes it
            /// from the store.
            ///
            /// The local session is kept if the server does not confirm the
            /// logout; use [`Self::forget_session`] to drop it regardless.
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::NotLoggedIn`] if no session is stored, or
            /// an error if the HTTP call or the store fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn logout(&self) -> Result<()> {
                let session = self.session() $( .$await_ext )? ?;
                let _data = self.client.logout(&session) $( .$await_ext )? ?;
                self.storage.clear_session() $( .$await_ext )? ?;
                tracing::info!("logged out");
                Ok(())
            }

            /// Removes the stored session without contacting the server.
            ///
            /// # Errors
            ///
            /// Returns an error if the store fails.
            #[inline]
            pub $($async_kw)? fn forget_session(&self) -> Result<()> {
                self.storage.clear_session() $( .$await_ext )?
            }

            /// Returns `true` if a session is stored.
            ///
            /// # Errors
            ///
            /// Returns an error if the store fails.
            #[inline]
            pub $($async_kw)? fn is_logged_in(&self) -> Result<bool> {
                Ok(self.storage.load_session() $( .$await_ext )? ?.is_some())
            }

            // ── Accounts ────────────────────────────────────────────

            /// Lists the logged-in user's accounts.
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::NotLoggedIn`] if no session is stored, or
            /// an HTTP/API error.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn user_accounts(&self) -> Result<UserAccounts> {
                let session = self.session() $( .$await_ext )? ?;
                self.client.fetch_user_accounts(&session) $( .$await_ext )?
            }

            /// Finds one of the user's accounts by name (case-insensitive).
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::NotLoggedIn`] if no session is stored, or
            /// an HTTP/API error.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn find_account_by_name(
                &self,
                name: &str,
            ) -> Result<Option<AccountDetails>> {
                let listing = self.user_accounts() $( .$await_ext )? ?;
                Ok(listing.find_by_name(name).cloned())
            }

            /// Fetches one account with its balances. A blank purpose is
            /// replaced by the default one. Calling this counts as the user's
            /// consent to the fetch.
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::NotLoggedIn`] if no session is stored,
            /// [`LedgerError::Validation`] for a blank URN or overlong purpose,
            /// or an HTTP/API error.
            #[tracing::instrument(skip_all, fields(account = %account))]
            pub $($async_kw)? fn account(
                &self,
                account: &AccountUrn,
                purpose: &str,
            ) -> Result<AccountDetails> {
                let request = AccountRequest::fetch_account(account.clone(), purpose, true)?;
                let session = self.session() $( .$await_ext )? ?;
                self.client.fetch_account(&session, &request) $( .$await_ext )?
            }

            /// Opens a new account.
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::NotLoggedIn`] if no session is stored, or
            /// an HTTP/API error.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_account(
                &self,
                request: &CreateAccountRequest,
            ) -> Result<AccountDetails> {
                let session = self.session() $( .$await_ext )? ?;
                let account = self.client.create_account(&session, request) $( .$await_ext )? ?;
                tracing::info!(account = %account.account_urn, "account created");
                Ok(account)
            }

            /// Moves money between two accounts.
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::NotLoggedIn`] if no session is stored, or
            /// an HTTP/API error.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_transaction(
                &self,
                request: &CreateTransactionRequest,
            ) -> Result<CreatedTransaction> {
                let session = self.session() $( .$await_ext )? ?;
                let created = self
                    .client
                    .create_transaction(&session, request)
                    $( .$await_ext )? ?;
                tracing::info!(transaction = %created.transaction_urn, "transaction created");
                Ok(created)
            }

            // ── Statements ──────────────────────────────────────────

            /// Fetches the full statement of an account. Calling this counts
            /// as the user's consent to the fetch.
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::NotLoggedIn`] if no session is stored,
            /// [`LedgerError::Validation`] for a blank URN or overlong purpose,
            /// or an HTTP/API error.
            #[tracing::instrument(skip_all, fields(account = %account))]
            pub $($async_kw)? fn fetch_statement(
                &self,
                account: &AccountUrn,
                purpose: &str,
            ) -> Result<Statement> {
                let request = AccountRequest::fetch_statement(account.clone(), purpose, true)?;
                let session = self.session() $( .$await_ext )? ?;
                self.client.fetch_statement(&session, &request) $( .$await_ext )?
            }

            /// Fetches an account's statement and summarizes it over `range`.
            ///
            /// # Errors
            ///
            /// Returns the errors of [`Self::fetch_statement`], or
            /// [`LedgerError::MixedCurrency`] if the records mix currencies.
            #[tracing::instrument(skip_all, fields(account = %account))]
            pub $($async_kw)? fn statement(
                &self,
                account: &AccountUrn,
                purpose: &str,
                range: DateRange,
            ) -> Result<StatementSummary> {
                let statement = self.fetch_statement(account, purpose) $( .$await_ext )? ?;
                StatementSummary::compute(&statement.transactions, range)
            }

            /// Fetches an account's statement and opens an idle report view
            /// over it.
            ///
            /// # Errors
            ///
            /// Returns the errors of [`Self::fetch_statement`], or
            /// [`LedgerError::MixedCurrency`] if the records mix currencies.
            #[tracing::instrument(skip_all, fields(account = %account))]
            pub $($async_kw)? fn report(
                &self,
                account: &AccountUrn,
                purpose: &str,
            ) -> Result<ReportView> {
                let statement = self.fetch_statement(account, purpose) $( .$await_ext )? ?;
                ReportView::new(statement.transactions)
            }

            /// Loads the stored session.
            $($async_kw)? fn session(&self) -> Result<Session> {
                self.storage
                    .load_session()
                    $( .$await_ext )?
                    ?
                    .ok_or(LedgerError::NotLoggedIn)
            }
        }
    };
}

// ── Async variant ───────────────────────────────────────────────────────

#[cfg(feature = "async")]
mod async_ledger {
    //! Async high-level client.

    use secrecy::SecretString;

    use crate::client::LedgerClient;
    use crate::error::{LedgerError, Result};
    use crate::models::{
        AccountDetails, AccountRequest, AccountUrn, CreateAccountRequest,
        CreateTransactionRequest, CreatedTransaction, CredentialsRequest, RegisteredUser,
        Statement, UserAccounts,
    };
    use crate::report::ReportView;
    use crate::session::Session;
    use crate::statement::{DateRange, StatementSummary};
    use crate::storage::SessionStore;

    define_ledger! {
        client_name: Ledger,
        builder_name: LedgerBuilder,
        http_client: LedgerClient,
        storage_trait: SessionStore,
        client_doc: "High-level async ledger client with an integrated session store.\n\nUse [`Ledger::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`Ledger`] client.",
        async_kw: async,
        await_kw: await,
    }
}

// ── Blocking variant ────────────────────────────────────────────────────

#[cfg(feature = "blocking")]
mod blocking_ledger {
    //! Blocking high-level client.

    use secrecy::SecretString;

    use crate::client::LedgerBlockingClient;
    use crate::error::{LedgerError, Result};
    use crate::models::{
        AccountDetails, AccountRequest, AccountUrn, CreateAccountRequest,
        CreateTransactionRequest, CreatedTransaction, CredentialsRequest, RegisteredUser,
        Statement, UserAccounts,
    };
    use crate::report::ReportView;
    use crate::session::Session;
    use crate::statement::{DateRange, StatementSummary};
    use crate::storage::BlockingSessionStore;

    define_ledger! {
        client_name: LedgerBlocking,
        builder_name: LedgerBlockingBuilder,
        http_client: LedgerBlockingClient,
        storage_trait: BlockingSessionStore,
        client_doc: "High-level blocking ledger client with an integrated session store.\n\nUse [`LedgerBlocking::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`LedgerBlocking`] client.",
    }
}

#[cfg(feature = "async")]
pub use async_ledger::{Ledger, LedgerBuilder};
#[cfg(feature = "blocking")]
pub use blocking_ledger::{LedgerBlocking, LedgerBlockingBuilder};
