//! HTTP client for the ledger API.
//!
//! Provides both async and blocking client variants behind feature flags.
//! Both are generated from one macro so their method sets never drift.
//!
//! The client is stateless with respect to authentication: every call that
//! needs a bearer credential takes a [`Session`](crate::session::Session)
//! argument.

/// Base URL of a locally running ledger service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8002";

/// Registration endpoint path.
const REGISTER_PATH: &str = "user/register";

/// Login endpoint path.
const LOGIN_PATH: &str = "user/login";

/// Logout endpoint path.
const LOGOUT_PATH: &str = "user/logout";

/// Account creation endpoint path.
const CREATE_ACCOUNT_PATH: &str = "apis/create/account";

/// Transaction creation endpoint path.
const CREATE_TRANSACTION_PATH: &str = "apis/create/transaction";

/// Account details endpoint path.
const FETCH_ACCOUNT_PATH: &str = "apis/fetch/account";

/// Account listing endpoint path.
const FETCH_USER_ACCOUNTS_PATH: &str = "apis/fetch/usr-account";

/// Statement endpoint path.
const FETCH_STATEMENT_PATH: &str = "apis/fetch/statement";

/// Parses a base URL and makes sure it ends with `/`, so that endpoint
/// paths are joined below it rather than replacing its last segment.
fn parse_base_url(raw: &str) -> crate::error::Result<url::Url> {
    let mut parsed = url::Url::parse(raw)?;
    if !parsed.path().ends_with('/') {
        let with_slash = format!("{}/", parsed.path());
        parsed.set_path(&with_slash);
    }
    Ok(parsed)
}

/// Generates a ledger client (async or blocking) with builder, methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        request_type: $req_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
        $(send_bound: $send_bound:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Base URL override.
            base_url: Option<String>,
        }

        impl $builder {
            /// Overrides the base URL (e.g. a remote deployment or a mock
            /// server in tests).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::InvalidUrl`] if the base URL does not parse.
            /// Returns [`LedgerError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let raw = self
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
                let base_url = parse_base_url(&raw)?;
                tracing::debug!(base_url = %base_url, "building client");
                let http = <$http_type>::builder().build()?;

                Ok($client { http, base_url })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// API base URL, always ending with `/`.
            base_url: Url,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder { base_url: None }
            }

            /// Returns the base URL requests are sent to.
            #[inline]
            #[must_use]
            pub const fn base_url(&self) -> &Url {
                &self.base_url
            }

            /// Registers a new user via `/user/register`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server rejects
            /// the registration, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn register(
                &self,
                request: &CredentialsRequest,
            ) -> Result<RegisteredUser> {
                tracing::debug!("calling register endpoint");
                let (status, envelope) =
                    self.post_json(REGISTER_PATH, None, request) $( .$await_ext )? ?;
                envelope.decode(status)
            }

            /// Logs in via `/user/login` and returns the issued session.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the credentials are
            /// rejected, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn login(&self, request: &CredentialsRequest) -> Result<Session> {
                tracing::debug!("calling login endpoint");
                let (status, envelope) =
                    self.post_json(LOGIN_PATH, None, request) $( .$await_ext )? ?;
                let data: LoginData = envelope.decode(status)?;
                Ok(Session::from(data))
            }

            /// Invalidates the session via `/user/logout`.
            ///
            /// Only an envelope with status `SUCCESS` counts as a logout.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server does not
            /// confirm the logout, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn logout(&self, session: &Session) -> Result<LogoutData> {
                tracing::debug!("calling logout endpoint");
                let request = LogoutRequest::new();
                let (status, envelope) =
                    self.post_json(LOGOUT_PATH, Some(session), &request) $( .$await_ext )? ?;
                if !envelope.is_success() {
                    return Err(envelope.to_error(status));
                }
                envelope.decode(status)
            }

            /// Opens a new account via `/apis/create/account`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server rejects
            /// the request, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_account(
                &self,
                session: &Session,
                request: &CreateAccountRequest,
            ) -> Result<AccountDetails> {
                tracing::debug!(currency = %request.currency_code, "calling create account endpoint");
                let (status, envelope) = self
                    .post_json(CREATE_ACCOUNT_PATH, Some(session), request)
                    $( .$await_ext )? ?;
                envelope.decode(status)
            }

            /// Moves money between two accounts via `/apis/create/transaction`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server rejects
            /// the transfer, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_transaction(
                &self,
                session: &Session,
                request: &CreateTransactionRequest,
            ) -> Result<CreatedTransaction> {
                tracing::debug!("calling create transaction endpoint");
                let (status, envelope) = self
                    .post_json(CREATE_TRANSACTION_PATH, Some(session), request)
                    $( .$await_ext )? ?;
                envelope.decode(status)
            }

            /// Fetches one account with its balances via `/apis/fetch/account`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server rejects
            /// the request, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(account = %request.account_urn))]
            pub $($async_kw)? fn fetch_account(
                &self,
                session: &Session,
                request: &AccountRequest,
            ) -> Result<AccountDetails> {
                tracing::debug!("calling fetch account endpoint");
                let (status, envelope) = self
                    .post_json(FETCH_ACCOUNT_PATH, Some(session), request)
                    $( .$await_ext )? ?;
                envelope.decode(status)
            }

            /// Lists the logged-in user's accounts via `/apis/fetch/usr-account`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server rejects
            /// the request, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn fetch_user_accounts(&self, session: &Session) -> Result<UserAccounts> {
                tracing::debug!("calling fetch user accounts endpoint");
                let url = self.base_url.join(FETCH_USER_ACCOUNTS_PATH)?;
                tracing::trace!(url = %url, "sending GET request");
                let builder = self.http.get(url.as_str()).bearer_auth(session.token());
                let (status, envelope) = self.execute(builder) $( .$await_ext )? ?;
                envelope.decode(status)
            }

            /// Fetches an account's full statement via `/apis/fetch/statement`.
            ///
            /// Records are decoded one by one; undecodable records end up in
            /// [`Statement::rejected`] instead of failing the call.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server rejects
            /// the request, or the payload is not a list of records.
            #[inline]
            #[tracing::instrument(skip_all, fields(account = %request.account_urn))]
            pub $($async_kw)? fn fetch_statement(
                &self,
                session: &Session,
                request: &AccountRequest,
            ) -> Result<Statement> {
                tracing::debug!("calling fetch statement endpoint");
                let (status, envelope) = self
                    .post_json(FETCH_STATEMENT_PATH, Some(session), request)
                    $( .$await_ext )? ?;
                let statement = Statement::from_data(envelope.into_data(status)?)?;
                tracing::debug!(
                    transactions = statement.transactions.len(),
                    rejected = statement.rejected.len(),
                    "statement received"
                );
                Ok(statement)
            }

            /// Sends a JSON POST request, with a bearer header when a session
            /// is given, and parses the response envelope.
            #[tracing::instrument(skip_all, fields(path = %path))]
            $($async_kw)? fn post_json<Req: serde::Serialize $(+ $send_bound)?>(
                &self,
                path: &str,
                session: Option<&Session>,
                request: &Req,
            ) -> Result<(u16, ApiResponse)> {
                let url = self.base_url.join(path)?;
                tracing::trace!(url = %url, "sending POST request");
                let mut builder = self
                    .http
                    .post(url.as_str())
                    .header(CONTENT_TYPE, "application/json")
                    .json(request);
                if let Some(active) = session {
                    builder = builder.bearer_auth(active.token());
                }
                self.execute(builder) $( .$await_ext )?
            }

            /// Sends a prepared request and parses the response envelope.
            ///
            /// Non-2xx answers become [`LedgerError::Api`], using the
            /// envelope's message when the body is one and the raw body text
            /// otherwise.
            $($async_kw)? fn execute(&self, builder: $req_type) -> Result<(u16, ApiResponse)> {
                let response: $resp_type = builder.send() $( .$await_ext )? ?;
                let status = response.status();
                tracing::debug!(status = %status, "received response");
                let body = response
                    .text()
                    $( .$await_ext )?
                    .unwrap_or_else(|_| "unknown error".to_owned());
                if status.is_success() {
                    tracing::trace!(body_len = body.len(), "parsing response body");
                    let envelope: ApiResponse = serde_json::from_str(&body)?;
                    Ok((status.as_u16(), envelope))
                } else {
                    let err = match serde_json::from_str::<ApiResponse>(&body) {
                        Ok(envelope) => envelope.to_error(status.as_u16()),
                        Err(_) => LedgerError::Api {
                            status: status.as_u16(),
                            key: None,
                            message: body,
                        },
                    };
                    tracing::debug!(status = status.as_u16(), error = %err, "API error");
                    Err(err)
                }
            }
        }

    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the ledger API.

    use reqwest::header::CONTENT_TYPE;
    use url::Url;

    use super::{
        CREATE_ACCOUNT_PATH, CREATE_TRANSACTION_PATH, DEFAULT_BASE_URL, FETCH_ACCOUNT_PATH,
        FETCH_STATEMENT_PATH, FETCH_USER_ACCOUNTS_PATH, LOGIN_PATH, LOGOUT_PATH, REGISTER_PATH,
        parse_base_url,
    };
    use crate::error::{LedgerError, Result};
    use crate::models::{
        AccountDetails, AccountRequest, ApiResponse, CreateAccountRequest,
        CreateTransactionRequest, CreatedTransaction, CredentialsRequest, LoginData, LogoutData,
        LogoutRequest, RegisteredUser, Statement, UserAccounts,
    };
    use crate::session::Session;

    define_client! {
        client_name: LedgerClient,
        builder_name: LedgerClientBuilder,
        http_type: reqwest::Client,
        request_type: reqwest::RequestBuilder,
        response_type: reqwest::Response,
        client_doc: "Async client for the ledger API.\n\nUse [`LedgerClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`LedgerClient`].",
        async_kw: async,
        await_kw: await,
        send_bound: Sync,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the ledger API.

    use reqwest::header::CONTENT_TYPE;
    use url::Url;

    use super::{
        CREATE_ACCOUNT_PATH, CREATE_TRANSACTION_PATH, DEFAULT_BASE_URL, FETCH_ACCOUNT_PATH,
        FETCH_STATEMENT_PATH, FETCH_USER_ACCOUNTS_PATH, LOGIN_PATH, LOGOUT_PATH, REGISTER_PATH,
        parse_base_url,
    };
    use crate::error::{LedgerError, Result};
    use crate::models::{
        AccountDetails, AccountRequest, ApiResponse, CreateAccountRequest,
        CreateTransactionRequest, CreatedTransaction, CredentialsRequest, LoginData, LogoutData,
        LogoutRequest, RegisteredUser, Statement, UserAccounts,
    };
    use crate::session::Session;

    define_client! {
        client_name: LedgerBlockingClient,
        builder_name: LedgerBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        request_type: reqwest::blocking::RequestBuilder,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the ledger API.\n\nUse [`LedgerBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`LedgerBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{LedgerClient, LedgerClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{LedgerBlockingClient, LedgerBlockingClientBuilder};
