//! Rust client library for the `FinTrack` ledger API.
//!
//! This crate provides a typed client for the ledger service (register,
//! login, accounts, transactions, statements), an explicit session
//! credential store, and the statement aggregator that filters a
//! transaction list by date range and computes credit/debit totals and
//! running balance series with exact decimal arithmetic.

#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
pub mod error;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod ledger;
pub mod models;
pub mod report;
pub mod session;
pub mod statement;
pub mod storage;
pub mod validation;
