//! Report view: validated date filtering, chronological ordering and chart
//! data over one account's transactions.
//!
//! A [`ReportView`] holds the unfiltered transaction list for the lifetime
//! of the view. Each call to [`ReportView::apply_filter`] validates the
//! requested range and rebuilds the report from that list; a failed
//! validation discards whatever report was shown before.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{Result, ValidationError};
use crate::models::{Transaction, TransactionType};
use crate::statement::{
    DateRange, Totals, aggregate_totals, build_balance_series, ensure_single_currency,
    filter_by_range, sort_by_timestamp,
};

/// Screen a date range was entered on. Selects the wording of range errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViewKind {
    /// Statement listing.
    Statement,
    /// Chart report.
    Report,
}

impl ViewKind {
    /// Message shown when the end date precedes the start date.
    #[inline]
    #[must_use]
    pub const fn inverted_range_message(self) -> &'static str {
        match self {
            Self::Statement => "To Date should not be earlier than From Date.",
            Self::Report => "To Date should be greater than or equal to From Date.",
        }
    }
}

/// Validates a pair of picker dates and turns them into a whole-day range.
///
/// Both dates are required, neither may lie after `today`, and `from` may
/// not come after `to`.
///
/// # Errors
///
/// Returns [`ValidationError::MissingDateRange`],
/// [`ValidationError::ToBeforeFrom`] or [`ValidationError::FutureDate`].
pub fn validate_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
    view: ViewKind,
) -> core::result::Result<DateRange, ValidationError> {
    let (Some(start), Some(end)) = (from, to) else {
        return Err(ValidationError::MissingDateRange);
    };
    if start > end {
        return Err(ValidationError::ToBeforeFrom { view });
    }
    if let Some(date) = [start, end].into_iter().find(|date| *date > today) {
        return Err(ValidationError::FutureDate { date });
    }
    DateRange::from_dates(start, end)
}

/// One bar group of the report chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    /// Calendar date of the transaction.
    pub date: NaiveDate,
    /// Credited amount, or zero for a debit.
    pub credit: Decimal,
    /// Debited amount, or zero for a credit.
    pub debit: Decimal,
    /// Running balance after the transaction.
    pub balance: Decimal,
}

/// A computed report for one date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Range the report covers.
    pub range: DateRange,
    /// Currency of the account, if known.
    pub currency: Option<String>,
    /// Transactions in range, oldest first.
    pub transactions: Vec<Transaction>,
    /// Totals over [`Self::transactions`].
    pub totals: Totals,
    /// Running balance, one entry per transaction.
    pub balance_series: Vec<Decimal>,
    /// Chart data, one point per transaction.
    pub chart: Vec<ChartPoint>,
}

impl Report {
    /// Filters `source` by `range`, sorts the result chronologically and
    /// derives totals, balances and chart points.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::LedgerError::AmountOverflow`] if the amounts
    /// in range cannot be added up.
    pub fn build(
        source: &[Transaction],
        range: DateRange,
        currency: Option<String>,
    ) -> Result<Self> {
        let sorted = sort_by_timestamp(filter_by_range(source, &range));
        let totals = aggregate_totals(sorted.iter().copied())?;
        let balance_series = build_balance_series(sorted.iter().copied())?;
        let chart = sorted
            .iter()
            .zip(&balance_series)
            .filter_map(|(tx, balance)| {
                let date = tx.date()?;
                let (credit, debit) = match tx.transaction_type {
                    TransactionType::Credit => (tx.amount, Decimal::ZERO),
                    TransactionType::Debit => (Decimal::ZERO, tx.amount),
                };
                Some(ChartPoint {
                    date,
                    credit,
                    debit,
                    balance: *balance,
                })
            })
            .collect();
        Ok(Self {
            range,
            currency,
            transactions: sorted.into_iter().cloned().collect(),
            totals,
            balance_series,
            chart,
        })
    }
}

/// State of a [`ReportView`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReportState {
    /// No filter applied yet.
    #[default]
    Idle,
    /// The last filter was valid and produced this report.
    Validated(Report),
    /// The last filter was rejected; no report is shown.
    Invalid(ValidationError),
}

impl ReportState {
    /// Returns the current report, if the last filter was valid.
    #[inline]
    #[must_use]
    pub const fn report(&self) -> Option<&Report> {
        match *self {
            Self::Validated(ref report) => Some(report),
            Self::Idle | Self::Invalid(_) => None,
        }
    }

    /// Returns the validation error, if the last filter was rejected.
    #[inline]
    #[must_use]
    pub const fn error(&self) -> Option<&ValidationError> {
        match *self {
            Self::Invalid(ref err) => Some(err),
            Self::Idle | Self::Validated(_) => None,
        }
    }
}

/// Report view over one account's full transaction list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    /// Unfiltered transactions; never modified.
    source: Vec<Transaction>,
    /// Currency shared by `source`.
    currency: Option<String>,
    /// Totals over `source`.
    overall: Totals,
    /// Outcome of the last filter.
    state: ReportState,
}

impl ReportView {
    /// Creates an idle view over `source`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::LedgerError::MixedCurrency`] if the list mixes
    /// currencies, or [`crate::error::LedgerError::AmountOverflow`] if its
    /// amounts cannot be added up.
    pub fn new(source: Vec<Transaction>) -> Result<Self> {
        let currency = ensure_single_currency(&source)?;
        let overall = aggregate_totals(&source)?;
        Ok(Self {
            source,
            currency,
            overall,
            state: ReportState::Idle,
        })
    }

    /// The unfiltered transaction list.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &[Transaction] {
        &self.source
    }

    /// Currency shared by the transactions, if any record carries one.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    /// Outcome of the last filter.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> &ReportState {
        &self.state
    }

    /// Totals over the whole, unfiltered list.
    #[inline]
    #[must_use]
    pub const fn overall_totals(&self) -> Totals {
        self.overall
    }

    /// Validates the range and rebuilds the report from the source list,
    /// replacing the previous state either way.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::LedgerError::AmountOverflow`] if the amounts
    /// in range cannot be added up; the view is then back to
    /// [`ReportState::Idle`].
    pub fn apply_filter(
        &mut self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<&ReportState> {
        let next = match validate_range(from, to, today, ViewKind::Report) {
            Ok(range) => {
                let report = match Report::build(&self.source, range, self.currency.clone()) {
                    Ok(report) => report,
                    Err(err) => {
                        self.state = ReportState::Idle;
                        return Err(err);
                    }
                };
                tracing::debug!(
                    %range,
                    transactions = report.transactions.len(),
                    "report rebuilt"
                );
                ReportState::Validated(report)
            }
            Err(err) => {
                tracing::debug!(error = %err, "report filter rejected");
                ReportState::Invalid(err)
            }
        };
        self.state = next;
        Ok(&self.state)
    }

    /// Returns the view to [`ReportState::Idle`].
    #[inline]
    pub fn reset(&mut self) {
        self.state = ReportState::Idle;
    }
}
