//! Statement aggregation: date-range filtering, credit/debit totals and
//! running balances.
//!
//! Everything here is a pure function over a borrowed transaction list.
//! Nothing is cached: every call recomputes from the list it is given, and
//! the list itself is never modified.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::{LedgerError, Result, ValidationError};
use crate::models::{Transaction, TransactionType};
use crate::report::ViewKind;

/// Number of fraction digits shown for money.
pub const DISPLAY_DECIMALS: u32 = 2;

/// Last representable instant of a calendar day.
const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999) {
    Some(time) => time,
    None => NaiveTime::MIN,
};

/// Inclusive time interval `[from, to]` with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    /// First instant included.
    from: NaiveDateTime,
    /// Last instant included.
    to: NaiveDateTime,
}

impl DateRange {
    /// Creates a range from two instants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ToBeforeFrom`] if `to` precedes `from`.
    pub fn new(
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> core::result::Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::ToBeforeFrom {
                view: ViewKind::Statement,
            });
        }
        Ok(Self { from, to })
    }

    /// Creates a range covering whole days: from midnight of `from` to the
    /// last instant of `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ToBeforeFrom`] if `to` precedes `from`.
    pub fn from_dates(
        from: NaiveDate,
        to: NaiveDate,
    ) -> core::result::Result<Self, ValidationError> {
        Self::new(from.and_time(NaiveTime::MIN), to.and_time(END_OF_DAY))
    }

    /// First instant included.
    #[inline]
    #[must_use]
    pub const fn from(&self) -> NaiveDateTime {
        self.from
    }

    /// Last instant included.
    #[inline]
    #[must_use]
    pub const fn to(&self) -> NaiveDateTime {
        self.to
    }

    /// Returns `true` if `instant` lies within the range (bounds included).
    #[inline]
    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.from <= instant && instant <= self.to
    }
}

impl core::fmt::Display for DateRange {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.from.format("%Y-%m-%d %H:%M:%S"),
            self.to.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Credit, debit and net sums over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Totals {
    /// Sum of credited amounts.
    pub credit: Decimal,
    /// Sum of debited amounts.
    pub debit: Decimal,
    /// `credit - debit`.
    pub net: Decimal,
}

/// Returns the transactions whose timestamp lies in `range`, in input order.
///
/// Records with an unparseable timestamp are left out and logged.
#[must_use]
pub fn filter_by_range<'tx>(
    transactions: &'tx [Transaction],
    range: &DateRange,
) -> Vec<&'tx Transaction> {
    transactions
        .iter()
        .filter(|tx| match tx.timestamp() {
            Some(instant) => range.contains(instant),
            None => {
                tracing::warn!(
                    transaction = %tx.transaction_urn,
                    timestamp = %tx.transaction_timestamp,
                    "skipping transaction with unparseable timestamp"
                );
                false
            }
        })
        .collect()
}

/// Sums credits and debits. An empty input yields all zeros.
///
/// # Errors
///
/// Returns [`LedgerError::AmountOverflow`] if a sum leaves the decimal range.
pub fn aggregate_totals<'tx, I>(transactions: I) -> Result<Totals>
where
    I: IntoIterator<Item = &'tx Transaction>,
{
    let (credit, debit) = transactions.into_iter().try_fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(credit, debit), tx| -> Result<(Decimal, Decimal)> {
            match tx.transaction_type {
                TransactionType::Credit => Ok((checked_add(credit, tx.amount)?, debit)),
                TransactionType::Debit => Ok((credit, checked_add(debit, tx.amount)?)),
            }
        },
    )?;
    let net = credit
        .checked_sub(debit)
        .ok_or(LedgerError::AmountOverflow)?;
    Ok(Totals { credit, debit, net })
}

/// Sorts transactions ascending by timestamp. The sort is stable, so
/// records with equal timestamps keep their relative order.
#[must_use]
pub fn sort_by_timestamp(mut transactions: Vec<&Transaction>) -> Vec<&Transaction> {
    transactions.sort_by_key(|tx| tx.timestamp());
    transactions
}

/// Running balance starting at zero: `series[i]` is the balance after
/// `transactions[i]`.
///
/// # Errors
///
/// Returns [`LedgerError::AmountOverflow`] if the balance leaves the
/// decimal range.
pub fn build_balance_series<'tx, I>(transactions: I) -> Result<Vec<Decimal>>
where
    I: IntoIterator<Item = &'tx Transaction>,
{
    let mut balance = Decimal::ZERO;
    transactions
        .into_iter()
        .map(|tx| -> Result<Decimal> {
            balance = checked_add(balance, tx.signed_amount())?;
            Ok(balance)
        })
        .collect()
}

/// Adds two amounts, reporting overflow instead of panicking.
fn checked_add(sum: Decimal, amount: Decimal) -> Result<Decimal> {
    sum.checked_add(amount).ok_or(LedgerError::AmountOverflow)
}

/// Returns the single currency code used by `transactions`.
///
/// Records without a code are ignored; `Ok(None)` means no record had one.
///
/// # Errors
///
/// Returns [`LedgerError::MixedCurrency`] when two different codes appear.
pub fn ensure_single_currency<'tx, I>(transactions: I) -> Result<Option<String>>
where
    I: IntoIterator<Item = &'tx Transaction>,
{
    let mut seen: Option<&str> = None;
    for code in transactions
        .into_iter()
        .filter_map(|tx| tx.currency_code.as_deref())
        .map(str::trim)
        .filter(|code| !code.is_empty())
    {
        match seen {
            None => seen = Some(code),
            Some(first) if first.eq_ignore_ascii_case(code) => {}
            Some(first) => {
                return Err(LedgerError::MixedCurrency {
                    first: first.to_owned(),
                    second: code.to_owned(),
                });
            }
        }
    }
    Ok(seen.map(str::to_uppercase))
}

/// The statement view of an account over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementSummary {
    /// Range the statement was filtered by.
    pub range: DateRange,
    /// Currency shared by all records, if any record carries one.
    pub currency: Option<String>,
    /// Transactions inside the range, in server order.
    pub filtered: Vec<Transaction>,
    /// Totals over [`Self::filtered`].
    pub filtered_totals: Totals,
    /// Totals over the whole statement, regardless of range.
    pub overall_totals: Totals,
    /// Records left out of the filtered set because their timestamp did not
    /// parse. They still count towards [`Self::overall_totals`].
    pub skipped: usize,
}

impl StatementSummary {
    /// Filters `transactions` by `range` and computes both sets of totals.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::MixedCurrency`] if the records do not share a
    /// currency, or [`LedgerError::AmountOverflow`] if the totals do not fit;
    /// nothing is computed in either case.
    pub fn compute(transactions: &[Transaction], range: DateRange) -> Result<Self> {
        let currency = ensure_single_currency(transactions)?;
        let filtered = filter_by_range(transactions, &range);
        let filtered_totals = aggregate_totals(filtered.iter().copied())?;
        let overall_totals = aggregate_totals(transactions)?;
        let skipped = transactions
            .iter()
            .filter(|tx| tx.timestamp().is_none())
            .count();
        tracing::debug!(
            total = transactions.len(),
            in_range = filtered.len(),
            skipped,
            "statement summarized"
        );
        Ok(Self {
            range,
            currency,
            filtered: filtered.into_iter().cloned().collect(),
            filtered_totals,
            overall_totals,
            skipped,
        })
    }
}

/// Formats an amount for display as `"<CODE> <value>"` with two fraction
/// digits, rounding half away from zero.
#[must_use]
pub fn format_amount(currency: Option<&str>, amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    match currency {
        Some(code) if !code.is_empty() => format!("{code} {rounded:.2}"),
        Some(_) | None => format!("{rounded:.2}"),
    }
}
