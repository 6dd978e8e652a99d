//! Report and dashboard builders
//!
//! These functions combine the filter engine and the aggregator into the two
//! views the presentation layer needs:
//!
//! - [`build_report`] answers "summary and series for period P"
//! - [`build_dashboard`] computes the headline cards over the whole ledger
//!
//! Both are deterministic: the same transactions, registry, period and
//! `today` always give the same result.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::aggregator::{self, BalancePoint, BalanceTrend, CategoryTotal, Summary};
use crate::core::category_registry::CategoryRegistry;
use crate::core::filter;
use crate::types::{Kind, LedgerError, PeriodSpec, Transaction, TransactionId};

/// One transaction row of a report, with its category label resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub kind: Kind,
    pub amount: Decimal,
}

/// Summary and series for one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub period: PeriodSpec,
    pub summary: Summary,
    /// Expenses as a percentage of income
    pub expense_share: Decimal,
    /// Expense totals per category label, first-encounter order
    pub by_category: Vec<CategoryTotal>,
    pub balance_series: Vec<BalancePoint>,
    /// Filtered transactions, most recent first
    pub entries: Vec<ReportEntry>,
}

/// Headline figures over the whole ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub income_count: usize,
    pub expense_count: usize,
    pub expense_share: Decimal,
    pub trend: BalanceTrend,
    pub recent: Vec<Transaction>,
}

/// Build the report for `period`
///
/// # Arguments
///
/// * `transactions` - All transactions of the user, in any order
/// * `registry` - Categories used to label transactions
/// * `period` - Window to report on
/// * `today` - Reference date for relative periods
///
/// # Returns
///
/// A `Report` computed over the transactions that fall in the period. The
/// category breakdown only covers expenses; the balance series covers
/// both kinds.
///
/// # Errors
///
/// Returns `LedgerError::ArithmeticOverflow` if a total, the balance series
/// or the expense share does not fit in a `Decimal`.
pub fn build_report(
    transactions: &[Transaction],
    registry: &CategoryRegistry,
    period: &PeriodSpec,
    today: NaiveDate,
) -> Result<Report, LedgerError> {
    let filtered = filter::by_period(transactions, period, today);
    tracing::debug!(
        "Building report for {} ({} of {} transactions)",
        period.label(),
        filtered.len(),
        transactions.len()
    );

    let summary = aggregator::summary(&filtered)?;
    let expense_share = aggregator::percentage_of_income(summary.expense, summary.income)?;
    let by_category = aggregator::by_category(&filtered, Kind::Expense, registry)?;
    let balance_series = aggregator::running_balance(&filtered)?;

    Ok(Report {
        period: *period,
        summary,
        expense_share,
        by_category,
        balance_series,
        entries: entries(filtered, registry),
    })
}

fn entries(mut transactions: Vec<Transaction>, registry: &CategoryRegistry) -> Vec<ReportEntry> {
    // Stable sort keeps input order for transactions on the same date
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    transactions
        .into_iter()
        .map(|t| ReportEntry {
            category: registry.label_for(&t),
            id: t.id,
            date: t.date,
            description: t.description,
            kind: t.kind,
            amount: t.amount,
        })
        .collect()
}

/// Build the dashboard cards
///
/// `transactions` is expected in display order (most recent first), as
/// returned by the transaction store; `recent` keeps the first
/// `recent_limit` of them.
pub fn build_dashboard(
    transactions: &[Transaction],
    recent_limit: usize,
) -> Result<Dashboard, LedgerError> {
    let summary = aggregator::summary(transactions)?;
    tracing::debug!("Building dashboard over {} transactions", summary.count);

    Ok(Dashboard {
        income_count: aggregator::count(transactions, Kind::Income),
        expense_count: aggregator::count(transactions, Kind::Expense),
        expense_share: aggregator::percentage_of_income(summary.expense, summary.income)?,
        trend: BalanceTrend::of(summary.balance),
        recent: transactions.iter().take(recent_limit).cloned().collect(),
        summary,
    })
}
