//! Summaries and series derived from transaction sequences
//!
//! All functions are pure. Amounts are summed with checked `Decimal`
//! arithmetic so totals are exact; a sum that does not fit is reported as
//! `LedgerError::ArithmeticOverflow`. Rounding only happens for the
//! percentage shown to users.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::core::category_registry::CategoryRegistry;
use crate::types::{Kind, LedgerError, Transaction};

/// Income, expense and balance over a set of transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
    /// `income - expense`
    pub balance: Decimal,
    /// Number of transactions of either kind
    pub count: usize,
}

/// Direction of a balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceTrend {
    Positive,
    Negative,
    Flat,
}

impl BalanceTrend {
    pub fn of(balance: Decimal) -> Self {
        if balance > Decimal::ZERO {
            BalanceTrend::Positive
        } else if balance < Decimal::ZERO {
            BalanceTrend::Negative
        } else {
            BalanceTrend::Flat
        }
    }
}

/// Summed amount for one category label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub label: String,
    pub amount: Decimal,
}

/// End-of-day balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalancePoint {
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub balance: Decimal,
}

/// Sum of amounts of one kind, zero for empty input
///
/// # Errors
///
/// Returns `LedgerError::ArithmeticOverflow` if the sum does not fit in a
/// `Decimal`.
pub fn total(transactions: &[Transaction], kind: Kind) -> Result<Decimal, LedgerError> {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .try_fold(Decimal::ZERO, |sum, t| {
            sum.checked_add(t.amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow(&format!("{} total", kind)))
        })
}

/// Number of transactions of one kind
pub fn count(transactions: &[Transaction], kind: Kind) -> usize {
    transactions.iter().filter(|t| t.kind == kind).count()
}

pub fn summary(transactions: &[Transaction]) -> Result<Summary, LedgerError> {
    let income = total(transactions, Kind::Income)?;
    let expense = total(transactions, Kind::Expense)?;
    let balance = income
        .checked_sub(expense)
        .ok_or_else(|| LedgerError::arithmetic_overflow("balance"))?;

    Ok(Summary {
        income,
        expense,
        balance,
        count: transactions.len(),
    })
}

/// Share of income that was spent, as a percentage with one decimal place
///
/// Zero when there is no income.
///
/// # Errors
///
/// Returns `LedgerError::ArithmeticOverflow` when the ratio is too large to
/// represent, e.g. a huge expense against a tiny income.
pub fn percentage_of_income(
    expense_total: Decimal,
    income_total: Decimal,
) -> Result<Decimal, LedgerError> {
    if income_total <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    expense_total
        .checked_div(income_total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|share| share.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| LedgerError::arithmetic_overflow("expense share"))
}

/// Totals per category label for one kind
///
/// Labels appear in the order they are first encountered in the input.
pub fn by_category(
    transactions: &[Transaction],
    kind: Kind,
    registry: &CategoryRegistry,
) -> Result<Vec<CategoryTotal>, LedgerError> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions.iter().filter(|t| t.kind == kind) {
        let label = registry.label_for(transaction);
        match totals.iter_mut().find(|entry| entry.label == label) {
            Some(entry) => {
                entry.amount = entry
                    .amount
                    .checked_add(transaction.amount)
                    .ok_or_else(|| LedgerError::arithmetic_overflow("category total"))?;
            }
            None => totals.push(CategoryTotal {
                label,
                amount: transaction.amount,
            }),
        }
    }

    Ok(totals)
}

/// Cumulative balance after each distinct date, oldest first
///
/// When several transactions share a date only the balance after the last
/// of them is kept.
pub fn running_balance(transactions: &[Transaction]) -> Result<Vec<BalancePoint>, LedgerError> {
    let mut chronological: Vec<&Transaction> = transactions.iter().collect();
    chronological.sort_by_key(|t| t.date);

    let mut points: Vec<BalancePoint> = Vec::new();
    let mut balance = Decimal::ZERO;

    for transaction in chronological {
        balance = balance
            .checked_add(transaction.signed_amount())
            .ok_or_else(|| LedgerError::arithmetic_overflow("running balance"))?;
        let date = transaction.date.format("%Y-%m-%d").to_string();

        match points.last_mut() {
            Some(point) if point.date == date => point.balance = balance,
            _ => points.push(BalancePoint { date, balance }),
        }
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, TransactionId};
    use chrono::{NaiveDate, Utc};
    use rstest::rstest;
    use std::collections::HashSet;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tx(id: TransactionId, kind: Kind, amount: &str, date: &str, category: &str) -> Transaction {
        Transaction {
            id,
            kind,
            description: format!("tx {}", id),
            amount: dec(amount),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category_id: Some(category.to_string()),
            created_at: Utc::now(),
        }
    }

    fn scenario() -> Vec<Transaction> {
        vec![
            tx(1, Kind::Income, "100", "2024-01-05", "salary"),
            tx(2, Kind::Expense, "30", "2024-01-05", "food"),
            tx(3, Kind::Expense, "20", "2024-02-01", "food"),
        ]
    }

    fn registry() -> CategoryRegistry {
        CategoryRegistry::from_categories([Category {
            id: "food".to_string(),
            name: "Food".to_string(),
            icon: "*".to_string(),
            kind: Kind::Expense,
            custom: false,
        }])
    }

    #[test]
    fn test_total_of_empty_input_is_zero() {
        assert_eq!(total(&[], Kind::Income).unwrap(), Decimal::ZERO);
        assert_eq!(total(&[], Kind::Expense).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_summary_scenario() {
        let result = summary(&scenario()).unwrap();
        assert_eq!(
            result,
            Summary {
                income: dec("100"),
                expense: dec("50"),
                balance: dec("50"),
                count: 3,
            }
        );
    }

    #[test]
    fn test_balance_equals_income_minus_expense() {
        let transactions = vec![
            tx(1, Kind::Expense, "10.10", "2024-03-01", "a"),
            tx(2, Kind::Income, "5.05", "2024-03-02", "b"),
            tx(3, Kind::Expense, "0.01", "2024-03-02", "a"),
        ];
        let result = summary(&transactions).unwrap();
        let income = total(&transactions, Kind::Income).unwrap();
        let expense = total(&transactions, Kind::Expense).unwrap();
        assert_eq!(income - expense, result.balance);
        assert_eq!(result.balance, dec("-5.06"));
        assert_eq!(count(&transactions, Kind::Expense), 2);
    }

    #[rstest]
    #[case::half(dec("50"), dec("100"), dec("50.0"))]
    #[case::one_third(dec("1"), dec("3"), dec("33.3"))]
    #[case::two_thirds(dec("2"), dec("3"), dec("66.7"))]
    #[case::midpoint_rounds_up(dec("1.25"), dec("1000"), dec("0.1"))]
    #[case::over_budget(dec("150"), dec("100"), dec("150.0"))]
    #[case::no_income(dec("80"), Decimal::ZERO, Decimal::ZERO)]
    fn test_percentage_of_income(
        #[case] expense: Decimal,
        #[case] income: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(percentage_of_income(expense, income).unwrap(), expected);
    }

    #[test]
    fn test_by_category_keeps_first_encounter_order() {
        let transactions = vec![
            tx(1, Kind::Expense, "5", "2024-01-03", "travel"),
            tx(2, Kind::Expense, "10", "2024-01-01", "food"),
            tx(3, Kind::Income, "99", "2024-01-01", "food"),
            tx(4, Kind::Expense, "2.5", "2024-01-02", "travel"),
        ];

        let result = by_category(&transactions, Kind::Expense, &registry()).unwrap();
        assert_eq!(
            result,
            vec![
                CategoryTotal {
                    label: "travel".to_string(),
                    amount: dec("7.5"),
                },
                CategoryTotal {
                    label: "* Food".to_string(),
                    amount: dec("10"),
                },
            ]
        );
    }

    #[test]
    fn test_by_category_sum_matches_total() {
        let transactions = scenario();
        let sum: Decimal = by_category(&transactions, Kind::Expense, &registry())
            .unwrap()
            .iter()
            .map(|entry| entry.amount)
            .sum();
        assert_eq!(sum, total(&transactions, Kind::Expense).unwrap());
    }

    #[test]
    fn test_running_balance_scenario() {
        let points = running_balance(&scenario()).unwrap();
        assert_eq!(
            points,
            vec![
                BalancePoint {
                    date: "2024-01-05".to_string(),
                    balance: dec("70"),
                },
                BalancePoint {
                    date: "2024-02-01".to_string(),
                    balance: dec("50"),
                },
            ]
        );
    }

    #[test]
    fn test_running_balance_sorts_and_dedupes_dates() {
        let transactions = vec![
            tx(1, Kind::Expense, "5", "2024-03-03", "a"),
            tx(2, Kind::Income, "20", "2024-03-01", "b"),
            tx(3, Kind::Expense, "1", "2024-03-01", "a"),
            tx(4, Kind::Income, "4", "2024-03-02", "b"),
        ];

        let points = running_balance(&transactions).unwrap();
        let dates: Vec<&str> = points.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);

        let unique: HashSet<&str> = dates.iter().copied().collect();
        assert_eq!(unique.len(), points.len());

        assert_eq!(points[0].balance, dec("19"));
        assert_eq!(
            points.last().unwrap().balance,
            summary(&transactions).unwrap().balance
        );
    }

    #[test]
    fn test_running_balance_of_empty_input() {
        assert!(running_balance(&[]).unwrap().is_empty());
    }

    #[rstest]
    #[case::positive(dec("0.01"), BalanceTrend::Positive)]
    #[case::negative(dec("-3"), BalanceTrend::Negative)]
    #[case::flat(Decimal::ZERO, BalanceTrend::Flat)]
    fn test_balance_trend(#[case] balance: Decimal, #[case] expected: BalanceTrend) {
        assert_eq!(BalanceTrend::of(balance), expected);
    }

    fn with_amount(id: TransactionId, kind: Kind, amount: Decimal) -> Transaction {
        Transaction {
            amount,
            ..tx(id, kind, "0", "2024-01-01", "big")
        }
    }

    #[test]
    fn test_total_reports_overflow() {
        let transactions = vec![
            with_amount(1, Kind::Income, Decimal::MAX),
            with_amount(2, Kind::Income, Decimal::ONE),
        ];

        assert_eq!(
            total(&transactions, Kind::Income),
            Err(LedgerError::arithmetic_overflow("income total"))
        );
        assert!(matches!(
            summary(&transactions),
            Err(LedgerError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_running_balance_reports_overflow() {
        let transactions = vec![
            with_amount(1, Kind::Expense, Decimal::MAX),
            with_amount(2, Kind::Expense, Decimal::ONE),
        ];

        assert_eq!(
            running_balance(&transactions),
            Err(LedgerError::arithmetic_overflow("running balance"))
        );
    }

    #[test]
    fn test_by_category_reports_overflow() {
        let transactions = vec![
            with_amount(1, Kind::Expense, Decimal::MAX),
            with_amount(2, Kind::Expense, Decimal::MAX),
        ];

        assert_eq!(
            by_category(&transactions, Kind::Expense, &registry()),
            Err(LedgerError::arithmetic_overflow("category total"))
        );
    }

    #[rstest]
    #[case::huge_expense(Decimal::from_scientific("1e27").unwrap(), Decimal::ONE)]
    #[case::tiny_income(Decimal::MAX, dec("0.0001"))]
    fn test_percentage_of_income_reports_overflow(
        #[case] expense: Decimal,
        #[case] income: Decimal,
    ) {
        assert_eq!(
            percentage_of_income(expense, income),
            Err(LedgerError::arithmetic_overflow("expense share"))
        );
    }
}
