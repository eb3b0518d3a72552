use crate::db::repository;
use crate::error::SummaryError;
use crate::models::transaction::{Transaction, TransactionType};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Aggregates derived from every stored transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    /// Expense totals keyed by the exact category string, ordered by category.
    pub expenses_by_category: Vec<(String, Decimal)>,
}

impl Summary {
    /// Returns `None` for an empty slice so callers can keep their previous display.
    ///
    /// Sums are checked; a total beyond `Decimal::MAX` is an error rather than a panic.
    pub fn compute(transactions: &[Transaction]) -> Result<Option<Summary>, SummaryError> {
        if transactions.is_empty() {
            return Ok(None);
        }

        let mut total_income = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();

        for transaction in transactions {
            match transaction.transaction_type {
                TransactionType::Income => {
                    total_income = checked_add(total_income, transaction.amount, "Total income")?;
                }
                TransactionType::Expense => {
                    total_expenses = checked_add(total_expenses, transaction.amount, "Total expenses")?;
                    let entry = by_category
                        .entry(transaction.category.clone())
                        .or_insert(Decimal::ZERO);
                    *entry = checked_add(*entry, transaction.amount, "A category total")?;
                }
            }
        }

        let balance = total_income
            .checked_sub(total_expenses)
            .ok_or(SummaryError::Overflow("Balance"))?;

        Ok(Some(Summary {
            total_income,
            total_expenses,
            balance,
            expenses_by_category: by_category.into_iter().collect(),
        }))
    }

    pub fn lines(&self) -> [String; 3] {
        [
            format!("Total Income: {}", format_currency(self.total_income)),
            format!("Total Expenses: {}", format_currency(self.total_expenses)),
            format!("Balance: {}", format_currency(self.balance)),
        ]
    }
}

fn checked_add(total: Decimal, amount: Decimal, what: &'static str) -> Result<Decimal, SummaryError> {
    total.checked_add(amount).ok_or(SummaryError::Overflow(what))
}

/// `$` followed by the value rounded to two decimals, e.g. `$-5.00`.
pub fn format_currency(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

/// What the statistics region currently shows.
///
/// Holds the last non-empty summary; an empty store never replaces it.
#[derive(Debug, Default)]
pub struct SummaryView {
    summary: Option<Summary>,
    redraws: usize,
}

impl SummaryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Number of times the chart has been replaced.
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// Re-reads the whole table and recomputes the summary.
    pub fn refresh(&mut self, conn: &Connection) -> Result<(), SummaryError> {
        let transactions = repository::list_all(conn)?;
        match Summary::compute(&transactions)? {
            Some(summary) => {
                tracing::info!(
                    rows = transactions.len(),
                    income = %summary.total_income,
                    expenses = %summary.total_expenses,
                    "Recomputed summary"
                );
                self.summary = Some(summary);
                self.redraws += 1;
            }
            None => tracing::debug!("No transactions stored, summary left unchanged"),
        }
        Ok(())
    }
}
