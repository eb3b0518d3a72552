use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Suggested categories offered by the entry form. Any other string is accepted.
pub const SUGGESTED_CATEGORIES: [&str; 5] =
    ["Food", "Transport", "Utilities", "Entertainment", "Other"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TransactionType::Income => TransactionType::Expense,
            TransactionType::Expense => TransactionType::Income,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("Invalid transaction type '{}'", other)),
        }
    }
}

/// A stored transaction. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub description: String,
}

/// The caller-supplied fields of a transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: String,
    pub category: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub description: String,
}

impl NewTransaction {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        amount: Decimal,
        transaction_type: TransactionType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            amount,
            transaction_type,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parse_is_case_insensitive() {
        assert_eq!("Income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!("EXPENSE".parse::<TransactionType>().unwrap(), TransactionType::Expense);
    }

    #[test]
    fn test_transaction_type_parse_invalid() {
        let result = "refund".parse::<TransactionType>();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("refund"));
    }

    #[test]
    fn test_transaction_type_toggle() {
        assert_eq!(TransactionType::Expense.toggle(), TransactionType::Income);
        assert_eq!(TransactionType::Income.toggle(), TransactionType::Expense);
    }
}
