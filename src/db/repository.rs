use crate::error::StoreError;
use crate::models::transaction::{NewTransaction, Transaction, TransactionType};
use rusqlite::Connection;
use rusqlite::types::ValueRef;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Inserts a transaction and returns the id SQLite assigned to it.
///
/// No validation happens here; the entry form owns that.
pub fn create(conn: &Connection, transaction: &NewTransaction) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO transactions (date, category, amount, type, description) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            &transaction.date,
            &transaction.category,
            transaction.amount.to_string(),
            transaction.transaction_type.as_str(),
            &transaction.description,
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::debug!(id, category = %transaction.category, amount = %transaction.amount, "Inserted transaction");
    Ok(id)
}

/// Reads every stored transaction in insertion order.
pub fn list_all(conn: &Connection) -> Result<Vec<Transaction>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, date, category, amount, type, description FROM transactions ORDER BY id ASC")?;

    let rows = stmt.query_map([], |row| {
        Ok(RawRow {
            id: row.get(0)?,
            date: row.get(1)?,
            category: row.get(2)?,
            amount: RawAmount::from_value(row.get_ref(3)?),
            transaction_type: row.get(4)?,
            description: row.get(5)?,
        })
    })?;

    let mut transactions = Vec::new();
    for row in rows {
        transactions.push(row?.into_transaction()?);
    }

    tracing::debug!("Loaded {} transactions", transactions.len());
    Ok(transactions)
}

pub fn count(conn: &Connection) -> Result<usize, StoreError> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
    Ok(total as usize)
}

struct RawRow {
    id: i64,
    date: String,
    category: String,
    amount: RawAmount,
    transaction_type: String,
    description: Option<String>,
}

/// The `amount` column as SQLite holds it. Databases created by older versions of
/// the tracker store it as REAL, newer ones as decimal TEXT.
enum RawAmount {
    Text(String),
    Real(f64),
    Integer(i64),
    Other(&'static str),
}

impl RawAmount {
    fn from_value(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Text(bytes) => RawAmount::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Real(value) => RawAmount::Real(value),
            ValueRef::Integer(value) => RawAmount::Integer(value),
            ValueRef::Null => RawAmount::Other("NULL"),
            ValueRef::Blob(_) => RawAmount::Other("BLOB"),
        }
    }

    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawAmount::Text(text) => Decimal::from_str(text.trim()).ok(),
            RawAmount::Real(value) => Decimal::try_from(*value).ok(),
            RawAmount::Integer(value) => Some(Decimal::from(*value)),
            RawAmount::Other(_) => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            RawAmount::Text(text) => text.clone(),
            RawAmount::Real(value) => value.to_string(),
            RawAmount::Integer(value) => value.to_string(),
            RawAmount::Other(kind) => kind.to_string(),
        }
    }
}

impl RawRow {
    fn into_transaction(self) -> Result<Transaction, StoreError> {
        let amount = self.amount.to_decimal().ok_or_else(|| StoreError::InvalidAmount {
            id: self.id,
            value: self.amount.describe(),
        })?;
        let transaction_type =
            TransactionType::from_str(&self.transaction_type).map_err(|_| StoreError::InvalidType {
                id: self.id,
                value: self.transaction_type.clone(),
            })?;

        Ok(Transaction {
            id: self.id,
            date: self.date,
            category: self.category,
            amount,
            transaction_type,
            description: self.description.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;

    fn create_test_transaction(category: &str, cents: i64, transaction_type: TransactionType) -> NewTransaction {
        NewTransaction::new(
            "2025-01-15",
            category,
            Decimal::new(cents, 2),
            transaction_type,
            "Test Transaction",
        )
    }

    #[test]
    fn test_create_returns_increasing_ids() {
        let conn = establish_test_connection().unwrap();

        let first = create(&conn, &create_test_transaction("Food", 1000, TransactionType::Expense)).unwrap();
        let second = create(&conn, &create_test_transaction("Food", 2000, TransactionType::Expense)).unwrap();

        assert!(second > first);
    }

    #[test]
    fn test_list_all_empty() {
        let conn = establish_test_connection().unwrap();

        let result = list_all(&conn);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().len(), 0);
    }

    #[test]
    fn test_create_is_visible_to_next_read() {
        let conn = establish_test_connection().unwrap();
        let tx = create_test_transaction("Salary", 150000, TransactionType::Income);

        let id = create(&conn, &tx).unwrap();
        let all = list_all(&conn).unwrap();

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].date, "2025-01-15");
        assert_eq!(all[0].category, "Salary");
        assert_eq!(all[0].amount, Decimal::new(150000, 2));
        assert_eq!(all[0].transaction_type, TransactionType::Income);
        assert_eq!(all[0].description, "Test Transaction");
    }

    #[test]
    fn test_list_all_keeps_insertion_order() {
        let conn = establish_test_connection().unwrap();

        create(&conn, &create_test_transaction("Transport", 500, TransactionType::Expense)).unwrap();
        create(&conn, &create_test_transaction("Food", 4000, TransactionType::Expense)).unwrap();
        create(&conn, &create_test_transaction("Utilities", 9000, TransactionType::Expense)).unwrap();

        let categories: Vec<String> = list_all(&conn).unwrap().into_iter().map(|t| t.category).collect();
        assert_eq!(categories, vec!["Transport", "Food", "Utilities"]);
    }

    #[test]
    fn test_create_accepts_empty_and_unlisted_values() {
        let conn = establish_test_connection().unwrap();
        let tx = NewTransaction::new("", "", Decimal::new(-300, 2), TransactionType::Expense, "");

        create(&conn, &tx).unwrap();
        let all = list_all(&conn).unwrap();

        assert_eq!(all[0].date, "");
        assert_eq!(all[0].category, "");
        assert_eq!(all[0].amount, Decimal::new(-300, 2));
    }

    #[test]
    fn test_count_tracks_inserts() {
        let conn = establish_test_connection().unwrap();
        assert_eq!(count(&conn).unwrap(), 0);

        create(&conn, &create_test_transaction("Food", 100, TransactionType::Expense)).unwrap();
        create(&conn, &create_test_transaction("Food", 100, TransactionType::Expense)).unwrap();
        assert_eq!(count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_list_all_null_description_reads_as_empty() {
        let conn = establish_test_connection().unwrap();
        conn.execute(
            "INSERT INTO transactions (date, category, amount, type, description) VALUES ('2025-02-01', 'Other', '7', 'expense', NULL)",
            [],
        )
        .unwrap();

        let all = list_all(&conn).unwrap();
        assert_eq!(all[0].description, "");
    }

    #[test]
    fn test_list_all_reads_legacy_real_amounts() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE transactions (
                id INTEGER PRIMARY KEY,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL,
                description TEXT
            )",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO transactions (date, category, amount, type, description) VALUES ('2024-12-01', 'Food', 12.5, 'expense', 'Pizza')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO transactions (date, category, amount, type, description) VALUES ('2024-12-02', 'Salary', 3000, 'income', '')",
            [],
        )
        .unwrap();
        crate::db::connection::initialize(&conn).unwrap();

        let all = list_all(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].amount, Decimal::new(125, 1));
        assert_eq!(all[1].amount, Decimal::from(3000));
        assert_eq!(all[1].transaction_type, TransactionType::Income);

        let id = create(&conn, &create_test_transaction("Food", 250, TransactionType::Expense)).unwrap();
        let all = list_all(&conn).unwrap();
        assert_eq!(all.last().unwrap().id, id);
        assert_eq!(all.last().unwrap().amount, Decimal::new(250, 2));
    }

    #[test]
    fn test_list_all_rejects_corrupt_amount() {
        let conn = establish_test_connection().unwrap();
        conn.execute(
            "INSERT INTO transactions (date, category, amount, type, description) VALUES ('2025-02-01', 'Other', 'lots', 'expense', '')",
            [],
        )
        .unwrap();

        let result = list_all(&conn);
        assert!(matches!(result, Err(StoreError::InvalidAmount { .. })));
    }
}
