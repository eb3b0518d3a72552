use crate::error::StoreError;
use rusqlite::Connection;
use std::path::Path;

const CREATE_TRANSACTIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    category TEXT NOT NULL,
    amount TEXT NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
    description TEXT
)";

/// Opens (or creates) the database file at `path` and makes sure the schema exists.
pub fn establish_connection(path: impl AsRef<Path>) -> Result<Connection, StoreError> {
    let path = path.as_ref();
    let conn = Connection::open(path)?;
    initialize(&conn)?;
    let rows = super::repository::count(&conn)?;
    tracing::info!("Opened transaction store at {} ({} rows)", path.display(), rows);
    Ok(conn)
}

/// Creates the transactions table if it is missing. Safe to call on every startup.
pub fn initialize(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(CREATE_TRANSACTIONS_TABLE, [])?;
    Ok(())
}

#[cfg(test)]
pub fn establish_test_connection() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    initialize(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{count, create, list_all};
    use crate::models::transaction::{NewTransaction, TransactionType};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    #[test]
    fn test_establish_connection_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("finance.db");
        assert!(!path.exists());

        let conn = establish_connection(&path).unwrap();
        assert!(path.exists());
        assert_eq!(count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let conn = establish_test_connection().unwrap();
        assert!(initialize(&conn).is_ok());
        assert!(initialize(&conn).is_ok());
    }

    #[test]
    fn test_reopening_keeps_existing_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("finance.db");

        {
            let conn = establish_connection(&path).unwrap();
            let tx = NewTransaction::new("2025-03-01", "Food", Decimal::new(1250, 2), TransactionType::Expense, "Lunch");
            create(&conn, &tx).unwrap();
        }

        let conn = establish_connection(&path).unwrap();
        let all = list_all(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description, "Lunch");
        assert_eq!(all[0].amount, Decimal::new(1250, 2));
    }
}
