//! Store failure classification.
//!
//! SeaORM surfaces driver errors as strings wrapped in [`DbErr`] variants, so
//! the schema check looks at SQLSTATE / vendor codes and messages across
//! backends (SQLite, Postgres, MySQL).

use sea_orm::DbErr;

use crate::ListingError;

/// Postgres undefined_table / undefined_column, MySQL ER_NO_SUCH_TABLE / ER_BAD_FIELD_ERROR.
pub fn is_missing_schema_code(code: &str) -> bool {
    matches!(code, "42P01" | "42703" | "1146" | "1054")
}

/// True when the message reports a missing table or column.
pub fn is_missing_schema_message(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    msg.contains("no such table")
        || msg.contains("no such column")
        || (msg.contains("relation") && msg.contains("does not exist"))
        || (msg.contains("column") && msg.contains("does not exist"))
        || msg.contains("doesn't exist")
        || msg.contains("unknown column")
        || msg
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(is_missing_schema_code)
}

/// Map a store error onto the listing taxonomy. Missing schema is
/// `NotProvisioned`; everything else (closed pool, timeouts, I/O) is
/// `StoreUnavailable`.
pub fn classify_db_err(entity: &str, err: DbErr) -> ListingError {
    let text = err.to_string();
    match &err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            ListingError::StoreUnavailable(format!("{entity}: {text}"))
        }
        _ if is_missing_schema_message(&text) => {
            ListingError::NotProvisioned(format!("{entity}: {text}"))
        }
        _ => ListingError::StoreUnavailable(format!("{entity}: {text}")),
    }
}
