use std::fmt;

/// Warehouse load failure. `Sql` always means the transaction was rolled
/// back (explicitly, or by the transaction guard on drop) before this error
/// reached the caller.
#[derive(Debug)]
pub enum LoadError {
    InvalidSymbol { symbol: String },
    Sql {
        stage: &'static str,
        table: String,
        source: sqlx::Error,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::InvalidSymbol { symbol } => {
                write!(f, "symbol {symbol:?} is not a valid warehouse table name")
            }
            LoadError::Sql { stage, table, source } => {
                write!(f, "load failed (stage={stage}, table={table}): {source}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::InvalidSymbol { .. } => None,
            LoadError::Sql { source, .. } => Some(source),
        }
    }
}
