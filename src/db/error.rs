use std::fmt;

/// Repository layer errors
#[derive(Debug)]
pub enum RepositoryError {
    PoolError(String),
    UniqueViolation(String),
    DatabaseError(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::PoolError(msg) => write!(f, "Connection pool error: {msg}"),
            RepositoryError::UniqueViolation(msg) => {
                write!(f, "Unique constraint violation: {msg}")
            }
            RepositoryError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
        }
    }
}

impl std::error::Error for RepositoryError {}

impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                RepositoryError::UniqueViolation(info.message().to_string())
            }
            Error::DatabaseError(_, info) => {
                RepositoryError::DatabaseError(info.message().to_string())
            }
            _ => RepositoryError::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::PoolError(err.to_string())
    }
}

// The in-memory stores guard their state with a std Mutex
impl<T> From<std::sync::PoisonError<T>> for RepositoryError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        RepositoryError::DatabaseError(format!("store lock poisoned: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_from_diesel_maps_to_database_error() {
        let err = RepositoryError::from(diesel::result::Error::NotFound);
        assert!(matches!(err, RepositoryError::DatabaseError(_)));
    }

    #[test]
    fn pool_error_displays_prefix() {
        let err = RepositoryError::PoolError("timed out".to_string());
        assert_eq!(err.to_string(), "Connection pool error: timed out");
    }
}
