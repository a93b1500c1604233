use thiserror::Error;

/// Outcome kinds surfaced by catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Caller supplied something the operation refuses to run with.
    /// Nothing was read or written.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The backing store failed. Any bulk write in flight was rolled back.
    #[error("Store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Lift a store failure. A `CatalogError` raised inside the store comes
    /// back as is, and regex compilation errors raised by Postgres
    /// (SQLSTATE 2201B) become input errors.
    pub fn from_store(err: anyhow::Error) -> Self {
        let err = match err.downcast::<CatalogError>() {
            Ok(catalog_err) => return catalog_err,
            Err(err) => err,
        };

        let invalid_regex = err
            .chain()
            .filter_map(|cause| cause.downcast_ref::<sqlx::Error>())
            .filter_map(|sqlx_err| sqlx_err.as_database_error())
            .any(|db_err| db_err.code().as_deref() == Some("2201B"));

        if invalid_regex {
            return Self::InvalidInput(format!("{:#}", err));
        }
        Self::Store(err)
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
