//! Domain error types.

use super::record::RecordKind;

/// Errors raised by the collection query engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("unknown sort field '{field}' for {kind}")]
    InvalidField { kind: RecordKind, field: String },

    #[error("invalid page size {page_size}: must be at least 1")]
    InvalidPageSize { page_size: usize },
}

/// Top-level error type for stocksim.
#[derive(Debug, thiserror::Error)]
pub enum StocksimError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("duplicate {kind} key: {key}")]
    DuplicateKey { kind: RecordKind, key: String },

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StocksimError> for std::process::ExitCode {
    fn from(err: &StocksimError) -> Self {
        let code: u8 = match err {
            StocksimError::Io(_) => 1,
            StocksimError::ConfigParse { .. }
            | StocksimError::ConfigMissing { .. }
            | StocksimError::ConfigInvalid { .. } => 2,
            StocksimError::DataSource { .. } | StocksimError::DuplicateKey { .. } => 3,
            StocksimError::Query(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_field_message_names_kind_and_field() {
        let err = QueryError::InvalidField {
            kind: RecordKind::Order,
            field: "colour".into(),
        };
        assert_eq!(err.to_string(), "unknown sort field 'colour' for order");
    }

    #[test]
    fn query_error_converts_transparently() {
        let err: StocksimError = QueryError::InvalidPageSize { page_size: 0 }.into();
        assert_eq!(
            err.to_string(),
            "invalid page size 0: must be at least 1"
        );
    }
}
