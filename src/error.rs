use std::error;

/// Errors raised while building expressions or executing requests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The partition key name is empty or its value is absent.
    #[error("partition key name and value are required")]
    MissingPartitionKey,
    /// A sort key was given without both an operator and a value.
    #[error("sort key `{0}` requires both an operator and a value")]
    MissingSortKeyArgs(String),
    /// The `between` operator was requested but no field holds a two element range.
    #[error("operator `between` requires a value with exactly 2 elements")]
    InvalidRangeOperator,
    /// A field value could not be converted into an attribute value.
    #[error("malformed field value: {0}")]
    MalformedInput(#[from] serde_dynamo::Error),
    /// A request element could not be built because a required field is missing,
    /// e.g. a transactional update without an update expression.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] aws_sdk_dynamodb::error::BuildError),
    /// The store client failed; the original error is kept as the source.
    #[error("store request failed: {0}")]
    StoreTransport(#[source] Box<dyn error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn store<E: error::Error + Send + Sync + 'static>(error: E) -> Self {
        Self::StoreTransport(Box::new(error))
    }
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
