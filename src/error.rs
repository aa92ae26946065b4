use thiserror::Error;

pub type BucketResult<T> = Result<T, BucketError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BucketError {
    #[error("invalid domain: {reason}")]
    InvalidDomain { reason: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl BucketError {
    pub(crate) fn invalid_domain(reason: impl Into<String>) -> Self {
        Self::InvalidDomain {
            reason: reason.into(),
        }
    }
}
