use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArlError {
    /// A non-positive quantity reached the encoder. The upstream cleaner is
    /// responsible for filtering these; seeing one here means a caller
    /// bypassed it.
    #[error("non-positive quantity {quantity} for item in basket {basket_id}")]
    InvalidQuantity { basket_id: String, quantity: f64 },

    #[error("support threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("recommendation count must be at least 1")]
    InvalidCount,

    #[error("malformed record at line {line}: {reason}")]
    BadRecord { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
