use thiserror::Error;

/// Failures at the ledger/contract boundary. None of these are fatal to the
/// UI; the worst outcome of any of them is a stale or empty view.
#[derive(Debug, Error)]
pub enum ChainError {
    /// No wallet / no account identity available.
    #[error("wallet unavailable: {0}")]
    Wallet(String),

    /// A read-only contract call failed.
    #[error("contract call failed: {0}")]
    Call(String),

    /// A submitted transaction was rejected by the proxy or the ledger.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// The proxy returned parallel arrays that do not line up.
    #[error("malformed campaign data: {0}")]
    Decode(String),

    /// A decimal amount string could not be converted to base units.
    #[error("bad amount {0:?}")]
    Amount(String),
}
