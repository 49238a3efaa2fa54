//! The wallet side of the chain boundary: account identity and transaction
//! submission. The contract's method surface lives in [`crate::chain::proxy`].

use std::fmt;

use async_trait::async_trait;
use futures::stream::LocalBoxStream;
use serde::{Deserialize, Serialize};

use crate::chain::error::ChainError;
use crate::chain::proxy::MethodCall;
use crate::chain::units::Wei;

/// An account address in canonical form: trimmed and lowercased. All equality
/// comparisons in the app go through this type, so normalization happens once
/// at the read boundary and never downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(raw: &str) -> Self {
        Address(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Receipt for a mined transaction. The controller never inspects it beyond
/// success; state refreshes ride on contract events, not receipts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxReceipt {
    #[serde(default)]
    pub transaction_hash: String,
}

/// Capability set the wallet must provide. `submit` suspends until the
/// transaction is mined or rejected.
#[async_trait(?Send)]
pub trait LedgerClient {
    async fn request_accounts(&self) -> Result<Vec<Address>, ChainError>;

    async fn submit(
        &self,
        from: &Address,
        call: MethodCall,
        value: Option<Wei>,
    ) -> Result<TxReceipt, ChainError>;

    /// Account-change notifications. Acquired once when the controller
    /// starts and dropped when it stops.
    fn account_changes(&self) -> LocalBoxStream<'static, Address>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_canonicalized() {
        assert_eq!(Address::new("  0xAbC  ").as_str(), "0xabc");
        assert_eq!(Address::new("0xABC"), Address::new("0xabc"));
    }

    #[test]
    fn empty_address() {
        assert!(Address::default().is_empty());
        assert!(Address::new("   ").is_empty());
    }
}
