//! Fixed interface to the one deployed crowdfunding contract: read-only
//! queries, the write-method surface, and the named change notifications.

use async_trait::async_trait;
use futures::stream::LocalBoxStream;
use serde::{Deserialize, Serialize};

use crate::chain::error::ChainError;
use crate::chain::ledger::Address;
use crate::chain::units::Wei;

/// Deserializes a wei column that may arrive as JSON numbers or, for values
/// beyond the JS safe-integer range, decimal strings.
fn wei_column<'de, D>(deserializer: D) -> Result<Vec<Wei>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    raw.into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => {
                s.parse().map_err(|_| serde::de::Error::custom("bad wei string"))
            }
            serde_json::Value::Number(n) => n
                .as_u64()
                .map(Wei::from)
                .ok_or_else(|| serde::de::Error::custom("bad wei number")),
            _ => Err(serde::de::Error::custom("wei must be string or number")),
        })
        .collect()
}

/// Parallel arrays returned by `getActiveCampaigns`, indexed by position.
/// Decoding into row records is done in one place, [`crate::chain::campaign`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActiveColumns {
    pub creators: Vec<String>,
    pub ids: Vec<u64>,
    #[serde(deserialize_with = "wei_column")]
    pub pledge_costs: Vec<Wei>,
    pub pledges_sold: Vec<u64>,
    pub pledges_remaining: Vec<u64>,
    pub backer_pledges: Vec<u64>,
    pub privileged: Vec<bool>,
}

/// Parallel arrays for the fulfilled and canceled listings, which carry no
/// per-campaign privilege column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettledColumns {
    pub creators: Vec<String>,
    pub ids: Vec<u64>,
    #[serde(deserialize_with = "wei_column")]
    pub pledge_costs: Vec<Wei>,
    pub pledges_sold: Vec<u64>,
    pub pledges_remaining: Vec<u64>,
    pub backer_pledges: Vec<u64>,
}

/// The canceled listing additionally reports whether the caller is owed a
/// refund across any canceled campaign.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CanceledColumns {
    #[serde(flatten)]
    pub campaigns: SettledColumns,
    pub deserves_refund: bool,
}

/// State-changing contract methods, submitted through the ledger client with
/// the current user as sender. Serialized across the wallet bridge, so the
/// wire names match the contract ABI.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "method", content = "args")]
pub enum MethodCall {
    #[serde(rename = "addNewCampaign")]
    AddNewCampaign {
        title: String,
        // wei, stringified: pledge costs can exceed the JS safe-integer range
        pledge_cost: String,
        pledge_count: u64,
    },
    #[serde(rename = "supportACampaign")]
    SupportACampaign { id: u64 },
    #[serde(rename = "cancelACampaign")]
    CancelACampaign { id: u64 },
    #[serde(rename = "fulfillACampaign")]
    FulfillACampaign { id: u64 },
    #[serde(rename = "refund")]
    Refund,
    #[serde(rename = "transferAllFeesToContractOwner")]
    TransferAllFeesToContractOwner,
    #[serde(rename = "changeContractOwner")]
    ChangeContractOwner { new_owner: Address },
    #[serde(rename = "addUserToBanList")]
    AddUserToBanList { target: Address },
    #[serde(rename = "destroyContract")]
    DestroyContract,
}

/// The contract's named notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EventKind {
    CampaignCreated,
    PledgeMade,
    CampaignCanceled,
    CampaignFulfilled,
    RefundMade,
    WithdrawMade,
    OwnerChanged,
    UserBanned,
    ContractDestroyed,
}

/// One delivered notification. The payload is logged for diagnostics but
/// never parsed; the kind alone decides which reload subset runs.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractEvent {
    pub kind: EventKind,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ContractEvent {
    pub fn new(kind: EventKind) -> Self {
        ContractEvent {
            kind,
            payload: serde_json::Value::Null,
        }
    }
}

/// Read-only queries against the deployed contract, plus its notification
/// stream. Campaign listings are caller-relative.
#[async_trait(?Send)]
pub trait ContractProxy {
    async fn get_contract_owner(&self) -> Result<String, ChainError>;
    async fn get_contract_whole_balance(&self) -> Result<Wei, ChainError>;
    async fn get_contract_fees(&self) -> Result<Wei, ChainError>;
    async fn get_banned_backers(&self) -> Result<Vec<String>, ChainError>;
    async fn check_if_contract_is_active(&self) -> Result<bool, ChainError>;

    async fn get_active_campaigns(&self, caller: &Address) -> Result<ActiveColumns, ChainError>;
    async fn get_fulfilled_campaigns(&self, caller: &Address)
        -> Result<SettledColumns, ChainError>;
    async fn get_canceled_campaigns(&self, caller: &Address)
        -> Result<CanceledColumns, ChainError>;

    /// Notification stream. Acquired once when the controller starts and
    /// dropped when it stops.
    fn events(&self) -> LocalBoxStream<'static, ContractEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_call_wire_format() {
        let call = MethodCall::SupportACampaign { id: 7 };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["method"], "supportACampaign");
        assert_eq!(json["args"]["id"], 7);
    }

    #[test]
    fn no_arg_calls_serialize() {
        let json = serde_json::to_value(MethodCall::Refund).unwrap();
        assert_eq!(json["method"], "refund");
    }
}
