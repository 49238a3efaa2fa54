//! Campaign projections and the single schema-mapping step that turns the
//! proxy's positional parallel arrays into typed rows.

use serde::Deserialize;

use crate::chain::error::ChainError;
use crate::chain::ledger::Address;
use crate::chain::proxy::{ActiveColumns, SettledColumns};
use crate::chain::units;

/// Read-only projection of one campaign, as rendered by the UI. Monetary
/// fields are decimal ether strings; wei never leaves this module.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Campaign {
    pub creator: Address,
    pub id: u64,
    pub pledge_cost: String,
    pub pledges_sold: u64,
    pub pledges_remaining: u64,
    pub backer_pledges: u64,
    /// Caller-specific flag, only reported for active campaigns.
    pub is_privileged: bool,
}

fn check_len(expected: usize, got: usize, column: &str) -> Result<(), ChainError> {
    if got != expected {
        return Err(ChainError::Decode(format!(
            "column {} has {} entries, expected {}",
            column, got, expected
        )));
    }
    Ok(())
}

/// Zips the active-campaign columns into rows, preserving the proxy's order.
/// Every row's fields come from the same index across all columns; columns
/// that do not line up reject the whole listing.
pub fn decode_active(cols: &ActiveColumns) -> Result<Vec<Campaign>, ChainError> {
    let n = cols.creators.len();
    check_len(n, cols.ids.len(), "ids")?;
    check_len(n, cols.pledge_costs.len(), "pledge_costs")?;
    check_len(n, cols.pledges_sold.len(), "pledges_sold")?;
    check_len(n, cols.pledges_remaining.len(), "pledges_remaining")?;
    check_len(n, cols.backer_pledges.len(), "backer_pledges")?;
    check_len(n, cols.privileged.len(), "privileged")?;

    Ok(cols
        .creators
        .iter()
        .enumerate()
        .map(|(i, creator)| Campaign {
            creator: Address::new(creator),
            id: cols.ids[i],
            pledge_cost: units::from_base_units(cols.pledge_costs[i]),
            pledges_sold: cols.pledges_sold[i],
            pledges_remaining: cols.pledges_remaining[i],
            backer_pledges: cols.backer_pledges[i],
            is_privileged: cols.privileged[i],
        })
        .collect())
}

/// Same mapping for the fulfilled/canceled listings, which carry no
/// privilege column.
pub fn decode_settled(cols: &SettledColumns) -> Result<Vec<Campaign>, ChainError> {
    let n = cols.creators.len();
    check_len(n, cols.ids.len(), "ids")?;
    check_len(n, cols.pledge_costs.len(), "pledge_costs")?;
    check_len(n, cols.pledges_sold.len(), "pledges_sold")?;
    check_len(n, cols.pledges_remaining.len(), "pledges_remaining")?;
    check_len(n, cols.backer_pledges.len(), "backer_pledges")?;

    Ok(cols
        .creators
        .iter()
        .enumerate()
        .map(|(i, creator)| Campaign {
            creator: Address::new(creator),
            id: cols.ids[i],
            pledge_cost: units::from_base_units(cols.pledge_costs[i]),
            pledges_sold: cols.pledges_sold[i],
            pledges_remaining: cols.pledges_remaining[i],
            backer_pledges: cols.backer_pledges[i],
            is_privileged: false,
        })
        .collect())
}
