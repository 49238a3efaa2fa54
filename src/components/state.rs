//! The view-state store: a flat cache of everything the page renders,
//! mutated only through [`StatePatch::apply`]. The whole struct lives inside
//! one `Signal`, so applying a patch under a single write guard is one
//! observable change and one re-render.

use crate::chain::campaign::Campaign;
use crate::chain::ledger::Address;

/// Everything the UI renders. Monetary fields are decimal ether strings;
/// conversion from wei happens at the chain boundary, never here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub current_address: Address,
    pub owner_address: Address,
    pub contract_balance: String,
    pub collected_fees: String,
    /// Advisory message shown under the header, e.g. when no wallet is
    /// connected or a submission failed.
    pub message: String,

    // New-campaign form
    pub campaign_title: String,
    pub pledge_cost: String,
    pub number_of_pledges: String,

    // Control-panel form
    pub new_contract_owner: String,
    pub address_to_ban: String,

    // Each list is fully replaced on reload, never patched element-wise.
    pub active_campaigns: Vec<Campaign>,
    pub fulfilled_campaigns: Vec<Campaign>,
    pub canceled_campaigns: Vec<Campaign>,

    pub banned_users: Vec<Address>,
    /// Caller-specific flag from the canceled listing.
    pub deserves_refund: bool,
    pub contract_is_active: bool,
}

/// A partial set of field updates, applied atomically. The store performs no
/// validation; it is a pure cache of confirmed (or typed-in) values.
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub current_address: Option<Address>,
    pub owner_address: Option<Address>,
    pub contract_balance: Option<String>,
    pub collected_fees: Option<String>,
    pub message: Option<String>,

    pub campaign_title: Option<String>,
    pub pledge_cost: Option<String>,
    pub number_of_pledges: Option<String>,
    pub new_contract_owner: Option<String>,
    pub address_to_ban: Option<String>,

    pub active_campaigns: Option<Vec<Campaign>>,
    pub fulfilled_campaigns: Option<Vec<Campaign>>,
    pub canceled_campaigns: Option<Vec<Campaign>>,

    pub banned_users: Option<Vec<Address>>,
    pub deserves_refund: Option<bool>,
    pub contract_is_active: Option<bool>,
}

impl StatePatch {
    pub fn apply(self, state: &mut ViewState) {
        macro_rules! set {
            ($field:ident) => {
                if let Some(v) = self.$field {
                    state.$field = v;
                }
            };
        }

        set!(current_address);
        set!(owner_address);
        set!(contract_balance);
        set!(collected_fees);
        set!(message);
        set!(campaign_title);
        set!(pledge_cost);
        set!(number_of_pledges);
        set!(new_contract_owner);
        set!(address_to_ban);
        set!(active_campaigns);
        set!(fulfilled_campaigns);
        set!(canceled_campaigns);
        set!(banned_users);
        set!(deserves_refund);
        set!(contract_is_active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(id: u64, creator: &str) -> Campaign {
        Campaign {
            creator: Address::new(creator),
            id,
            pledge_cost: "1".into(),
            pledges_sold: 0,
            pledges_remaining: 3,
            backer_pledges: 0,
            is_privileged: false,
        }
    }

    #[test]
    fn untouched_fields_survive() {
        let mut state = ViewState {
            message: "hello".into(),
            contract_balance: "5".into(),
            ..Default::default()
        };

        StatePatch {
            collected_fees: Some("0.04".into()),
            ..Default::default()
        }
        .apply(&mut state);

        assert_eq!(state.collected_fees, "0.04");
        assert_eq!(state.message, "hello");
        assert_eq!(state.contract_balance, "5");
    }

    #[test]
    fn lists_are_replaced_wholesale() {
        let mut state = ViewState {
            active_campaigns: vec![campaign(1, "0xaaa"), campaign(2, "0xbbb")],
            ..Default::default()
        };

        StatePatch {
            active_campaigns: Some(vec![campaign(3, "0xccc")]),
            ..Default::default()
        }
        .apply(&mut state);

        assert_eq!(state.active_campaigns.len(), 1);
        assert_eq!(state.active_campaigns[0].id, 3);
    }

    #[test]
    fn overlapping_reloads_last_writer_wins() {
        // Two reloads of the same list settling out of order: the store ends
        // up with exactly the later patch's list, no element mixing.
        let older = StatePatch {
            active_campaigns: Some(vec![campaign(1, "0xaaa"), campaign(2, "0xbbb")]),
            ..Default::default()
        };
        let newer = StatePatch {
            active_campaigns: Some(vec![campaign(9, "0xccc")]),
            ..Default::default()
        };

        let mut a = ViewState::default();
        newer.clone().apply(&mut a);
        older.clone().apply(&mut a);
        assert_eq!(
            a.active_campaigns.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![1, 2]
        );

        let mut b = ViewState::default();
        older.apply(&mut b);
        newer.apply(&mut b);
        assert_eq!(
            b.active_campaigns.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![9]
        );
    }
}
