//! Access policy: pure derivations over a snapshot of the view state. These
//! are recomputed on every render and never cached, so a permission can
//! never outlive the state it was derived from.

use crate::chain::campaign::Campaign;
use crate::components::state::ViewState;

/// The current user is the contract owner.
pub fn is_privileged_user(state: &ViewState) -> bool {
    state.current_address == state.owner_address
}

/// Owner and creator may cancel a campaign.
pub fn is_eligible_to_cancel(state: &ViewState, campaign: &Campaign) -> bool {
    is_privileged_user(state) || state.current_address == campaign.creator
}

/// The current user appears in the ban set. Every entry is compared; the
/// result is the OR over all of them.
pub fn is_user_banned(state: &ViewState) -> bool {
    state
        .banned_users
        .iter()
        .fold(false, |banned, entry| banned || state.current_address == *entry)
}

// Control enablement, combining policy with campaign lifecycle. The owner
// collects fees rather than competing for pledges, so creation is closed to
// the owner as well as to banned users.

pub fn can_create_campaign(state: &ViewState) -> bool {
    !is_privileged_user(state) && !is_user_banned(state) && state.contract_is_active
}

/// Fulfillment opens once every pledge is sold.
pub fn can_fulfill(campaign: &Campaign) -> bool {
    campaign.pledges_remaining == 0
}

/// Cancel/Fulfill controls are shown only to the owner or the campaign's
/// creator.
pub fn shows_campaign_controls(state: &ViewState, campaign: &Campaign) -> bool {
    is_privileged_user(state) || state.current_address == campaign.creator
}

pub fn can_claim_refund(state: &ViewState) -> bool {
    state.deserves_refund
}

/// Owner-only controls also shut off when the contract has been destroyed.
pub fn can_operate_contract(state: &ViewState) -> bool {
    is_privileged_user(state) && state.contract_is_active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ledger::Address;

    fn campaign(creator: &str, remaining: u64) -> Campaign {
        Campaign {
            creator: Address::new(creator),
            id: 1,
            pledge_cost: "1".into(),
            pledges_sold: 3,
            pledges_remaining: remaining,
            backer_pledges: 0,
            is_privileged: false,
        }
    }

    #[test]
    fn privilege_ignores_case_and_padding() {
        let state = ViewState {
            current_address: Address::new("0xaaa"),
            owner_address: Address::new("  0xAAA  "),
            ..Default::default()
        };
        assert!(is_privileged_user(&state));

        let state = ViewState {
            current_address: Address::new("0xaaa"),
            owner_address: Address::new("0xbbb"),
            ..Default::default()
        };
        assert!(!is_privileged_user(&state));
    }

    #[test]
    fn mixed_case_owner_after_initial_load() {
        // Owner read back as 0xAAA, wallet reports 0xaaa.
        let state = ViewState {
            current_address: Address::new("0xaaa"),
            owner_address: Address::new("0xAAA"),
            ..Default::default()
        };
        assert!(is_privileged_user(&state));
    }

    #[test]
    fn ban_set_matching() {
        let mut state = ViewState {
            current_address: Address::new("0xAbC"),
            ..Default::default()
        };
        assert!(!is_user_banned(&state));

        state.banned_users = vec![Address::new("0xddd"), Address::new(" 0xABC ")];
        assert!(is_user_banned(&state));

        state.banned_users = vec![Address::new("0xddd"), Address::new("0xeee")];
        assert!(!is_user_banned(&state));
    }

    #[test]
    fn cancel_eligibility() {
        let state = ViewState {
            current_address: Address::new("0xuser"),
            owner_address: Address::new("0xowner"),
            ..Default::default()
        };
        assert!(is_eligible_to_cancel(&state, &campaign("0xUSER", 2)));
        assert!(!is_eligible_to_cancel(&state, &campaign("0xother", 2)));

        let owner_state = ViewState {
            current_address: Address::new("0xowner"),
            owner_address: Address::new("0xowner"),
            ..Default::default()
        };
        assert!(is_eligible_to_cancel(&owner_state, &campaign("0xother", 2)));
    }

    #[test]
    fn fulfill_gated_on_remaining_pledges() {
        assert!(can_fulfill(&campaign("0xaaa", 0)));
        assert!(!can_fulfill(&campaign("0xaaa", 2)));
    }

    #[test]
    fn refund_follows_stored_flag() {
        let mut state = ViewState {
            deserves_refund: false,
            // Everything else favorable: refund still stays off.
            contract_is_active: true,
            current_address: Address::new("0xaaa"),
            ..Default::default()
        };
        assert!(!can_claim_refund(&state));

        state.deserves_refund = true;
        assert!(can_claim_refund(&state));
    }

    #[test]
    fn creation_closed_to_owner_banned_and_inactive() {
        let mut state = ViewState {
            current_address: Address::new("0xuser"),
            owner_address: Address::new("0xowner"),
            contract_is_active: true,
            ..Default::default()
        };
        assert!(can_create_campaign(&state));

        state.contract_is_active = false;
        assert!(!can_create_campaign(&state));

        state.contract_is_active = true;
        state.banned_users = vec![Address::new("0xUSER")];
        assert!(!can_create_campaign(&state));

        state.banned_users.clear();
        state.owner_address = Address::new("0xuser");
        assert!(!can_create_campaign(&state));
    }

    #[test]
    fn owner_controls_need_active_contract() {
        let mut state = ViewState {
            current_address: Address::new("0xowner"),
            owner_address: Address::new("0xowner"),
            contract_is_active: true,
            ..Default::default()
        };
        assert!(can_operate_contract(&state));

        state.contract_is_active = false;
        assert!(!can_operate_contract(&state));
    }
}
