use dioxus::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

use crate::chain::campaign::Campaign;
use crate::chain::AppCmd;
use crate::components::{policy, AppState};

/// Live campaigns with per-row Pledge / Cancel / Fulfill controls.
#[component]
pub fn ActiveCampaignsSection() -> Element {
    let app_state = use_context::<AppState>();
    let cmd_tx = use_context::<UnboundedSender<AppCmd>>();
    let view = app_state.view.read();
    let campaigns = view.active_campaigns.clone();

    rsx! {
        section { class: "live-campaigns",
            h2 { "Live campaigns" }

            table { class: "table table-bordered",
                thead {
                    tr {
                        th { "Entrepreneur" }
                        th { "Id" }
                        th { "Price" }
                        th { "Pledges Sold" }
                        th { "Pledges Left" }
                        th { "Your Pledges" }
                        th { "" }
                    }
                }
                tbody {
                    for campaign in campaigns.iter() {
                        {
                            let show_controls = policy::shows_campaign_controls(&view, campaign);
                            let can_cancel = policy::is_eligible_to_cancel(&view, campaign);
                            let can_fulfill = policy::can_fulfill(campaign);
                            let pledge_cmd = AppCmd::Pledge {
                                campaign_id: campaign.id,
                                pledge_cost: campaign.pledge_cost.clone(),
                            };
                            let cancel_cmd = AppCmd::CancelCampaign { campaign_id: campaign.id };
                            let fulfill_cmd = AppCmd::FulfillCampaign { campaign_id: campaign.id };
                            let tx_pledge = cmd_tx.clone();
                            let tx_cancel = cmd_tx.clone();
                            let tx_fulfill = cmd_tx.clone();

                            rsx! {
                                tr { key: "{campaign.id}",
                                    CampaignCells { campaign: campaign.clone() }
                                    td {
                                        button {
                                            class: "btn btn-green",
                                            onclick: move |_| { let _ = tx_pledge.send(pledge_cmd.clone()); },
                                            "Pledge"
                                        }
                                        button {
                                            class: "btn btn-red",
                                            hidden: !show_controls,
                                            disabled: !can_cancel,
                                            onclick: move |_| { let _ = tx_cancel.send(cancel_cmd.clone()); },
                                            "Cancel"
                                        }
                                        button {
                                            class: if can_fulfill { "btn btn-blue" } else { "btn btn-grey" },
                                            hidden: !show_controls,
                                            disabled: !can_fulfill,
                                            onclick: move |_| { let _ = tx_fulfill.send(fulfill_cmd.clone()); },
                                            "Fulfill"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn FulfilledCampaignsSection() -> Element {
    let app_state = use_context::<AppState>();
    let campaigns = app_state.view.read().fulfilled_campaigns.clone();

    rsx! {
        section { class: "fulfilled-campaigns",
            h2 { "Fulfilled campaigns" }
            CampaignTable { campaigns }
        }
    }
}

#[component]
pub fn CanceledCampaignsSection() -> Element {
    let app_state = use_context::<AppState>();
    let cmd_tx = use_context::<UnboundedSender<AppCmd>>();
    let view = app_state.view.read();
    let campaigns = view.canceled_campaigns.clone();
    let can_claim = policy::can_claim_refund(&view);
    drop(view);

    rsx! {
        section { class: "canceled-campaigns",
            h2 { "Canceled campaigns" }

            button {
                class: if can_claim { "btn btn-blue" } else { "btn btn-grey" },
                disabled: !can_claim,
                onclick: move |_| { let _ = cmd_tx.send(AppCmd::ClaimRefund); },
                "Claim"
            }

            CampaignTable { campaigns }
        }
    }
}

/// Plain listing for the terminal-state sections.
#[component]
fn CampaignTable(campaigns: Vec<Campaign>) -> Element {
    rsx! {
        table { class: "table",
            thead {
                tr {
                    th { "Entrepreneur" }
                    th { "Id" }
                    th { "Price" }
                    th { "Pledges Sold" }
                    th { "Pledges Left" }
                    th { "Your Pledges" }
                }
            }
            tbody {
                for campaign in campaigns.iter() {
                    tr { key: "{campaign.id}",
                        CampaignCells { campaign: campaign.clone() }
                    }
                }
            }
        }
    }
}

#[component]
fn CampaignCells(campaign: Campaign) -> Element {
    rsx! {
        td { "{campaign.creator}" }
        td { "{campaign.id}" }
        td { "{campaign.pledge_cost}" }
        td { "{campaign.pledges_sold}" }
        td { "{campaign.pledges_remaining}" }
        td { "{campaign.backer_pledges}" }
    }
}
