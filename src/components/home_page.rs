use dioxus::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

use crate::chain::AppCmd;
use crate::components::campaigns::{ActiveCampaignsSection, CanceledCampaignsSection, FulfilledCampaignsSection};
use crate::components::control_panel::ControlPanel;
use crate::components::state::StatePatch;
use crate::components::{policy, AppState};

#[component]
pub fn HomeComponent() -> Element {
    rsx! {
        div { class: "page-container",
            Header {}
            hr {}
            NewCampaignForm {}
            hr {}
            ActiveCampaignsSection {}
            hr {}
            FulfilledCampaignsSection {}
            hr {}
            CanceledCampaignsSection {}
            hr {}
            ControlPanel {}
        }
    }
}

#[component]
fn Header() -> Element {
    let app_state = use_context::<AppState>();
    let cmd_tx = use_context::<UnboundedSender<AppCmd>>();
    let view = app_state.view.read();

    let current_address = view.current_address.to_string();
    let owner_address = view.owner_address.to_string();
    let balance = view.contract_balance.clone();
    let fees = view.collected_fees.clone();
    let message = view.message.clone();
    drop(view);

    rsx! {
        header { class: "header",
            div { class: "flex justify-between items-center",
                h1 { "Crowdfunding DApp" }
                button {
                    class: "btn btn-ghost btn-sm",
                    onclick: move |_| { let _ = cmd_tx.send(AppCmd::ReloadPage); },
                    "Refresh"
                }
            }

            div { class: "wallet-details",
                div { class: "addresses",
                    p { "Current Address "
                        input { class: "form-control", id: "current-addr", value: "{current_address}", readonly: true }
                    }
                    p { "Owner's Address "
                        input { class: "form-control", id: "owner-addr", value: "{owner_address}", readonly: true }
                    }
                }
                div { class: "balances",
                    p { "Balance "
                        input { class: "form-control", id: "contract-balance", value: "{balance}", readonly: true }
                    }
                    p { "Collected Fees "
                        input { class: "form-control", id: "collected-fees", value: "{fees}", readonly: true }
                    }
                }
            }

            if !message.is_empty() {
                div { class: "advisory", "{message}" }
            }
        }
    }
}

/// Every keystroke lands in the store; submission reads the store back, so
/// there is never a separate local draft to drift out of sync.
#[component]
fn NewCampaignForm() -> Element {
    let mut app_state = use_context::<AppState>();
    let cmd_tx = use_context::<UnboundedSender<AppCmd>>();
    let view = app_state.view.read();

    let title = view.campaign_title.clone();
    let cost = view.pledge_cost.clone();
    let count = view.number_of_pledges.clone();
    let disabled = !policy::can_create_campaign(&view);
    drop(view);

    let on_create = move |_| {
        let view = app_state.view.read();
        let _ = cmd_tx.send(AppCmd::CreateCampaign {
            title: view.campaign_title.clone(),
            pledge_cost: view.pledge_cost.clone(),
            pledge_count: view.number_of_pledges.clone(),
        });
    };

    rsx! {
        section { class: "new-campaign",
            h2 { "New Campaign" }

            div { class: "form-control",
                label { "Title: "
                    input {
                        class: "form-control",
                        id: "campaign-title",
                        placeholder: "Enter a title",
                        value: "{title}",
                        oninput: move |e| app_state.patch(StatePatch {
                            campaign_title: Some(e.value()),
                            ..Default::default()
                        }),
                    }
                }
            }
            div { class: "form-control",
                label { "Pledge cost: "
                    input {
                        class: "form-control",
                        id: "pledge-cost",
                        r#type: "number",
                        value: "{cost}",
                        oninput: move |e| app_state.patch(StatePatch {
                            pledge_cost: Some(e.value()),
                            ..Default::default()
                        }),
                    }
                }
            }
            div { class: "form-control",
                label { "Number of pledges: "
                    input {
                        class: "form-control",
                        id: "number-of-pledges",
                        r#type: "number",
                        value: "{count}",
                        oninput: move |e| app_state.patch(StatePatch {
                            number_of_pledges: Some(e.value()),
                            ..Default::default()
                        }),
                    }
                }
            }
            button {
                class: if disabled { "btn btn-grey" } else { "btn btn-blue" },
                id: "create-campaign-btn",
                disabled,
                onclick: on_create,
                "Create"
            }
        }
    }
}
