use dioxus::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

use crate::chain::AppCmd;
use crate::components::state::StatePatch;
use crate::components::{policy, AppState};

/// Owner-only operations. Everything here is disabled for non-owners and
/// once the contract has been destroyed; the contract enforces the same
/// rules, these gates just keep the UI honest.
#[component]
pub fn ControlPanel() -> Element {
    let mut app_state = use_context::<AppState>();
    let cmd_tx = use_context::<UnboundedSender<AppCmd>>();
    let view = app_state.view.read();

    let enabled = policy::can_operate_contract(&view);
    let new_owner = view.new_contract_owner.clone();
    let ban_target = view.address_to_ban.clone();
    drop(view);

    let btn_class = if enabled { "btn btn-blue" } else { "btn btn-grey" };

    let tx_withdraw = cmd_tx.clone();
    let tx_change = cmd_tx.clone();
    let tx_ban = cmd_tx.clone();
    let tx_destroy = cmd_tx.clone();

    rsx! {
        section { class: "control-panel",
            h2 { "Control Panel" }

            div { class: "control-panel-container",
                div { class: "control-buttons",
                    button {
                        class: btn_class,
                        disabled: !enabled,
                        onclick: move |_| { let _ = tx_withdraw.send(AppCmd::WithdrawFees); },
                        "Withdraw"
                    }
                }

                div { class: "form-inline",
                    button {
                        class: btn_class,
                        disabled: !enabled,
                        onclick: move |_| {
                            let new_owner = app_state.view.read().new_contract_owner.clone();
                            let _ = tx_change.send(AppCmd::ChangeOwner { new_owner });
                        },
                        "Change owner"
                    }
                    input {
                        class: "form-control",
                        id: "new-contract-owner-input",
                        value: "{new_owner}",
                        oninput: move |e| app_state.patch(StatePatch {
                            new_contract_owner: Some(e.value()),
                            ..Default::default()
                        }),
                    }
                }

                div { class: "form-inline",
                    button {
                        class: btn_class,
                        disabled: !enabled,
                        onclick: move |_| {
                            let address = app_state.view.read().address_to_ban.clone();
                            let _ = tx_ban.send(AppCmd::BanUser { address });
                        },
                        "Ban entrepreneur"
                    }
                    input {
                        class: "form-control",
                        id: "ban-user-input",
                        value: "{ban_target}",
                        oninput: move |e| app_state.patch(StatePatch {
                            address_to_ban: Some(e.value()),
                            ..Default::default()
                        }),
                    }
                }

                div { class: "control-buttons",
                    button {
                        class: btn_class,
                        disabled: !enabled,
                        onclick: move |_| { let _ = tx_destroy.send(AppCmd::DestroyContract); },
                        "Destroy"
                    }
                }
            }
        }
    }
}
