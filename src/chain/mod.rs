pub mod campaign;
pub mod error;
pub mod eth;
pub mod ledger;
pub mod proxy;
pub mod units;

use std::rc::Rc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::components::state::StatePatch;
use campaign::{decode_active, decode_settled};
use error::ChainError;
use ledger::{Address, LedgerClient, TxReceipt};
use proxy::{ContractProxy, ContractEvent, EventKind, MethodCall};
use units::Wei;

/// Fixed fee attached to every campaign listing, in ether.
pub const LISTING_FEE_ETH: &str = "0.02";

const NO_WALLET_MSG: &str = "Metamask has not connected yet";

/// User intents sent from the presentation layer. Business rules are not
/// validated here; the contract is the judge and the UI only reflects
/// confirmed state once the matching event arrives.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCmd {
    ReloadPage,
    CreateCampaign {
        title: String,
        pledge_cost: String,
        pledge_count: String,
    },
    Pledge {
        campaign_id: u64,
        pledge_cost: String,
    },
    CancelCampaign {
        campaign_id: u64,
    },
    FulfillCampaign {
        campaign_id: u64,
    },
    ClaimRefund,
    WithdrawFees,
    ChangeOwner {
        new_owner: String,
    },
    BanUser {
        address: String,
    },
    DestroyContract,
}

/// Mirrors on-chain state into the view-state store and submits
/// transactions. Owns the command receiver and the patch sender; the store
/// itself is only ever touched through the patches this controller emits.
pub struct SyncController<P, L> {
    proxy: Rc<P>,
    ledger: Rc<L>,
    cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    patch_tx: mpsc::UnboundedSender<StatePatch>,
    /// Latest successfully obtained account identity. Racing triggers each
    /// overwrite this in turn; the last winner drives subsequent reloads.
    current: Address,
}

impl<P: ContractProxy, L: LedgerClient> SyncController<P, L> {
    pub fn new(
        proxy: Rc<P>,
        ledger: Rc<L>,
        patch_tx: mpsc::UnboundedSender<StatePatch>,
        cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    ) -> Self {
        SyncController {
            proxy,
            ledger,
            cmd_rx,
            patch_tx,
            current: Address::default(),
        }
    }

    /// Runs until the command channel closes or the owning future is
    /// dropped. Both notification streams are acquired here and released
    /// with the controller, so handlers are registered exactly once per page
    /// lifetime no matter how often the UI re-renders.
    pub async fn run(mut self) {
        let mut events = self.proxy.events().fuse();
        let mut accounts = self.ledger.account_changes().fuse();

        self.load_page_data().await;

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(cmd) => self.handle_cmd(cmd).await,
                    None => break,
                },
                Some(ev) = events.next() => self.handle_event(ev).await,
                Some(addr) = accounts.next() => self.handle_account_change(addr).await,
            }
        }
    }

    fn push(&self, patch: StatePatch) {
        let _ = self.patch_tx.send(patch);
    }

    fn advise(&self, message: &str) {
        self.push(StatePatch {
            message: Some(message.to_string()),
            ..Default::default()
        });
    }

    // ---- Reload operations -------------------------------------------------

    /// Initial and full-page load: contract overview first, then the account
    /// handshake, then all three campaign listings for that account.
    async fn load_page_data(&mut self) {
        match self.fetch_overview().await {
            Ok(patch) => self.push(patch),
            // Stale overview fields are kept; the next trigger re-syncs.
            Err(e) => error!("failed to load contract overview: {e}"),
        }

        match self.ledger.request_accounts().await {
            Ok(accounts) if !accounts.is_empty() => {
                let addr = accounts[0].clone();
                self.current = addr.clone();
                self.push(StatePatch {
                    current_address: Some(addr),
                    ..Default::default()
                });
                self.load_active_campaigns().await;
                self.load_fulfilled_campaigns().await;
                self.load_canceled_campaigns().await;
            }
            Ok(_) | Err(_) => {
                // Recoverable: the page stays readable, campaign lists stay
                // empty until a wallet shows up.
                self.advise(NO_WALLET_MSG);
            }
        }
    }

    /// Reads the page-top fields in a fixed order and folds them into one
    /// atomic patch. Addresses are canonicalized here, at the boundary.
    async fn fetch_overview(&self) -> Result<StatePatch, ChainError> {
        let owner = self.proxy.get_contract_owner().await?;
        let balance = self.proxy.get_contract_whole_balance().await?;
        let fees = self.proxy.get_contract_fees().await?;
        let banned = self.proxy.get_banned_backers().await?;
        let active = self.proxy.check_if_contract_is_active().await?;

        Ok(StatePatch {
            owner_address: Some(Address::new(&owner)),
            contract_balance: Some(units::from_base_units(balance)),
            collected_fees: Some(units::from_base_units(fees)),
            banned_users: Some(banned.iter().map(|b| Address::new(b)).collect()),
            contract_is_active: Some(active),
            ..Default::default()
        })
    }

    async fn load_active_campaigns(&self) {
        let listing = match self.proxy.get_active_campaigns(&self.current).await {
            Ok(cols) => decode_active(&cols),
            Err(e) => Err(e),
        };
        match listing {
            Ok(campaigns) => self.push(StatePatch {
                active_campaigns: Some(campaigns),
                ..Default::default()
            }),
            Err(e) => error!("failed to load active campaigns: {e}"),
        }
    }

    async fn load_fulfilled_campaigns(&self) {
        let listing = match self.proxy.get_fulfilled_campaigns(&self.current).await {
            Ok(cols) => decode_settled(&cols),
            Err(e) => Err(e),
        };
        match listing {
            Ok(campaigns) => self.push(StatePatch {
                fulfilled_campaigns: Some(campaigns),
                ..Default::default()
            }),
            Err(e) => error!("failed to load fulfilled campaigns: {e}"),
        }
    }

    /// The canceled listing carries the caller's refund flag; both land in
    /// the same patch so the Claim button can never see a half-updated pair.
    async fn load_canceled_campaigns(&self) {
        let listing = match self.proxy.get_canceled_campaigns(&self.current).await {
            Ok(cols) => decode_settled(&cols.campaigns).map(|c| (c, cols.deserves_refund)),
            Err(e) => Err(e),
        };
        match listing {
            Ok((campaigns, deserves_refund)) => self.push(StatePatch {
                canceled_campaigns: Some(campaigns),
                deserves_refund: Some(deserves_refund),
                ..Default::default()
            }),
            Err(e) => error!("failed to load canceled campaigns: {e}"),
        }
    }

    /// Cheap refresh after money-moving events; campaign lists are left to
    /// their own handlers.
    async fn load_balance_and_fees(&self) {
        let fetched = async {
            let balance = self.proxy.get_contract_whole_balance().await?;
            let fees = self.proxy.get_contract_fees().await?;
            Ok::<_, ChainError>((balance, fees))
        }
        .await;

        match fetched {
            Ok((balance, fees)) => self.push(StatePatch {
                contract_balance: Some(units::from_base_units(balance)),
                collected_fees: Some(units::from_base_units(fees)),
                ..Default::default()
            }),
            Err(e) => error!("failed to load balance and fees: {e}"),
        }
    }

    // ---- Event-driven refresh ----------------------------------------------

    /// One fixed, minimal reload subset per notification. Handlers are
    /// idempotent: re-delivery only refreshes the same fields again.
    async fn handle_event(&mut self, ev: ContractEvent) {
        info!(kind = ?ev.kind, payload = %ev.payload, "contract event");
        match ev.kind {
            EventKind::CampaignCreated | EventKind::PledgeMade => {
                self.load_balance_and_fees().await;
                self.load_active_campaigns().await;
            }
            EventKind::CampaignCanceled => {
                self.load_active_campaigns().await;
                self.load_canceled_campaigns().await;
            }
            EventKind::CampaignFulfilled => {
                self.load_balance_and_fees().await;
                self.load_active_campaigns().await;
                self.load_fulfilled_campaigns().await;
            }
            EventKind::RefundMade => {
                self.load_balance_and_fees().await;
                self.load_canceled_campaigns().await;
            }
            EventKind::WithdrawMade => {
                self.load_balance_and_fees().await;
            }
            EventKind::OwnerChanged => match self.proxy.get_contract_owner().await {
                Ok(owner) => self.push(StatePatch {
                    owner_address: Some(Address::new(&owner)),
                    ..Default::default()
                }),
                Err(e) => error!("failed to reload owner: {e}"),
            },
            // Bans and destruction change which controls are enabled, so the
            // whole page reloads after the targeted field refresh.
            EventKind::UserBanned => {
                match self.proxy.get_banned_backers().await {
                    Ok(banned) => self.push(StatePatch {
                        banned_users: Some(banned.iter().map(|b| Address::new(b)).collect()),
                        ..Default::default()
                    }),
                    Err(e) => error!("failed to reload ban list: {e}"),
                }
                self.load_page_data().await;
            }
            EventKind::ContractDestroyed => {
                match self.proxy.check_if_contract_is_active().await {
                    Ok(active) => self.push(StatePatch {
                        contract_is_active: Some(active),
                        ..Default::default()
                    }),
                    Err(e) => error!("failed to reload active flag: {e}"),
                }
                self.load_page_data().await;
            }
        }
    }

    async fn handle_account_change(&mut self, addr: Address) {
        let addr = Address::new(addr.as_str());
        info!(address = %addr, "account changed");
        self.current = addr.clone();
        self.push(StatePatch {
            current_address: Some(addr),
            ..Default::default()
        });
        self.load_active_campaigns().await;
        self.load_fulfilled_campaigns().await;
        self.load_canceled_campaigns().await;
    }

    // ---- Action submission -------------------------------------------------

    async fn handle_cmd(&mut self, cmd: AppCmd) {
        match cmd {
            AppCmd::ReloadPage => self.load_page_data().await,
            AppCmd::CreateCampaign {
                title,
                pledge_cost,
                pledge_count,
            } => self.create_campaign(title, pledge_cost, pledge_count).await,
            AppCmd::Pledge {
                campaign_id,
                pledge_cost,
            } => self.pledge(campaign_id, pledge_cost).await,
            AppCmd::CancelCampaign { campaign_id } => {
                if let Err(e) = self
                    .submit(MethodCall::CancelACampaign { id: campaign_id }, None)
                    .await
                {
                    warn!("cancel failed: {e}");
                }
            }
            AppCmd::FulfillCampaign { campaign_id } => {
                if let Err(e) = self
                    .submit(MethodCall::FulfillACampaign { id: campaign_id }, None)
                    .await
                {
                    warn!("fulfill failed: {e}");
                }
            }
            AppCmd::ClaimRefund => match self.submit(MethodCall::Refund, None).await {
                Ok(_) => self.push(StatePatch {
                    deserves_refund: Some(false),
                    ..Default::default()
                }),
                Err(e) => warn!("refund failed: {e}"),
            },
            AppCmd::WithdrawFees => {
                if let Err(e) = self
                    .submit(MethodCall::TransferAllFeesToContractOwner, None)
                    .await
                {
                    warn!("withdraw failed: {e}");
                }
            }
            AppCmd::ChangeOwner { new_owner } => {
                let call = MethodCall::ChangeContractOwner {
                    new_owner: Address::new(&new_owner),
                };
                match self.submit(call, None).await {
                    Ok(_) => self.push(StatePatch {
                        new_contract_owner: Some(String::new()),
                        ..Default::default()
                    }),
                    Err(e) => warn!("owner change failed: {e}"),
                }
            }
            AppCmd::BanUser { address } => self.ban_user(address).await,
            AppCmd::DestroyContract => self.destroy_contract().await,
        }
    }

    /// Submits with the cached identity as sender. With no identity there is
    /// nothing to sign with, so the connectivity advisory is raised instead
    /// of round-tripping a doomed transaction.
    async fn submit(
        &self,
        call: MethodCall,
        value: Option<Wei>,
    ) -> Result<TxReceipt, ChainError> {
        if self.current.is_empty() {
            self.advise(NO_WALLET_MSG);
            return Err(ChainError::Wallet(NO_WALLET_MSG.into()));
        }
        self.ledger.submit(&self.current, call, value).await
    }

    async fn create_campaign(&mut self, title: String, pledge_cost: String, pledge_count: String) {
        let prepared = (|| {
            let cost = units::to_base_units(&pledge_cost)?;
            let count: u64 = pledge_count
                .trim()
                .parse()
                .map_err(|_| ChainError::Amount(pledge_count.clone()))?;
            let fee = units::to_base_units(LISTING_FEE_ETH)?;
            Ok::<_, ChainError>((cost, count, fee))
        })();

        let (cost, count, fee) = match prepared {
            Ok(v) => v,
            Err(e) => {
                warn!("campaign form rejected: {e}");
                self.advise("Failed to create campaign");
                return;
            }
        };

        let call = MethodCall::AddNewCampaign {
            title,
            pledge_cost: cost.to_string(),
            pledge_count: count,
        };
        match self.submit(call, Some(fee)).await {
            // Prepare for the next campaign; the list itself refreshes when
            // the CampaignCreated event lands.
            Ok(_) => self.push(StatePatch {
                campaign_title: Some(String::new()),
                pledge_cost: Some(String::new()),
                number_of_pledges: Some(String::new()),
                ..Default::default()
            }),
            Err(e) => {
                warn!("create failed: {e}");
                self.advise("Failed to create campaign");
            }
        }
    }

    async fn pledge(&mut self, campaign_id: u64, pledge_cost: String) {
        let value = match units::to_base_units(&pledge_cost) {
            Ok(v) => v,
            Err(e) => {
                warn!("bad pledge cost: {e}");
                self.advise("Funding failed");
                return;
            }
        };
        if let Err(e) = self
            .submit(MethodCall::SupportACampaign { id: campaign_id }, Some(value))
            .await
        {
            warn!("pledge failed: {e}");
            self.advise("Funding failed");
        }
    }

    async fn ban_user(&mut self, address: String) {
        let call = MethodCall::AddUserToBanList {
            target: Address::new(&address),
        };
        match self.submit(call, None).await {
            Ok(_) => match self.proxy.get_banned_backers().await {
                Ok(banned) => self.push(StatePatch {
                    address_to_ban: Some(String::new()),
                    banned_users: Some(banned.iter().map(|b| Address::new(b)).collect()),
                    ..Default::default()
                }),
                Err(e) => error!("failed to reload ban list: {e}"),
            },
            Err(e) => warn!("ban failed: {e}"),
        }
    }

    async fn destroy_contract(&mut self) {
        match self.submit(MethodCall::DestroyContract, None).await {
            Ok(_) => match self.proxy.check_if_contract_is_active().await {
                Ok(active) => self.push(StatePatch {
                    contract_is_active: Some(active),
                    ..Default::default()
                }),
                Err(e) => error!("failed to reload active flag: {e}"),
            },
            Err(e) => warn!("destroy failed: {e}"),
        }
    }
}
