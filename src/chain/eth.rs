//! Browser-side implementations of [`LedgerClient`] and [`ContractProxy`],
//! bridged to `window.ethereum` and the web3 contract handle set up by
//! `assets/crowdfunding.js` through `document::eval`.
//!
//! Every call round-trips one eval: the script awaits the JS promise and
//! sends back `{ ok: ... }` or `{ err: ... }`. Subscription streams keep
//! their eval handle alive inside the stream so the JS callback can keep
//! delivering for the life of the controller.

use async_trait::async_trait;
use dioxus::document;
use futures::stream::LocalBoxStream;
use futures::StreamExt;
use tracing::warn;

use crate::chain::error::ChainError;
use crate::chain::ledger::{Address, LedgerClient, TxReceipt};
use crate::chain::proxy::{
    ActiveColumns, CanceledColumns, ContractEvent, ContractProxy, MethodCall, SettledColumns,
};
use crate::chain::units::Wei;

#[derive(Default)]
pub struct EthLedger;

#[derive(Default)]
pub struct EthContract;

/// Runs one ok/err round-trip through the eval bridge.
async fn bridge_call(js: String) -> Result<serde_json::Value, ChainError> {
    let mut eval = document::eval(&js);
    let response: serde_json::Value = eval
        .recv()
        .await
        .map_err(|e| ChainError::Call(format!("eval bridge: {e:?}")))?;

    if let Some(err) = response.get("err").and_then(|e| e.as_str()) {
        return Err(ChainError::Call(err.to_string()));
    }
    response
        .get("ok")
        .cloned()
        .ok_or_else(|| ChainError::Call("empty bridge response".into()))
}

/// One read-only contract call. `caller` becomes the `from` of the eth call,
/// which is what makes the campaign listings caller-relative.
async fn contract_read(
    method: &str,
    caller: Option<&Address>,
) -> Result<serde_json::Value, ChainError> {
    let caller_js = match caller {
        Some(a) => serde_json::Value::String(a.as_str().to_string()).to_string(),
        None => "null".to_string(),
    };
    let js = format!(
        r#"try {{
            const result = await window.crowdfund.read("{method}", {caller_js});
            dioxus.send({{ ok: result }});
        }} catch (err) {{
            dioxus.send({{ err: String(err) }});
        }}"#
    );
    bridge_call(js).await
}

fn wei_from(value: &serde_json::Value) -> Result<Wei, ChainError> {
    match value {
        serde_json::Value::String(s) => s
            .parse()
            .map_err(|_| ChainError::Call(format!("bad wei value {s:?}"))),
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(Wei::from)
            .ok_or_else(|| ChainError::Call(format!("bad wei value {n}"))),
        other => Err(ChainError::Call(format!("bad wei value {other}"))),
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, ChainError> {
    serde_json::from_value(value).map_err(|e| ChainError::Decode(e.to_string()))
}

/// Wraps an eval handle whose JS side keeps pushing messages into a stream.
fn eval_stream<T, F>(js: &'static str, parse: F) -> LocalBoxStream<'static, T>
where
    F: Fn(serde_json::Value) -> Option<T> + 'static,
    T: 'static,
{
    let eval = document::eval(js);
    futures::stream::unfold((eval, parse), |(mut eval, parse)| async move {
        loop {
            match eval.recv::<serde_json::Value>().await {
                Ok(raw) => match parse(raw) {
                    Some(item) => return Some((item, (eval, parse))),
                    // Unparseable notification: skip it, keep listening.
                    None => continue,
                },
                Err(e) => {
                    warn!("subscription closed: {e:?}");
                    return None;
                }
            }
        }
    })
    .boxed_local()
}

#[async_trait(?Send)]
impl LedgerClient for EthLedger {
    async fn request_accounts(&self) -> Result<Vec<Address>, ChainError> {
        let js = r#"try {
            const accounts = await window.ethereum.request({ method: 'eth_requestAccounts' });
            dioxus.send({ ok: accounts });
        } catch (err) {
            dioxus.send({ err: String(err) });
        }"#;
        let raw = bridge_call(js.to_string())
            .await
            .map_err(|e| ChainError::Wallet(e.to_string()))?;
        let accounts: Vec<String> = decode(raw).map_err(|e| ChainError::Wallet(e.to_string()))?;
        Ok(accounts.iter().map(|a| Address::new(a)).collect())
    }

    async fn submit(
        &self,
        from: &Address,
        call: MethodCall,
        value: Option<Wei>,
    ) -> Result<TxReceipt, ChainError> {
        let from_js = serde_json::Value::String(from.as_str().to_string()).to_string();
        let call_js =
            serde_json::to_string(&call).map_err(|e| ChainError::Rejected(e.to_string()))?;
        // Wei travels as a decimal string; it can exceed the JS safe range.
        let value_js = match value {
            Some(v) => format!("\"{v}\""),
            None => "null".to_string(),
        };
        let js = format!(
            r#"try {{
                const receipt = await window.crowdfund.submit({from_js}, {call_js}, {value_js});
                dioxus.send({{ ok: receipt }});
            }} catch (err) {{
                dioxus.send({{ err: String(err) }});
            }}"#
        );
        let raw = bridge_call(js)
            .await
            .map_err(|e| ChainError::Rejected(e.to_string()))?;
        decode(raw).map_err(|e| ChainError::Rejected(e.to_string()))
    }

    fn account_changes(&self) -> LocalBoxStream<'static, Address> {
        eval_stream(
            r#"window.ethereum.on('accountsChanged', (accounts) => dioxus.send(accounts));"#,
            |raw| {
                let accounts: Vec<String> = serde_json::from_value(raw).ok()?;
                accounts.first().map(|a| Address::new(a))
            },
        )
    }
}

#[async_trait(?Send)]
impl ContractProxy for EthContract {
    async fn get_contract_owner(&self) -> Result<String, ChainError> {
        let raw = contract_read("getContractOwner", None).await?;
        decode(raw)
    }

    async fn get_contract_whole_balance(&self) -> Result<Wei, ChainError> {
        let raw = contract_read("getContractWholeBalance", None).await?;
        wei_from(&raw)
    }

    async fn get_contract_fees(&self) -> Result<Wei, ChainError> {
        let raw = contract_read("getContractFees", None).await?;
        wei_from(&raw)
    }

    async fn get_banned_backers(&self) -> Result<Vec<String>, ChainError> {
        let raw = contract_read("getBannedBackers", None).await?;
        decode(raw)
    }

    async fn check_if_contract_is_active(&self) -> Result<bool, ChainError> {
        let raw = contract_read("checkIfContractIsActive", None).await?;
        decode(raw)
    }

    async fn get_active_campaigns(&self, caller: &Address) -> Result<ActiveColumns, ChainError> {
        let raw = contract_read("getActiveCampaigns", Some(caller)).await?;
        decode(raw)
    }

    async fn get_fulfilled_campaigns(
        &self,
        caller: &Address,
    ) -> Result<SettledColumns, ChainError> {
        let raw = contract_read("getFulfilledCampaigns", Some(caller)).await?;
        decode(raw)
    }

    async fn get_canceled_campaigns(
        &self,
        caller: &Address,
    ) -> Result<CanceledColumns, ChainError> {
        let raw = contract_read("getCanceledCampaigns", Some(caller)).await?;
        decode(raw)
    }

    fn events(&self) -> LocalBoxStream<'static, ContractEvent> {
        eval_stream(
            r#"window.crowdfund.onEvent((kind, payload) => dioxus.send({ kind, payload }));"#,
            |raw| match serde_json::from_value::<ContractEvent>(raw) {
                Ok(ev) => Some(ev),
                Err(e) => {
                    warn!("unrecognized contract event: {e}");
                    None
                }
            },
        )
    }
}
