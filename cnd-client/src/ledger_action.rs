use crate::wallet::{TransactionId, Wallet};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What cnd asks the caller to do on a ledger when an action is executed.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(tag = "type", content = "payload")]
pub enum LedgerAction {
    BitcoinSendAmountToAddress {
        to: String,
        amount: Quantity,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        network: Option<String>,
    },
    BitcoinBroadcastSignedTransaction {
        hex: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        network: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_median_block_time: Option<u32>,
    },
    EthereumDeployContract {
        data: String,
        amount: Quantity,
        gas_limit: Quantity,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chain_id: Option<u32>,
    },
    EthereumCallContract {
        contract_address: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<String>,
        gas_limit: Quantity,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chain_id: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_block_timestamp: Option<u32>,
    },
    None,
}

/// A quantity cnd renders either as a JSON number or a (hex) string.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(from = "RawQuantity", into = "String")]
pub struct Quantity(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Number(u64),
    String(String),
}

impl From<RawQuantity> for Quantity {
    fn from(raw: RawQuantity) -> Self {
        match raw {
            RawQuantity::Number(number) => Quantity(number.to_string()),
            RawQuantity::String(string) => Quantity(string),
        }
    }
}

impl From<Quantity> for String {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl Quantity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl LedgerAction {
    /// Perform the action with `wallet`.
    ///
    /// Time locks are not waited for; the ledger rejects transactions that
    /// are broadcast too early.
    pub async fn execute<W>(&self, wallet: &W) -> anyhow::Result<Option<TransactionId>>
    where
        W: Wallet + ?Sized,
    {
        let transaction = match self {
            LedgerAction::BitcoinSendAmountToAddress { to, amount, .. } => wallet
                .send_to_address(to, amount.as_str())
                .await
                .with_context(|| format!("failed to send {} to {}", amount, to))?,
            LedgerAction::BitcoinBroadcastSignedTransaction { hex, .. } => wallet
                .broadcast_transaction(hex)
                .await
                .context("failed to broadcast signed bitcoin transaction")?,
            LedgerAction::EthereumDeployContract {
                data,
                amount,
                gas_limit,
                ..
            } => wallet
                .deploy_contract(data, amount.as_str(), gas_limit.as_str())
                .await
                .context("failed to deploy contract")?,
            LedgerAction::EthereumCallContract {
                contract_address,
                data,
                gas_limit,
                ..
            } => wallet
                .call_contract(contract_address, data.as_deref(), gas_limit.as_str())
                .await
                .with_context(|| format!("failed to call contract {}", contract_address))?,
            LedgerAction::None => return Ok(None),
        };

        tracing::info!("published transaction {}", transaction);

        Ok(Some(transaction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::test_wallet::RecordingWallet;
    use serde_json::json;

    #[test]
    fn deserializes_call_contract_rendered_by_cnd() {
        let action = serde_json::from_str::<LedgerAction>(
            r#"{"type":"ethereum-call-contract","payload":{"contract_address":"0x0a81e8be41b21f651a71aab1a85c6813b8bbccf8","gas_limit":"0x1","network":"ropsten"}}"#,
        )
        .unwrap();

        assert_eq!(action, LedgerAction::EthereumCallContract {
            contract_address: "0x0a81e8be41b21f651a71aab1a85c6813b8bbccf8".to_owned(),
            data: None,
            gas_limit: Quantity("0x1".to_owned()),
            chain_id: None,
            min_block_timestamp: None,
        });
    }

    #[test]
    fn numeric_amount_is_kept_as_decimal_string() {
        let action = serde_json::from_value::<LedgerAction>(json!({
            "type": "bitcoin-send-amount-to-address",
            "payload": {
                "to": "bcrt1qs2aderg3whgu0m8uadn6dwxjf7j3wx97kk2qqt",
                "amount": 100000000,
                "network": "regtest"
            }
        }))
        .unwrap();

        match action {
            LedgerAction::BitcoinSendAmountToAddress { amount, .. } => {
                assert_eq!(amount.as_str(), "100000000")
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn none_has_no_payload() {
        let action = serde_json::from_value::<LedgerAction>(json!({ "type": "none" })).unwrap();

        assert_eq!(action, LedgerAction::None);
    }

    #[tokio::test]
    async fn deploy_contract_goes_to_wallet() {
        let wallet = RecordingWallet::default();
        let action = LedgerAction::EthereumDeployContract {
            data: "0x6020".to_owned(),
            amount: Quantity("0".to_owned()),
            gas_limit: Quantity("0x2dc6c0".to_owned()),
            chain_id: Some(1337),
        };

        let transaction = action.execute(&wallet).await.unwrap();

        assert_eq!(transaction, Some(TransactionId("tx1".to_owned())));
        assert_eq!(wallet.calls(), vec!["deploy 0x6020 with 0 gas 0x2dc6c0"]);
    }

    #[tokio::test]
    async fn none_does_not_touch_the_wallet() {
        let wallet = RecordingWallet::default();

        let transaction = LedgerAction::None.execute(&wallet).await.unwrap();

        assert_eq!(transaction, None);
        assert!(wallet.calls().is_empty());
    }
}
