use crate::{
    action::{Chain, FieldHint, FieldKind},
    resolve::ResolveField,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a transaction published by a [`Wallet`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TransactionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The wallets one party holds, across ledgers.
///
/// Amounts are in the base unit of the ledger (satoshi, wei) and passed as
/// decimal or `0x` hex strings, the way cnd renders them.
#[async_trait]
pub trait Wallet: Send + Sync {
    fn supports(&self, _chain: Chain) -> bool {
        true
    }

    async fn address(&self, chain: Chain) -> anyhow::Result<String>;

    /// Top the wallet up with the native asset of `chain`.
    async fn fund(&self, chain: Chain, amount: &str) -> anyhow::Result<()>;

    async fn send_to_address(&self, address: &str, amount: &str) -> anyhow::Result<TransactionId>;

    async fn broadcast_transaction(&self, hex: &str) -> anyhow::Result<TransactionId>;

    async fn deploy_contract(
        &self,
        data: &str,
        amount: &str,
        gas_limit: &str,
    ) -> anyhow::Result<TransactionId>;

    async fn call_contract(
        &self,
        contract_address: &str,
        data: Option<&str>,
        gas_limit: &str,
    ) -> anyhow::Result<TransactionId>;
}

/// Answers address fields from a [`Wallet`] and fee fields from a fixed
/// rate. Everything else is left unresolved.
#[derive(Debug)]
pub struct WalletResolver<'w, W> {
    wallet: &'w W,
    fee_per_wu: Option<u64>,
}

impl<'w, W> WalletResolver<'w, W> {
    pub fn new(wallet: &'w W) -> Self {
        Self {
            wallet,
            fee_per_wu: None,
        }
    }

    pub fn with_fee_per_wu(self, fee_per_wu: u64) -> Self {
        Self {
            fee_per_wu: Some(fee_per_wu),
            ..self
        }
    }
}

#[async_trait]
impl<W> ResolveField for WalletResolver<'_, W>
where
    W: Wallet,
{
    async fn resolve(&self, name: &str, hint: &FieldHint) -> anyhow::Result<Option<Value>> {
        let chain = match hint.ledger {
            Some(chain) if self.wallet.supports(chain) => chain,
            _ => return Ok(None),
        };

        let value = match hint.kind {
            FieldKind::Address => Some(Value::String(self.wallet.address(chain).await?)),
            FieldKind::FeePerWu if chain == Chain::Bitcoin => {
                self.fee_per_wu.map(|fee| Value::String(fee.to_string()))
            }
            _ => None,
        };

        if value.is_none() {
            tracing::debug!("wallet cannot provide field {} ({:?})", name, hint);
        }

        Ok(value)
    }
}
