use crate::{
    client::ActionResponse,
    ledger_action::LedgerAction,
    poll::{poll_until, PollConfig},
    swap::SwapResource,
    wallet::{TransactionId, Wallet, WalletResolver},
    Client, Result,
};
use anyhow::Context;
use url::Url;

/// One party of a swap: its cnd and its wallet.
#[derive(Debug)]
pub struct Actor<W> {
    pub name: String,
    pub cnd: Client,
    pub wallet: W,
    pub poll: PollConfig,
    fee_per_wu: Option<u64>,
}

impl<W> Actor<W>
where
    W: Wallet,
{
    pub fn new(name: impl Into<String>, cnd: Client, wallet: W) -> Self {
        Self {
            name: name.into(),
            cnd,
            wallet,
            poll: PollConfig::default(),
            fee_per_wu: None,
        }
    }

    pub fn with_poll_config(self, poll: PollConfig) -> Self {
        Self { poll, ..self }
    }

    pub fn with_fee_per_wu(self, fee_per_wu: u64) -> Self {
        Self {
            fee_per_wu: Some(fee_per_wu),
            ..self
        }
    }

    /// Connect this actor's cnd to the one of `other`.
    pub async fn dial<V>(&self, other: &Actor<V>) -> Result<()> {
        tracing::debug!("{} dials {}", self.name, other.name);

        self.cnd.dial(&other.cnd).await
    }

    pub async fn wait_for(&self, swap: &Url, state: &str) -> Result<SwapResource> {
        tracing::debug!("{} waits for swap {} to be {}", self.name, swap, state);

        poll_until(&self.cnd, swap, state, self.poll).await
    }

    /// Execute action `name` of `swap`, filling in fields from the wallet.
    pub async fn execute(&self, swap: &SwapResource, name: &str) -> Result<ActionResponse> {
        let action = self.cnd.action(swap, name).await?;
        tracing::debug!("{} executes {}", self.name, action.name);

        self.cnd.execute_action(&action, &self.resolver()).await
    }

    /// Execute action `name` and carry out the ledger action cnd returns.
    pub async fn execute_ledger_action(
        &self,
        swap: &SwapResource,
        name: &str,
    ) -> anyhow::Result<Option<TransactionId>> {
        let response = self
            .execute(swap, name)
            .await
            .with_context(|| format!("{} failed to execute {}", self.name, name))?;
        let ledger_action = response
            .body_as::<LedgerAction>()
            .with_context(|| format!("response to {} is not a ledger action", name))?
            .unwrap_or(LedgerAction::None);

        ledger_action.execute(&self.wallet).await
    }

    fn resolver(&self) -> WalletResolver<'_, W> {
        let resolver = WalletResolver::new(&self.wallet);

        match self.fee_per_wu {
            Some(fee) => resolver.with_fee_per_wu(fee),
            None => resolver,
        }
    }
}
