//! Request bodies for creating swaps and orders.
//!
//! cnd is the authority on whether a payload makes sense; the checks here
//! only make sure nothing required is missing or malformed before a body is
//! sent.

use serde::Serialize;
use std::fmt;

/// A payload cnd accepts on one of its creation endpoints.
pub trait Payload: Serialize {
    /// Path of the creation endpoint, relative to cnd's base URL.
    fn path(&self) -> String;

    fn ensure_complete(&self) -> Result<(), IncompletePayload>;
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("field {field} {reason}")]
pub struct IncompletePayload {
    pub field: String,
    pub reason: Reason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reason {
    Empty,
    NotAnInteger,
    Missing,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Empty => write!(f, "is empty"),
            Reason::NotAnInteger => write!(f, "is not a decimal integer"),
            Reason::Missing => write!(f, "is missing"),
        }
    }
}

fn non_empty(field: &str, value: &str) -> Result<(), IncompletePayload> {
    if value.trim().is_empty() {
        return Err(IncompletePayload {
            field: field.to_owned(),
            reason: Reason::Empty,
        });
    }

    Ok(())
}

/// Quantities travel as strings of base units (satoshi, wei, ...).
fn integer(field: &str, value: &str) -> Result<(), IncompletePayload> {
    non_empty(field, value)?;

    if !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(IncompletePayload {
            field: field.to_owned(),
            reason: Reason::NotAnInteger,
        });
    }

    Ok(())
}

fn present<T>(field: &str, value: &Option<T>) -> Result<(), IncompletePayload> {
    if value.is_none() {
        return Err(IncompletePayload {
            field: field.to_owned(),
            reason: Reason::Missing,
        });
    }

    Ok(())
}

fn nested(prefix: &str, result: Result<(), IncompletePayload>) -> Result<(), IncompletePayload> {
    result.map_err(|IncompletePayload { field, reason }| IncompletePayload {
        field: format!("{}.{}", prefix, field),
        reason,
    })
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum Role {
    Alice,
    Bob,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Peer {
    pub peer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_hint: Option<String>,
}

impl Peer {
    pub fn new(peer_id: impl Into<String>) -> Self {
        Self {
            peer_id: peer_id.into(),
            address_hint: None,
        }
    }

    pub fn with_address_hint(self, address_hint: impl Into<String>) -> Self {
        Self {
            address_hint: Some(address_hint.into()),
            ..self
        }
    }

    fn ensure_complete(&self) -> Result<(), IncompletePayload> {
        non_empty("peer_id", &self.peer_id)?;
        if let Some(address_hint) = &self.address_hint {
            non_empty("address_hint", address_hint)?;
        }

        Ok(())
    }
}

/// One side of a swap: the parameters of one HTLC protocol.
pub trait Protocol: Serialize {
    const NAME: &'static str;

    fn ensure_complete(&self) -> Result<(), IncompletePayload>;
}

/// HTLC on Bitcoin.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Hbit {
    pub amount: String,
    pub final_identity: String,
    pub network: String,
    pub absolute_expiry: u32,
}

impl Protocol for Hbit {
    const NAME: &'static str = "hbit";

    fn ensure_complete(&self) -> Result<(), IncompletePayload> {
        integer("amount", &self.amount)?;
        non_empty("final_identity", &self.final_identity)?;
        non_empty("network", &self.network)
    }
}

/// HTLC for an ERC20 token on Ethereum.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Herc20 {
    pub amount: String,
    pub identity: String,
    pub chain_id: u32,
    pub token_contract: String,
    pub absolute_expiry: u32,
}

impl Protocol for Herc20 {
    const NAME: &'static str = "herc20";

    fn ensure_complete(&self) -> Result<(), IncompletePayload> {
        integer("amount", &self.amount)?;
        non_empty("identity", &self.identity)?;
        non_empty("token_contract", &self.token_contract)
    }
}

/// HTLC on Lightning, expressed as a hold invoice.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Halbit {
    pub amount: String,
    pub identity: String,
    pub network: String,
    pub cltv_expiry: u32,
}

impl Protocol for Halbit {
    const NAME: &'static str = "halbit";

    fn ensure_complete(&self) -> Result<(), IncompletePayload> {
        integer("amount", &self.amount)?;
        non_empty("identity", &self.identity)?;
        non_empty("network", &self.network)
    }
}

/// Body of `POST /swaps/<alpha>/<beta>`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SwapBody<A, B> {
    pub alpha: A,
    pub beta: B,
    pub peer: Peer,
    pub role: Role,
}

pub type Herc20HbitPayload = SwapBody<Herc20, Hbit>;
pub type HbitHerc20Payload = SwapBody<Hbit, Herc20>;
pub type Herc20HalbitPayload = SwapBody<Herc20, Halbit>;
pub type HalbitHerc20Payload = SwapBody<Halbit, Herc20>;

impl<A, B> SwapBody<A, B>
where
    Self: Payload,
{
    pub fn new(alpha: A, beta: B, peer: Peer, role: Role) -> Result<Self, IncompletePayload> {
        let body = Self {
            alpha,
            beta,
            peer,
            role,
        };
        body.ensure_complete()?;

        Ok(body)
    }
}

macro_rules! impl_payload_for_pairing {
    ($alpha:ty, $beta:ty) => {
        impl Payload for SwapBody<$alpha, $beta> {
            fn path(&self) -> String {
                format!(
                    "swaps/{}/{}",
                    <$alpha as Protocol>::NAME,
                    <$beta as Protocol>::NAME
                )
            }

            fn ensure_complete(&self) -> Result<(), IncompletePayload> {
                nested("alpha", self.alpha.ensure_complete())?;
                nested("beta", self.beta.ensure_complete())?;
                nested("peer", self.peer.ensure_complete())
            }
        }
    };
}

impl_payload_for_pairing!(Herc20, Hbit);
impl_payload_for_pairing!(Hbit, Herc20);
impl_payload_for_pairing!(Herc20, Halbit);
impl_payload_for_pairing!(Halbit, Herc20);

/// A ledger as cnd's RFC003 API names it, e.g. `{"name": "bitcoin",
/// "network": "regtest"}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Ledger {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

impl Ledger {
    pub fn bitcoin(network: impl Into<String>) -> Self {
        Self {
            name: "bitcoin".to_owned(),
            chain_id: None,
            network: Some(network.into()),
        }
    }

    pub fn ethereum(chain_id: u32) -> Self {
        Self {
            name: "ethereum".to_owned(),
            chain_id: Some(chain_id),
            network: None,
        }
    }

    fn ensure_complete(&self) -> Result<(), IncompletePayload> {
        non_empty("name", &self.name)?;
        match self.name.as_str() {
            "bitcoin" => present("network", &self.network)?,
            "ethereum" => present("chain_id", &self.chain_id)?,
            _ => {}
        }
        if let Some(network) = &self.network {
            non_empty("network", network)?;
        }

        Ok(())
    }
}

/// An asset as cnd's RFC003 API names it, e.g. `{"name": "erc20",
/// "quantity": "100", "token_contract": "0x..."}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Asset {
    pub name: String,
    pub quantity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_contract: Option<String>,
}

impl Asset {
    pub fn bitcoin(sats: impl Into<String>) -> Self {
        Self {
            name: "bitcoin".to_owned(),
            quantity: sats.into(),
            token_contract: None,
        }
    }

    pub fn ether(wei: impl Into<String>) -> Self {
        Self {
            name: "ether".to_owned(),
            quantity: wei.into(),
            token_contract: None,
        }
    }

    pub fn erc20(quantity: impl Into<String>, token_contract: impl Into<String>) -> Self {
        Self {
            name: "erc20".to_owned(),
            quantity: quantity.into(),
            token_contract: Some(token_contract.into()),
        }
    }

    fn ensure_complete(&self) -> Result<(), IncompletePayload> {
        non_empty("name", &self.name)?;
        integer("quantity", &self.quantity)?;
        if self.name == "erc20" {
            present("token_contract", &self.token_contract)?;
        }
        if let Some(token_contract) = &self.token_contract {
            non_empty("token_contract", token_contract)?;
        }

        Ok(())
    }
}

/// Body of `POST /swaps/rfc003`.
///
/// Identities are optional because cnd derives them itself for ledgers where
/// it controls the transient keys.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Rfc003Payload {
    pub alpha_ledger: Ledger,
    pub beta_ledger: Ledger,
    pub alpha_asset: Asset,
    pub beta_asset: Asset,
    pub alpha_ledger_refund_identity: Option<String>,
    pub beta_ledger_redeem_identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_expiry: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta_expiry: Option<u32>,
    pub peer: Peer,
}

impl Rfc003Payload {
    pub fn new(
        (alpha_ledger, alpha_asset): (Ledger, Asset),
        (beta_ledger, beta_asset): (Ledger, Asset),
        peer: Peer,
    ) -> Self {
        Self {
            alpha_ledger,
            beta_ledger,
            alpha_asset,
            beta_asset,
            alpha_ledger_refund_identity: None,
            beta_ledger_redeem_identity: None,
            alpha_expiry: None,
            beta_expiry: None,
            peer,
        }
    }

    pub fn with_identities(
        self,
        alpha_ledger_refund_identity: impl Into<String>,
        beta_ledger_redeem_identity: impl Into<String>,
    ) -> Self {
        Self {
            alpha_ledger_refund_identity: Some(alpha_ledger_refund_identity.into()),
            beta_ledger_redeem_identity: Some(beta_ledger_redeem_identity.into()),
            ..self
        }
    }

    pub fn with_expiries(self, alpha_expiry: u32, beta_expiry: u32) -> Self {
        Self {
            alpha_expiry: Some(alpha_expiry),
            beta_expiry: Some(beta_expiry),
            ..self
        }
    }
}

impl Payload for Rfc003Payload {
    fn path(&self) -> String {
        "swaps/rfc003".to_owned()
    }

    fn ensure_complete(&self) -> Result<(), IncompletePayload> {
        nested("alpha_ledger", self.alpha_ledger.ensure_complete())?;
        nested("beta_ledger", self.beta_ledger.ensure_complete())?;
        nested("alpha_asset", self.alpha_asset.ensure_complete())?;
        nested("beta_asset", self.beta_asset.ensure_complete())?;
        if let Some(identity) = &self.alpha_ledger_refund_identity {
            non_empty("alpha_ledger_refund_identity", identity)?;
        }
        if let Some(identity) = &self.beta_ledger_redeem_identity {
            non_empty("beta_ledger_redeem_identity", identity)?;
        }
        nested("peer", self.peer.ensure_complete())
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Buy,
    Sell,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct OrderSwap {
    pub role: Role,
    pub bitcoin_address: String,
    pub ethereum_address: String,
}

/// Body of `POST /orders/BTC-DAI`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BtcDaiOrder {
    pub position: Position,
    /// In satoshi.
    pub quantity: String,
    /// In attodai per whole bitcoin.
    pub price: String,
    pub swap: OrderSwap,
}

impl Payload for BtcDaiOrder {
    fn path(&self) -> String {
        "orders/BTC-DAI".to_owned()
    }

    fn ensure_complete(&self) -> Result<(), IncompletePayload> {
        integer("quantity", &self.quantity)?;
        integer("price", &self.price)?;
        non_empty("swap.bitcoin_address", &self.swap.bitcoin_address)?;
        non_empty("swap.ethereum_address", &self.swap.ethereum_address)
    }
}
