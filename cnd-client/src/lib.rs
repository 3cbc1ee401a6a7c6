#![warn(
    unused_extern_crates,
    missing_debug_implementations,
    missing_copy_implementations,
    rust_2018_idioms,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::fallible_impl_from,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,
    clippy::dbg_macro
)]
#![cfg_attr(not(test), warn(clippy::unwrap_used))]
#![forbid(unsafe_code)]

//! Client side of the cnd HTTP API.
//!
//! cnd describes what can be done next with a swap through Siren actions.
//! This crate turns those descriptions into HTTP requests, executes them and
//! watches the swap resource until it reaches the state a caller waits for.

pub mod action;
pub mod actor;
pub mod client;
pub mod config;
mod error;
pub mod fs;
pub mod ledger_action;
pub mod payload;
pub mod poll;
mod problem;
pub mod request;
pub mod resolve;
pub mod swap;
pub mod trace;
pub mod wallet;

pub use self::{
    action::{Action, Chain, Field, FieldHint, FieldKind, Method},
    actor::Actor,
    client::{ActionResponse, Client, PeerInfo},
    error::{Error, Result},
    ledger_action::LedgerAction,
    payload::{IncompletePayload, Payload},
    poll::{poll_until, FetchSwap, PollConfig},
    problem::Problem,
    request::{to_request, ActionRequest, Body, ConversionError},
    resolve::ResolveField,
    swap::{Link, SwapResource},
    wallet::{TransactionId, Wallet, WalletResolver},
};
