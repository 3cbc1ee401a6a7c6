//! A stand-in for cnd serving just enough of its HTTP API to drive a swap
//! from `Start` to `Accepted` and fetch the funding action.

#![allow(dead_code)]

use async_trait::async_trait;
use cnd_client::{Chain, Client, PollConfig, TransactionId, Wallet};
use http_api_problem::{HttpApiProblem, PROBLEM_JSON_MEDIA_TYPE};
use serde_json::{json, Value};
use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
    time::Duration,
};
use url::Url;
use warp::{
    http::{header, StatusCode},
    hyper::body::Bytes,
    reply::Response,
    Filter, Reply,
};

pub const SWAP_ID: &str = "123";
pub const ORDER_ID: &str = "bd1c3a4f-9d57-4c0f-8b36-1d8b9b3e1f7a";
pub const REFUND_IDENTITY: &str = "0x00a329c0648769a73afac7f9381e08fb43dbea72";

#[derive(Debug, Default)]
pub struct Recorded {
    pub swap_state: Option<String>,
    pub created: Vec<(String, Value)>,
    pub accepted_with: Option<Value>,
    pub dialed: Vec<Vec<String>>,
}

#[derive(Debug)]
struct Node {
    peer_id: String,
    listen_address: Option<String>,
    recorded: Mutex<Recorded>,
}

#[derive(Debug, Clone)]
pub struct FakeCnd {
    pub url: Url,
    node: Arc<Node>,
}

impl FakeCnd {
    /// Serve on an ephemeral port of localhost for the rest of the test.
    pub fn start(peer_id: &str, listen_address: &str) -> Self {
        Self::serve(peer_id, Some(listen_address.to_owned()))
    }

    /// A cnd whose info document carries its id but no listen addresses.
    pub fn start_without_listen_addresses(peer_id: &str) -> Self {
        Self::serve(peer_id, None)
    }

    fn serve(peer_id: &str, listen_address: Option<String>) -> Self {
        let node = Arc::new(Node {
            peer_id: peer_id.to_owned(),
            listen_address,
            recorded: Mutex::new(Recorded::default()),
        });

        let (addr, server) =
            warp::serve(routes(node.clone())).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        let url = format!("http://{}/", addr).parse().unwrap();

        Self { url, node }
    }

    pub fn client(&self) -> Client {
        Client::new(self.url.clone())
    }

    pub fn set_swap_state(&self, state: &str) {
        self.node.recorded.lock().unwrap().swap_state = Some(state.to_owned());
    }

    pub fn created(&self) -> Vec<(String, Value)> {
        self.node.recorded.lock().unwrap().created.clone()
    }

    pub fn accepted_with(&self) -> Option<Value> {
        self.node.recorded.lock().unwrap().accepted_with.clone()
    }

    pub fn dialed(&self) -> Vec<Vec<String>> {
        self.node.recorded.lock().unwrap().dialed.clone()
    }
}

pub fn fast_polling() -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(20),
        timeout: Duration::from_secs(2),
    }
}

fn with_node(node: Arc<Node>) -> impl Filter<Extract = (Arc<Node>,), Error = Infallible> + Clone {
    warp::any().map(move || node.clone())
}

fn routes(
    node: Arc<Node>,
) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
    let info = warp::get()
        .and(warp::path::end())
        .and(with_node(node.clone()))
        .map(info);
    let dial = warp::post()
        .and(warp::path!("dial"))
        .and(with_node(node.clone()))
        .and(warp::body::json())
        .map(dial);
    let accept = warp::post()
        .and(warp::path!("swaps" / String / "accept"))
        .and(with_node(node.clone()))
        .and(warp::body::bytes())
        .map(accept);
    let create_swap = warp::post()
        .and(warp::path!("swaps" / String / String))
        .and(with_node(node.clone()))
        .and(warp::body::bytes())
        .map(create_swap);
    let create_rfc003_swap = warp::post()
        .and(warp::path!("swaps" / "rfc003"))
        .map(create_rfc003_swap);
    let create_order = warp::post()
        .and(warp::path!("orders" / "BTC-DAI"))
        .map(create_order);
    let get_swap = warp::get()
        .and(warp::path!("swaps" / String))
        .and(with_node(node.clone()))
        .map(get_swap);
    let fund_action = warp::get()
        .and(warp::path!("swaps" / String / "fund" / "action"))
        .map(fund_action);
    let fund = warp::get()
        .and(warp::path!("swaps" / String / "fund"))
        .and(with_node(node))
        .map(fund);

    info.or(dial)
        .unify()
        .or(accept)
        .unify()
        .or(create_swap)
        .unify()
        .or(create_rfc003_swap)
        .unify()
        .or(create_order)
        .unify()
        .or(get_swap)
        .unify()
        .or(fund_action)
        .unify()
        .or(fund)
        .unify()
}

fn problem(problem: HttpApiProblem) -> Response {
    let code = problem.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let reply = warp::reply::json(&problem);
    let reply = warp::reply::with_status(reply, code);
    let reply = warp::reply::with_header(reply, header::CONTENT_TYPE, PROBLEM_JSON_MEDIA_TYPE);

    reply.into_response()
}

fn swap_not_found() -> Response {
    problem(HttpApiProblem::new("Swap not found.").set_status(StatusCode::NOT_FOUND))
}

fn created(location: String) -> Response {
    let reply = warp::reply::with_status(warp::reply(), StatusCode::CREATED);

    warp::reply::with_header(reply, header::LOCATION, location).into_response()
}

fn info(node: Arc<Node>) -> Response {
    let document = match &node.listen_address {
        Some(listen_address) => json!({
            "id": node.peer_id,
            "listen_addresses": [listen_address]
        }),
        None => json!({ "id": node.peer_id }),
    };

    warp::reply::json(&document).into_response()
}

fn dial(node: Arc<Node>, body: Value) -> Response {
    let addresses = body["addresses"]
        .as_array()
        .map(|addresses| {
            addresses
                .iter()
                .filter_map(|address| address.as_str().map(ToOwned::to_owned))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    node.recorded.lock().unwrap().dialed.push(addresses);

    warp::reply().into_response()
}

fn create_swap(alpha: String, beta: String, node: Arc<Node>, body: Bytes) -> Response {
    if alpha == "halbit" || beta == "halbit" {
        return problem(
            HttpApiProblem::new("lightning is not configured.")
                .set_status(StatusCode::BAD_REQUEST)
                .set_detail(
                    "lightning ledger is not properly configured, \
                     swap involving this ledger are not available.",
                ),
        );
    }

    let body = match serde_json::from_slice::<Value>(&body) {
        Ok(body) if body.is_object() => body,
        _ => {
            return problem(
                HttpApiProblem::new("Invalid body.").set_status(StatusCode::BAD_REQUEST),
            )
        }
    };

    let mut recorded = node.recorded.lock().unwrap();
    recorded.created.push((format!("{}/{}", alpha, beta), body));
    recorded.swap_state = Some("Start".to_owned());

    created(format!("/swaps/{}", SWAP_ID))
}

/// Answers with a location but without `201 Created`.
fn create_rfc003_swap() -> Response {
    let reply = warp::reply::with_status(warp::reply(), StatusCode::OK);

    warp::reply::with_header(reply, header::LOCATION, format!("/swaps/{}", SWAP_ID))
        .into_response()
}

fn create_order() -> Response {
    created(format!("/orders/{}", ORDER_ID))
}

fn get_swap(id: String, node: Arc<Node>) -> Response {
    let state = match node.recorded.lock().unwrap().swap_state.clone() {
        Some(state) if id == SWAP_ID => state,
        _ => return swap_not_found(),
    };

    let document = match state.as_str() {
        "Start" => json!({
            "class": ["swap"],
            "properties": {
                "id": SWAP_ID,
                "state": "Start",
                "role": "Bob",
                "protocol": "rfc003"
            },
            "actions": [
                {
                    "name": "accept",
                    "class": [],
                    "method": "POST",
                    "href": format!("/swaps/{}/accept", SWAP_ID),
                    "title": "Accept the swap",
                    "type": "application/json",
                    "fields": [
                        {
                            "name": "beta_ledger_refund_identity",
                            "class": ["ethereum", "address"],
                            "type": "text"
                        },
                        {
                            "name": "beta_ledger_lock_duration",
                            "class": [],
                            "type": "number",
                            "value": 43200
                        }
                    ]
                },
                {
                    "name": "decline",
                    "method": "POST",
                    "href": format!("/swaps/{}/decline", SWAP_ID),
                    "fields": []
                }
            ],
            "links": [
                { "rel": ["self"], "href": format!("/swaps/{}", SWAP_ID) }
            ]
        }),
        "Accepted" => json!({
            "state": "Accepted",
            "_links": {
                "self": { "href": format!("/swaps/{}", SWAP_ID) },
                "fund": { "href": format!("/swaps/{}/fund/action", SWAP_ID) }
            }
        }),
        other => json!({
            "state": other,
            "_links": {
                "self": { "href": format!("/swaps/{}", SWAP_ID) }
            }
        }),
    };

    warp::reply::json(&document).into_response()
}

fn accept(id: String, node: Arc<Node>, body: Bytes) -> Response {
    let mut recorded = node.recorded.lock().unwrap();
    if id != SWAP_ID || recorded.swap_state.is_none() {
        return swap_not_found();
    }

    let body = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
    match body["beta_ledger_refund_identity"].as_str() {
        Some(identity) if !identity.is_empty() => {}
        _ => {
            return problem(
                HttpApiProblem::new("Invalid body.")
                    .set_status(StatusCode::BAD_REQUEST)
                    .set_detail("beta_ledger_refund_identity is required"),
            )
        }
    }

    recorded.accepted_with = Some(body);
    recorded.swap_state = Some("Accepted".to_owned());

    warp::reply().into_response()
}

fn fund_action(id: String) -> Response {
    warp::reply::json(&json!({
        "name": "fund",
        "method": "GET",
        "href": format!("/swaps/{}/fund", id),
        "fields": []
    }))
    .into_response()
}

fn fund(id: String, node: Arc<Node>) -> Response {
    if id != SWAP_ID || node.recorded.lock().unwrap().swap_state.is_none() {
        return swap_not_found();
    }

    warp::reply::json(&json!({
        "type": "ethereum-deploy-contract",
        "payload": {
            "data": "0x6020",
            "amount": "0",
            "gas_limit": "0x2dc6c0",
            "chain_id": 1337
        }
    }))
    .into_response()
}

pub const BITCOIN_ADDRESS: &str = "bcrt1qs2aderg3whgu0m8uadn6dwxjf7j3wx97kk2qqt";

/// A wallet with fixed addresses that records what it is asked to publish.
#[derive(Debug, Default)]
pub struct StaticWallet {
    published: Mutex<Vec<String>>,
}

impl StaticWallet {
    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }

    fn publish(&self, transaction: String) -> TransactionId {
        let mut published = self.published.lock().unwrap();
        published.push(transaction);

        TransactionId(format!("0x{:064x}", published.len()))
    }
}

#[async_trait]
impl Wallet for StaticWallet {
    fn supports(&self, chain: Chain) -> bool {
        chain != Chain::Lightning
    }

    async fn address(&self, chain: Chain) -> anyhow::Result<String> {
        match chain {
            Chain::Bitcoin => Ok(BITCOIN_ADDRESS.to_owned()),
            Chain::Ethereum => Ok(REFUND_IDENTITY.to_owned()),
            Chain::Lightning => anyhow::bail!("no lightning wallet"),
        }
    }

    async fn fund(&self, _: Chain, _: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn send_to_address(&self, address: &str, amount: &str) -> anyhow::Result<TransactionId> {
        Ok(self.publish(format!("send {} to {}", amount, address)))
    }

    async fn broadcast_transaction(&self, hex: &str) -> anyhow::Result<TransactionId> {
        Ok(self.publish(format!("broadcast {}", hex)))
    }

    async fn deploy_contract(
        &self,
        data: &str,
        amount: &str,
        gas_limit: &str,
    ) -> anyhow::Result<TransactionId> {
        Ok(self.publish(format!("deploy {} with {} gas {}", data, amount, gas_limit)))
    }

    async fn call_contract(
        &self,
        contract_address: &str,
        _: Option<&str>,
        gas_limit: &str,
    ) -> anyhow::Result<TransactionId> {
        Ok(self.publish(format!("call {} gas {}", contract_address, gas_limit)))
    }
}
