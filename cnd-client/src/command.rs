use anyhow::Context;
use cnd_client::{
    config::{File, Settings},
    poll_until, Client,
};
use serde_json::Value;
use std::path::PathBuf;
use structopt::StructOpt;
use url::Url;

#[derive(StructOpt, Debug)]
pub struct Options {
    /// Path to configuration file
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    pub config_file: Option<PathBuf>,

    /// URL of cnd, overrides the configuration file
    #[structopt(short = "u", long = "url")]
    pub url: Option<Url>,

    /// Commands available
    #[structopt(subcommand)]
    pub cmd: Command,
}

impl Options {
    pub fn from_args() -> Self {
        StructOpt::from_args()
    }
}

#[derive(StructOpt, Debug, Clone)]
pub enum Command {
    /// Print peer id and listen addresses of cnd
    Info,
    /// Make cnd connect to the cnd at the given URL
    Dial { other: Url },
    /// Print the JSON document at the given path
    Fetch { path: String },
    /// Wait until the swap at the given URL is in the given state
    WaitFor { swap: Url, state: String },
    /// Dump the current configuration
    DumpConfig,
}

pub fn dump_config(settings: Settings) -> anyhow::Result<()> {
    let file = File::from(settings);
    let serialized = toml::to_string(&file)?;
    println!("{}", serialized);
    Ok(())
}

pub async fn info(client: &Client) -> anyhow::Result<()> {
    let info = client.info().await.context("failed to get info of cnd")?;

    println!("peer id: {}", info.id);
    for address in info.listen_addresses {
        println!("listening on: {}", address);
    }

    Ok(())
}

pub async fn dial(client: &Client, other: Url) -> anyhow::Result<()> {
    client
        .dial(&Client::new(other.clone()))
        .await
        .with_context(|| format!("failed to dial {}", other))?;

    println!("dialed {}", other);

    Ok(())
}

pub async fn fetch(client: &Client, path: &str) -> anyhow::Result<()> {
    let document = client
        .fetch::<Value>(path)
        .await
        .with_context(|| format!("failed to fetch {}", path))?;

    println!("{}", serde_json::to_string_pretty(&document)?);

    Ok(())
}

pub async fn wait_for(
    client: &Client,
    settings: &Settings,
    swap: &Url,
    state: &str,
) -> anyhow::Result<()> {
    let swap = poll_until(client, swap, state, settings.poll).await?;

    println!("swap is in state {}", swap.state);
    for action in swap.actions.iter() {
        println!("available action: {}", action.name);
    }
    for rel in swap.links.keys() {
        println!("link: {}", rel);
    }

    Ok(())
}
