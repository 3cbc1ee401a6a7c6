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

mod command;

use crate::command::{dial, dump_config, fetch, info, wait_for, Command, Options};
use anyhow::Result;
use cnd_client::{
    config::{read_config, Settings},
    fs::default_config_path,
    trace, Client,
};

#[tokio::main]
async fn main() -> Result<()> {
    let options = Options::from_args();

    let file = read_config(&options.config_file, default_config_path)?;
    let settings = Settings::from_config_file_and_defaults(file, options.url);

    if let Command::DumpConfig = options.cmd {
        return dump_config(settings);
    }

    trace::init_tracing(settings.logging.level)?;

    let client = Client::new(settings.cnd.url.clone());

    match options.cmd {
        Command::Info => info(&client).await,
        Command::Dial { other } => dial(&client, other).await,
        Command::Fetch { path } => fetch(&client, &path).await,
        Command::WaitFor { swap, state } => wait_for(&client, &settings, &swap, &state).await,
        Command::DumpConfig => Ok(()),
    }
}
