//! Binary crate for the weather Telegram bot.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Logging setup
//! - Routing Telegram updates to the handlers in `weather-core`

use clap::Parser;

mod bot;
mod cli;
mod handlers;
mod logging;
mod telegram;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
