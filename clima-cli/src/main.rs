//! Binary crate for the `clima` command-line dashboard.
//!
//! Parses arguments, sets up logging and prints the views built by
//! `clima-core` as plain text.

use clap::Parser;

mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run().await
}
