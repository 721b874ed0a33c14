use anyhow::Context;
use clap::Parser;

mod app;
mod cli;
mod clipboard;
mod config;
mod dialog;
mod logging;
mod media;
mod mpris;
mod player;
mod resolver;
mod runtime;
mod theme;
mod ui;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init_logging().context("failed to initialize logging")?;
    runtime::run(cli)
}
