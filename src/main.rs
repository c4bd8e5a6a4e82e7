use anyhow::Result;
use clap::Parser;

#[cfg(test)]
mod testutil;

mod categorize;
mod cmd;
mod filespec;
mod html;
mod importers;
mod money;
mod orders;
mod output;
mod rules;
mod transaction;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    cmd::Command::parse().run()
}
