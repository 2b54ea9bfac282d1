use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use netmon_types::PollTier;

#[derive(Debug, Parser)]
#[command(name = "netmon-agent", about = "Vendor-agnostic SNMP monitoring engine")]
pub struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, env = "NETMON_CONFIG", default_value = "config/netmon.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the polling orchestrator until interrupted.
    Run,
    /// Inspect or edit the configured device set.
    Devices {
        #[command(subcommand)]
        command: DevicesCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices configured in the config file.
    List,
    /// Append a new SNMPv2c device to the config file.
    Register {
        #[arg(long)]
        device_id: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "generic")]
        vendor: String,
        #[arg(long, default_value = "public")]
        community: String,
    },
    /// Run a single one-shot poll of one device/tier and print the result.
    PollNow {
        #[arg(long)]
        device_id: u64,
        #[arg(long, value_enum)]
        tier: Tier,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Tier {
    Interfaces,
    Health,
    Inventory,
}

impl From<Tier> for PollTier {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Interfaces => PollTier::Interfaces,
            Tier::Health => PollTier::Health,
            Tier::Inventory => PollTier::Inventory,
        }
    }
}
