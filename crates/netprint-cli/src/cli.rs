//! CLI argument definitions using clap.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use netprint_core::protocol::report::parse_padded_ipv4;

/// Netprint - manage network printer device records
#[derive(Parser, Debug)]
#[command(name = "netprint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Store tool executable (overrides the settings file)
    #[arg(long, global = true, env = "NETPRINT_TOOL")]
    pub tool: Option<PathBuf>,

    /// Node-name prefix used by the store (overrides the settings file)
    #[arg(long, global = true, env = "NETPRINT_NODE_PREFIX")]
    pub node_prefix: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List configured devices
    List,

    /// List supported models
    Models,

    /// Add a device
    Add(AddArgs),

    /// Change an existing device
    Edit(EditArgs),

    /// Remove a device
    Remove(RemoveArgs),

    /// Interactive device form
    Form,

    /// Settings management
    Settings(SettingsArgs),
}

// ==================== Add / Edit ====================

#[derive(Args, Debug)]
#[group(multiple = false)]
pub struct AddressArgs {
    /// IPv4 address (segments may be zero-padded)
    #[arg(long, value_parser = parse_ip)]
    pub ip: Option<Ipv4Addr>,

    /// Node name, without the store prefix
    #[arg(long)]
    pub node: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Device name
    #[arg(long)]
    pub name: String,

    /// Model name (see `netprint models`)
    #[arg(long)]
    pub model: String,

    #[command(flatten)]
    pub address: AddressArgs,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Current device name
    pub target: String,

    /// New device name
    #[arg(long)]
    pub name: Option<String>,

    /// New model name
    #[arg(long)]
    pub model: Option<String>,

    #[command(flatten)]
    pub address: AddressArgs,
}

// ==================== Remove ====================

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Device name
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// ==================== Settings ====================

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommands,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the effective settings
    Show,

    /// Update the settings file
    Set(SettingsSetArgs),
}

#[derive(Args, Debug)]
pub struct SettingsSetArgs {
    /// Store tool executable
    #[arg(long = "tool-path")]
    pub tool_path: Option<PathBuf>,

    /// Node-name prefix
    #[arg(long = "prefix")]
    pub prefix: Option<String>,
}

fn parse_ip(s: &str) -> Result<Ipv4Addr, String> {
    parse_padded_ipv4(s).ok_or_else(|| format!("'{}' is not an IPv4 address", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "netprint", "add", "--name", "Printer1", "--model", "Model-A", "--ip",
            "192.168.001.010",
        ])
        .unwrap();

        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.name, "Printer1");
                assert_eq!(args.address.ip, Some(Ipv4Addr::new(192, 168, 1, 10)));
                assert!(args.address.node.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_ip_and_node_conflict() {
        let result = Cli::try_parse_from([
            "netprint", "edit", "Printer1", "--ip", "10.0.0.1", "--node", "ABC",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_ip_rejected() {
        let result = Cli::try_parse_from(["netprint", "edit", "Printer1", "--ip", "10.0.0"]);
        assert!(result.is_err());
    }
}
