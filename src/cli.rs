//! CLI argument definitions using clap with subcommand architecture

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DashConfig;
use crate::socket_server::DEFAULT_PORT;

/// Telemetry dashboard broadcaster
#[derive(Parser, Debug)]
#[command(name = "dashcast")]
#[command(about = "Aggregates telemetry into a JSON document and broadcasts it to dashboard clients")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (default: platform config dir)
    #[arg(short, long, global = true, env = "DASHCAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands for dashcast
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a session driven by JSON host events on stdin
    Serve(ServeArgs),

    /// Connect to a session and print each broadcast document
    #[command(visible_alias = "w")]
    Watch(WatchArgs),

    /// Print the effective configuration
    Config,
}

/// Arguments for the serve command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Interface to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Minimum milliseconds between frames (overrides config)
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut DashConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.broadcast.interval_ms = interval_ms;
        }
    }
}

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Host to connect to
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Port to connect to
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Print only this dotted field, e.g. telemetry.truck.speed
    #[arg(short, long)]
    pub field: Option<String>,
}
