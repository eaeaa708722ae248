use crate::config::{Config, ServiceConfig};
use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Debug,
    Trace,
}

impl Verbosity {
    /// Map a numeric level (0-4, as in the config file) to a verbosity.
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Quiet,
            1 => Verbosity::Normal,
            2 => Verbosity::Verbose,
            3 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }

    /// Filter directive for the crate's own log target.
    pub fn to_log_level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "skip-client")]
#[command(about = "Replay scenarios against a Skip reactive service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Host of the Skip service
    #[arg(long, global = true, env = "SKIP_CLIENT_HOST")]
    pub host: Option<String>,

    /// Port of the control API
    #[arg(long, global = true, value_name = "PORT")]
    pub control_port: Option<u16>,

    /// Port of the streaming API
    #[arg(long, global = true, value_name = "PORT")]
    pub streaming_port: Option<u16>,

    /// Scenario file (JSON, or TOML with a .toml extension)
    #[arg(long, global = true, value_name = "FILE")]
    pub scenarios: Option<PathBuf>,

    /// Increase log output (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Effective verbosity: flags first, then the config file.
    pub fn verbosity(&self, config: &Config) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose > 0 {
            Verbosity::from_level(self.verbose.saturating_add(1))
        } else {
            config
                .output
                .verbosity
                .map(Verbosity::from_level)
                .unwrap_or(Verbosity::Normal)
        }
    }

    /// Service endpoints with command-line values taking precedence over the
    /// config file.
    pub fn service_config(&self, config: &Config) -> ServiceConfig {
        ServiceConfig {
            host: self
                .host
                .clone()
                .unwrap_or_else(|| config.service.host.clone()),
            control_port: self.control_port.unwrap_or(config.service.control_port),
            streaming_port: self
                .streaming_port
                .unwrap_or(config.service.streaming_port),
        }
    }

    /// Scenario file to load, if any.
    pub fn scenario_path(&self, config: &Config) -> Option<PathBuf> {
        self.scenarios
            .clone()
            .or_else(|| config.scenarios.path.clone())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive console (the default)
    Repl,

    /// Play one scenario to the end, then exit
    Play(PlayArgs),

    /// List the available scenarios
    List,

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct PlayArgs {
    /// Scenario number, starting at 1
    pub index: i64,

    /// Wait for each step to complete before performing the next
    #[arg(long)]
    pub sequential: bool,

    /// Keep printing subscription events until Ctrl-C
    #[arg(long)]
    pub follow: bool,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
