pub mod cli;
pub mod client;
pub mod config;
pub mod logging;
pub mod player;
pub mod repl;
pub mod scenario;
pub mod step;
pub mod ui;

use miette::Diagnostic;

pub use client::{HttpControlClient, SkipHttpAccess};
pub use player::{Player, Session};
pub use scenario::{Scenario, ScenarioSet};
pub use step::Step;

/// Result type alias for the client binary
pub type Result<T> = miette::Result<T>;

/// Error types for the scenario client
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    #[diagnostic(
        code(client::http_failed),
        help("Check that the Skip service is running and that --control-port / --streaming-port match its configuration.")
    )]
    Http(#[from] reqwest::Error),

    #[error("Malformed payload: {0}")]
    #[diagnostic(
        code(client::malformed_payload),
        help("Payloads are JSON. Example: write [{{\"collection\": \"cells\", \"entries\": [[\"A1\", [\"23\"]]]}}]")
    )]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    #[diagnostic(code(client::stream_error))]
    Stream(String),

    #[error("Unknown command line '{0}'")]
    #[diagnostic(
        code(client::unknown_command),
        help("Type 'help' for available commands.")
    )]
    UnknownCommand(String),

    #[error("Failed to load scenarios: {0}")]
    #[diagnostic(
        code(client::scenario_file),
        help("Scenario files are either a JSON array of step arrays or a TOML file with [[scenarios]] tables.")
    )]
    ScenarioFile(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(client::config_error))]
    Config(String),

    #[error("I/O error: {0}")]
    #[diagnostic(code(client::io_error))]
    Io(#[from] std::io::Error),
}
