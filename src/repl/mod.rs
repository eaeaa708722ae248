/// Interactive console for scenario replay
///
/// This module provides a Read-Eval-Print Loop (REPL) that drives the
/// scenario player and lets an operator issue ad-hoc operations against the
/// service between steps.
pub mod commands;
pub mod executor;
pub mod pattern;
pub mod session;

pub use executor::{OperationExecutor, Origin};
pub use session::ReplSession;

use crate::config::ServiceConfig;
use crate::scenario::ScenarioSet;
use crate::Result;
use std::path::PathBuf;

/// Configuration for starting the REPL
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub service: ServiceConfig,
    pub scenarios: ScenarioSet,
    /// Defaults to `~/.skip_client_history`
    pub history_path: Option<PathBuf>,
}

/// Start the REPL interactive session
pub async fn start_repl(config: ReplConfig) -> Result<()> {
    let mut session = ReplSession::new(config)?;
    session.run().await?;
    Ok(())
}
