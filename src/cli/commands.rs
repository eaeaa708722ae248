use crate::cli::args::{Cli, PlayArgs};
use crate::client::SkipHttpAccess;
use crate::config::ServiceConfig;
use crate::logging;
use crate::player::{ConsoleErrors, Player};
use crate::repl::{start_repl, OperationExecutor, ReplConfig};
use crate::scenario::ScenarioSet;
use crate::ui::formatter::Formatter;
use crate::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;
use std::path::Path;
use std::sync::Arc;

fn print_info(message: impl AsRef<str>) {
    println!("{}", Formatter::info(message));
}

fn print_success(message: impl AsRef<str>) {
    println!("{}", Formatter::success(message));
}

/// Load scenarios from `path`, or the built-in spreadsheet demo without one.
pub fn load_scenarios(path: Option<&Path>) -> Result<ScenarioSet> {
    let Some(path) = path else {
        let set = ScenarioSet::sheet_demo();
        logging::log_scenarios_loaded("built-in", set.len());
        return Ok(set);
    };
    let set = ScenarioSet::load(path)?;
    logging::log_scenarios_loaded(&path.to_string_lossy(), set.len());
    Ok(set)
}

/// Execute the repl command
pub async fn repl(service: ServiceConfig, scenarios: ScenarioSet) -> Result<()> {
    start_repl(ReplConfig {
        service,
        scenarios,
        history_path: None,
    })
    .await
}

/// Execute the play command
pub async fn play(args: PlayArgs, service: &ServiceConfig, scenarios: ScenarioSet) -> Result<()> {
    let Some(scenario) = scenarios.get(args.index).cloned() else {
        return Err(miette::miette!(
            help = "Run `skip-client list` to see the available scenarios",
            "Scenario {} does not exist (available: 1..={})",
            args.index,
            scenarios.len()
        ));
    };

    let executor = OperationExecutor::new(SkipHttpAccess::connect(service)?);
    print_info(format!("Playing {}", scenario));

    if args.sequential {
        for (position, step) in scenario.steps().iter().enumerate() {
            println!(">> {}", Formatter::info(step.to_string()));
            logging::log_step_dispatched(position + 1, step.kind());
            executor.run_scenario_step(step).await;
        }
    } else {
        let mut player = Player::new(
            scenarios,
            Arc::new(executor.clone()),
            Arc::new(ConsoleErrors),
            Arc::new(executor.clone()),
        );
        player.play(Some(args.index));
        executor.wait_idle().await;
    }

    if args.follow && executor.subscriptions() > 0 {
        print_info("Following subscriptions, press Ctrl-C to stop");
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| miette::miette!("Failed to wait for Ctrl-C: {}", e))?;
    }

    executor.shutdown().await;
    print_success("Scenario complete");
    Ok(())
}

/// Execute the list command
pub fn list(scenarios: &ScenarioSet) {
    for (i, scenario) in scenarios.iter().enumerate() {
        println!(" {:>3}  {}", i + 1, scenario);
    }
}

/// Execute the completions command
pub fn completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "skip-client", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_builtin_scenarios() {
        let set = load_scenarios(None).unwrap();
        assert_eq!(set, ScenarioSet::sheet_demo());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(load_scenarios(Some(&dir.path().join("absent.json"))).is_err());
    }

    #[test]
    fn test_load_scenario_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("one.json");
        fs::write(
            &path,
            r#"[[{"type": "log", "payload": {"resource": "computed"}}]]"#,
        )
        .unwrap();
        assert_eq!(load_scenarios(Some(&path)).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_play_rejects_unknown_index() {
        let err = play(
            PlayArgs {
                index: 3,
                sequential: false,
                follow: false,
            },
            &ServiceConfig::default(),
            ScenarioSet::sheet_demo(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Scenario 3 does not exist"));
    }
}
