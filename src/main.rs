use clap::Parser;
use skip_scenario_client::cli::commands;
use skip_scenario_client::cli::{Cli, Commands, Verbosity};
use skip_scenario_client::config::Config;
use skip_scenario_client::logging;
use skip_scenario_client::ui::formatter::Formatter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing(verbosity: Verbosity) {
    let log_level = verbosity.to_log_level();
    let fallback_filter = logging::default_filter(log_level);

    let use_json = std::env::var("SKIP_CLIENT_JSON").is_ok();

    if use_json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| fallback_filter.clone().into()),
            )
            .with(json_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| fallback_filter.into()),
            )
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    Formatter::configure_colors_from_env();

    let cli = Cli::parse();

    // Logging depends on the configured verbosity, so a broken config file
    // is only reported once the subscriber is installed.
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    initialize_tracing(cli.verbosity(&config));
    if let Some(e) = config_error {
        logging::log_config_fallback(&e);
    }
    tracing::debug!(
        git = env!("GIT_HASH"),
        rustc = env!("RUSTC_VERSION"),
        "skip-client {}",
        env!("CARGO_PKG_VERSION")
    );

    let service = cli.service_config(&config);
    let scenario_path = cli.scenario_path(&config);

    let result = match cli.command {
        Some(Commands::Completions(args)) => {
            commands::completions(args.shell);
            Ok(())
        }
        Some(Commands::List) => {
            commands::load_scenarios(scenario_path.as_deref()).map(|set| commands::list(&set))
        }
        Some(Commands::Play(args)) => match commands::load_scenarios(scenario_path.as_deref()) {
            Ok(set) => commands::play(args, &service, set).await,
            Err(e) => Err(e),
        },
        Some(Commands::Repl) | None => match commands::load_scenarios(scenario_path.as_deref()) {
            Ok(set) => commands::repl(service, set).await,
            Err(e) => Err(e),
        },
    };

    if let Err(err) = &result {
        tracing::debug!(error = %err, "Command failed");
    }
    result
}
