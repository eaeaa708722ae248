/// REPL session management with history
///
/// Line editing blocks, so the editor lives on the blocking pool and hands
/// each line over a channel. Network effects dispatched by earlier lines keep
/// running on the runtime while the prompt waits.
use super::commands::ReplCommand;
use super::executor::OperationExecutor;
use super::ReplConfig;
use crate::client::SkipHttpAccess;
use crate::player::{ConsoleErrors, Player};
use crate::ui::formatter::Formatter;
use crate::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::sync::{mpsc as std_mpsc, Arc};
use tokio::sync::mpsc;

const PROMPT: &str = "> ";

/// What the line editor produced
#[derive(Debug)]
enum Input {
    Line(String),
    Interrupted,
    Eof,
    Failed(String),
}

/// REPL session state
pub struct ReplSession {
    player: Player,
    executor: OperationExecutor,
    history_path: PathBuf,
}

impl ReplSession {
    /// Create a new REPL session
    pub fn new(config: ReplConfig) -> Result<Self> {
        let history_path = config.history_path.unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(".skip_client_history")
        });

        let executor = OperationExecutor::new(SkipHttpAccess::connect(&config.service)?);
        let player = Player::new(
            config.scenarios,
            Arc::new(executor.clone()),
            Arc::new(ConsoleErrors),
            Arc::new(executor.clone()),
        );

        Ok(ReplSession {
            player,
            executor,
            history_path,
        })
    }

    /// Run the REPL event loop until `exit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        let (lines_tx, mut lines) = mpsc::unbounded_channel();
        let (ready, ready_rx) = std_mpsc::channel();
        let history_path = self.history_path.clone();
        tokio::task::spawn_blocking(move || read_lines(history_path, ready_rx, lines_tx));

        self.print_welcome();

        loop {
            if ready.send(()).is_err() {
                break;
            }
            let Some(input) = lines.recv().await else {
                break;
            };

            match input {
                Input::Line(line) => {
                    if self.execute_line(&line) {
                        break;
                    }
                }
                Input::Interrupted => {
                    println!("{}", Formatter::info("Use 'exit' or Ctrl+D to quit"));
                }
                Input::Eof => break,
                Input::Failed(e) => {
                    tracing::error!("{}", Formatter::error(format!("Error: {}", e)));
                    break;
                }
            }
        }

        // Dropping `ready` lets the editor thread finish.
        drop(ready);
        self.executor.shutdown().await;
        println!("{}", Formatter::success("Goodbye!"));
        Ok(())
    }

    /// Handle one console line. Returns true when exit was requested.
    fn execute_line(&mut self, line: &str) -> bool {
        match ReplCommand::parse(line) {
            ReplCommand::Exit => return true,
            ReplCommand::Help => println!("{}", Formatter::format_help()),
            ReplCommand::List => self.print_scenarios(),
            ReplCommand::Line(line) => self.player.online(&line),
        }
        false
    }

    fn print_welcome(&self) {
        crate::logging::log_repl_started(self.player.scenarios().len());
        println!("{}", Formatter::success("Skip scenario console"));
        self.print_scenarios();
        println!("{}", Formatter::info("Type 'help' for available commands"));
    }

    fn print_scenarios(&self) {
        if self.player.scenarios().is_empty() {
            println!("{}", Formatter::warning("No scenarios loaded"));
            return;
        }
        for line in self.player.list() {
            println!("{}", line);
        }
    }
}

/// Editor loop. Reads one line per `ready` signal and stops once the
/// session drops its end of either channel.
fn read_lines(
    history_path: PathBuf,
    ready: std_mpsc::Receiver<()>,
    lines: mpsc::UnboundedSender<Input>,
) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            let _ = lines.send(Input::Failed(format!("Failed to initialize REPL editor: {}", e)));
            return;
        }
    };
    let _ = editor.load_history(&history_path);
    while ready.recv().is_ok() {
        let input = match editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                    let _ = editor.save_history(&history_path);
                }
                Input::Line(line)
            }
            Err(ReadlineError::Interrupted) => Input::Interrupted,
            Err(ReadlineError::Eof) => Input::Eof,
            Err(e) => Input::Failed(e.to_string()),
        };
        if lines.send(input).is_err() {
            break;
        }
    }
}
