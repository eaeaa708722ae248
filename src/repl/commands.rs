/// REPL command parsing and representation
///
/// Console lines are first checked for the console commands (`exit`, `help`,
/// `list`); everything else goes to the scenario player, which in turn
/// forwards lines that are not playback commands to the operation commands
/// parsed here.
use super::pattern::CommandParser;
use crate::step::{Delete, ResourceQuery, Step, Write};
use crate::ClientError;
use std::sync::OnceLock;

/// Represents a console-level command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Exit the console: exit
    Exit,
    /// Show help: help
    Help,
    /// List scenarios: list
    List,
    /// Anything else, handed to the player
    Line(String),
}

impl ReplCommand {
    /// Parse a console line into a ReplCommand
    pub fn parse(input: &str) -> Self {
        match input {
            "exit" => ReplCommand::Exit,
            "help" => ReplCommand::Help,
            "list" => ReplCommand::List,
            _ => ReplCommand::Line(input.to_string()),
        }
    }
}

type Operation = Result<Step, ClientError>;

fn operation_parser() -> &'static CommandParser<Operation> {
    static PARSER: OnceLock<CommandParser<Operation>> = OnceLock::new();
    PARSER.get_or_init(|| {
        CommandParser::new()
            .rule(r"^request (.*)$", |a| {
                Ok(Step::Request(serde_json::from_str::<ResourceQuery>(a[0])?))
            })
            .and_then(|p| {
                p.rule(r"^log (.*)$", |a| {
                    Ok(Step::Log(serde_json::from_str::<ResourceQuery>(a[0])?))
                })
            })
            .and_then(|p| {
                p.rule(r"^write (.*)$", |a| {
                    Ok(Step::Write(serde_json::from_str::<Vec<Write>>(a[0])?))
                })
            })
            .and_then(|p| {
                p.rule(r"^delete (.*)$", |a| {
                    Ok(Step::Delete(serde_json::from_str::<Vec<Delete>>(a[0])?))
                })
            })
            .expect("operation patterns are valid regular expressions")
    })
}

/// Parse the operations on a console line (`request|log|write|delete <json>`).
///
/// Every matching rule yields one operation; an empty result means the line
/// is not an operation command.
pub fn parse_operations(line: &str) -> Vec<Operation> {
    operation_parser().parse(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_console_commands() {
        assert_eq!(ReplCommand::parse("exit"), ReplCommand::Exit);
        assert_eq!(ReplCommand::parse("help"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("list"), ReplCommand::List);
        assert_eq!(
            ReplCommand::parse("exit now"),
            ReplCommand::Line("exit now".into())
        );
        assert_eq!(ReplCommand::parse(""), ReplCommand::Line(String::new()));
    }

    #[test]
    fn test_parse_request_operation() {
        let ops = parse_operations(r#"request {"resource": "computed", "params": {"x": 1}}"#);
        assert_eq!(ops.len(), 1);
        match ops.into_iter().next().unwrap().unwrap() {
            Step::Request(q) => {
                assert_eq!(q.resource, "computed");
                assert_eq!(q.params, Some(json!({"x": 1})));
            }
            other => panic!("Expected Request, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_write_and_delete_operations() {
        let ops = parse_operations(
            r#"write [{"collection": "cells", "entries": [["A1", ["23"]], ["A2", ["2"]]]}]"#,
        );
        assert!(matches!(&ops[0], Ok(Step::Write(w)) if w[0].entries.len() == 2));

        let ops = parse_operations(r#"delete [{"collection": "cells", "keys": ["A1", "A2"]}]"#);
        assert!(matches!(&ops[0], Ok(Step::Delete(d)) if d[0].keys.len() == 2));
    }

    #[test]
    fn test_malformed_payload_is_error_not_panic() {
        let ops = parse_operations("write [{\"collection\": ");
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], Err(ClientError::MalformedPayload(_))));

        let ops = parse_operations("log {}");
        assert!(matches!(ops[0], Err(ClientError::MalformedPayload(_))));
    }

    #[test]
    fn test_unknown_lines_yield_nothing() {
        assert!(parse_operations("subscribe computed").is_empty());
        assert!(parse_operations("write").is_empty());
    }
}
