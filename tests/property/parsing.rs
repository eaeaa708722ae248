use proptest::prelude::*;
use skip_scenario_client::player::{parse_playback, PlaybackCommand, PlaybackError};
use skip_scenario_client::repl::commands::parse_operations;
use skip_scenario_client::repl::pattern::parse_leading_int;

proptest! {
    #[test]
    fn test_leading_int_matches_integer_parse(n in any::<i32>()) {
        prop_assert_eq!(parse_leading_int(&n.to_string()), Some(n as i64));
    }

    #[test]
    fn test_leading_int_ignores_trailing_text(n in 0u32..100_000, tail in "[a-z_]{0,6}") {
        prop_assert_eq!(parse_leading_int(&format!("{}{}", n, tail)), Some(n as i64));
    }

    #[test]
    fn test_leading_int_rejects_non_numeric(s in "[a-z_][a-z_0-9]{0,6}") {
        prop_assert_eq!(parse_leading_int(&s), None);
    }

    #[test]
    fn test_start_argument(arg in "[a-z_0-9]{1,8}") {
        let parsed = parse_playback(&format!("start {}", arg));
        match parse_leading_int(&arg) {
            Some(n) => prop_assert_eq!(parsed, Some(Ok(PlaybackCommand::Start(n)))),
            None => prop_assert_eq!(parsed, Some(Err(PlaybackError::InvalidIndex(arg)))),
        }
    }

    #[test]
    fn test_operation_lines_never_panic(kind in "(request|log|write|delete)", payload in "\\PC*") {
        let ops = parse_operations(&format!("{} {}", kind, payload));
        prop_assert_eq!(ops.len(), 1);
    }
}
