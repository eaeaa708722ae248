use proptest::prelude::*;
use skip_scenario_client::player::PlaybackError;
use skip_scenario_client::Player;
use std::sync::Arc;

use crate::utils::{resources, scenario_set, scenario_sizes, Errors, Lines, Recorder};

struct Harness {
    player: Player,
    sink: Arc<Recorder>,
    errors: Arc<Errors>,
    lines: Arc<Lines>,
}

fn harness(sizes: &[usize]) -> Harness {
    let sink = Arc::new(Recorder::default());
    let errors = Arc::new(Errors::default());
    let lines = Arc::new(Lines::default());
    let player = Player::new(
        scenario_set(sizes),
        sink.clone(),
        errors.clone(),
        lines.clone(),
    );
    Harness {
        player,
        sink,
        errors,
        lines,
    }
}

proptest! {
    #[test]
    fn test_out_of_range_start_keeps_session(
        sizes in scenario_sizes(),
        advanced in 0usize..4,
        bad in prop_oneof![-100i64..=0, 6i64..100],
    ) {
        let mut h = harness(&sizes);
        prop_assert!(h.player.start(1));
        for _ in 0..advanced.min(sizes[0]) {
            h.player.step(None);
        }
        let before = h.player.session().unwrap().current();

        prop_assert!(!h.player.start(bad));
        let session = h.player.session().unwrap();
        prop_assert_eq!(session.current(), before);
        prop_assert!(session.scenario().ptr_eq(h.player.scenarios().get(1).unwrap()));
        prop_assert_eq!(
            h.errors.take(),
            vec![PlaybackError::ScenarioIndexOutOfRange { index: bad, count: sizes.len() }]
        );
        prop_assert_eq!(h.sink.releases(), 0);
    }

    #[test]
    fn test_step_performs_zero_or_one(sizes in scenario_sizes(), count in -5i64..10) {
        let mut h = harness(&sizes);
        h.player.start(1);
        h.player.step(Some(count));
        let expected = if count >= 1 { sizes[0].min(1) } else { 0 };
        prop_assert_eq!(h.sink.count(), expected);
    }

    #[test]
    fn test_play_drains_selected_scenario(sizes in scenario_sizes(), pick in 1usize..5) {
        let mut h = harness(&sizes);
        let pick = pick.min(sizes.len());
        h.player.online(&format!("play {}", pick));
        prop_assert_eq!(h.sink.resources(), resources(pick, sizes[pick - 1]));
        prop_assert!(h.player.session().unwrap().is_completed());
        prop_assert!(h.lines.lines().is_empty());
    }

    #[test]
    fn test_non_playback_lines_are_forwarded(word in "[a-z]{1,8}", arg in "[a-z0-9 ]{0,8}") {
        let line = format!("{} {}", word, arg).trim_end().to_string();
        let mut h = harness(&[2]);
        h.player.online(&line);
        let playback = matches!(
            line.as_str(),
            "reset" | "step" | "play" | "stop"
        ) || ["start ", "step ", "play "]
            .iter()
            .any(|p| line.strip_prefix(p).is_some_and(|rest| {
                !rest.is_empty() && rest.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            }));
        if playback {
            prop_assert!(h.lines.lines().is_empty());
        } else {
            prop_assert_eq!(h.lines.lines(), vec![line]);
        }
    }

    #[test]
    fn test_list_marks_running_scenario(sizes in scenario_sizes(), pick in 1usize..5) {
        let mut h = harness(&sizes);
        prop_assert!(h.player.list().iter().all(|l| !l.starts_with('*')));

        let pick = pick.min(sizes.len());
        h.player.start(pick as i64);
        let listing = h.player.list();
        prop_assert_eq!(listing.len(), sizes.len());
        let marked: Vec<usize> = listing
            .iter()
            .enumerate()
            .filter(|(_, l)| l.starts_with('*'))
            .map(|(i, _)| i + 1)
            .collect();
        prop_assert_eq!(marked, vec![pick]);
    }
}
