use proptest::prelude::*;
use skip_scenario_client::player::PlaybackError;
use skip_scenario_client::Session;
use std::sync::Arc;

use crate::utils::{resources, scenario, Errors, Recorder};

fn session(n: usize) -> (Session, Arc<Recorder>, Arc<Errors>) {
    let sink = Arc::new(Recorder::default());
    let errors = Arc::new(Errors::default());
    let session = Session::new(scenario(1, n), sink.clone(), errors.clone());
    (session, sink, errors)
}

proptest! {
    #[test]
    fn test_reset_then_drain_replays_declared_order(n in 0usize..10, advanced in 0usize..12) {
        let (mut session, sink, _errors) = session(n);
        for _ in 0..advanced {
            session.next();
        }
        session.reset();
        sink.clear();

        session.play();
        prop_assert_eq!(sink.resources(), resources(1, n));
        prop_assert_eq!(session.current(), n);
    }

    #[test]
    fn test_current_never_exceeds_length(n in 0usize..10, calls in 0usize..20) {
        let (mut session, sink, errors) = session(n);
        for _ in 0..calls {
            let before = session.current();
            let more = session.next();
            prop_assert!(session.current() <= n);
            if before == n {
                prop_assert_eq!(session.current(), before);
                prop_assert!(!more);
            } else {
                prop_assert_eq!(session.current(), before + 1);
                prop_assert_eq!(more, session.current() < n);
            }
        }
        prop_assert_eq!(sink.count(), calls.min(n));
        let exhausted = errors.take();
        prop_assert_eq!(exhausted.len(), calls.saturating_sub(n));
        prop_assert!(exhausted.iter().all(|e| *e == PlaybackError::ScenarioExhausted));
    }

    #[test]
    fn test_play_from_any_position_finishes(n in 0usize..10, advanced in 0usize..10) {
        let (mut session, sink, _errors) = session(n);
        for _ in 0..advanced.min(n) {
            session.next();
        }
        session.play();
        prop_assert!(session.is_completed());
        prop_assert!(!session.is_on());
        prop_assert_eq!(sink.resources(), resources(1, n));
    }
}
