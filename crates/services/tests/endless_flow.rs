use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{
    EndlessSession, SessionError, SolveHistory, Trainer, builtin_catalog, demo_history,
};
use trainer_core::analysis::weakest_topic;
use trainer_core::model::{CombinedHistory, DifficultyRating, LastAction, Topic};
use trainer_core::selector::SelectionReason;
use trainer_core::time::{fixed_clock, fixed_now};

fn demo_trainer(seed: u64) -> Trainer<StdRng> {
    Trainer::new(builtin_catalog().unwrap(), StdRng::seed_from_u64(seed))
        .with_clock(fixed_clock())
        .with_history(SolveHistory::from_records(demo_history()))
}

#[test]
fn demo_history_points_at_number_theory() {
    let trainer = demo_trainer(1);
    assert_eq!(
        trainer.weakest_topic(None),
        Some(Topic::from("Number Theory"))
    );
}

#[test]
fn solves_stay_in_weakest_topic() {
    let mut catalog = builtin_catalog().unwrap();
    let mut history = SolveHistory::from_records(demo_history());
    let mut rng = StdRng::seed_from_u64(3);
    let mut session = EndlessSession::start(&catalog, fixed_now(), &mut rng);

    for round in 0..200 {
        let rating = DifficultyRating::new((round % 10) as u8 + 1).unwrap();
        let before = session.current_index();

        session
            .on_solve(&mut catalog, &mut history, rating, fixed_now())
            .unwrap();
        let weakest = weakest_topic(
            &catalog,
            CombinedHistory::new(history.records(), session.solved()),
        )
        .unwrap();

        let selection = session.advance(&catalog, &history, &mut rng);
        assert_ne!(selection.index, before);
        if let SelectionReason::WeakestTopic(topic) = &selection.reason {
            assert_eq!(topic, &weakest);
            assert_eq!(catalog.get(selection.index).unwrap().topic(), &weakest);
        } else {
            assert_eq!(selection.reason, SelectionReason::Fallback);
        }
    }
    assert_eq!(session.solved().len(), 200);
}

#[test]
fn next_problem_never_repeats_over_a_thousand_steps() {
    let mut trainer = demo_trainer(4);
    let mut session = trainer.start_endless();

    for step in 0..1000 {
        let before = session.current_index();
        let selection = if step % 3 == 0 {
            trainer.skip(&mut session).unwrap()
        } else {
            let rating = DifficultyRating::new((step % 10) as u8 + 1).unwrap();
            trainer.solve(&mut session, rating).unwrap().1
        };
        assert_ne!(selection.index, before, "step {step} repeated a problem");
        assert_eq!(session.current_index(), selection.index);
        assert_eq!(session.last_action(), LastAction::None);
    }

    let difficulties_in_range = trainer
        .catalog()
        .iter()
        .all(|p| (0.0..=10.0).contains(&p.difficulty()));
    assert!(difficulties_in_range);
}

#[test]
fn skip_steps_down_in_difficulty() {
    let mut trainer = demo_trainer(5);
    let mut session = trainer.start_endless();

    for _ in 0..100 {
        let before = trainer
            .catalog()
            .get(session.current_index())
            .unwrap()
            .difficulty();
        let selection = trainer.skip(&mut session).unwrap();
        let after = trainer.catalog().get(selection.index).unwrap().difficulty();
        match selection.reason {
            SelectionReason::EasierStep => assert!(after < before),
            SelectionReason::Fallback => {
                let easiest = trainer
                    .catalog()
                    .iter()
                    .map(|p| p.difficulty())
                    .fold(f64::INFINITY, f64::min);
                assert_eq!(before, easiest);
            }
            other => panic!("unexpected reason {other:?}"),
        }
    }
}

#[test]
fn hints_reveal_in_order_and_reset_on_advance() {
    let mut trainer = demo_trainer(6);
    let mut session = trainer.start_endless();
    let problem = session.current_problem(trainer.catalog()).unwrap().clone();

    let first = session.request_hint(trainer.catalog()).unwrap().to_owned();
    assert_eq!(first, problem.hints()[0]);
    assert!(matches!(
        session.request_hint(trainer.catalog()),
        Err(SessionError::Hint(_))
    ));
    session.finish_hint_reveal();
    session.request_hint(trainer.catalog()).unwrap();
    assert_eq!(session.hints().revealed(), 2);

    trainer.skip(&mut session).unwrap();
    assert_eq!(session.hints().revealed(), 0);
}

#[test]
fn ended_session_summarises_only_its_own_solves() {
    let mut trainer = demo_trainer(7);
    let mut session = trainer.start_endless();
    for _ in 0..4 {
        for _ in 0..60 {
            trainer.tick_endless(&mut session);
        }
        trainer
            .solve(&mut session, DifficultyRating::new(6).unwrap())
            .unwrap();
    }

    let summary = trainer.end_endless(session).unwrap();
    assert_eq!(summary.solved_count(), 4);
    assert_eq!(summary.total_time_secs(), 240);
    assert_eq!(summary.average_rating(), Some(6.0));
    assert_eq!(trainer.history().len(), demo_history().len() + 4);
}
