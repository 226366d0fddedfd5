//! Engine -> controller -> channel -> terminal, without a real clock.

use std::sync::Arc;
use std::time::Duration;

use alphabox::playback::{ManualScheduler, PlaybackController, PlaybackState};
use alphabox::sim::{Catalog, RngSource, SimulationEngine};
use alphabox::{PlaybackBus, PlaybackMessage, RunOptions, TerminalPrinter};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn test_replay_prints_every_event() {
    let catalog = Catalog::reference();
    let options = RunOptions {
        words: Some(vec![0]),
        ..RunOptions::default()
    };
    let config = options.to_config(&catalog).unwrap();
    let engine = SimulationEngine::new(catalog);
    let log = engine
        .run(&config, &mut RngSource::new(ChaCha8Rng::seed_from_u64(21)))
        .unwrap();

    let scheduler = Arc::new(ManualScheduler::new());
    let (presenter, receiver) = PlaybackBus::create_pair();
    let controller = PlaybackController::new(scheduler.clone(), presenter);
    let mut printer = TerminalPrinter::new(engine.catalog().words(), Vec::new());

    assert!(controller.play(log.clone(), Duration::from_millis(10)));
    let mut finished = false;
    while !finished {
        for message in receiver.drain() {
            finished |= printer.handle(&message).unwrap();
        }
        if !finished {
            assert!(scheduler.run_next());
        }
    }

    assert_eq!(controller.state(), PlaybackState::Completed);
    assert_eq!(printer.view().summary(), log.summary().unwrap());
    assert!(printer.view().completed);

    let text = String::from_utf8(printer.into_inner()).unwrap();
    let event_lines = text.lines().filter(|l| l.starts_with('[')).count();
    assert_eq!(event_lines, log.len());
    assert!(text.contains("complete:"));
}

#[test]
fn test_zero_interval_queues_whole_replay() {
    let engine = SimulationEngine::reference();
    let config = RunOptions {
        words: Some(vec![0]),
        advanced_probability: Some(0.0),
        ..RunOptions::default()
    }
    .to_config(engine.catalog())
    .unwrap();
    let log = engine
        .run(&config, &mut RngSource::new(ChaCha8Rng::seed_from_u64(5)))
        .unwrap();

    let (presenter, receiver) = PlaybackBus::create_pair();
    let controller = PlaybackController::new(Arc::new(ManualScheduler::new()), presenter);
    controller.play(log.clone(), Duration::ZERO);

    let messages = receiver.drain();
    let applied = messages
        .iter()
        .filter(|m| matches!(m, PlaybackMessage::Applied { .. }))
        .count();
    assert_eq!(applied, log.len());
    assert_eq!(
        messages.last(),
        Some(&PlaybackMessage::StateChanged(PlaybackState::Completed))
    );
}
