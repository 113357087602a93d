//! End-to-end scenarios for the baseline detector and count-gated rules.

use seqcd::{
    piecewise_constant, run, run_iter, Detector, DetectorExt, MinObservations, RunState,
    RunningMean, Segment, Termination,
};

#[test]
fn step_change_with_baseline_never_triggers() {
    let signal = piecewise_constant(&[Segment::new(50.0, 500), Segment::new(40.0, 500)]);
    let mut d = RunningMean::new();
    let r = run(&signal, &mut d).unwrap();

    assert!(!r.triggered());
    assert_eq!(r.history().keys().collect::<Vec<_>>(), vec![RunningMean::MEAN]);

    let mean = r.residual(RunningMean::MEAN).unwrap();
    assert_eq!(mean.len(), 1000);
    assert_eq!(mean[499], 50.0);
    // One step past the change: (500 * 50 + 40) / 501.
    assert!((mean[500] - 25_040.0 / 501.0).abs() < 1e-9);
    assert!((mean[999] - 45.0).abs() < 1e-9, "final mean {}", mean[999]);
    // After the change the running mean only moves down.
    assert!(mean[500..].windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn three_values_give_running_means() {
    let mut d = RunningMean::new();
    let r = run(&[1.0, 2.0, 3.0], &mut d).unwrap();
    assert!(!r.triggered());
    assert_eq!(r.residual(RunningMean::MEAN), Some(&[1.0, 1.5, 2.0][..]));
}

#[test]
fn count_rule_stops_at_three_and_leaves_the_rest_unread() {
    let mut delivered = Vec::new();
    let mut d = RunningMean::new().with_rule(MinObservations(3));
    let r = run_iter(
        [1.0, 2.0, 3.0, 4.0, 5.0].into_iter().inspect(|&x| delivered.push(x)),
        &mut d,
    )
    .unwrap();

    assert!(r.triggered());
    assert_eq!(r.stop_index(), Some(3));
    assert_eq!(r.termination(), Termination::Triggered { at: 3 });
    assert_eq!(r.state(), RunState::StoppedTriggered);
    for (_, series) in r.history().iter() {
        assert_eq!(series.len(), 3);
    }
    assert_eq!(delivered, vec![1.0, 2.0, 3.0]);
    assert_eq!(d.n(), 3);
}

#[test]
fn empty_signal_yields_empty_history() {
    let mut d = RunningMean::new();
    let r = run(&[], &mut d).unwrap();
    assert!(!r.triggered());
    assert!(r.history().is_empty());
    assert_eq!(r.steps(), 0);
    assert_eq!(r.state(), RunState::StoppedExhausted);
    assert_eq!(d.n(), 0);
}

#[test]
fn continuing_a_detector_is_explicit_and_carries_state() {
    // Two runs on the same detector act like one longer signal for the detector, while each
    // result only holds its own steps.
    let mut d = RunningMean::new();
    let first = run(&[2.0, 4.0], &mut d).unwrap();
    let second = run(&[6.0], &mut d).unwrap();
    assert_eq!(first.residual(RunningMean::MEAN), Some(&[2.0, 3.0][..]));
    assert_eq!(second.residual(RunningMean::MEAN), Some(&[4.0][..]));
}

#[cfg(feature = "serde")]
#[test]
fn results_serialize() {
    let mut d = RunningMean::new().with_rule(MinObservations(2));
    let r = run(&[1.0, 3.0, 5.0], &mut d).unwrap();
    let json = serde_json::to_string(&r).unwrap();
    let back: seqcd::SimulationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, r);
}

#[cfg(feature = "serde")]
#[test]
fn misaligned_results_are_rejected_on_load() {
    use seqcd::SimulationResult;

    // Series shorter than the recorded step count.
    let short = r#"{"triggered":true,"history":{"series":{"mean_":[1.0]},"steps":5}}"#;
    assert!(serde_json::from_str::<SimulationResult>(short).is_err());

    // Series of different lengths.
    let ragged = r#"{"triggered":false,"history":{"series":{"a_":[1.0],"b_":[1.0,2.0]},"steps":2}}"#;
    assert!(serde_json::from_str::<SimulationResult>(ragged).is_err());

    // A trigger needs at least one step.
    let empty = r#"{"triggered":true,"history":{"series":{},"steps":0}}"#;
    assert!(serde_json::from_str::<SimulationResult>(empty).is_err());

    let ok = r#"{"triggered":true,"history":{"series":{"mean_":[1.0,2.0]},"steps":2}}"#;
    let r: SimulationResult = serde_json::from_str(ok).unwrap();
    assert_eq!(r.stop_index(), Some(2));
    assert_eq!(r.residual("mean_").unwrap().len(), 2);
}
