//! Reusing the running-mean update under a hand-written stopping rule.
//!
//! The rule fires when the newest observation sits more than `gap` below the running
//! mean: a crude level-drop alarm, good enough to exercise early stopping.
//!
//! Run with:
//!   cargo run --example custom_rule

use seqcd::{
    piecewise_constant, run_and_report, DetectorExt, MinObservations, RunningMean, Segment,
    StopContext,
};

fn main() -> Result<(), seqcd::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seqcd=info".into()),
        )
        .init();

    let signal = piecewise_constant(&[Segment::new(50.0, 500), Segment::new(40.0, 500)]);

    let gap = 5.0;
    let mut detector = RunningMean::new().with_rule(move |ctx: &StopContext<'_>| {
        ctx.residual(RunningMean::MEAN)
            .is_some_and(|m| ctx.value < m - gap)
    });
    let (_, report) = run_and_report(&signal, &mut detector, true)?;
    println!("level-drop rule:\n{report}\n");

    // A pure count gate: stops after a fixed budget regardless of the data.
    let mut budgeted = RunningMean::new().with_rule(MinObservations(250));
    let (_, report) = run_and_report(&signal, &mut budgeted, false)?;
    println!("budget rule:\n{report}");
    Ok(())
}
