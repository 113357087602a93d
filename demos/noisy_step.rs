//! Noisy step change with an explicit seed.
//!
//! Run with:
//!   cargo run --example noisy_step --features stochastic

use seqcd::{
    piecewise_constant, run_and_report, with_gaussian_noise, DetectorExt, ResidualBelow,
    RunningMean, Segment, StopContext, StoppingRule,
};

const SEED: u64 = 111_111;

fn main() -> Result<(), seqcd::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seqcd=info".into()),
        )
        .init();

    let clean = piecewise_constant(&[Segment::new(50.0, 500), Segment::new(40.0, 500)]);
    let signal = with_gaussian_noise(&clean, 2.0, SEED)?;

    // Stops once the running mean has sagged below 48, after a 100-step warm-up so early
    // noise cannot fire it. With a drop of 10 at step 501 this needs about 125 post-change
    // observations.
    let mut sag = ResidualBelow::new(RunningMean::MEAN, 48.0);
    let mut detector = RunningMean::new()
        .with_rule(move |ctx: &StopContext<'_>| ctx.n > 100 && sag.triggered(ctx));
    let (result, report) = run_and_report(&signal, &mut detector, true)?;

    println!("{report}");
    if let Some(at) = result.stop_index() {
        println!("delay after change: {} steps", at.saturating_sub(500));
    }
    Ok(())
}
