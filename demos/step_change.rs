//! Step change through the baseline detector.
//!
//! A signal at 50 for 500 steps, then 40 for 500 steps, fed one value at a time to the
//! running-mean detector. The baseline never triggers; the point is to see the residual
//! history the simulator collects.
//!
//! Run with:
//!   cargo run --example step_change
//!   RUST_LOG=seqcd=debug cargo run --example step_change

use seqcd::{piecewise_constant, run_and_report, RunningMean, Segment};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), seqcd::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seqcd=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let signal = piecewise_constant(&[Segment::new(50.0, 500), Segment::new(40.0, 500)]);
    let mut detector = RunningMean::new();
    let (result, report) = run_and_report(&signal, &mut detector, true)?;

    println!("{report}");
    for panel in &report.panels {
        let last = panel.values.last().copied().unwrap_or(f64::NAN);
        println!(
            "  {:<22} n={:<5} last={:<10.3} limits={:?}",
            panel.title,
            panel.values.len(),
            last,
            panel.limits
        );
    }
    println!("steps delivered: {}", result.steps());
    Ok(())
}
