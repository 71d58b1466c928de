use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use gruppen_core::{
    ConcurrencyProbe, Executable, Gather, GatherConfig, Policy, TaskError, executable_with,
};
use gruppen_observe::{LoggerConfig, logger_init};

const JOBS: usize = 24;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger
    let cfg = LoggerConfig {
        level: "info,gruppen.gather=debug".to_string(),
        ..Default::default()
    };
    logger_init(&cfg)?;
    info!("logger initialized");

    // 2) Ctrl+C cancels everything still pending
    let ctx = CancellationToken::new();
    let on_signal = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling");
            on_signal.cancel();
        }
    });

    // 3) Happy path: every job succeeds
    let probe = ConcurrencyProbe::new();
    let gather = Gather::new(GatherConfig::new().with_limit(4))?;
    let started = Instant::now();
    let sizes = gather.run(&ctx, jobs(&probe, None)).await?;
    info!(
        jobs = sizes.len(),
        total = sizes.iter().sum::<u64>(),
        peak = probe.peak(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "run-to-completion finished"
    );

    // 4) One early failure, both policies
    for policy in [Policy::RunToCompletion, Policy::FailFast] {
        probe.reset();
        let gather = Gather::new(GatherConfig::new().with_limit(4).with_policy(policy))?;
        match gather.run(&ctx, jobs(&probe, Some(2))).await {
            Ok(_) => warn!(policy = policy.as_str(), "expected a failure"),
            Err(e) => info!(
                policy = policy.as_str(),
                invoked = probe.invocations(),
                error = %e,
                "gather failed as expected"
            ),
        }
    }

    Ok(())
}

/// Simulated downloads: job `i` takes `10 + i` ms and yields `i * 1024` bytes.
fn jobs(probe: &ConcurrencyProbe, fail_at: Option<usize>) -> Vec<Executable<u64>> {
    (0..JOBS)
        .map(|i| {
            let probe = probe.clone();
            executable_with(move |ctx: CancellationToken| async move {
                let _guard = probe.enter();
                if fail_at == Some(i) {
                    return Err(TaskError::fail(format!("job {i}: connection reset")));
                }
                tokio::select! {
                    _ = ctx.cancelled() => Err(TaskError::Canceled),
                    _ = tokio::time::sleep(Duration::from_millis(10 + i as u64)) => Ok(i as u64 * 1024),
                }
            })
        })
        .collect()
}
