// Demo: register a mix of recurring jobs and run the scheduler until ctrl-c.

use anyhow::Result;
use metronome::config::Settings;
use metronome::{telemetry, Scheduler, SystemClock};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;
    telemetry::init_logging(&settings.log_level)?;

    let sched = Scheduler::with_config(settings.scheduler_config(), Arc::new(SystemClock));

    sched
        .every(10)
        .seconds()
        .run(|| async { info!("every ten seconds") })
        .await?;
    sched
        .every(3)
        .minutes()
        .run(|| async { info!("every three minutes") })
        .await?;
    sched
        .every(2)
        .days()
        .at("12:32")
        .run(|| async { info!("every other day at 12:32") })
        .await?;
    sched
        .every_single()
        .saturday()
        .at("8:00")
        .run(|| async { info!("saturdays at 8:00") })
        .await?;

    sched.start();
    info!(jobs = sched.size().await, "scheduler running, press ctrl-c to exit");

    tokio::signal::ctrl_c().await?;
    sched.stop();
    info!("scheduler stopped");
    Ok(())
}
