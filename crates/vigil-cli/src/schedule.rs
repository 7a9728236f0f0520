//! Continuous mode: fire one aggregation cycle per scheduled tick.
//!
//! A [`JobScheduler`] is initialised at startup with a single cron job built
//! from the daily/weekly schedule config. The handle must stay alive for the
//! lifetime of the process; the task parks until interrupted.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio_cron_scheduler::{Job, JobScheduler};

use vigil_core::{AppConfig, Frequency, ScheduleConfig};

/// Six-field cron expression (with seconds) for the configured fire time.
pub(crate) fn cron_expression(schedule: &ScheduleConfig) -> String {
    match schedule.frequency {
        Frequency::Daily => format!("0 {} {} * * *", schedule.minute, schedule.hour),
        Frequency::Weekly => format!(
            "0 {} {} * * {}",
            schedule.minute, schedule.hour, schedule.weekday
        ),
    }
}

/// Run cycles on the configured schedule until the process is interrupted.
///
/// # Errors
///
/// Returns an error if scheduling is disabled in config, the runner cannot
/// be assembled, or the scheduler fails to start. Per-cycle failures are
/// handled inside the cycle runner and never surface here.
pub(crate) async fn watch(config: AppConfig, pool: SqlitePool) -> anyhow::Result<()> {
    if !config.schedule.enabled {
        anyhow::bail!(
            "scheduling is disabled; set VIGIL_SCHEDULE_ENABLED=true or use `vigil run`"
        );
    }

    let expression = cron_expression(&config.schedule);
    let runner = Arc::new(crate::build_runner(config, pool)?);

    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(expression.as_str(), move |_uuid, _lock| {
        let runner = Arc::clone(&runner);
        Box::pin(async move {
            tracing::info!("scheduler: starting aggregation cycle");
            let report = runner.run("scheduler").await;
            tracing::info!(
                succeeded = report.sources_succeeded,
                failed = report.sources_failed,
                new_records = report.records_new,
                forward_ok = report.forward_ok,
                "scheduler: cycle finished"
            );
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(cron = %expression, "watch mode started; waiting for scheduled cycles");

    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupt received; shutting down");

    Ok(())
}
