use std::fmt::{Debug, Display};

use tokio::task::JoinError;
use weather_notifier::{
    configuration::get_configuration,
    notification_scheduler::run_scheduler_until_stopped,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("weather-notifier".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");
    let application = Application::build(&configuration).await?;
    let application_task = tokio::spawn(application.run_until_stopped());

    if !configuration.notifications.enabled {
        tracing::info!("Weather notification scheduler is disabled");
        return report_exit("API", application_task.await);
    }

    let scheduler_task = tokio::spawn(run_scheduler_until_stopped(configuration));
    tokio::select! {
        outcome = application_task => report_exit("API", outcome),
        outcome = scheduler_task => report_exit("Weather notification scheduler", outcome),
    }
}

/// Logs how a task ended. Anything but a clean exit becomes the process error.
fn report_exit(
    task_name: &str,
    outcome: Result<Result<(), impl Debug + Display>, JoinError>,
) -> anyhow::Result<()> {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{} has exited", task_name);
            Ok(())
        }
        Ok(Err(e)) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} failed",
                task_name
            );
            Err(anyhow::anyhow!("{} failed: {}", task_name, e))
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} task failed to complete",
                task_name
            );
            Err(anyhow::Error::new(e).context(format!("{} task failed to complete", task_name)))
        }
    }
}
