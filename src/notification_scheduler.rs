use std::time::Duration;

use anyhow::Context;
use tokio::time::{Instant, interval_at};

use crate::{
    configuration::Settings, email_client::EmailClient,
    notification_delivery::send_weather_notifications, startup::get_connection_pool,
    subscription_store::SubscriptionStore, weather_client::WeatherClient,
};

async fn scheduler_loop(
    store: SubscriptionStore,
    weather_client: WeatherClient,
    email_client: EmailClient,
    period: Duration,
) -> Result<(), anyhow::Error> {
    // first run one full period after start-up
    let mut interval = interval_at(Instant::now() + period, period);
    loop {
        interval.tick().await;
        if let Err(e) = send_weather_notifications(&store, &weather_client, &email_client).await {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Scheduled weather notification run failed to fetch subscriptions"
            );
        }
    }
}

pub async fn run_scheduler_until_stopped(configuration: Settings) -> Result<(), anyhow::Error> {
    let period = configuration.notifications.interval();
    anyhow::ensure!(
        !period.is_zero(),
        "notifications.interval_seconds must be greater than zero"
    );

    let store = SubscriptionStore::new(get_connection_pool(&configuration.database));
    let weather_client = configuration
        .weather_client
        .client()
        .context("Failed to build the weather client")?;
    let email_client = configuration
        .email_client
        .client()
        .context("Failed to build the email client")?;

    tracing::info!(
        interval_seconds = configuration.notifications.interval_seconds,
        "Starting the weather notification scheduler"
    );
    scheduler_loop(store, weather_client, email_client, period).await
}
