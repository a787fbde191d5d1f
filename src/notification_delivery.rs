use crate::{
    domain::{Subscriber, SubscriberLocation},
    email_client::EmailClient,
    subscription_store::SubscriptionStore,
    weather_client::{CurrentWeather, WeatherClient, WeatherError},
};

/// The plaintext email sent to one subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherNotification {
    pub subject: String,
    pub text: String,
}

impl WeatherNotification {
    pub fn compose(location: &SubscriberLocation, weather: &CurrentWeather) -> Self {
        let subject = format!("Daily Weather Update for {}", location);
        // -0.0 + 0.0 is 0.0, so a reading of "-0" renders as "0"
        let temperature = weather.temperature + 0.0;
        let text = format!(
            "Good morning!\n\n\
             Today's weather in {}:\n\
             - {}\n\
             - Temperature: {}°C\n\n\
             Have a great day!",
            location, weather.description, temperature
        );
        Self { subject, text }
    }
}

/// Per-run counts. Logged once the batch completes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub weather_failures: usize,
    pub mail_failures: usize,
    pub invalid_records: usize,
}

#[derive(Debug, thiserror::Error)]
enum DeliveryError {
    #[error("Failed to fetch the weather")]
    Weather(#[source] WeatherError),
    #[error("Failed to send the weather notification")]
    Mail(#[source] reqwest::Error),
}

/// Sends the current weather to every subscriber, one after the other.
///
/// Only a failure to load the subscriber list is returned. Weather and mail
/// failures for a subscriber are logged, counted, and the loop moves on.
#[tracing::instrument(name = "Sending weather notifications", skip_all)]
pub async fn send_weather_notifications(
    store: &SubscriptionStore,
    weather_client: &WeatherClient,
    email_client: &EmailClient,
) -> Result<DeliveryReport, sqlx::Error> {
    let subscribers = store.scan().await?;

    let mut report = DeliveryReport::default();
    for subscriber in subscribers {
        let subscriber = match subscriber {
            Ok(subscriber) => subscriber,
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Skipping a subscriber. Their stored record is invalid"
                );
                report.invalid_records += 1;
                continue;
            }
        };

        match notify_subscriber(&subscriber, weather_client, email_client).await {
            Ok(()) => report.delivered += 1,
            Err(e @ DeliveryError::Weather(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    subscriber_location = %subscriber.location,
                    "Failed to fetch the weather for a subscriber. Skipping"
                );
                report.weather_failures += 1;
            }
            Err(e @ DeliveryError::Mail(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    subscriber_email = %subscriber.email,
                    "Failed to deliver a weather notification. Skipping"
                );
                report.mail_failures += 1;
            }
        }
    }

    tracing::info!(
        delivered = report.delivered,
        weather_failures = report.weather_failures,
        mail_failures = report.mail_failures,
        invalid_records = report.invalid_records,
        "Weather notification run completed"
    );
    Ok(report)
}

#[tracing::instrument(
    name = "Notifying a subscriber",
    skip_all,
    fields(
        subscriber_email = %subscriber.email,
        subscriber_location = %subscriber.location
    )
)]
async fn notify_subscriber(
    subscriber: &Subscriber,
    weather_client: &WeatherClient,
    email_client: &EmailClient,
) -> Result<(), DeliveryError> {
    let weather = weather_client
        .current_weather(&subscriber.location)
        .await
        .map_err(DeliveryError::Weather)?;

    let notification = WeatherNotification::compose(&subscriber.location, &weather);
    email_client
        .send_email(&subscriber.email, &notification.subject, &notification.text)
        .await
        .map_err(DeliveryError::Mail)?;

    tracing::info!("Weather notification sent");
    Ok(())
}
