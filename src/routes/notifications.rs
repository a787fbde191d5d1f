use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};

use crate::{
    email_client::EmailClient,
    notification_delivery::send_weather_notifications,
    routes::{ApiMessage, error_chain_fmt},
    subscription_store::SubscriptionStore,
    weather_client::WeatherClient,
};

#[derive(thiserror::Error)]
pub enum NotificationError {
    #[error("Failed to fetch subscriptions.")]
    LoadSubscribers(#[source] sqlx::Error),
}

impl std::fmt::Debug for NotificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for NotificationError {
    fn status_code(&self) -> StatusCode {
        match self {
            NotificationError::LoadSubscribers(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            NotificationError::LoadSubscribers(e) => {
                ApiMessage::with_error("Failed to fetch subscriptions.", e)
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Runs one notification batch on demand.
///
/// The response does not say how many subscribers were notified; see the
/// logged delivery report for that.
#[tracing::instrument(
    name = "Triggering weather notifications",
    skip(store, weather_client, email_client)
)]
pub async fn send_notifications(
    store: web::Data<SubscriptionStore>,
    weather_client: web::Data<WeatherClient>,
    email_client: web::Data<EmailClient>,
) -> Result<HttpResponse, NotificationError> {
    send_weather_notifications(&store, &weather_client, &email_client)
        .await
        .map_err(NotificationError::LoadSubscribers)?;
    Ok(HttpResponse::Ok().json(ApiMessage::new("Weather notifications sent.")))
}
