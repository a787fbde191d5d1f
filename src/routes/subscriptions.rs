use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::Deserialize;

use crate::{
    domain::{Subscriber, SubscriberEmail, SubscriberLocation},
    routes::{ApiMessage, error_chain_fmt},
    subscription_store::SubscriptionStore,
};

/// `null`, absent and empty fields all end up as the same 400.
#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl TryFrom<SubscriptionRequest> for Subscriber {
    type Error = String;

    fn try_from(value: SubscriptionRequest) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(value.email.unwrap_or_default())?;
        let location = SubscriberLocation::parse(value.location.unwrap_or_default())?;
        Ok(Subscriber { email, location })
    }
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to store the subscriber.")]
    StoreError(#[source] sqlx::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            SubscribeError::ValidationError(_) => {
                ApiMessage::new("Email and location are required.")
            }
            SubscribeError::StoreError(e) => ApiMessage::with_error("Failed to subscribe.", e),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(body, store),
    fields(
        subscriber_email = ?body.email,
        subscriber_location = ?body.location
    )
)]
pub async fn subscribe(
    body: web::Json<SubscriptionRequest>,
    store: web::Data<SubscriptionStore>,
) -> Result<HttpResponse, SubscribeError> {
    let subscriber: Subscriber = body
        .into_inner()
        .try_into()
        .map_err(SubscribeError::ValidationError)?;

    store
        .put(&subscriber)
        .await
        .map_err(SubscribeError::StoreError)?;

    Ok(HttpResponse::Ok().json(ApiMessage::new("Subscription successful.")))
}
