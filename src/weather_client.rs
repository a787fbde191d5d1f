use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::SubscriberLocation;

/// Current conditions for one location, in metric units.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub description: String,
    pub temperature: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Weather provider request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather provider response has no weather conditions")]
    MissingCondition,
}

/// Subset of the OpenWeatherMap current weather payload.
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    weather: Vec<ConditionEntry>,
    main: MainReadings,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

impl TryFrom<CurrentWeatherResponse> for CurrentWeather {
    type Error = WeatherError;

    fn try_from(response: CurrentWeatherResponse) -> Result<Self, Self::Error> {
        let condition = response
            .weather
            .into_iter()
            .next()
            .ok_or(WeatherError::MissingCondition)?;
        Ok(Self {
            description: condition.description,
            temperature: response.main.temp,
        })
    }
}

/// HTTP client for the weather provider.
pub struct WeatherClient {
    http_client: Client,
    base_url: String,
    api_key: SecretString,
}

impl WeatherClient {
    pub fn new(
        base_url: String,
        api_key: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    #[tracing::instrument(
        name = "Fetching current weather",
        skip(self, location),
        fields(location = %location)
    )]
    pub async fn current_weather(
        &self,
        location: &SubscriberLocation,
    ) -> Result<CurrentWeather, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let response: CurrentWeatherResponse = self
            .http_client
            .get(url)
            .query(&[
                ("q", location.as_ref()),
                ("appid", self.api_key.expose_secret()),
                ("units", "metric"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response.try_into()
    }
}
