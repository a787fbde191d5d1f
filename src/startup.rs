use std::net::TcpListener;

use actix_web::{App, HttpServer, dev::Server, web};
use anyhow::Context;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tracing_actix_web::TracingLogger;

use crate::{
    configuration::{DatabaseSettings, Settings},
    email_client::EmailClient,
    routes::{
        SubscribeError, health_check::health_check, notifications::send_notifications,
        subscriptions::subscribe,
    },
    subscription_store::SubscriptionStore,
    weather_client::WeatherClient,
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: &Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&config.database);
        sqlx::migrate!("./migrations")
            .run(&connection_pool)
            .await
            .context("Failed to migrate the subscription store")?;

        let email_client = config
            .email_client
            .client()
            .context("Failed to build the email client")?;
        let weather_client = config
            .weather_client
            .client()
            .context("Failed to build the weather client")?;

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let server = run(
            listener,
            SubscriptionStore::new(connection_pool),
            weather_client,
            email_client,
        )?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(database_config: &DatabaseSettings) -> SqlitePool {
    SqlitePoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(database_config.connect_options())
}

pub fn run(
    listener: TcpListener,
    store: SubscriptionStore,
    weather_client: WeatherClient,
    email_client: EmailClient,
) -> Result<Server, std::io::Error> {
    let store = web::Data::new(store);
    let weather_client = web::Data::new(weather_client);
    let email_client = web::Data::new(email_client);
    // malformed bodies get the same 400 as missing fields
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| SubscribeError::ValidationError(err.to_string()).into());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/subscriptions", web::post().to(subscribe))
            .route("/notifications", web::post().to(send_notifications))
            .app_data(json_config.clone())
            .app_data(store.clone())
            .app_data(weather_client.clone())
            .app_data(email_client.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
