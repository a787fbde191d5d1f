pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod notification_delivery;
pub mod notification_scheduler;
pub mod routes;
pub mod startup;
pub mod subscription_store;
pub mod telemetry;
pub mod weather_client;
