use serde::Serialize;

pub mod health_check;
pub mod notifications;
pub mod subscriptions;

pub use notifications::NotificationError;
pub use subscriptions::SubscribeError;

/// JSON body shared by every response of the API.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiMessage {
    pub fn new(message: &'static str) -> Self {
        Self {
            message,
            error: None,
        }
    }

    pub fn with_error(message: &'static str, error: impl ToString) -> Self {
        Self {
            message,
            error: Some(error.to_string()),
        }
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
