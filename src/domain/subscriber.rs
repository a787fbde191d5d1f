use crate::domain::{SubscriberEmail, SubscriberLocation};

/// One notification recipient, keyed by email in the subscription store.
#[derive(Debug)]
pub struct Subscriber {
    pub email: SubscriberEmail,
    pub location: SubscriberLocation,
}

impl Subscriber {
    pub fn parse(email: String, location: String) -> Result<Self, String> {
        let email = SubscriberEmail::parse(email)?;
        let location = SubscriberLocation::parse(location)?;
        Ok(Self { email, location })
    }
}
