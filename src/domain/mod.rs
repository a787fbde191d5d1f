mod subscriber;
mod subscriber_email;
mod subscriber_location;

pub use subscriber::Subscriber;
pub use subscriber_email::SubscriberEmail;
pub use subscriber_location::SubscriberLocation;
