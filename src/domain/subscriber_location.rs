/// Free-text place name, passed verbatim to the weather provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberLocation(String);

impl SubscriberLocation {
    pub fn parse(s: String) -> Result<Self, String> {
        if s.is_empty() {
            Err("Subscriber location is empty.".to_string())
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for SubscriberLocation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
