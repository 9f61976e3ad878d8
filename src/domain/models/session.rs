use std::fmt;

use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Server-correlated conversation identifier. Opaque to the client, it is
/// handed out by the assistant service on the first successful exchange.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    #[cfg(test)]
    pub fn new(id: &str) -> SessionId {
        return SessionId(id.to_string());
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }

    pub fn is_empty(&self) -> bool {
        return self.0.trim().is_empty();
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}
