use serde::{Deserialize, Serialize};
use std::fmt;

/// The user participation state is evaluated for.
/// Has no `Default`; callers pass the session user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewerId(String);

impl ViewerId {
    pub fn new(id: impl Into<String>) -> Self {
        ViewerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewerId {
    fn from(value: &str) -> Self {
        ViewerId::new(value)
    }
}

impl From<String> for ViewerId {
    fn from(value: String) -> Self {
        ViewerId(value)
    }
}
