use serde::{Deserialize, Serialize};

/// Account role as reported by the user service.
///
/// Role strings are matched exactly; anything that is not `guest` or `host`
/// is kept verbatim as `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Guest,
    Host,
    Other(String),
}

impl UserRole {
    pub fn is_host(&self) -> bool {
        matches!(self, UserRole::Host)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            "guest" => UserRole::Guest,
            "host" => UserRole::Host,
            other => UserRole::Other(other.to_string()),
        }
    }
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        UserRole::from(s.as_str())
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Guest => write!(f, "guest"),
            UserRole::Host => write!(f, "host"),
            UserRole::Other(s) => write!(f, "{s}"),
        }
    }
}
