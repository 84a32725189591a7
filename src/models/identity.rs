use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// An account in the hosted identity store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
    #[serde(default)]
    pub app_metadata: Map<String, Value>,
}

impl Identity {
    /// Case-insensitive email comparison, ignoring surrounding whitespace.
    pub fn has_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|own| own.trim().eq_ignore_ascii_case(email.trim()))
    }

    /// `user_metadata.role`, when set.
    pub fn role(&self) -> Option<&str> {
        self.user_metadata.get("role").and_then(Value::as_str)
    }

    /// Whether the account still carries its generated password.
    pub fn requires_password_change(&self) -> bool {
        self.user_metadata
            .get("requires_password_change")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Payload for creating an identity through the admin API.
#[derive(Clone, Serialize)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub email_confirm: bool,
    pub user_metadata: Map<String, Value>,
}

impl std::fmt::Debug for NewIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewIdentity")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("email_confirm", &self.email_confirm)
            .field("user_metadata", &self.user_metadata)
            .finish()
    }
}
