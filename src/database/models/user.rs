use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::store::Document;

pub const ROLE_FIELD: &str = "role";
pub const EMAIL_FIELD: &str = "email";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Default,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Default => "default",
            Role::Admin => "admin",
        }
    }

    /// Role of a stored user document; absent or unknown values mean `Default`.
    pub fn of(user: &Document) -> Self {
        match user.get(ROLE_FIELD).and_then(Value::as_str) {
            Some("admin") => Role::Admin,
            _ => Role::Default,
        }
    }
}

pub fn is_admin(user: Option<&Document>) -> bool {
    user.is_some_and(|u| Role::of(u) == Role::Admin)
}

pub fn email_of(document: &Document) -> Option<&str> {
    document.get(EMAIL_FIELD).and_then(Value::as_str)
}

/// `$set` payload that promotes a user.
pub fn admin_role_set() -> Document {
    let mut set = Document::new();
    set.insert(ROLE_FIELD.to_string(), Value::String(Role::Admin.as_str().to_string()));
    set
}
