//! Login and signup inputs.

use std::fmt;

use serde::Serialize;

/// Login credentials for the medsafe backend.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use medsafe_core::LoginCredentials;
///
/// let creds = LoginCredentials::new("alice", "hunter2");
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    username: String,
    password: String,
}

impl LoginCredentials {
    /// Create new credentials.
    ///
    /// # Arguments
    ///
    /// * `username` - The account username or email
    /// * `password` - The account password
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Account creation data.
#[derive(Clone, Serialize)]
pub struct SignupData {
    pub username: String,
    pub email: String,
    password: String,
    /// Display name, sent as both `name` and `nickname`.
    pub name: String,
    #[serde(rename = "nickname")]
    nickname: String,
}

impl SignupData {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            nickname: name.clone(),
            name,
        }
    }
}

impl fmt::Debug for SignupData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupData")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hide_password_in_debug() {
        let creds = LoginCredentials::new("alice", "secret123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn credentials_serialize_for_login_body() {
        let creds = LoginCredentials::new("alice", "secret123");
        let body = serde_json::to_value(&creds).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"username": "alice", "password": "secret123"})
        );
    }

    #[test]
    fn signup_sends_name_and_nickname() {
        let data = SignupData::new("bob", "bob@example.com", "pw", "Bob");
        let body = serde_json::to_value(&data).unwrap();
        assert_eq!(body["name"], "Bob");
        assert_eq!(body["nickname"], "Bob");
        assert_eq!(body["email"], "bob@example.com");
        assert!(!format!("{:?}", data).contains("\"pw\""));
    }
}
