//! Authentication bodies.

use serde::{Deserialize, Serialize};

use crate::tokens::Credential;

/// The logged-in user's profile, persisted under the `user` store key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl Profile {
    /// Best available name to show for this user.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.nickname.as_deref())
            .or(self.username.as_deref())
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Response from login and signup.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(alias = "accessToken")]
    pub access_token: String,
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: Option<String>,
    #[serde(default, alias = "tokenType")]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<Profile>,
}

/// What login and signup hand back once the credential is stored.
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub credential: Credential,
    pub profile: Option<Profile>,
}

/// Request body for the token refresh endpoint.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Response from the token refresh endpoint.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    #[serde(alias = "accessToken")]
    pub access_token: String,
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: Option<String>,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChangeNicknameRequest<'a> {
    pub nickname: &'a str,
}

#[derive(Debug, Serialize)]
pub struct FindUsernameRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct FindPasswordRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
}
