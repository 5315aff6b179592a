//! Account maintenance beyond login and logout.

use tracing::instrument;

use medsafe_core::models::{
    ChangeNicknameRequest, ChangePasswordRequest, FindPasswordRequest, FindUsernameRequest,
    MessageResponse,
};
use medsafe_core::{OutgoingRequest, Result, Transport};

use crate::client::ApiClient;
use crate::http::endpoints;

impl<T: Transport> ApiClient<T> {
    #[instrument(skip_all)]
    pub async fn change_password(&self, current: &str, new: &str) -> Result<MessageResponse> {
        let body = ChangePasswordRequest {
            current_password: current,
            new_password: new,
        };
        self.post(endpoints::AUTH_CHANGE_PASSWORD, &body).await
    }

    #[instrument(skip(self))]
    pub async fn change_nickname(&self, nickname: &str) -> Result<MessageResponse> {
        self.post(endpoints::AUTH_CHANGE_NICKNAME, &ChangeNicknameRequest { nickname })
            .await
    }

    /// Ask the backend to mail the username registered to `email`.
    ///
    /// Works without a login.
    #[instrument(skip(self))]
    pub async fn find_username(&self, email: &str) -> Result<MessageResponse> {
        let request = OutgoingRequest::post(endpoints::AUTH_FIND_USERNAME)
            .json(&FindUsernameRequest { email })?;
        self.request(request).await
    }

    /// Ask the backend to start a password reset.
    #[instrument(skip(self))]
    pub async fn find_password(&self, username: &str, email: &str) -> Result<MessageResponse> {
        let request = OutgoingRequest::post(endpoints::AUTH_FIND_PASSWORD)
            .json(&FindPasswordRequest { username, email })?;
        self.request(request).await
    }
}
