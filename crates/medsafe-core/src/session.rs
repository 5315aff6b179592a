//! Session state and the events the client publishes about it.

use std::fmt;

/// Authentication state of a client.
///
/// "Authenticated" is derived from the store: an access token is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Authenticated,
    /// A token refresh is in flight.
    Refreshing,
    Unauthenticated,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, SessionState::Unauthenticated)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Authenticated => "authenticated",
            SessionState::Refreshing => "refreshing",
            SessionState::Unauthenticated => "unauthenticated",
        };
        f.write_str(s)
    }
}

/// Session transitions published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Login or signup stored a new credential.
    LoggedIn,
    /// A refresh replaced the access token.
    Refreshed,
    /// The session ended without the user asking. Emitted once per transition;
    /// the host should send the user back to login.
    Expired,
    /// The user logged out.
    LoggedOut,
}
