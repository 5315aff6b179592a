//! HTTP transport trait.

use async_trait::async_trait;

use crate::Result;
use crate::request::{HttpResponse, OutgoingRequest};

/// Sends one request and returns the response, whatever its status.
///
/// Implementations must not interpret statuses: a 401 or 500 is a successful
/// `Ok(HttpResponse)`. Only failures to get any response at all are `Err`,
/// normally [`Error::Transport`](crate::Error::Transport).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &OutgoingRequest) -> Result<HttpResponse>;
}
