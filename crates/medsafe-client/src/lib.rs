//! medsafe-client - Authenticated REST client for the medsafe backend.
//!
//! [`ApiClient`] is the single request-issuing capability. It attaches the
//! stored bearer token, transparently refreshes it once on a 401 and ends
//! the session when recovery is impossible. Typed wrappers for the
//! backend's resources live on the same type.

mod client;
pub mod config;
pub mod http;
mod services;
mod session;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use http::HttpTransport;
pub use services::PostQuery;
