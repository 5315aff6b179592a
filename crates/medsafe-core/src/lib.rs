//! medsafe-core - Core types and traits for the medsafe API client.
//!
//! Nothing in this crate performs I/O. It defines the values that flow
//! through the client ([`OutgoingRequest`], [`HttpResponse`], [`Credential`])
//! and the two seams implementations plug into: [`Transport`] for HTTP and
//! [`CredentialStore`] for token persistence.

pub mod credentials;
pub mod error;
pub mod models;
pub mod request;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::{LoginCredentials, SignupData};
pub use error::Error;
pub use request::{HttpResponse, Method, MultipartForm, OutgoingRequest, RequestBody};
pub use session::{SessionEvent, SessionState};
pub use tokens::{AccessToken, Credential, RefreshToken};
pub use traits::{CredentialStore, StoreKey, Transport};
pub use types::ApiBaseUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
