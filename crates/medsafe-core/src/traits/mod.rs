//! Core traits for the HTTP transport and credential storage seams.

mod store;
mod transport;

pub use store::{CredentialStore, StoreKey};
pub use transport::Transport;
