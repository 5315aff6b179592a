//! HTTP plumbing.
//!
//! This module provides the reqwest-backed transport and the backend's
//! endpoint paths.

pub(crate) mod endpoints;
mod transport;

pub use transport::HttpTransport;
