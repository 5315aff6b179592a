//! Typed wrappers over the backend's resources.
//!
//! Each module adds methods to [`ApiClient`](crate::ApiClient); all of them
//! go through the authenticated request pipeline.

mod account;
mod allergies;
mod analysis;
mod comments;
mod medicines;
mod ocr;
mod posts;

pub use posts::PostQuery;
