//! medsafe-store - Credential stores.
//!
//! Every store implements [`medsafe_core::CredentialStore`]:
//!
//! - [`MemoryStore`] keeps tokens for the life of the process.
//! - [`FileStore`] persists them in a single JSON file readable only by the owner.
//! - `KeyringStore` (feature `keyring`) uses the platform secret service.

mod file;
#[cfg(feature = "keyring")]
mod os_keyring;
mod memory;

pub use file::FileStore;
#[cfg(feature = "keyring")]
pub use os_keyring::KeyringStore;
pub use memory::MemoryStore;
