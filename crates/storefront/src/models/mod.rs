//! Types kept in visitor storage that are not part of the core domain.

pub mod session;

pub use session::{CurrentUser, keys as storage_keys};
