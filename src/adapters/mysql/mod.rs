//! MySQL adapter for the identity store.

mod identity_store;

pub use identity_store::MySqlIdentityConnector;
