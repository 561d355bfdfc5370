//! Client-side session handling for the inventory pages.
//!
//! The pieces mirror the flow of the admin frontend: [`client::AuthClient`]
//! talks to the auth endpoints, [`store::TokenStore`] persists the issued
//! token under a fixed key, and [`guard::SessionGuard`] projects the stored
//! token into an in-memory session identity and gates protected-page
//! rendering.

pub mod client;
pub mod guard;
pub mod store;
