//! Drinks resource server.
//!
//! CRUD over drinks, with each write (and the detailed listing) gated by a
//! permission carried in a bearer token signed by the identity provider.
//! Token verification lives in [`services::auth`]; the axum glue in
//! [`middleware::auth::access`].

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
