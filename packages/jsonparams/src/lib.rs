//! `jsonparams` unified package.
//!
//! Re-exports the jsonparams components based on feature flags.
//!
//! # Features
//!
//! * `all` - Enable every component (the default)
//! * `params` - The [`Params`](params::Params) JSON parameter store
//! * `middleware` - actix-web middlewares for JSON request bodies and responses
//! * `responses` - `{"error": ...}` and `{"success": ...}` response helpers

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// actix-web middlewares decoding JSON request bodies and marking responses as JSON.
#[cfg(feature = "middleware")]
pub use jsonparams_middleware as middleware;
/// Dynamically-typed JSON parameter store with coercing getters.
#[cfg(feature = "params")]
pub use jsonparams_params as params;
/// Helpers writing JSON error and success responses.
#[cfg(feature = "responses")]
pub use jsonparams_responses as responses;

#[cfg(feature = "params")]
pub use jsonparams_params::{Params, Value};
