//! Helpers writing `{"error": ...}` and `{"success": ...}` JSON responses.
//!
//! ```rust
//! use actix_web::http::StatusCode;
//!
//! let response = jsonparams_responses::error("the parameter name is required", None);
//! assert_eq!(response.status(), StatusCode::BAD_REQUEST);
//!
//! let response = jsonparams_responses::success("created", Some(StatusCode::CREATED));
//! assert_eq!(response.status(), StatusCode::CREATED);
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt::Display;

use actix_web::{HttpResponse, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of a success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessBody {
    pub success: String,
}

/// Writes `err` as `{"error": "<message>"}`.
///
/// `status` defaults to `400 Bad Request`.
#[must_use]
pub fn error(err: impl Display, status: Option<StatusCode>) -> HttpResponse {
    let status = status.unwrap_or(StatusCode::BAD_REQUEST);
    let error = err.to_string();

    log::debug!("Responding with {status}: {error}");

    HttpResponse::build(status).json(ErrorBody { error })
}

/// Writes `message` as `{"success": "<message>"}`.
///
/// `status` defaults to `200 OK`.
#[must_use]
pub fn success(message: impl Display, status: Option<StatusCode>) -> HttpResponse {
    HttpResponse::build(status.unwrap_or(StatusCode::OK)).json(SuccessBody {
        success: message.to_string(),
    })
}
