//! The decoded JSON body published to downstream handlers.

use std::{
    future::{Ready, ready},
    sync::Arc,
};

use actix_web::{
    FromRequest, HttpMessage as _, HttpRequest, HttpResponse, ResponseError, dev::Payload,
    error::ErrorBadRequest, http::StatusCode,
};
use jsonparams_params::{DecodeError, Params};
use thiserror::Error;

/// Errors that can occur while reading and decoding a JSON request body.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Failed to read request body: {0}")]
    Payload(String),
    #[error("Request body exceeds the {limit} byte limit")]
    Overflow { limit: usize },
}

impl ResponseError for BodyError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Overflow { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Decode(_) | Self::Payload(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        jsonparams_responses::error(self, Some(self.status_code()))
    }
}

/// A JSON request body decoded by [`JsonRequest`](crate::JsonRequest).
///
/// Only present on requests whose content type was `application/json`. Take
/// it as `Option<JsonBody>` in a handler to treat "no JSON body" explicitly;
/// extracting a bare `JsonBody` from a request without one fails with
/// `400 Bad Request`.
///
/// ```rust,ignore
/// use actix_web::HttpResponse;
/// use jsonparams_middleware::JsonBody;
///
/// async fn handler(body: Option<JsonBody>) -> HttpResponse {
///     let Some(body) = body else {
///         return jsonparams_responses::error("expected a JSON body", None);
///     };
///     if let Some(err) = body.decode_error() {
///         return jsonparams_responses::error(err, None);
///     }
///     jsonparams_responses::success(&body.params().get("name"), None)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonBody {
    params: Params,
    decode_error: Option<Arc<BodyError>>,
}

impl JsonBody {
    #[must_use]
    pub const fn new(params: Params) -> Self {
        Self {
            params,
            decode_error: None,
        }
    }

    /// A body that failed to decode. The params are left empty.
    #[must_use]
    pub fn failed(error: BodyError) -> Self {
        Self {
            params: Params::new(),
            decode_error: Some(Arc::new(error)),
        }
    }

    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    pub const fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    #[must_use]
    pub fn into_params(self) -> Params {
        self.params
    }

    /// The error that occurred while reading or decoding the body, if any.
    #[must_use]
    pub fn decode_error(&self) -> Option<&BodyError> {
        self.decode_error.as_deref()
    }

    /// Returns the params, or the decode error if decoding failed.
    ///
    /// # Errors
    ///
    /// * If the body failed to read or decode
    pub fn into_result(self) -> Result<Params, Arc<BodyError>> {
        match self.decode_error {
            Some(error) => Err(error),
            None => Ok(self.params),
        }
    }
}

impl From<Result<Params, BodyError>> for JsonBody {
    fn from(value: Result<Params, BodyError>) -> Self {
        match value {
            Ok(params) => Self::new(params),
            Err(error) => Self::failed(error),
        }
    }
}

impl FromRequest for JsonBody {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, actix_web::Error>>;

    /// Extracts the body published by the [`JsonRequest`](crate::JsonRequest)
    /// middleware.
    ///
    /// # Errors
    ///
    /// * Returns `ErrorBadRequest` if the request carried no JSON body
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Self>()
                .cloned()
                .ok_or_else(|| ErrorBadRequest("Missing JSON request body")),
        )
    }
}
