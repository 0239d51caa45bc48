//! Middleware decoding `application/json` request bodies into [`Params`].

use std::{
    future::{Ready, ready},
    rc::Rc,
};

use actix_web::{
    HttpMessage as _,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{self, HeaderMap},
    web::{Bytes, BytesMut},
};
use futures_util::{StreamExt as _, future::LocalBoxFuture};
use jsonparams_params::Params;

use crate::{
    BodyError, JsonBody,
    config::{BODY_LIMIT_ENV, ConfigError, DEFAULT_BODY_LIMIT, default_env_usize},
};

/// Middleware factory that decodes JSON request bodies.
///
/// For every request whose `Content-Type` is `application/json` (parameters
/// such as `charset` are ignored), the body is read, decoded into a
/// [`Params`] store, and published as a [`JsonBody`] request extension. The
/// body bytes are handed back to the request, so later extractors can still
/// read them. Requests with any other content type pass through untouched.
///
/// ```rust,ignore
/// use actix_web::{App, web};
/// use jsonparams_middleware::{JsonRequest, JsonResponse};
///
/// let app = App::new()
///     .wrap(JsonResponse)
///     .wrap(JsonRequest::new().limit(1024 * 1024))
///     .route("/save", web::post().to(save));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JsonRequest {
    limit: usize,
}

impl JsonRequest {
    /// Creates the middleware with the [`DEFAULT_BODY_LIMIT`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Creates the middleware with the body limit read from
    /// `JSONPARAMS_BODY_LIMIT`, or [`DEFAULT_BODY_LIMIT`] when unset.
    ///
    /// # Errors
    ///
    /// * If `JSONPARAMS_BODY_LIMIT` is set but is not a valid byte count
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            limit: default_env_usize(BODY_LIMIT_ENV, DEFAULT_BODY_LIMIT)?,
        })
    }

    /// Sets the maximum accepted body size, in bytes.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for JsonRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for JsonRequest
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = JsonRequestMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JsonRequestMiddleware {
            service: Rc::new(service),
            limit: self.limit,
        }))
    }
}

/// The service created by [`JsonRequest`] for each worker.
pub struct JsonRequestMiddleware<S> {
    service: Rc<S>,
    limit: usize,
}

impl<S, B> Service<ServiceRequest> for JsonRequestMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limit = self.limit;

        Box::pin(async move {
            if is_json_content_type(req.headers()) {
                let mut payload = req.take_payload();

                let body = match read_body(&mut payload, limit).await {
                    Ok(bytes) => {
                        let decoded = Params::from_slice(&bytes).map_err(BodyError::from);
                        req.set_payload(Payload::from(bytes));
                        decoded
                    }
                    Err(e) => Err(e),
                };

                if let Err(e) = &body {
                    log::debug!(
                        "Failed to decode JSON body for {} '{}': {e}",
                        req.method(),
                        req.path(),
                    );
                }

                req.extensions_mut().insert(JsonBody::from(body));
            }

            service.call(req).await
        })
    }
}

/// Returns whether the primary token of the `Content-Type` header is
/// `application/json`.
#[must_use]
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

async fn read_body(payload: &mut Payload, limit: usize) -> Result<Bytes, BodyError> {
    let mut body = BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| BodyError::Payload(e.to_string()))?;

        if body.len() + chunk.len() > limit {
            log::warn!("Rejecting JSON body larger than {limit} bytes");
            return Err(BodyError::Overflow { limit });
        }

        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}

#[cfg(test)]
mod tests {
    use actix_web::{http::header::HeaderValue, test::TestRequest};

    use super::*;

    fn headers(content_type: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        headers
    }

    #[test_log::test]
    fn test_is_json_content_type() {
        assert!(is_json_content_type(&headers(Some("application/json"))));
        assert!(is_json_content_type(&headers(Some(
            "application/json; charset=utf-8"
        ))));
        assert!(is_json_content_type(&headers(Some("Application/JSON"))));
    }

    #[test_log::test]
    fn test_is_not_json_content_type() {
        assert!(!is_json_content_type(&headers(None)));
        assert!(!is_json_content_type(&headers(Some("text/plain"))));
        assert!(!is_json_content_type(&headers(Some(
            "application/x-www-form-urlencoded"
        ))));
        assert!(!is_json_content_type(&headers(Some("application/jsonp"))));
    }

    #[test_log::test(actix_web::test)]
    async fn test_read_body_within_limit() {
        let (_, mut payload) = TestRequest::default()
            .set_payload(r#"{"one":1}"#)
            .to_http_parts();

        let body = read_body(&mut payload, 64).await.unwrap();

        assert_eq!(body, Bytes::from_static(br#"{"one":1}"#));
    }

    #[test_log::test(actix_web::test)]
    async fn test_read_body_over_limit() {
        let (_, mut payload) = TestRequest::default()
            .set_payload(r#"{"one":1}"#)
            .to_http_parts();

        let result = read_body(&mut payload, 4).await;

        assert!(matches!(result, Err(BodyError::Overflow { limit: 4 })));
    }

    #[test_log::test]
    fn test_builder_limit() {
        assert_eq!(JsonRequest::new().limit, DEFAULT_BODY_LIMIT);
        assert_eq!(JsonRequest::default().limit(10).limit, 10);
    }
}
