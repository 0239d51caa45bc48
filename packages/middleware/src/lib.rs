//! actix-web middlewares for JSON request bodies and responses.
//!
//! * [`JsonRequest`] decodes `application/json` request bodies into a
//!   [`Params`](jsonparams_params::Params) store and publishes it to handlers
//!   as a [`JsonBody`]
//! * [`JsonResponse`] marks every response as `application/json`
//!
//! # Example
//!
//! ```rust,ignore
//! use actix_web::{App, HttpResponse, HttpServer, web};
//! use jsonparams_middleware::{JsonBody, JsonRequest, JsonResponse};
//!
//! async fn save(body: Option<JsonBody>) -> HttpResponse {
//!     let Some(body) = body else {
//!         return jsonparams_responses::error("expected a JSON body", None);
//!     };
//!     if let Err(e) = body.params().required(&["user.name", "user.email"]) {
//!         return jsonparams_responses::error(e, None);
//!     }
//!     jsonparams_responses::success("saved", None)
//! }
//!
//! HttpServer::new(|| {
//!     App::new()
//!         .wrap(JsonResponse)
//!         .wrap(JsonRequest::new())
//!         .route("/save", web::post().to(save))
//! })
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::module_name_repetitions)]

pub mod body;
pub mod config;
pub mod request;
pub mod response;

pub use body::{BodyError, JsonBody};
pub use config::{ConfigError, DEFAULT_BODY_LIMIT};
pub use request::{JsonRequest, JsonRequestMiddleware, is_json_content_type};
pub use response::{JsonResponse, JsonResponseMiddleware};
