#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Basic server wiring the jsonparams middlewares into an actix-web app.
//!
//! # Usage
//!
//! ```sh
//! cargo run --package jsonparams_middleware_basic_server
//! ```
//!
//! ```sh
//! curl -X POST -H 'Content-Type: application/json' \
//!     -d '{"user": {"name": "Jane", "email": "jane@example.com", "age": "42"}}' \
//!     http://localhost:8080/save
//!
//! curl -X POST -H 'Content-Type: application/json' \
//!     -d '{"user": {"name": "Jane"}}' \
//!     http://localhost:8080/save
//! ```
//!
//! `BIND_ADDR` and `PORT` select the listening socket, `JSONPARAMS_BODY_LIMIT`
//! caps the accepted body size, and `RUST_LOG` controls logging.

use std::io;

use actix_web::{App, HttpResponse, HttpServer, http::StatusCode, middleware, web};
use jsonparams_middleware::{JsonBody, JsonRequest, JsonResponse, config::default_env_usize};
use jsonparams_responses::{error, success};

async fn save(body: Option<JsonBody>) -> HttpResponse {
    let Some(body) = body else {
        return error(
            "expected an application/json body",
            Some(StatusCode::UNSUPPORTED_MEDIA_TYPE),
        );
    };
    if let Some(e) = body.decode_error() {
        return error(e, None);
    }

    let params = body.params();
    if let Err(e) = params.required(&["user.name", "user.email"]) {
        return error(e, None);
    }

    let user = params.get_nested("user");
    log::info!(
        "Saving user {} <{}> aged {}",
        user.get("name"),
        user.get("email"),
        user.get_int("age"),
    );

    success(format!("saved {}", user.get("name")), Some(StatusCode::CREATED))
}

async fn echo(body: JsonBody) -> HttpResponse {
    HttpResponse::Ok().json(body.into_params())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = default_env_usize("PORT", 8080)
        .map_err(io::Error::other)
        .and_then(|port| u16::try_from(port).map_err(io::Error::other))?;
    let json_request = JsonRequest::from_env().map_err(io::Error::other)?;

    log::info!("Listening on http://{bind_addr}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(JsonResponse)
            .wrap(json_request)
            .wrap(middleware::Logger::default())
            .route("/save", web::post().to(save))
            .route("/echo", web::post().to(echo))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
