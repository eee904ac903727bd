//! AWS Lambda handler for loan calculations
//!
//! Routes `POST /calculate` to the amortization engine and
//! `POST /estimate-rate` to the rate estimator. Bodies are JSON in both
//! directions; failures are reported as `{"error": "..."}`.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::{info, warn};

use loan_calculator::api::{route, ApiResponse};
use loan_calculator::config::AmortizationConfig;

fn respond(status: u16, json_body: Option<String>) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type");

    let body = match json_body {
        Some(text) => {
            builder = builder.header("Content-Type", "application/json");
            Body::Text(text)
        }
        None => Body::Empty,
    };

    Ok(builder.body(body)?)
}

fn json_response(api: &ApiResponse) -> Result<Response<Body>, Error> {
    respond(api.status, Some(serde_json::to_string(&api.body)?))
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let method = event.method().as_str();
    let path = event.uri().path();

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => String::new(),
    };

    let response = route(method, path, &body_str, &AmortizationConfig::default());

    if response.is_success() {
        info!("{} {} -> {}", method, path, response.status);
    } else {
        warn!("{} {} -> {}", method, path, response.status);
    }

    if response.body.is_null() {
        return respond(response.status, None);
    }
    json_response(&response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
