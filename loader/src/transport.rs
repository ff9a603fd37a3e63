//! `Transport` over ureq.
//!
//! ureq is blocking, so each request runs on tokio's blocking pool. Status
//! codes are returned as data (`http_status_as_error(false)`); only
//! connection-level failures become `TransportError`.

use std::time::Duration;

use async_trait::async_trait;
use consent_core::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use tracing::debug;

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| TransportError::new(format!("request task failed: {e}")))?
    }
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    debug!(method = request.method.as_str(), path = %request.path, "sending request");

    let headers = &request.headers;
    let result = match request.method {
        HttpMethod::Get => with_headers(agent.get(&request.path), headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(&request.path), headers).call(),
        HttpMethod::Post => {
            let builder = with_headers(agent.post(&request.path), headers);
            match &request.body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };

    let mut response = result.map_err(into_transport_error)?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| into_transport_error(e).with_status(status))?;

    debug!(status, "response received");
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder
}

fn into_transport_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::StatusCode(status) => {
            TransportError::new(format!("HTTP {status}")).with_status(status)
        }
        other => TransportError::new(other.to_string()),
    }
}
