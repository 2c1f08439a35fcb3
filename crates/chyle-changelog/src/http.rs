//! Shared HTTP plumbing for remote decorators and senders

use reqwest::{Client, Response};
use tracing::debug;
use url::form_urlencoded;

use crate::error::{PipelineError, Result};

const USER_AGENT: &str = concat!("chyle/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used by a stage
pub(crate) fn client() -> Result<Client> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

/// `Authorization` header value for token authenticated APIs
pub(crate) fn token_header(token: &str) -> String {
    format!("token {}", token)
}

/// Percent-encode `value` so it stays a single URL path segment
pub(crate) fn encode_segment(value: &str) -> String {
    // form encoding turns spaces into `+` and escapes a literal `+`
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Turn a non-success response into [`PipelineError::Api`]
pub(crate) async fn check(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    debug!(url, status = status.as_u16(), "API response");

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(PipelineError::Api {
            url: url.to_string(),
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}
