//! Request submitter: performs the single network call of a generation attempt.
//!
//! A [`Submitter`] turns a [`GenerationRequest`] into a [`GenerationOutcome`].
//! It never fails: server refusals and transport errors are both folded into
//! [`GenerationOutcome::Failure`], so whoever awaits the call always gets an
//! outcome to feed back into the workflow. Exactly one attempt is made per
//! call; nothing is retried.

use crate::client::messages::{transport_failure, CalculateResponse, CALCULATE_PATH};
use crate::domain::error::{Result, ShelltexError};
use crate::domain::{GenerationOutcome, GenerationRequest};
use crate::Config;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::{Client, Url};
use std::error::Error;

/// Performs generation calls.
///
/// The returned future owns everything it needs, so the runtime can keep it
/// pending while it goes on handling user input.
pub trait Submitter: Send + Sync {
    fn submit(&self, request: GenerationRequest) -> BoxFuture<'static, GenerationOutcome>;
}

/// [`Submitter`] that posts JSON to `<endpoint>/calculate`.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: Client,
    url: Url,
}

impl HttpSubmitter {
    /// Builds a submitter for the configured endpoint.
    ///
    /// The configured request timeout applies to the whole exchange, from
    /// connecting to reading the body.
    ///
    /// # Errors
    ///
    /// Returns [`ShelltexError::Config`] if the endpoint is not a usable base
    /// URL, or [`ShelltexError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let url = calculate_url(&config.endpoint)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        tracing::debug!(url = %url, timeout = ?config.request_timeout(), "http submitter ready");
        Ok(Self { client, url })
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    async fn exchange(client: Client, url: Url, request: GenerationRequest) -> GenerationOutcome {
        let response = match client.post(url.clone()).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                let cause = describe(&e);
                tracing::debug!(url = %url, error = %cause, "generation request failed in transport");
                return transport_failure(&cause);
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                let cause = describe(&e);
                tracing::debug!(status = %status, error = %cause, "failed reading response body");
                return transport_failure(&cause);
            }
        };

        tracing::debug!(status = %status, body_len = body.len(), "generation response received");
        CalculateResponse::from_body(&body).into_outcome(status.is_success())
    }
}

impl Submitter for HttpSubmitter {
    fn submit(&self, request: GenerationRequest) -> BoxFuture<'static, GenerationOutcome> {
        Self::exchange(self.client.clone(), self.url.clone(), request).boxed()
    }
}

/// Resolves the `/calculate` URL under `endpoint`.
///
/// The endpoint is treated as a directory, so `http://host/app` and
/// `http://host/app/` both resolve to `http://host/app/calculate`.
fn calculate_url(endpoint: &str) -> Result<Url> {
    let mut base = Url::parse(endpoint)
        .map_err(|e| ShelltexError::Config(format!("invalid endpoint {endpoint:?}: {e}")))?;

    if base.cannot_be_a_base() {
        return Err(ShelltexError::Config(format!(
            "endpoint {endpoint:?} cannot be used as a base URL"
        )));
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(CALCULATE_PATH)
        .map_err(|e| ShelltexError::Config(format!("invalid endpoint {endpoint:?}: {e}")))
}

/// Formats an error with its chain of sources.
fn describe(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
