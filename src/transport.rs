//! HTTP access to the local wallet server

use crate::constants::SESSION_ID_FIELD;
use crate::error::PollError;
use crate::types::{Endpoint, FormSubmission, PollResult};
use futures::future::BoxFuture;
use tracing::debug;

/// Request side of a poll loop. Implemented over HTTP for the app and by a
/// scripted fake in tests.
pub trait Transport: Send + Sync {
    fn fetch(&self, endpoint: Endpoint) -> BoxFuture<'_, Result<PollResult, PollError>>;

    fn submit(&self, submission: FormSubmission) -> BoxFuture<'_, Result<(), PollError>>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    session_id: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str, session_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            // An empty session id means "no session"
            session_id: session_id.filter(|id| !id.is_empty()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn session_form(&self) -> Option<[(&'static str, &str); 1]> {
        self.session_id
            .as_deref()
            .map(|id| [(SESSION_ID_FIELD, id)])
    }

    /// GET, or POST with the session id for session-scoped endpoints.
    fn request(&self, endpoint: Endpoint) -> reqwest::RequestBuilder {
        let url = self.url(endpoint.path());
        match self.session_form() {
            Some(form) if endpoint.session_scoped() => self.client.post(url).form(&form),
            _ => self.client.get(url),
        }
    }

    fn submit_request(&self, submission: &FormSubmission) -> reqwest::RequestBuilder {
        let builder = self.client.post(self.url(&submission.action));
        match self.session_form() {
            Some(form) => builder.form(&form),
            None => builder,
        }
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, endpoint: Endpoint) -> BoxFuture<'_, Result<PollResult, PollError>> {
        Box::pin(async move {
            let path = endpoint.path();
            let response = self.request(endpoint).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(PollError::Status { path, status });
            }
            Ok(response.json::<PollResult>().await?)
        })
    }

    fn submit(&self, submission: FormSubmission) -> BoxFuture<'_, Result<(), PollError>> {
        Box::pin(async move {
            debug!(form = %submission.form, action = %submission.action, "Submitting form");
            let response = self.submit_request(&submission).send().await?;
            response.error_for_status()?;
            Ok(())
        })
    }
}
