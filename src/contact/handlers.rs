use super::types::{
    ContactForm, FormState, STATUS_FAILED, STATUS_SENT, SubmissionPayload, SubmitOutcome,
};
use crate::config::Config;
use crate::error::{DirectoryError, Result};

/// Posts contact submissions to the listing endpoint.
#[derive(Clone)]
pub struct Submitter {
    endpoint: Option<String>,
    subject: String,
    client: reqwest::Client,
}

impl Submitter {
    pub fn new(endpoint: Option<String>, subject: &str, client: reqwest::Client) -> Self {
        Self {
            endpoint,
            subject: subject.to_string(),
            client,
        }
    }

    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self::new(config.endpoint.clone(), &config.subject, client)
    }

    pub async fn submit(&self, form: &ContactForm) -> Result<SubmitOutcome> {
        if form.honeypot_tripped() {
            tracing::info!("Honeypot field filled, dropping submission");
            return Ok(SubmitOutcome::Dropped);
        }

        let endpoint = self.endpoint.as_deref().ok_or(DirectoryError::Configuration)?;
        let payload = SubmissionPayload::from_form(&self.subject, form);

        let response = self.client.post(endpoint).form(&payload).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if submission_succeeded(status.is_success(), &body) {
            tracing::info!("Submission for {:?} accepted", payload.name);
            Ok(SubmitOutcome::Sent)
        } else if status.is_success() {
            Err(DirectoryError::Rejected)
        } else {
            Err(DirectoryError::Transport(format!("HTTP {}", status)))
        }
    }

    /// Runs a submission and returns the form state the page should show.
    pub async fn handle(&self, form: ContactForm, previous_status: Option<String>) -> FormState {
        match self.submit(&form).await {
            Ok(SubmitOutcome::Sent) => FormState {
                values: ContactForm::default(),
                status: Some(STATUS_SENT.to_string()),
            },
            Ok(SubmitOutcome::Dropped) => FormState {
                values: form,
                status: previous_status,
            },
            Err(e) => {
                tracing::error!("Submission failed: {}", e);
                FormState {
                    values: form,
                    status: Some(STATUS_FAILED.to_string()),
                }
            }
        }
    }
}

/// An explicit boolean `ok` in a JSON body overrides the HTTP status.
pub fn submission_succeeded(status_ok: bool, body: &str) -> bool {
    let explicit = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("ok").and_then(|ok| ok.as_bool()));

    explicit.unwrap_or(status_ok)
}
