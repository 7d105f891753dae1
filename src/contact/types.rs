//! Contact Form Types
//!
//! The form as the page posts it, and the fixed-name payload forwarded to
//! the endpoint.

use serde::{Deserialize, Serialize};

pub const STATUS_SENT: &str = "送信が完了しました。担当者宛にメールをお届けしました。";
pub const STATUS_FAILED: &str = "送信に失敗しました。時間をおいて再度お試しください。";

/// Fields posted by the page's contact form. `website` is the honeypot and
/// is never forwarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub company_name: String,
    pub category: String,
    pub message: String,
    pub lp_url: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub additional_info: String,
    pub website: String,
}

impl ContactForm {
    pub fn honeypot_tripped(&self) -> bool {
        !self.website.trim().is_empty()
    }
}

/// Body of the `application/x-www-form-urlencoded` submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub subject: String,
    pub name: String,
    pub category: String,
    pub message: String,
    pub lp_url: String,
    pub manager_name: String,
    pub emailaddress_from: String,
    pub phone_number: String,
    pub others: String,
}

impl SubmissionPayload {
    pub fn from_form(subject: &str, form: &ContactForm) -> Self {
        Self {
            subject: subject.to_string(),
            name: form.company_name.clone(),
            category: form.category.clone(),
            message: form.message.clone(),
            lp_url: form.lp_url.clone(),
            manager_name: form.contact_name.clone(),
            emailaddress_from: form.email.clone(),
            phone_number: form.phone.clone(),
            others: form.additional_info.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The endpoint accepted the submission.
    Sent,
    /// Honeypot filled: nothing was sent and nothing should be shown.
    Dropped,
}

/// What the form should look like after a submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Values to prefill. Reset after success, preserved after failure.
    pub values: ContactForm,
    /// Inline status line. `None` leaves the status element untouched.
    pub status: Option<String>,
}
