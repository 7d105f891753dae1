//! Contact Module
//!
//! Forwards the listing-request form to the same endpoint the directory is
//! loaded from, as a url-encoded POST with fixed field names.
//!
//! A filled honeypot field drops the submission silently. On failure the
//! submitted values are kept so the visitor can retry.

pub mod handlers;
pub mod types;
