//! Loader Module
//!
//! Retrieves the company records from the remote, spreadsheet-backed
//! endpoint.
//!
//! ## Workflow
//! 1. **Direct**: `GET <endpoint>?activeOnly=true` and read the JSON envelope.
//! 2. **Fallback**: if that fails for any reason, issue a callback-style
//!    request and wait for the named callback to receive the envelope.
//! 3. **Normalize**: map legacy category names to canonical ones and fill in
//!    missing style classes.
//!
//! There is no retry beyond the single fallback.

pub mod registry;
pub mod service;
pub mod transport;
pub mod types;

#[cfg(test)]
mod tests;
