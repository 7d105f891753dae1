//! Callback Registry
//!
//! Named one-shot callbacks used by the callback transport. A callback is
//! registered before its request goes out and is removed on its first
//! invocation, so a payload is delivered at most once. The
//! `PendingCallback` handle removes the entry when dropped, which covers
//! load errors, timeouts and cancelled fetches.

use crate::error::{DirectoryError, Result};
use dashmap::DashMap;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::sync::oneshot;

const CALLBACK_PREFIX: &str = "__companyDirectoryCallback_";

/// `name(<json>)` with an optional `/**/` guard and trailing semicolon.
static SCRIPT_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*(?:/\*\*/\s*)?([A-Za-z_$][A-Za-z0-9_$]*)\s*\((.*)\)\s*;?\s*$")
        .expect("callback script pattern is valid")
});

pub struct CallbackRegistry {
    callbacks: DashMap<String, oneshot::Sender<serde_json::Value>>,
}

impl CallbackRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a fresh, uniquely named callback.
    pub fn register(self: &Arc<Self>) -> PendingCallback {
        let name = format!("{}{}", CALLBACK_PREFIX, uuid::Uuid::new_v4().simple());
        let (sender, receiver) = oneshot::channel();
        self.callbacks.insert(name.clone(), sender);

        tracing::debug!("Registered callback {}", name);

        PendingCallback {
            name,
            registry: Arc::clone(self),
            receiver,
        }
    }

    /// Delivers `payload` to the named callback and unregisters it.
    ///
    /// Returns `false` if no such callback is registered, including when it
    /// has already been invoked once.
    pub fn invoke(&self, name: &str, payload: serde_json::Value) -> bool {
        match self.callbacks.remove(name) {
            Some((_, sender)) => {
                if sender.send(payload).is_err() {
                    tracing::debug!("Callback {} fired after its caller went away", name);
                }
                true
            }
            None => {
                tracing::warn!("Ignoring invocation of unknown callback {}", name);
                false
            }
        }
    }

    /// Evaluates a callback-style response body.
    ///
    /// Returns whether a registered callback was invoked. A body that is not
    /// a single call with a JSON argument is an `InvalidEnvelope`.
    pub fn dispatch_script(&self, script: &str) -> Result<bool> {
        let caps = SCRIPT_CALL.captures(script).ok_or_else(|| {
            DirectoryError::InvalidEnvelope("callback response is not a function call".to_string())
        })?;

        let name = &caps[1];
        let payload: serde_json::Value = serde_json::from_str(caps[2].trim())
            .map_err(|e| DirectoryError::InvalidEnvelope(e.to_string()))?;

        Ok(self.invoke(name, payload))
    }

    /// Unregisters without invoking.
    pub fn remove(&self, name: &str) -> bool {
        self.callbacks.remove(name).is_some()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    pub fn pending_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self {
            callbacks: DashMap::new(),
        }
    }
}

/// Handle to a registered callback. Dropping it unregisters the callback.
pub struct PendingCallback {
    name: String,
    registry: Arc<CallbackRegistry>,
    receiver: oneshot::Receiver<serde_json::Value>,
}

impl PendingCallback {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waits for the single invocation. `None` waits indefinitely.
    pub async fn wait(mut self, timeout: Option<Duration>) -> Result<serde_json::Value> {
        let received = match timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut self.receiver).await {
                Ok(received) => received,
                Err(_) => {
                    tracing::warn!("Callback {} timed out after {:?}", self.name, limit);
                    return Err(DirectoryError::CallbackTimeout(self.name.clone()));
                }
            },
            None => (&mut self.receiver).await,
        };

        received.map_err(|_| DirectoryError::CallbackAbandoned(self.name.clone()))
    }
}

impl Drop for PendingCallback {
    fn drop(&mut self) {
        if self.registry.remove(&self.name) {
            tracing::debug!("Removed uninvoked callback {}", self.name);
        }
    }
}
