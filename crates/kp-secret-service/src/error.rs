// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for Secret Service access

use thiserror::Error;

/// Result type alias for Secret Service operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised while talking to the secret-storage daemon
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The client bindings or the daemon are not usable in this environment
    #[error("secret service unavailable: {0}")]
    Unavailable(String),

    /// The daemon refused the requested session capabilities
    #[error("session negotiation failed: {0}")]
    Negotiation(String),

    /// Anything the daemon or the transport reported during a call.
    /// Displays the raw detail so reports can quote it verbatim.
    #[error("{0}")]
    Service(String),
}

impl StoreError {
    /// Short machine-readable tag for structured output
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Unavailable(_) => "unavailable",
            StoreError::Negotiation(_) => "negotiation",
            StoreError::Service(_) => "service",
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "freebsd", target_os = "openbsd"))]
impl From<dbus_secret_service::Error> for StoreError {
    fn from(err: dbus_secret_service::Error) -> Self {
        StoreError::Service(err.to_string())
    }
}
