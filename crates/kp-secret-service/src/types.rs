// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Session and collection types shared by every backend

use serde::{Deserialize, Serialize};

/// Transport encryption requested when opening the daemon session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionAlgorithm {
    /// No transport encryption; the "no special flags" mode
    #[default]
    Plain,
    /// Diffie-Hellman key exchange with AES-128-CBC transport
    Dh,
}

impl std::fmt::Display for SessionAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionAlgorithm::Plain => write!(f, "plain"),
            SessionAlgorithm::Dh => write!(f, "dh"),
        }
    }
}

/// Session context handed to a [`crate::SecretStore`] by its caller
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub algorithm: SessionAlgorithm,
}

impl SessionContext {
    pub fn new(algorithm: SessionAlgorithm) -> Self {
        Self { algorithm }
    }
}

/// Outcome of a successful capability negotiation.
///
/// Backends hand this out from `negotiate`; `connect` takes it as proof
/// that negotiation already happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NegotiatedSession {
    backend: &'static str,
    algorithm: SessionAlgorithm,
}

impl NegotiatedSession {
    pub fn new(backend: &'static str, algorithm: SessionAlgorithm) -> Self {
        Self { backend, algorithm }
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    pub fn algorithm(&self) -> SessionAlgorithm {
        self.algorithm
    }
}

/// Opaque reference to one top-level collection
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CollectionRef(String);

impl CollectionRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_parses_as_value_enum() {
        use clap::ValueEnum;

        assert_eq!(SessionAlgorithm::from_str("plain", false), Ok(SessionAlgorithm::Plain));
        assert_eq!(SessionAlgorithm::from_str("DH", true), Ok(SessionAlgorithm::Dh));
        assert!(SessionAlgorithm::from_str("aes", true).is_err());
    }

    #[test]
    fn algorithm_display_matches_flag_value() {
        assert_eq!(SessionAlgorithm::Plain.to_string(), "plain");
        assert_eq!(SessionAlgorithm::Dh.to_string(), "dh");
    }

    #[test]
    fn default_context_requests_plain_session() {
        assert_eq!(SessionContext::default().algorithm, SessionAlgorithm::Plain);
    }

    #[test]
    fn negotiated_session_exposes_agreed_terms() {
        let session = NegotiatedSession::new("secret-service", SessionAlgorithm::Dh);
        assert_eq!(session.backend(), "secret-service");
        assert_eq!(session.algorithm(), SessionAlgorithm::Dh);
    }
}
