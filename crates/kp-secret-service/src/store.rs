// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Collaborator traits for the secret-storage daemon

use crate::error::Result;
use crate::types::{CollectionRef, NegotiatedSession, SessionContext};

/// An established connection to the daemon
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ServiceHandle {
    /// List the daemon's top-level collections, in the order it reports them
    fn collections(&self) -> Result<Vec<CollectionRef>>;
}

/// A secret-storage backend the probe can connect to
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait SecretStore: Send + Sync {
    /// Human-readable backend name used in reports and logs
    fn name(&self) -> &'static str;

    /// Agree on session capabilities. Must succeed before `connect`.
    fn negotiate(&self, context: &SessionContext) -> Result<NegotiatedSession>;

    /// Obtain a handle to the running daemon.
    ///
    /// `Ok(None)` means the call went through but produced no usable handle.
    /// May block while the inter-process connection is established.
    fn connect(&self, session: &NegotiatedSession) -> Result<Option<Box<dyn ServiceHandle>>>;
}
