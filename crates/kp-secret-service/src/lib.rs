// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Read-only access to the desktop Secret Service
//!
//! This crate is the seam between the probe and the secret-storage daemon.
//! Everything the probe needs from the daemon goes through two traits:
//!
//! - [`SecretStore`] negotiates the session capabilities and hands out a
//!   connection handle (or nothing, when the daemon gives no usable handle)
//! - [`ServiceHandle`] enumerates the top-level collections
//!
//! The ambient desktop session is never read implicitly. Callers build a
//! [`SessionContext`] and pass it in, which lets tests swap the daemon for
//! a mock collaborator.
//!
//! No operation in this crate creates, reads, writes, unlocks or deletes
//! keyring items.

pub mod dbus;
pub mod error;
pub mod store;
pub mod types;

pub use dbus::DbusSecretStore;
pub use error::{Result, StoreError};
pub use store::{SecretStore, ServiceHandle};
pub use types::{CollectionRef, NegotiatedSession, SessionAlgorithm, SessionContext};

#[cfg(any(test, feature = "mock"))]
pub use store::{MockSecretStore, MockServiceHandle};
