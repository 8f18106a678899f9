// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! freedesktop Secret Service backend over the session D-Bus

use crate::error::{Result, StoreError};
use crate::store::{SecretStore, ServiceHandle};
use crate::types::{NegotiatedSession, SessionContext};

const BACKEND_NAME: &str = "secret-service";

/// Backend talking to the Secret Service daemon (GNOME Keyring, KWallet,
/// KeePassXC, ...) through `org.freedesktop.secrets`
#[derive(Clone, Copy, Debug, Default)]
pub struct DbusSecretStore;

impl DbusSecretStore {
    pub fn new() -> Self {
        Self
    }
}

impl SecretStore for DbusSecretStore {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn negotiate(&self, context: &SessionContext) -> Result<NegotiatedSession> {
        platform::negotiate(context)
    }

    fn connect(&self, session: &NegotiatedSession) -> Result<Option<Box<dyn ServiceHandle>>> {
        platform::connect(session)
    }
}

#[cfg(any(target_os = "linux", target_os = "freebsd", target_os = "openbsd"))]
mod platform {
    use super::*;
    use crate::types::{CollectionRef, SessionAlgorithm};
    use dbus_secret_service::{EncryptionType, SecretService};

    struct DbusHandle {
        service: SecretService,
    }

    impl ServiceHandle for DbusHandle {
        fn collections(&self) -> Result<Vec<CollectionRef>> {
            let collections = self.service.get_all_collections()?;
            tracing::debug!(count = collections.len(), "Enumerated collections");
            Ok(collections
                .iter()
                .map(|collection| CollectionRef::new(collection.path.to_string()))
                .collect())
        }
    }

    pub(super) fn negotiate(context: &SessionContext) -> Result<NegotiatedSession> {
        // Both algorithms are compiled in through the crypto-rust feature.
        tracing::debug!(algorithm = %context.algorithm, "Negotiating Secret Service session");
        Ok(NegotiatedSession::new(BACKEND_NAME, context.algorithm))
    }

    pub(super) fn connect(session: &NegotiatedSession) -> Result<Option<Box<dyn ServiceHandle>>> {
        let encryption = match session.algorithm() {
            SessionAlgorithm::Plain => EncryptionType::Plain,
            SessionAlgorithm::Dh => EncryptionType::Dh,
        };
        let service = SecretService::connect(encryption).map_err(|err| {
            tracing::debug!(error = %err, "Secret Service connection failed");
            StoreError::from(err)
        })?;
        Ok(Some(Box::new(DbusHandle { service })))
    }
}

#[cfg(not(any(target_os = "linux", target_os = "freebsd", target_os = "openbsd")))]
mod platform {
    use super::*;

    pub(super) fn negotiate(_context: &SessionContext) -> Result<NegotiatedSession> {
        Err(StoreError::Unavailable(format!(
            "no Secret Service bindings for target '{}'",
            std::env::consts::OS
        )))
    }

    pub(super) fn connect(_session: &NegotiatedSession) -> Result<Option<Box<dyn ServiceHandle>>> {
        Err(StoreError::Unavailable(format!(
            "no Secret Service bindings for target '{}'",
            std::env::consts::OS
        )))
    }
}
