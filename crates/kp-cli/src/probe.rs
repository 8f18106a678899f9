// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The keyring health check itself

use kp_secret_service::{SecretStore, SessionContext, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// Why the probe could not confirm a working keyring
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The daemon answered but produced no usable handle
    ConnectionFailure,
    /// Negotiation, connection or enumeration raised an error
    ServiceException { kind: &'static str, detail: String },
    /// The daemon did not answer within the bounded wait
    TimedOut { after: Duration },
}

impl ProbeFailure {
    /// Machine-readable tag for structured output
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeFailure::ConnectionFailure => "connection_failure",
            ProbeFailure::ServiceException { .. } => "service_exception",
            ProbeFailure::TimedOut { .. } => "timed_out",
        }
    }

    /// Error text to quote in the report, if any
    pub fn detail(&self) -> Option<String> {
        match self {
            ProbeFailure::ConnectionFailure => None,
            ProbeFailure::ServiceException { detail, .. } => Some(detail.clone()),
            ProbeFailure::TimedOut { after } => {
                Some(format!("timed out after {:?} waiting for the secret service", after))
            }
        }
    }
}

impl From<StoreError> for ProbeFailure {
    fn from(err: StoreError) -> Self {
        ProbeFailure::ServiceException {
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}

/// Tagged result of one probe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Healthy { collections: usize },
    Unreachable(ProbeFailure),
}

impl ProbeOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeOutcome::Healthy { .. })
    }

    /// Process exit status: 0 iff the daemon was reached and enumerated
    pub fn exit_code(&self) -> u8 {
        if self.is_healthy() {
            0
        } else {
            1
        }
    }
}

/// One-shot, read-only probe of a secret-storage backend
pub struct KeyringHealthCheck {
    store: Arc<dyn SecretStore>,
    context: SessionContext,
}

impl KeyringHealthCheck {
    pub fn new(store: Arc<dyn SecretStore>, context: SessionContext) -> Self {
        Self { store, context }
    }

    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    /// Negotiate, connect and enumerate, blocking the calling thread.
    ///
    /// Every error is captured into the returned outcome.
    pub fn run(&self) -> ProbeOutcome {
        let span = tracing::info_span!("keyring_probe", backend = self.backend());
        let _enter = span.enter();

        match self.try_run() {
            Ok(Some(collections)) => {
                tracing::info!(collections, "Secret service is healthy");
                ProbeOutcome::Healthy { collections }
            }
            Ok(None) => {
                tracing::warn!("Secret service returned no handle");
                ProbeOutcome::Unreachable(ProbeFailure::ConnectionFailure)
            }
            Err(err) => {
                tracing::warn!(error = %err, kind = err.kind(), "Secret service probe failed");
                ProbeOutcome::Unreachable(err.into())
            }
        }
    }

    fn try_run(&self) -> Result<Option<usize>, StoreError> {
        let session = self.store.negotiate(&self.context)?;
        tracing::debug!(
            backend = session.backend(),
            algorithm = %session.algorithm(),
            "Session negotiated"
        );

        let Some(handle) = self.store.connect(&session)? else {
            return Ok(None);
        };

        let collections = handle.collections()?;
        for collection in &collections {
            tracing::trace!(collection = collection.as_str(), "Found collection");
        }
        Ok(Some(collections.len()))
    }

    /// Run the probe on a blocking worker and stop waiting after `timeout`.
    ///
    /// A timed-out worker is abandoned, not cancelled; the caller should
    /// shut its runtime down in the background.
    pub async fn run_bounded(self, timeout: Duration) -> ProbeOutcome {
        let worker = tokio::task::spawn_blocking(move || self.run());

        match tokio::time::timeout(timeout, worker).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_err)) => {
                tracing::error!(error = %join_err, "Probe worker did not complete");
                ProbeOutcome::Unreachable(ProbeFailure::ServiceException {
                    kind: "worker",
                    detail: join_err.to_string(),
                })
            }
            Err(_) => {
                tracing::warn!(?timeout, "Secret service did not answer in time");
                ProbeOutcome::Unreachable(ProbeFailure::TimedOut { after: timeout })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kp_secret_service::{
        CollectionRef, MockSecretStore, MockServiceHandle, NegotiatedSession, ServiceHandle,
    };

    fn negotiating_store() -> MockSecretStore {
        let mut store = MockSecretStore::new();
        store.expect_name().return_const("mock");
        store
            .expect_negotiate()
            .returning(|ctx| Ok(NegotiatedSession::new("mock", ctx.algorithm)));
        store
    }

    fn handle_with(count: usize) -> Box<dyn ServiceHandle> {
        let mut handle = MockServiceHandle::new();
        handle.expect_collections().times(1).returning(move || {
            Ok((0..count)
                .map(|i| CollectionRef::new(format!("/org/freedesktop/secrets/collection/c{i}")))
                .collect())
        });
        Box::new(handle)
    }

    fn check(store: MockSecretStore) -> KeyringHealthCheck {
        KeyringHealthCheck::new(Arc::new(store), SessionContext::default())
    }

    #[test]
    fn healthy_service_reports_collection_count() {
        let mut store = negotiating_store();
        store.expect_connect().times(1).returning(|_| Ok(Some(handle_with(3))));

        let outcome = check(store).run();
        assert_eq!(outcome, ProbeOutcome::Healthy { collections: 3 });
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn empty_service_is_still_healthy() {
        let mut store = negotiating_store();
        store.expect_connect().returning(|_| Ok(Some(handle_with(0))));

        assert_eq!(check(store).run(), ProbeOutcome::Healthy { collections: 0 });
    }

    #[test]
    fn null_handle_is_a_connection_failure() {
        let mut store = negotiating_store();
        // No handle exists, so enumeration cannot be attempted.
        store.expect_connect().times(1).returning(|_| Ok(None));

        let outcome = check(store).run();
        assert_eq!(outcome, ProbeOutcome::Unreachable(ProbeFailure::ConnectionFailure));
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn connection_error_is_captured_with_detail() {
        let mut store = negotiating_store();
        store
            .expect_connect()
            .returning(|_| Err(StoreError::Service("permission denied".to_string())));

        let outcome = check(store).run();
        match &outcome {
            ProbeOutcome::Unreachable(failure) => {
                assert_eq!(failure.kind(), "service_exception");
                assert_eq!(failure.detail().as_deref(), Some("permission denied"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn enumeration_error_after_connect_fails_the_probe() {
        let mut store = negotiating_store();
        store.expect_connect().returning(|_| {
            let mut handle = MockServiceHandle::new();
            handle
                .expect_collections()
                .returning(|| Err(StoreError::Service("org.freedesktop.DBus.Error.NoReply".into())));
            Ok(Some(Box::new(handle) as Box<dyn ServiceHandle>))
        });

        let outcome = check(store).run();
        match &outcome {
            ProbeOutcome::Unreachable(failure) => {
                assert_eq!(failure.kind(), "service_exception");
                assert_eq!(
                    failure.detail().as_deref(),
                    Some("org.freedesktop.DBus.Error.NoReply")
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn negotiation_failure_skips_connect() {
        let mut store = MockSecretStore::new();
        store.expect_name().return_const("mock");
        store
            .expect_negotiate()
            .returning(|_| Err(StoreError::Unavailable("no bindings".to_string())));
        store.expect_connect().never();

        let outcome = check(store).run();
        match outcome {
            ProbeOutcome::Unreachable(ProbeFailure::ServiceException { kind, detail }) => {
                assert_eq!(kind, "unavailable");
                assert!(detail.contains("no bindings"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn repeated_runs_agree() {
        let mut store = negotiating_store();
        store.expect_connect().times(2).returning(|_| Ok(Some(handle_with(2))));

        let check = check(store);
        let first = check.run();
        let second = check.run();
        assert_eq!(first, second);
        assert_eq!(first.exit_code(), second.exit_code());
    }

    #[tokio::test]
    async fn bounded_run_returns_worker_outcome() {
        let mut store = negotiating_store();
        store.expect_connect().returning(|_| Ok(Some(handle_with(1))));

        let outcome = check(store).run_bounded(Duration::from_secs(5)).await;
        assert_eq!(outcome, ProbeOutcome::Healthy { collections: 1 });
    }

    #[tokio::test]
    async fn bounded_run_gives_up_on_a_stuck_daemon() {
        let mut store = negotiating_store();
        store.expect_connect().returning(|_| {
            std::thread::sleep(Duration::from_millis(300));
            Ok(None)
        });

        let timeout = Duration::from_millis(20);
        let outcome = check(store).run_bounded(timeout).await;
        assert_eq!(outcome, ProbeOutcome::Unreachable(ProbeFailure::TimedOut { after: timeout }));
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn timeout_detail_names_the_bound() {
        let failure = ProbeFailure::TimedOut { after: Duration::from_millis(1500) };
        assert_eq!(
            failure.detail().as_deref(),
            Some("timed out after 1.5s waiting for the secret service")
        );
    }
}
