// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use kp_logging::CliLoggingArgs;
use kp_secret_service::{SecretStore, SessionAlgorithm, SessionContext};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub mod probe;
pub mod report;

pub use clap::Parser;
pub use probe::{KeyringHealthCheck, ProbeFailure, ProbeOutcome};
pub use report::{HumanReadableFormatter, JsonFormatter, ProbeReport, ReportFormatter};

/// Component name used for logging
pub const COMPONENT: &str = "keyring-probe";

/// Upper bound on the wait for the daemon when none is given
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(clap::Parser, Debug, Serialize)]
#[command(
    name = "keyring-probe",
    about = "Check that the desktop Secret Service is reachable and lists its collections",
    version
)]
pub struct Cli {
    /// Give up on the daemon after this many milliseconds
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT_MS,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Maximum wait for the secret service, in milliseconds"
    )]
    pub timeout_ms: u64,

    /// Session transport encryption
    #[arg(long, value_enum, default_value_t = SessionAlgorithm::Plain)]
    pub algorithm: SessionAlgorithm,

    /// Output in JSON format
    #[arg(long, help = "Output in JSON format")]
    pub json: bool,

    #[command(flatten)]
    pub logging: CliLoggingArgs,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn session_context(&self) -> SessionContext {
        SessionContext::new(self.algorithm)
    }

    /// Run the probe against `store` and collect the report
    pub async fn execute(&self, store: Arc<dyn SecretStore>) -> ProbeReport {
        if let Ok(settings) = serde_json::to_string(self) {
            tracing::debug!(%settings, "Starting keyring probe");
        }

        let check = KeyringHealthCheck::new(store, self.session_context());
        let backend = check.backend();
        let outcome = check.run_bounded(self.timeout()).await;

        ProbeReport::new(backend, outcome)
    }

    /// Render the report in the format selected on the command line
    pub fn render(&self, report: &ProbeReport) -> String {
        if self.json {
            JsonFormatter.format(report)
        } else {
            HumanReadableFormatter.format(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_uses_defaults() {
        let cli = Cli::try_parse_from(["keyring-probe"]).unwrap();
        assert_eq!(cli.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(cli.algorithm, SessionAlgorithm::Plain);
        assert!(!cli.json);
        assert!(!cli.logging.logs_to_file());
    }

    #[test]
    fn flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "keyring-probe",
            "--timeout-ms",
            "250",
            "--algorithm",
            "dh",
            "--json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.timeout(), Duration::from_millis(250));
        assert_eq!(cli.session_context(), SessionContext::new(SessionAlgorithm::Dh));
        assert!(cli.json);
        assert_eq!(cli.logging.log_level, Some(kp_logging::CliLogLevel::Debug));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["keyring-probe", "--timeout-ms", "0"]).is_err());
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        assert!(Cli::try_parse_from(["keyring-probe", "--algorithm", "rot13"]).is_err());
    }
}
